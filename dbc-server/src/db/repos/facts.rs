//! Fact table repository
//!
//! Rows come back in the order the analytics expect: newest year first,
//! then by patient count.

use dbc_core::{FactDbc, FactDbcProfiel};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use super::DbError;

fn fact_from_row(row: &PgRow) -> Result<FactDbc, sqlx::Error> {
    Ok(FactDbc {
        jaar: row.try_get("jaar")?,
        behandelend_specialisme_cd: row.try_get("behandelend_specialisme_cd")?,
        typerende_diagnose_cd: row.try_get("typerende_diagnose_cd")?,
        zorgproduct_cd: row.try_get("zorgproduct_cd")?,
        aantal_pat_per_zpd: row.try_get("aantal_pat_per_zpd")?,
        aantal_subtraject_per_zpd: row.try_get("aantal_subtraject_per_zpd")?,
        aantal_pat_per_diag: row.try_get("aantal_pat_per_diag")?,
        aantal_subtraject_per_diag: row.try_get("aantal_subtraject_per_diag")?,
        aantal_pat_per_spc: row.try_get("aantal_pat_per_spc")?,
        aantal_subtraject_per_spc: row.try_get("aantal_subtraject_per_spc")?,
        gemiddelde_verkoopprijs: row.try_get("gemiddelde_verkoopprijs")?,
        versie: row.try_get("versie")?,
        datum_bestand: row.try_get("datum_bestand")?,
        peildatum: row.try_get("peildatum")?,
    })
}

fn profiel_from_row(row: &PgRow) -> Result<FactDbcProfiel, sqlx::Error> {
    Ok(FactDbcProfiel {
        jaar: row.try_get("jaar")?,
        behandelend_specialisme_cd: row.try_get("behandelend_specialisme_cd")?,
        typerende_diagnose_cd: row.try_get("typerende_diagnose_cd")?,
        zorgproduct_cd: row.try_get("zorgproduct_cd")?,
        zorgactiviteit_cd: row.try_get("zorgactiviteit_cd")?,
        zorgprofielklasse_cd: row.try_get("zorgprofielklasse_cd")?,
        aantal_pat: row.try_get("aantal_pat")?,
        aantal_subtraject: row.try_get("aantal_subtraject")?,
        aantal_zat: row.try_get("aantal_zat")?,
        som_aantal_zat: row.try_get("som_aantal_zat")?,
        versie: row.try_get("versie")?,
        datum_bestand: row.try_get("datum_bestand")?,
        peildatum: row.try_get("peildatum")?,
    })
}

/// `fact_dbc` / `fact_dbc_profiel` repository
pub struct FactDbcRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> FactDbcRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// All yearly facts for one product. Empty when the product has none.
    pub async fn by_product(&self, zorgproduct_cd: &str) -> Result<Vec<FactDbc>, DbError> {
        let rows = sqlx::query(
            r#"
            SELECT jaar, behandelend_specialisme_cd, typerende_diagnose_cd, zorgproduct_cd,
                   aantal_pat_per_zpd, aantal_subtraject_per_zpd,
                   aantal_pat_per_diag, aantal_subtraject_per_diag,
                   aantal_pat_per_spc, aantal_subtraject_per_spc,
                   gemiddelde_verkoopprijs::float8 AS gemiddelde_verkoopprijs,
                   versie, datum_bestand, peildatum
            FROM fact_dbc
            WHERE zorgproduct_cd = $1
            ORDER BY jaar DESC, aantal_pat_per_zpd DESC
            "#,
        )
        .bind(zorgproduct_cd)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.iter().map(fact_from_row).collect::<Result<Vec<_>, _>>()?)
    }

    /// Care activity profile rows for one product.
    pub async fn profiel_by_product(
        &self,
        zorgproduct_cd: &str,
    ) -> Result<Vec<FactDbcProfiel>, DbError> {
        let rows = sqlx::query(
            r#"
            SELECT jaar, behandelend_specialisme_cd, typerende_diagnose_cd, zorgproduct_cd,
                   zorgactiviteit_cd, zorgprofielklasse_cd,
                   aantal_pat, aantal_subtraject, aantal_zat, som_aantal_zat,
                   versie, datum_bestand, peildatum
            FROM fact_dbc_profiel
            WHERE zorgproduct_cd = $1
            ORDER BY jaar DESC, aantal_pat DESC, zorgactiviteit_cd ASC
            "#,
        )
        .bind(zorgproduct_cd)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.iter().map(profiel_from_row).collect::<Result<Vec<_>, _>>()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    #[ignore = "requires database"]
    async fn facts_are_newest_year_first() {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let pool = crate::db::create_pool(&url).await.unwrap();
        let repo = FactDbcRepo::new(&pool);

        let facts = repo.by_product("990017013").await.unwrap();
        assert!(facts.windows(2).all(|w| w[0].jaar >= w[1].jaar));

        let unknown = repo.by_product("000000000").await.unwrap();
        assert!(unknown.is_empty());
    }
}
