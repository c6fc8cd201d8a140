//! Care activity and profile class lists

use dbc_core::{RefZorgactiviteit, RefZorgprofielklasse};
use sqlx::{PgPool, Row};

use super::DbError;

pub struct ZorgactiviteitRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> ZorgactiviteitRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn all(&self) -> Result<Vec<RefZorgactiviteit>, DbError> {
        let rows = sqlx::query(
            r#"
            SELECT zorgactiviteit_cd, omschrijving, zorgprofielklasse_cd,
                   versie, datum_bestand, peildatum
            FROM ref_zorgactiviteit
            ORDER BY zorgactiviteit_cd ASC
            "#,
        )
        .fetch_all(self.pool)
        .await?;

        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            out.push(RefZorgactiviteit {
                zorgactiviteit_cd: row.try_get("zorgactiviteit_cd")?,
                omschrijving: row.try_get("omschrijving")?,
                zorgprofielklasse_cd: row.try_get("zorgprofielklasse_cd")?,
                versie: row.try_get("versie")?,
                datum_bestand: row.try_get("datum_bestand")?,
                peildatum: row.try_get("peildatum")?,
            });
        }
        Ok(out)
    }
}

pub struct ZorgprofielklasseRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> ZorgprofielklasseRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn all(&self) -> Result<Vec<RefZorgprofielklasse>, DbError> {
        let rows = sqlx::query(
            r#"
            SELECT zorgprofielklasse_cd, zorgprofielklasse_oms, versie, datum_bestand, peildatum
            FROM ref_zorgprofielklasse
            ORDER BY zorgprofielklasse_cd ASC
            "#,
        )
        .fetch_all(self.pool)
        .await?;

        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            out.push(RefZorgprofielklasse {
                zorgprofielklasse_cd: row.try_get("zorgprofielklasse_cd")?,
                zorgprofielklasse_oms: row.try_get("zorgprofielklasse_oms")?,
                versie: row.try_get("versie")?,
                datum_bestand: row.try_get("datum_bestand")?,
                peildatum: row.try_get("peildatum")?,
            });
        }
        Ok(out)
    }
}
