//! Specialism repository

use dbc_core::RefSpecialisme;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use super::DbError;

fn from_row(row: &PgRow) -> Result<RefSpecialisme, sqlx::Error> {
    Ok(RefSpecialisme {
        specialisme_cd: row.try_get("specialisme_cd")?,
        omschrijving: row.try_get("omschrijving")?,
        versie: row.try_get("versie")?,
        datum_bestand: row.try_get("datum_bestand")?,
        peildatum: row.try_get("peildatum")?,
    })
}

pub struct SpecialismeRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> SpecialismeRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// All specialisms, ordered by code.
    pub async fn all(&self) -> Result<Vec<RefSpecialisme>, DbError> {
        let rows = sqlx::query(
            r#"
            SELECT specialisme_cd, omschrijving, versie, datum_bestand, peildatum
            FROM ref_specialisme
            ORDER BY specialisme_cd ASC
            "#,
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows.iter().map(from_row).collect::<Result<Vec<_>, _>>()?)
    }

    pub async fn find(&self, code: &str) -> Result<Option<RefSpecialisme>, DbError> {
        let row = sqlx::query(
            r#"
            SELECT specialisme_cd, omschrijving, versie, datum_bestand, peildatum
            FROM ref_specialisme
            WHERE specialisme_cd = $1
            "#,
        )
        .bind(code)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.as_ref().map(from_row).transpose()?)
    }

    pub async fn get(&self, code: &str) -> Result<RefSpecialisme, DbError> {
        self.find(code)
            .await?
            .ok_or_else(|| DbError::not_found("specialisme", code))
    }
}
