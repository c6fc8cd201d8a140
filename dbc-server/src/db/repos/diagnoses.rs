//! Diagnosis repository
//!
//! A diagnosis is keyed by (diagnose_cd, specialisme_cd). Several reference
//! snapshots may exist; single lookups take the latest `peildatum`.

use dbc_core::RefDiagnose;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use super::DbError;

const COLUMNS: &str =
    "diagnose_cd, specialisme_cd, diagnose_omschrijving, versie, datum_bestand, peildatum";

fn from_row(row: &PgRow) -> Result<RefDiagnose, sqlx::Error> {
    Ok(RefDiagnose {
        diagnose_cd: row.try_get("diagnose_cd")?,
        specialisme_cd: row.try_get("specialisme_cd")?,
        diagnose_omschrijving: row.try_get("diagnose_omschrijving")?,
        versie: row.try_get("versie")?,
        datum_bestand: row.try_get("datum_bestand")?,
        peildatum: row.try_get("peildatum")?,
    })
}

pub struct DiagnoseRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> DiagnoseRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Every diagnosis row, oldest snapshot first so later ones win in lookups.
    pub async fn all(&self) -> Result<Vec<RefDiagnose>, DbError> {
        let sql = format!(
            "SELECT {COLUMNS} FROM ref_diagnose \
             ORDER BY specialisme_cd ASC, diagnose_cd ASC, peildatum ASC"
        );
        let rows = sqlx::query(&sql).fetch_all(self.pool).await?;
        Ok(rows.iter().map(from_row).collect::<Result<Vec<_>, _>>()?)
    }

    pub async fn for_specialism(&self, specialisme_cd: &str) -> Result<Vec<RefDiagnose>, DbError> {
        let sql = format!(
            "SELECT {COLUMNS} FROM ref_diagnose WHERE specialisme_cd = $1 \
             ORDER BY diagnose_cd ASC, peildatum ASC"
        );
        let rows = sqlx::query(&sql)
            .bind(specialisme_cd)
            .fetch_all(self.pool)
            .await?;
        Ok(rows.iter().map(from_row).collect::<Result<Vec<_>, _>>()?)
    }

    pub async fn find(
        &self,
        diagnose_cd: &str,
        specialisme_cd: &str,
    ) -> Result<Option<RefDiagnose>, DbError> {
        let sql = format!(
            "SELECT {COLUMNS} FROM ref_diagnose \
             WHERE diagnose_cd = $1 AND specialisme_cd = $2 \
             ORDER BY peildatum DESC LIMIT 1"
        );
        let row = sqlx::query(&sql)
            .bind(diagnose_cd)
            .bind(specialisme_cd)
            .fetch_optional(self.pool)
            .await?;

        Ok(row.as_ref().map(from_row).transpose()?)
    }

    pub async fn get(&self, diagnose_cd: &str, specialisme_cd: &str) -> Result<RefDiagnose, DbError> {
        self.find(diagnose_cd, specialisme_cd)
            .await?
            .ok_or_else(|| DbError::not_found("diagnose", format!("{specialisme_cd}/{diagnose_cd}")))
    }
}
