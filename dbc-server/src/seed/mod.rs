//! Loading the DBC exports into PostgreSQL
//!
//! Two strategies:
//! - [`seed_from_raw`] parses the raw upper-case exports and inserts typed
//!   rows in chunks, one transaction per table
//! - [`seed_from_normalized`] truncates everything and streams the
//!   normalized CSV files through `COPY ... FROM STDIN`
//!
//! Both load tables in [`dbc_core::SEED_ORDER`] and clear in reverse.

mod copy;
mod insert;

use std::path::PathBuf;

use dbc_core::table::clear_order;
use dbc_core::DbcError;
use sqlx::PgPool;

pub use copy::seed_from_normalized;
pub use insert::{seed_from_raw, InsertOptions, DEFAULT_CHUNK_SIZE};

/// Errors raised while seeding
#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error(transparent)]
    Source(#[from] DbcError),

    #[error("database error while seeding {table}: {source}")]
    Database {
        table: &'static str,
        #[source]
        source: sqlx::Error,
    },

    #[error("data file not found: {0}")]
    MissingFile(PathBuf),

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("background task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl SeedError {
    pub(crate) fn database(table: &'static str) -> impl FnOnce(sqlx::Error) -> Self {
        move |source| Self::Database { table, source }
    }
}

/// Row counts per loaded table, in load order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub tables: Vec<(&'static str, u64)>,
}

impl SeedReport {
    pub fn record(&mut self, table: &'static str, rows: u64) {
        self.tables.push((table, rows));
    }

    pub fn rows_for(&self, table: &str) -> Option<u64> {
        self.tables
            .iter()
            .find(|(name, _)| *name == table)
            .map(|(_, rows)| *rows)
    }

    pub fn total(&self) -> u64 {
        self.tables.iter().map(|(_, rows)| rows).sum()
    }
}

/// Delete every row, facts before the references they point at.
pub async fn clear_tables(pool: &PgPool) -> Result<(), SeedError> {
    for table in clear_order() {
        tracing::info!(table, "clearing");
        sqlx::query(&format!("DELETE FROM {table}"))
            .execute(pool)
            .await
            .map_err(SeedError::database(table))?;
    }
    Ok(())
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::path::Path;

    use sqlx::PgPool;
    use tokio::sync::{Mutex, MutexGuard};

    /// Seeding tests rewrite every table; run them one at a time.
    static DATABASE_LOCK: Mutex<()> = Mutex::const_new(());

    /// Migrated pool for `DATABASE_URL`, plus the lock guarding its tables
    pub async fn database() -> (PgPool, MutexGuard<'static, ()>) {
        let guard = DATABASE_LOCK.lock().await;
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let pool = crate::db::create_pool(&url).await.expect("pool creation failed");
        crate::db::migrations::run(&pool).await.expect("migrations failed");
        (pool, guard)
    }

    /// Small raw export set: two specialisms, three diagnoses, one product
    /// with five fact rows over 2021-2023.
    pub fn write_raw_exports(dir: &Path) {
        let files = [
            (
                "06_REF_SPC.csv",
                "SPECIALISME_CD,OMSCHRIJVING,VERSIE,DATUM_BESTAND,PEILDATUM\n\
                 0303,Chirurgie,v1,2024-05-01,2024-04-01\n\
                 0313,Interne geneeskunde,v1,2024-05-01,2024-04-01\n",
            ),
            (
                "03_REF_ZAT.csv",
                "ZORGACTIVITEIT_CD,OMSCHRIJVING,ZORGPROFIELKLASSE_CD,ZORGPROFIELKLASSE_OMS,\
                 VERSIE,DATUM_BESTAND,PEILDATUM\n\
                 010001,Eerste polikliniekbezoek,1,Polikliniekbezoek,v1,2024-05-01,2024-04-01\n\
                 010002,Herhaalbezoek,1,Polikliniekbezoek,v1,2024-05-01,2024-04-01\n",
            ),
            (
                "05_REF_ZPD.csv",
                "ZORGPRODUCT_CD,LATIJN_OMS,CONSUMENT_OMS,DECLARATIE_VERZEKERD_CD,\
                 DECLARATIE_ONVERZEKERD_CD,VERSIE,DATUM_BESTAND,PEILDATUM\n\
                 990017013,Pneumonie,\"Longontsteking, opname\",14D195,,v1,2024-05-01,2024-04-01\n",
            ),
            (
                "04_REF_DGN.csv",
                "DIAGNOSE_CD,SPECIALISME_CD,DIAGNOSE_OMSCHRIJVING,VERSIE,DATUM_BESTAND,PEILDATUM\n\
                 1101,0303,Hernia,v1,2024-05-01,2024-04-01\n\
                 1102,0303,Liesbreuk,v1,2024-05-01,2024-04-01\n\
                 2201,0313,Longontsteking,v1,2024-05-01,2024-04-01\n",
            ),
            (
                "01_DBC.csv",
                "JAAR,BEHANDELEND_SPECIALISME_CD,TYPERENDE_DIAGNOSE_CD,ZORGPRODUCT_CD,\
                 AANTAL_PAT_PER_ZPD,AANTAL_SUBTRAJECT_PER_ZPD,AANTAL_PAT_PER_DIAG,\
                 AANTAL_SUBTRAJECT_PER_DIAG,AANTAL_PAT_PER_SPC,AANTAL_SUBTRAJECT_PER_SPC,\
                 GEMIDDELDE_VERKOOPPRIJS,VERSIE,DATUM_BESTAND,PEILDATUM\n\
                 2023,0303,1101,990017013,10,11,12,13,14,15,1234.50,v1,2024-05-01,2024-04-01\n\
                 2023,0303,1102,990017013,4,4,4,4,14,15,1234.50,v1,2024-05-01,2024-04-01\n\
                 2022,0303,1101,990017013,9,9,9,9,9,9,,v1,2024-05-01,2024-04-01\n\
                 2021,0313,2201,990017013,7,7,7,7,7,7,1100.00,v1,2024-05-01,2024-04-01\n\
                 2021,0303,1101,990017013,3,3,3,3,3,3,1100.00,v1,2024-05-01,2024-04-01\n",
            ),
            (
                "02_DBC_PROFIEL.csv",
                "JAAR,BEHANDELEND_SPECIALISME_CD,TYPERENDE_DIAGNOSE_CD,ZORGPRODUCT_CD,\
                 ZORGACTIVITEIT_CD,ZORGPROFIELKLASSE_CD,AANTAL_PAT,AANTAL_SUBTRAJECT,AANTAL_ZAT,\
                 SOM_AANTAL_ZAT,VERSIE,DATUM_BESTAND,PEILDATUM\n\
                 2023,0303,1101,990017013,010001,1,10,10,1,10,v1,2024-05-01,2024-04-01\n\
                 2023,0303,1101,990017013,010002,1,6,6,2,12,v1,2024-05-01,2024-04-01\n",
            ),
        ];

        for (name, content) in files {
            std::fs::write(dir.join(name), content).unwrap();
        }
    }
}
