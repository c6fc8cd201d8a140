//! Insert-mode seeding from the raw exports

use std::path::{Path, PathBuf};

use dbc_core::table::{
    TableSpec, FACT_DBC, FACT_DBC_PROFIEL, REF_DIAGNOSE, REF_SPECIALISME, REF_ZORGACTIVITEIT,
    REF_ZORGPRODUCT, REF_ZORGPROFIELKLASSE, ZORGACTIVITEIT_RAW_FILE,
};
use dbc_core::{
    parse, read_table, CsvTable, FactDbc, FactDbcProfiel, RefDiagnose, RefSpecialisme,
    RefZorgactiviteit, RefZorgproduct, RefZorgprofielklasse,
};
use sqlx::query_builder::Separated;
use sqlx::{PgPool, Postgres, QueryBuilder};

use super::{clear_tables, SeedError, SeedReport};

/// Rows per INSERT statement
pub const DEFAULT_CHUNK_SIZE: usize = 1000;

/// Postgres accepts at most this many bind parameters per statement
const MAX_BIND_PARAMS: usize = u16::MAX as usize;

#[derive(Debug, Clone, Copy)]
pub struct InsertOptions {
    pub chunk_size: usize,
}

impl Default for InsertOptions {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

/// A record that can be bound as one VALUES tuple, in `TableSpec` column order.
trait InsertRow {
    fn bind_values<'args>(&'args self, b: &mut Separated<'_, 'args, Postgres, &'static str>);
}

impl InsertRow for RefSpecialisme {
    fn bind_values<'args>(&'args self, b: &mut Separated<'_, 'args, Postgres, &'static str>) {
        b.push_bind(self.specialisme_cd.as_str())
            .push_bind(self.omschrijving.as_str())
            .push_bind(self.versie.as_str())
            .push_bind(self.datum_bestand)
            .push_bind(self.peildatum);
    }
}

impl InsertRow for RefZorgprofielklasse {
    fn bind_values<'args>(&'args self, b: &mut Separated<'_, 'args, Postgres, &'static str>) {
        b.push_bind(self.zorgprofielklasse_cd.as_str())
            .push_bind(self.zorgprofielklasse_oms.as_str())
            .push_bind(self.versie.as_str())
            .push_bind(self.datum_bestand)
            .push_bind(self.peildatum);
    }
}

impl InsertRow for RefZorgactiviteit {
    fn bind_values<'args>(&'args self, b: &mut Separated<'_, 'args, Postgres, &'static str>) {
        b.push_bind(self.zorgactiviteit_cd.as_str())
            .push_bind(self.omschrijving.as_str())
            .push_bind(self.zorgprofielklasse_cd.as_str())
            .push_bind(self.versie.as_str())
            .push_bind(self.datum_bestand)
            .push_bind(self.peildatum);
    }
}

impl InsertRow for RefZorgproduct {
    fn bind_values<'args>(&'args self, b: &mut Separated<'_, 'args, Postgres, &'static str>) {
        b.push_bind(self.zorgproduct_cd.as_str())
            .push_bind(self.latijn_oms.as_str())
            .push_bind(self.consument_oms.as_str())
            .push_bind(self.declaratie_verzekerd_cd.as_str())
            .push_bind(self.declaratie_onverzekerd_cd.as_deref())
            .push_bind(self.versie.as_str())
            .push_bind(self.datum_bestand)
            .push_bind(self.peildatum);
    }
}

impl InsertRow for RefDiagnose {
    fn bind_values<'args>(&'args self, b: &mut Separated<'_, 'args, Postgres, &'static str>) {
        b.push_bind(self.diagnose_cd.as_str())
            .push_bind(self.specialisme_cd.as_str())
            .push_bind(self.diagnose_omschrijving.as_str())
            .push_bind(self.versie.as_str())
            .push_bind(self.datum_bestand)
            .push_bind(self.peildatum);
    }
}

impl InsertRow for FactDbc {
    fn bind_values<'args>(&'args self, b: &mut Separated<'_, 'args, Postgres, &'static str>) {
        // float8 is assignment-cast to NUMERIC by the server
        b.push_bind(self.jaar)
            .push_bind(self.behandelend_specialisme_cd.as_str())
            .push_bind(self.typerende_diagnose_cd.as_str())
            .push_bind(self.zorgproduct_cd.as_str())
            .push_bind(self.aantal_pat_per_zpd)
            .push_bind(self.aantal_subtraject_per_zpd)
            .push_bind(self.aantal_pat_per_diag)
            .push_bind(self.aantal_subtraject_per_diag)
            .push_bind(self.aantal_pat_per_spc)
            .push_bind(self.aantal_subtraject_per_spc)
            .push_bind(self.gemiddelde_verkoopprijs)
            .push_bind(self.versie.as_str())
            .push_bind(self.datum_bestand)
            .push_bind(self.peildatum);
    }
}

impl InsertRow for FactDbcProfiel {
    fn bind_values<'args>(&'args self, b: &mut Separated<'_, 'args, Postgres, &'static str>) {
        b.push_bind(self.jaar)
            .push_bind(self.behandelend_specialisme_cd.as_str())
            .push_bind(self.typerende_diagnose_cd.as_str())
            .push_bind(self.zorgproduct_cd.as_str())
            .push_bind(self.zorgactiviteit_cd.as_str())
            .push_bind(self.zorgprofielklasse_cd.as_str())
            .push_bind(self.aantal_pat)
            .push_bind(self.aantal_subtraject)
            .push_bind(self.aantal_zat)
            .push_bind(self.som_aantal_zat)
            .push_bind(self.versie.as_str())
            .push_bind(self.datum_bestand)
            .push_bind(self.peildatum);
    }
}

/// `INSERT INTO table (cols) ` prefix for a chunk
fn insert_prefix(spec: &TableSpec) -> String {
    format!(
        "INSERT INTO {} ({}) ",
        spec.table,
        spec.output_headers().join(", ")
    )
}

fn chunk_count(rows: usize, chunk_size: usize) -> usize {
    rows.div_ceil(chunk_size.max(1))
}

/// Requested chunk size, bounded so one chunk fits in a single statement.
fn effective_chunk_size(spec: &TableSpec, requested: usize) -> usize {
    let max_rows = MAX_BIND_PARAMS / spec.columns.len().max(1);
    requested.clamp(1, max_rows)
}

/// Insert all rows of one table inside a single transaction.
async fn insert_table<T: InsertRow>(
    pool: &PgPool,
    spec: &TableSpec,
    rows: &[T],
    chunk_size: usize,
) -> Result<u64, SeedError> {
    let effective = effective_chunk_size(spec, chunk_size);
    if effective < chunk_size {
        tracing::warn!(
            table = spec.table,
            requested = chunk_size,
            effective,
            "chunk size exceeds the bind parameter limit, lowering it"
        );
    }
    let chunk_size = effective;
    let total = rows.len();
    let chunks = chunk_count(total, chunk_size);
    let prefix = insert_prefix(spec);
    let db_err = || SeedError::database(spec.table);

    tracing::info!(table = spec.table, rows = total, chunks, "inserting");

    let mut tx = pool.begin().await.map_err(db_err())?;
    let mut done = 0usize;

    for (i, chunk) in rows.chunks(chunk_size).enumerate() {
        let mut builder: QueryBuilder<'_, Postgres> = QueryBuilder::new(&prefix);
        builder.push_values(chunk, |mut b, row| row.bind_values(&mut b));
        builder
            .build()
            .execute(&mut *tx)
            .await
            .map_err(db_err())?;

        done += chunk.len();
        tracing::info!(
            table = spec.table,
            chunk = i + 1,
            chunks,
            done,
            total,
            "[{}] chunk {}/{} ({}/{})",
            spec.table,
            i + 1,
            chunks,
            done,
            total
        );
    }

    tx.commit().await.map_err(db_err())?;
    Ok(total as u64)
}

/// Read a raw export off the async runtime.
async fn load_raw(raw_dir: &Path, file: &str) -> Result<CsvTable, SeedError> {
    let path: PathBuf = raw_dir.join(file);
    if !path.exists() {
        return Err(SeedError::MissingFile(path));
    }
    let table = tokio::task::spawn_blocking(move || read_table(&path)).await??;
    Ok(table)
}

/// Clear every table, then load the raw exports from `raw_dir`.
pub async fn seed_from_raw(
    pool: &PgPool,
    raw_dir: &Path,
    options: InsertOptions,
) -> Result<SeedReport, SeedError> {
    let chunk = options.chunk_size;
    let mut report = SeedReport::default();

    clear_tables(pool).await?;

    let specialismen = parse::specialismen(&load_raw(raw_dir, REF_SPECIALISME.raw_file).await?)?;
    let (activities, classes) =
        parse::split_zorgactiviteit(&load_raw(raw_dir, ZORGACTIVITEIT_RAW_FILE).await?)?;
    let zorgproducten = parse::zorgproducten(&load_raw(raw_dir, REF_ZORGPRODUCT.raw_file).await?)?;
    let diagnoses = parse::diagnoses(&load_raw(raw_dir, REF_DIAGNOSE.raw_file).await?)?;

    report.record(
        REF_SPECIALISME.table,
        insert_table(pool, &REF_SPECIALISME, &specialismen, chunk).await?,
    );
    report.record(
        REF_ZORGPROFIELKLASSE.table,
        insert_table(pool, &REF_ZORGPROFIELKLASSE, &classes, chunk).await?,
    );
    report.record(
        REF_ZORGACTIVITEIT.table,
        insert_table(pool, &REF_ZORGACTIVITEIT, &activities, chunk).await?,
    );
    report.record(
        REF_ZORGPRODUCT.table,
        insert_table(pool, &REF_ZORGPRODUCT, &zorgproducten, chunk).await?,
    );
    report.record(
        REF_DIAGNOSE.table,
        insert_table(pool, &REF_DIAGNOSE, &diagnoses, chunk).await?,
    );

    // Fact files are the large ones; parse each just before loading it.
    let facts = parse::facts(&load_raw(raw_dir, FACT_DBC.raw_file).await?)?;
    report.record(
        FACT_DBC.table,
        insert_table(pool, &FACT_DBC, &facts, chunk).await?,
    );
    drop(facts);

    let profiel = parse::profiel_facts(&load_raw(raw_dir, FACT_DBC_PROFIEL.raw_file).await?)?;
    report.record(
        FACT_DBC_PROFIEL.table,
        insert_table(pool, &FACT_DBC_PROFIEL, &profiel, chunk).await?,
    );

    for (table, rows) in &report.tables {
        tracing::info!(table, rows, "seeded");
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::test_support;
    use dbc_core::SEED_ORDER;

    #[test]
    fn prefix_lists_columns_in_table_order() {
        assert_eq!(
            insert_prefix(&REF_SPECIALISME),
            "INSERT INTO ref_specialisme (specialisme_cd, omschrijving, versie, datum_bestand, peildatum) "
        );
    }

    #[test]
    fn chunk_counts() {
        assert_eq!(chunk_count(0, 1000), 0);
        assert_eq!(chunk_count(1, 1000), 1);
        assert_eq!(chunk_count(1000, 1000), 1);
        assert_eq!(chunk_count(2500, 1000), 3);
        assert_eq!(chunk_count(3, 0), 3);
    }

    #[test]
    fn chunk_size_is_capped_by_bind_limit() {
        // 14 columns per fact row
        assert_eq!(effective_chunk_size(&FACT_DBC, 5000), 4681);
        assert_eq!(effective_chunk_size(&FACT_DBC, DEFAULT_CHUNK_SIZE), DEFAULT_CHUNK_SIZE);
        assert_eq!(effective_chunk_size(&REF_SPECIALISME, 0), 1);

        for spec in &SEED_ORDER {
            let rows = effective_chunk_size(spec, usize::MAX);
            assert!(rows * spec.columns.len() <= u16::MAX as usize, "{}", spec.table);
        }
    }

    #[tokio::test]
    async fn missing_raw_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_raw(dir.path(), REF_SPECIALISME.raw_file).await.unwrap_err();
        assert!(matches!(err, SeedError::MissingFile(p) if p.ends_with("06_REF_SPC.csv")));
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn seeds_raw_exports_in_small_chunks() {
        let (pool, _guard) = test_support::database().await;
        let dir = tempfile::tempdir().unwrap();
        test_support::write_raw_exports(dir.path());

        let report = seed_from_raw(&pool, dir.path(), InsertOptions { chunk_size: 2 })
            .await
            .unwrap();

        assert_eq!(report.rows_for("ref_specialisme"), Some(2));
        assert_eq!(report.rows_for("ref_zorgprofielklasse"), Some(1));
        assert_eq!(report.rows_for("ref_zorgactiviteit"), Some(2));
        assert_eq!(report.rows_for("ref_zorgproduct"), Some(1));
        assert_eq!(report.rows_for("ref_diagnose"), Some(3));
        assert_eq!(report.rows_for("fact_dbc"), Some(5));
        assert_eq!(report.rows_for("fact_dbc_profiel"), Some(2));

        let stored: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM fact_dbc")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(stored, 5);
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn oversized_chunk_size_still_seeds() {
        let (pool, _guard) = test_support::database().await;
        let dir = tempfile::tempdir().unwrap();
        test_support::write_raw_exports(dir.path());

        let report = seed_from_raw(&pool, dir.path(), InsertOptions { chunk_size: 100_000 })
            .await
            .unwrap();
        assert_eq!(report.total(), 16);
    }
}
