//! Raw export → normalized seed files.
//!
//! Selects and renames columns; values are copied verbatim. The activity
//! export is split into activities and their (deduplicated) profile classes.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::info;

use crate::csv_io::{read_table, write_table, HeaderIndex};
use crate::error::Result;
use crate::table::{
    ColumnMap, TableSpec, FACT_DBC, FACT_DBC_PROFIEL, REF_DIAGNOSE, REF_SPECIALISME,
    REF_ZORGACTIVITEIT, REF_ZORGPRODUCT, REF_ZORGPROFIELKLASSE, ZORGACTIVITEIT_RAW_FILE,
    ZORGPROFIELKLASSE_KEY,
};

/// Progress is logged every this many rows
pub const LOG_EVERY: usize = 250_000;

/// Row counts written per normalized file
#[derive(Debug, Clone, Default, Serialize)]
pub struct TransformReport {
    pub files: Vec<(String, usize)>,
}

impl TransformReport {
    fn record(&mut self, file: &str, rows: usize) {
        self.files.push((file.to_string(), rows));
    }

    pub fn rows_for(&self, file: &str) -> Option<usize> {
        self.files
            .iter()
            .find(|(name, _)| name == file)
            .map(|(_, rows)| *rows)
    }
}

fn log_progress(label: &str, current: usize, total: usize) {
    let percent = if total == 0 {
        100
    } else {
        ((current as f64 / total as f64) * 100.0).round() as u32
    };
    info!("{label}: {current}/{total} ({percent}%)");
}

/// Project every row onto the given columns.
pub fn map_rows(
    rows: &[Vec<String>],
    index: &HeaderIndex,
    columns: &[ColumnMap],
    label: &str,
) -> Vec<Vec<String>> {
    let total = rows.len();
    rows.iter()
        .enumerate()
        .map(|(i, row)| {
            let mapped = columns
                .iter()
                .map(|c| index.cell(row, c.input).to_string())
                .collect();
            if i + 1 == total || (i + 1) % LOG_EVERY == 0 {
                log_progress(label, i + 1, total);
            }
            mapped
        })
        .collect()
}

/// Transform one raw export into its normalized file. Returns rows written.
pub fn transform_table(spec: &TableSpec, raw_dir: &Path, out_dir: &Path) -> Result<usize> {
    info!("Transforming {} -> {}", spec.raw_file, spec.normalized_file);
    let input = raw_dir.join(spec.raw_file);
    let output = out_dir.join(spec.normalized_file);

    let table = read_table(&input)?;
    let index = table.header_index();
    index.require(&spec.input_headers(), spec.raw_file)?;

    let mapped = map_rows(
        &table.rows,
        &index,
        spec.columns,
        &format!("Mapping {}", spec.normalized_file),
    );
    write_table(&output, &spec.output_headers(), &mapped)?;

    info!("Wrote {} rows to {}", mapped.len(), spec.normalized_file);
    Ok(mapped.len())
}

/// Keep the first row seen for each profile class code, in input order.
pub fn distinct_profielklassen(rows: &[Vec<String>], index: &HeaderIndex) -> Vec<Vec<String>> {
    let mut seen = HashSet::new();
    let total = rows.len();
    let label = format!("Mapping {}", REF_ZORGPROFIELKLASSE.normalized_file);
    let mut out = Vec::new();

    for (i, row) in rows.iter().enumerate() {
        let key = index.cell(row, ZORGPROFIELKLASSE_KEY);
        if seen.insert(key.to_string()) {
            out.push(
                REF_ZORGPROFIELKLASSE
                    .columns
                    .iter()
                    .map(|c| index.cell(row, c.input).to_string())
                    .collect(),
            );
        }
        if i + 1 == total || (i + 1) % LOG_EVERY == 0 {
            log_progress(&label, i + 1, total);
        }
    }
    out
}

/// Split the activity export into activities and profile classes.
///
/// Returns `(activities, profile classes)` row counts.
pub fn transform_zorgactiviteit(raw_dir: &Path, out_dir: &Path) -> Result<(usize, usize)> {
    info!(
        "Transforming {} -> {}",
        ZORGACTIVITEIT_RAW_FILE, REF_ZORGACTIVITEIT.normalized_file
    );
    let input = raw_dir.join(ZORGACTIVITEIT_RAW_FILE);
    let table = read_table(&input)?;
    let index = table.header_index();
    index.require(&REF_ZORGACTIVITEIT.input_headers(), ZORGACTIVITEIT_RAW_FILE)?;
    index.require(&REF_ZORGPROFIELKLASSE.input_headers(), ZORGACTIVITEIT_RAW_FILE)?;

    let activities = map_rows(
        &table.rows,
        &index,
        REF_ZORGACTIVITEIT.columns,
        &format!("Mapping {}", REF_ZORGACTIVITEIT.normalized_file),
    );
    let classes = distinct_profielklassen(&table.rows, &index);

    write_table(
        &out_dir.join(REF_ZORGACTIVITEIT.normalized_file),
        &REF_ZORGACTIVITEIT.output_headers(),
        &activities,
    )?;
    info!(
        "Wrote {} rows to {}",
        activities.len(),
        REF_ZORGACTIVITEIT.normalized_file
    );

    write_table(
        &out_dir.join(REF_ZORGPROFIELKLASSE.normalized_file),
        &REF_ZORGPROFIELKLASSE.output_headers(),
        &classes,
    )?;
    info!(
        "Wrote {} rows to {}",
        classes.len(),
        REF_ZORGPROFIELKLASSE.normalized_file
    );

    Ok((activities.len(), classes.len()))
}

/// Directories used by a full transform run
#[derive(Debug, Clone)]
pub struct TransformPaths {
    pub raw_dir: PathBuf,
    pub out_dir: PathBuf,
}

/// Transform every raw export. Stops at the first failing file.
pub fn transform_all(paths: &TransformPaths) -> Result<TransformReport> {
    let mut report = TransformReport::default();

    for spec in [REF_SPECIALISME, REF_ZORGPRODUCT, REF_DIAGNOSE, FACT_DBC, FACT_DBC_PROFIEL] {
        let rows = transform_table(&spec, &paths.raw_dir, &paths.out_dir)?;
        report.record(spec.normalized_file, rows);
    }

    let (activities, classes) = transform_zorgactiviteit(&paths.raw_dir, &paths.out_dir)?;
    report.record(REF_ZORGACTIVITEIT.normalized_file, activities);
    report.record(REF_ZORGPROFIELKLASSE.normalized_file, classes);

    Ok(report)
}
