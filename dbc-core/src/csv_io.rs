//! CSV reading and writing for raw exports and normalized seed files.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::error::{DbcError, Result};

const BOM: char = '\u{feff}';

/// A fully loaded CSV file: header row plus data rows
#[derive(Debug, Clone, Default)]
pub struct CsvTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl CsvTable {
    /// Index the header row by name
    pub fn header_index(&self) -> HeaderIndex {
        HeaderIndex::new(&self.headers)
    }
}

/// Read a CSV file with a header row.
///
/// Blank lines are skipped, records may have differing lengths, a leading
/// UTF-8 BOM is removed and header cells are trimmed.
pub fn read_table(path: &Path) -> Result<CsvTable> {
    let file = fs::File::open(path).map_err(|e| DbcError::io(path, e))?;
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(file);

    let mut records = reader.records();
    let headers = match records.next() {
        Some(record) => record
            .map_err(|e| DbcError::csv(path, e))?
            .iter()
            .map(|h| h.trim_start_matches(BOM).trim().to_string())
            .collect::<Vec<_>>(),
        None => return Err(DbcError::empty_file(path)),
    };

    let mut rows = Vec::new();
    for record in records {
        let record = record.map_err(|e| DbcError::csv(path, e))?;
        if record.len() == 1 && record.get(0) == Some("") {
            continue;
        }
        rows.push(record.iter().map(str::to_string).collect());
    }

    tracing::debug!(path = %path.display(), rows = rows.len(), "read csv");
    Ok(CsvTable { headers, rows })
}

/// Write a header row and data rows, creating parent directories.
///
/// Uses `\n` line endings and quotes only fields that need it.
pub fn write_table<S: AsRef<str>>(path: &Path, headers: &[S], rows: &[Vec<String>]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| DbcError::io(parent, e))?;
        }
    }

    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_path(path)
        .map_err(|e| DbcError::csv(path, e))?;

    writer
        .write_record(headers.iter().map(|h| h.as_ref()))
        .map_err(|e| DbcError::csv(path, e))?;
    for row in rows {
        writer.write_record(row).map_err(|e| DbcError::csv(path, e))?;
    }
    writer
        .flush()
        .map_err(|e| DbcError::io(path, e))?;
    Ok(())
}

/// Lookup from header name to column position
#[derive(Debug, Clone)]
pub struct HeaderIndex {
    positions: HashMap<String, usize>,
}

impl HeaderIndex {
    pub fn new<S: AsRef<str>>(headers: &[S]) -> Self {
        let positions = headers
            .iter()
            .enumerate()
            .map(|(i, h)| (h.as_ref().trim().to_string(), i))
            .collect();
        Self { positions }
    }

    /// Fail with every missing header listed, not just the first one.
    pub fn require(&self, required: &[&str], context: &str) -> Result<()> {
        let missing: Vec<String> = required
            .iter()
            .filter(|name| !self.positions.contains_key(**name))
            .map(|name| name.to_string())
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(DbcError::missing_columns(context, missing))
        }
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.positions.get(name).copied()
    }

    /// Cell value for a header; short rows and unknown headers read as `""`.
    pub fn cell<'r>(&self, row: &'r [String], name: &str) -> &'r str {
        self.position(name)
            .and_then(|i| row.get(i))
            .map(String::as_str)
            .unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn write_raw(dir: &Path, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn reads_quoted_fields_and_embedded_newlines() {
        let dir = tempdir().unwrap();
        let path = write_raw(
            dir.path(),
            "in.csv",
            "CODE,OMS\n1,\"Knie, links\"\n2,\"regel een\nregel twee\"\n3,\"zegt \"\"hallo\"\"\"\n",
        );

        let table = read_table(&path).unwrap();
        assert_eq!(table.headers, vec!["CODE", "OMS"]);
        assert_eq!(table.rows.len(), 3);
        assert_eq!(table.rows[0][1], "Knie, links");
        assert_eq!(table.rows[1][1], "regel een\nregel twee");
        assert_eq!(table.rows[2][1], "zegt \"hallo\"");
    }

    #[test]
    fn strips_bom_crlf_and_blank_lines() {
        let dir = tempdir().unwrap();
        let path = write_raw(
            dir.path(),
            "in.csv",
            "\u{feff}CODE , OMS\r\n1,a\r\n\r\n2,b\r\n",
        );

        let table = read_table(&path).unwrap();
        assert_eq!(table.headers, vec!["CODE", "OMS"]);
        assert_eq!(table.rows, vec![vec!["1", "a"], vec!["2", "b"]]);
    }

    #[test]
    fn last_row_without_newline_is_kept() {
        let dir = tempdir().unwrap();
        let path = write_raw(dir.path(), "in.csv", "A,B\n1,2");

        let table = read_table(&path).unwrap();
        assert_eq!(table.rows, vec![vec!["1", "2"]]);
    }

    #[test]
    fn empty_file_is_an_error() {
        let dir = tempdir().unwrap();
        let path = write_raw(dir.path(), "empty.csv", "");

        let err = read_table(&path).unwrap_err();
        assert!(matches!(err, DbcError::EmptyFile { .. }));
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempdir().unwrap();
        let err = read_table(&dir.path().join("nope.csv")).unwrap_err();
        assert!(matches!(err, DbcError::Io { .. }));
    }

    #[test]
    fn header_index_reports_all_missing_columns() {
        let index = HeaderIndex::new(&["JAAR", "VERSIE"]);
        let err = index
            .require(&["JAAR", "PEILDATUM", "DATUM_BESTAND"], "01_DBC.csv")
            .unwrap_err();

        match err {
            DbcError::MissingColumns { missing, .. } => {
                assert_eq!(missing, vec!["PEILDATUM", "DATUM_BESTAND"]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn short_rows_read_as_empty_cells() {
        let index = HeaderIndex::new(&["A", "B", "C"]);
        let row = vec!["1".to_string()];
        assert_eq!(index.cell(&row, "A"), "1");
        assert_eq!(index.cell(&row, "C"), "");
        assert_eq!(index.cell(&row, "Z"), "");
    }

    #[test]
    fn write_then_read_preserves_awkward_values() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("out.csv");
        let rows = vec![
            vec!["1".to_string(), "met, komma".to_string()],
            vec!["2".to_string(), String::new()],
        ];

        write_table(&path, &["code", "oms"], &rows).unwrap();

        let raw = fs::read_to_string(&path).unwrap();
        assert_eq!(raw, "code,oms\n1,\"met, komma\"\n2,\n");

        let table = read_table(&path).unwrap();
        assert_eq!(table.rows, rows);
    }
}
