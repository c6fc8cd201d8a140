//! Typed parsing of raw export rows.
//!
//! Used by the insert-mode seeder, which reads the raw upper-case exports
//! directly instead of going through the normalized files.

use std::collections::HashSet;

use chrono::NaiveDate;

use crate::csv_io::{CsvTable, HeaderIndex};
use crate::error::{DbcError, Result};
use crate::model::{
    FactDbc, FactDbcProfiel, RefDiagnose, RefSpecialisme, RefZorgactiviteit, RefZorgproduct,
    RefZorgprofielklasse,
};
use crate::table::{
    TableSpec, FACT_DBC, FACT_DBC_PROFIEL, REF_DIAGNOSE, REF_SPECIALISME, REF_ZORGACTIVITEIT,
    REF_ZORGPRODUCT, REF_ZORGPROFIELKLASSE,
};

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%d-%m-%Y", "%Y%m%d"];

/// Integer cell that must be present.
pub fn required_int(column: &str, value: &str) -> Result<i32> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DbcError::invalid_value(column, "integer", value));
    }
    trimmed
        .parse::<i32>()
        .map_err(|_| DbcError::invalid_value(column, "integer", value))
}

/// Empty cell → `None`, otherwise the value as-is.
pub fn nullable_text(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Decimal cell that may be empty. Accepts `.` or a single `,` separator.
pub fn nullable_decimal(column: &str, value: &str) -> Result<Option<f64>> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    let normalized = if trimmed.matches(',').count() == 1 && !trimmed.contains('.') {
        trimmed.replace(',', ".")
    } else {
        trimmed.to_string()
    };
    normalized
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .map(Some)
        .ok_or_else(|| DbcError::invalid_value(column, "decimal", value))
}

/// Date cell in one of the formats the exports have used.
pub fn date(column: &str, value: &str) -> Result<NaiveDate> {
    let trimmed = value.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
        .ok_or_else(|| DbcError::invalid_value(column, "date", value))
}

/// Row reader bound to one file's header index
struct Cells<'a> {
    index: &'a HeaderIndex,
    row: &'a [String],
}

impl<'a> Cells<'a> {
    fn text(&self, name: &str) -> String {
        self.index.cell(self.row, name).to_string()
    }

    fn nullable_text(&self, name: &str) -> Option<String> {
        nullable_text(self.index.cell(self.row, name))
    }

    fn int(&self, name: &str) -> Result<i32> {
        required_int(name, self.index.cell(self.row, name))
    }

    fn decimal(&self, name: &str) -> Result<Option<f64>> {
        nullable_decimal(name, self.index.cell(self.row, name))
    }

    fn date(&self, name: &str) -> Result<NaiveDate> {
        date(name, self.index.cell(self.row, name))
    }
}

/// Parse every row of a raw table after checking its headers.
fn parse_rows<T>(
    table: &CsvTable,
    spec: &TableSpec,
    parse: impl Fn(&Cells<'_>) -> Result<T>,
) -> Result<Vec<T>> {
    let index = table.header_index();
    index.require(&spec.input_headers(), spec.raw_file)?;
    table
        .rows
        .iter()
        .map(|row| parse(&Cells { index: &index, row }))
        .collect()
}

pub fn specialismen(table: &CsvTable) -> Result<Vec<RefSpecialisme>> {
    parse_rows(table, &REF_SPECIALISME, |c| {
        Ok(RefSpecialisme {
            specialisme_cd: c.text("SPECIALISME_CD"),
            omschrijving: c.text("OMSCHRIJVING"),
            versie: c.text("VERSIE"),
            datum_bestand: c.date("DATUM_BESTAND")?,
            peildatum: c.date("PEILDATUM")?,
        })
    })
}

pub fn zorgproducten(table: &CsvTable) -> Result<Vec<RefZorgproduct>> {
    parse_rows(table, &REF_ZORGPRODUCT, |c| {
        Ok(RefZorgproduct {
            zorgproduct_cd: c.text("ZORGPRODUCT_CD"),
            latijn_oms: c.text("LATIJN_OMS"),
            consument_oms: c.text("CONSUMENT_OMS"),
            declaratie_verzekerd_cd: c.text("DECLARATIE_VERZEKERD_CD"),
            declaratie_onverzekerd_cd: c.nullable_text("DECLARATIE_ONVERZEKERD_CD"),
            versie: c.text("VERSIE"),
            datum_bestand: c.date("DATUM_BESTAND")?,
            peildatum: c.date("PEILDATUM")?,
        })
    })
}

pub fn diagnoses(table: &CsvTable) -> Result<Vec<RefDiagnose>> {
    parse_rows(table, &REF_DIAGNOSE, |c| {
        Ok(RefDiagnose {
            diagnose_cd: c.text("DIAGNOSE_CD"),
            specialisme_cd: c.text("SPECIALISME_CD"),
            diagnose_omschrijving: c.text("DIAGNOSE_OMSCHRIJVING"),
            versie: c.text("VERSIE"),
            datum_bestand: c.date("DATUM_BESTAND")?,
            peildatum: c.date("PEILDATUM")?,
        })
    })
}

pub fn facts(table: &CsvTable) -> Result<Vec<FactDbc>> {
    parse_rows(table, &FACT_DBC, |c| {
        Ok(FactDbc {
            jaar: c.int("JAAR")?,
            behandelend_specialisme_cd: c.text("BEHANDELEND_SPECIALISME_CD"),
            typerende_diagnose_cd: c.text("TYPERENDE_DIAGNOSE_CD"),
            zorgproduct_cd: c.text("ZORGPRODUCT_CD"),
            aantal_pat_per_zpd: c.int("AANTAL_PAT_PER_ZPD")?,
            aantal_subtraject_per_zpd: c.int("AANTAL_SUBTRAJECT_PER_ZPD")?,
            aantal_pat_per_diag: c.int("AANTAL_PAT_PER_DIAG")?,
            aantal_subtraject_per_diag: c.int("AANTAL_SUBTRAJECT_PER_DIAG")?,
            aantal_pat_per_spc: c.int("AANTAL_PAT_PER_SPC")?,
            aantal_subtraject_per_spc: c.int("AANTAL_SUBTRAJECT_PER_SPC")?,
            gemiddelde_verkoopprijs: c.decimal("GEMIDDELDE_VERKOOPPRIJS")?,
            versie: c.text("VERSIE"),
            datum_bestand: c.date("DATUM_BESTAND")?,
            peildatum: c.date("PEILDATUM")?,
        })
    })
}

pub fn profiel_facts(table: &CsvTable) -> Result<Vec<FactDbcProfiel>> {
    parse_rows(table, &FACT_DBC_PROFIEL, |c| {
        Ok(FactDbcProfiel {
            jaar: c.int("JAAR")?,
            behandelend_specialisme_cd: c.text("BEHANDELEND_SPECIALISME_CD"),
            typerende_diagnose_cd: c.text("TYPERENDE_DIAGNOSE_CD"),
            zorgproduct_cd: c.text("ZORGPRODUCT_CD"),
            zorgactiviteit_cd: c.text("ZORGACTIVITEIT_CD"),
            zorgprofielklasse_cd: c.text("ZORGPROFIELKLASSE_CD"),
            aantal_pat: c.int("AANTAL_PAT")?,
            aantal_subtraject: c.int("AANTAL_SUBTRAJECT")?,
            aantal_zat: c.int("AANTAL_ZAT")?,
            som_aantal_zat: c.int("SOM_AANTAL_ZAT")?,
            versie: c.text("VERSIE"),
            datum_bestand: c.date("DATUM_BESTAND")?,
            peildatum: c.date("PEILDATUM")?,
        })
    })
}

/// Activities plus their profile classes, first occurrence per class wins.
pub fn split_zorgactiviteit(
    table: &CsvTable,
) -> Result<(Vec<RefZorgactiviteit>, Vec<RefZorgprofielklasse>)> {
    let index = table.header_index();
    index.require(&REF_ZORGPROFIELKLASSE.input_headers(), REF_ZORGPROFIELKLASSE.raw_file)?;

    let activities = parse_rows(table, &REF_ZORGACTIVITEIT, |c| {
        Ok(RefZorgactiviteit {
            zorgactiviteit_cd: c.text("ZORGACTIVITEIT_CD"),
            omschrijving: c.text("OMSCHRIJVING"),
            zorgprofielklasse_cd: c.text("ZORGPROFIELKLASSE_CD"),
            versie: c.text("VERSIE"),
            datum_bestand: c.date("DATUM_BESTAND")?,
            peildatum: c.date("PEILDATUM")?,
        })
    })?;

    let mut seen = HashSet::new();
    let mut classes = Vec::new();
    for row in &table.rows {
        let c = Cells { index: &index, row };
        let code = c.text("ZORGPROFIELKLASSE_CD");
        if !seen.insert(code.clone()) {
            continue;
        }
        classes.push(RefZorgprofielklasse {
            zorgprofielklasse_cd: code,
            zorgprofielklasse_oms: c.text("ZORGPROFIELKLASSE_OMS"),
            versie: c.text("VERSIE"),
            datum_bestand: c.date("DATUM_BESTAND")?,
            peildatum: c.date("PEILDATUM")?,
        });
    }

    Ok((activities, classes))
}
