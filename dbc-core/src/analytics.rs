//! Derived product data: yearly series, provisional-year handling and the
//! per-specialism breakdown shown on a product page.
//!
//! All functions take the `fact_dbc` rows of a single product in the order
//! the repository returns them (`jaar DESC, aantal_pat_per_zpd DESC`).

use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::Serialize;

use crate::model::{FactDbc, RefDiagnose, RefSpecialisme, RefZorgproduct};

/// The most recent year is published before it is complete.
pub const DEFAULT_PROVISIONAL_YEAR: i32 = 2025;

/// Label used when a code has no reference entry
pub const UNKNOWN_LABEL: &str = "Onbekend";

/// Name lookups for specialisms and (diagnosis, specialism) pairs
#[derive(Debug, Clone, Default)]
pub struct Lookups {
    specialismen: HashMap<String, String>,
    diagnoses: HashMap<(String, String), String>,
}

impl Lookups {
    /// Later entries for the same key replace earlier ones.
    pub fn new(specialismen: &[RefSpecialisme], diagnoses: &[RefDiagnose]) -> Self {
        Self {
            specialismen: specialismen
                .iter()
                .map(|s| (s.specialisme_cd.clone(), s.omschrijving.clone()))
                .collect(),
            diagnoses: diagnoses
                .iter()
                .map(|d| {
                    (
                        (d.diagnose_cd.clone(), d.specialisme_cd.clone()),
                        d.diagnose_omschrijving.clone(),
                    )
                })
                .collect(),
        }
    }

    pub fn specialism_name(&self, code: &str) -> Option<&str> {
        self.specialismen.get(code).map(String::as_str)
    }

    pub fn diagnosis_name(&self, diagnose_cd: &str, specialisme_cd: &str) -> Option<&str> {
        self.diagnoses
            .get(&(diagnose_cd.to_string(), specialisme_cd.to_string()))
            .map(String::as_str)
    }
}

/// One fact row with names resolved
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicalUsageRow {
    pub jaar: i32,
    pub specialisme_cd: String,
    pub specialisme_oms: String,
    pub diagnose_cd: String,
    pub diagnose_oms: String,
    pub aantal_patienten: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TimeSeriesEntry {
    pub jaar: i32,
    pub value: f64,
}

/// A chart point split into the final and the provisional line
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChartPoint {
    pub jaar: i32,
    pub solid: Option<f64>,
    pub provisional: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpecialismItem {
    pub specialisme_cd: String,
    pub specialisme_oms: String,
    /// Latest year this specialism treated the product
    pub jaar: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosisCount {
    pub diagnose_cd: String,
    pub diagnose_oms: String,
    pub patient_count: i64,
}

pub fn medical_usage(facts: &[FactDbc], lookups: &Lookups) -> Vec<MedicalUsageRow> {
    facts
        .iter()
        .map(|row| MedicalUsageRow {
            jaar: row.jaar,
            specialisme_cd: row.behandelend_specialisme_cd.clone(),
            specialisme_oms: lookups
                .specialism_name(&row.behandelend_specialisme_cd)
                .unwrap_or(UNKNOWN_LABEL)
                .to_string(),
            diagnose_cd: row.typerende_diagnose_cd.clone(),
            diagnose_oms: lookups
                .diagnosis_name(&row.typerende_diagnose_cd, &row.behandelend_specialisme_cd)
                .unwrap_or(UNKNOWN_LABEL)
                .to_string(),
            aantal_patienten: row.aantal_pat_per_zpd,
        })
        .collect()
}

fn to_series(by_year: BTreeMap<i32, f64>) -> Vec<TimeSeriesEntry> {
    by_year
        .into_iter()
        .map(|(jaar, value)| TimeSeriesEntry { jaar, value })
        .collect()
}

/// First non-zero average price seen per year, ascending by year.
pub fn selling_price_history(facts: &[FactDbc]) -> Vec<TimeSeriesEntry> {
    let mut by_year = BTreeMap::new();
    for row in facts {
        if let Some(price) = row.gemiddelde_verkoopprijs.filter(|p| *p != 0.0) {
            by_year.entry(row.jaar).or_insert(price);
        }
    }
    to_series(by_year)
}

/// Total patients per year, ascending by year. Zero rows do not create a year.
pub fn patient_history(facts: &[FactDbc]) -> Vec<TimeSeriesEntry> {
    let mut by_year = BTreeMap::new();
    for row in facts.iter().filter(|r| r.aantal_pat_per_zpd != 0) {
        *by_year.entry(row.jaar).or_insert(0.0) += f64::from(row.aantal_pat_per_zpd);
    }
    to_series(by_year)
}

pub fn provisional_year(history: &[TimeSeriesEntry], year: i32) -> Option<i32> {
    history.iter().any(|e| e.jaar == year).then_some(year)
}

/// Latest entry that is not provisional.
///
/// A series holding only the provisional year still returns that entry.
pub fn most_recent_complete(history: &[TimeSeriesEntry], year: i32) -> Option<TimeSeriesEntry> {
    let last = history.last()?;
    if provisional_year(history, year).is_some() && history.len() > 1 {
        return history.get(history.len() - 2).copied();
    }
    Some(*last)
}

/// Split a series into a solid and a dashed provisional line.
///
/// Only applies when the final entry is the provisional year; the
/// second-to-last point then sits on both lines so they connect.
pub fn chart_series(history: &[TimeSeriesEntry], provisional: Option<i32>) -> Vec<ChartPoint> {
    let has_provisional = match (provisional, history.last()) {
        (Some(year), Some(last)) => last.jaar == year,
        _ => false,
    };

    let n = history.len();
    history
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            if !has_provisional {
                return ChartPoint {
                    jaar: entry.jaar,
                    solid: Some(entry.value),
                    provisional: None,
                };
            }
            let is_last = i + 1 == n;
            let is_second_to_last = i + 2 == n;
            ChartPoint {
                jaar: entry.jaar,
                solid: (!is_last).then_some(entry.value),
                provisional: (is_last || is_second_to_last).then_some(entry.value),
            }
        })
        .collect()
}

fn by_name_then_code(a: (&str, &str), b: (&str, &str)) -> std::cmp::Ordering {
    a.0.to_lowercase()
        .cmp(&b.0.to_lowercase())
        .then_with(|| a.1.cmp(b.1))
}

/// Every treating specialism with its latest year, sorted by name.
pub fn specialism_list(facts: &[FactDbc], lookups: &Lookups) -> Vec<SpecialismItem> {
    let mut latest: HashMap<&str, i32> = HashMap::new();
    for row in facts {
        let year = latest.entry(&row.behandelend_specialisme_cd).or_insert(row.jaar);
        if row.jaar > *year {
            *year = row.jaar;
        }
    }

    let mut items: Vec<SpecialismItem> = latest
        .into_iter()
        .map(|(code, jaar)| SpecialismItem {
            specialisme_cd: code.to_string(),
            specialisme_oms: lookups.specialism_name(code).unwrap_or(code).to_string(),
            jaar,
        })
        .collect();
    items.sort_by(|a, b| {
        by_name_then_code(
            (&a.specialisme_oms, &a.specialisme_cd),
            (&b.specialisme_oms, &b.specialisme_cd),
        )
    });
    items
}

/// Distinct years, newest first.
pub fn available_years(facts: &[FactDbc]) -> Vec<i32> {
    let years: BTreeSet<i32> = facts.iter().map(|r| r.jaar).collect();
    years.into_iter().rev().collect()
}

/// Requested year if it has data, else the newest year, else `current_year`.
pub fn resolve_year(available: &[i32], requested: Option<i32>, current_year: i32) -> i32 {
    match requested {
        Some(year) if available.contains(&year) => year,
        _ => available.first().copied().unwrap_or(current_year),
    }
}

pub fn specialism_patient_count(facts: &[FactDbc], specialisme_cd: &str, year: i32) -> i64 {
    facts
        .iter()
        .filter(|r| r.behandelend_specialisme_cd == specialisme_cd && r.jaar == year)
        .map(|r| i64::from(r.aantal_pat_per_zpd))
        .sum()
}

/// Diagnoses of one specialism in one year, counts summed per code.
pub fn diagnoses_for(
    usage: &[MedicalUsageRow],
    specialisme_cd: &str,
    year: i32,
) -> Vec<DiagnosisCount> {
    let mut by_code: HashMap<&str, DiagnosisCount> = HashMap::new();
    for row in usage
        .iter()
        .filter(|r| r.specialisme_cd == specialisme_cd && r.jaar == year)
    {
        by_code
            .entry(&row.diagnose_cd)
            .and_modify(|d| d.patient_count += i64::from(row.aantal_patienten))
            .or_insert_with(|| DiagnosisCount {
                diagnose_cd: row.diagnose_cd.clone(),
                diagnose_oms: row.diagnose_oms.clone(),
                patient_count: i64::from(row.aantal_patienten),
            });
    }

    let mut out: Vec<_> = by_code.into_values().collect();
    out.sort_by(|a, b| {
        by_name_then_code((&a.diagnose_oms, &a.diagnose_cd), (&b.diagnose_oms, &b.diagnose_cd))
    });
    out
}

/// One metric tab: the series, its headline value and chart points
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricSeries {
    pub history: Vec<TimeSeriesEntry>,
    pub provisional_year: Option<i32>,
    pub most_recent_complete: Option<TimeSeriesEntry>,
    pub chart: Vec<ChartPoint>,
}

impl MetricSeries {
    pub fn new(history: Vec<TimeSeriesEntry>, provisional: i32) -> Self {
        let provisional_year = provisional_year(&history, provisional);
        let most_recent_complete = most_recent_complete(&history, provisional);
        // A single point is not worth drawing.
        let chart = if history.len() > 1 {
            chart_series(&history, provisional_year)
        } else {
            Vec::new()
        };
        Self {
            history,
            provisional_year,
            most_recent_complete,
            chart,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpecialismBreakdown {
    pub specialisme_cd: String,
    pub specialisme_oms: String,
    pub latest_jaar: i32,
    pub patient_count: i64,
    pub diagnoses: Vec<DiagnosisCount>,
}

/// Everything a product page needs for one selected year
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDetail {
    pub product: RefZorgproduct,
    pub price: MetricSeries,
    pub patients: MetricSeries,
    pub available_years: Vec<i32>,
    pub selected_year: i32,
    pub specialisms: Vec<SpecialismBreakdown>,
}

/// Inputs that do not come from the database
#[derive(Debug, Clone, Copy)]
pub struct DetailOptions {
    pub requested_year: Option<i32>,
    pub provisional_year: i32,
    pub current_year: i32,
}

impl ProductDetail {
    pub fn build(
        product: RefZorgproduct,
        facts: &[FactDbc],
        lookups: &Lookups,
        options: DetailOptions,
    ) -> Self {
        let usage = medical_usage(facts, lookups);
        let available_years = available_years(facts);
        let selected_year = resolve_year(
            &available_years,
            options.requested_year,
            options.current_year,
        );

        let specialisms = specialism_list(facts, lookups)
            .into_iter()
            .map(|item| SpecialismBreakdown {
                patient_count: specialism_patient_count(facts, &item.specialisme_cd, selected_year),
                diagnoses: diagnoses_for(&usage, &item.specialisme_cd, selected_year),
                specialisme_cd: item.specialisme_cd,
                specialisme_oms: item.specialisme_oms,
                latest_jaar: item.jaar,
            })
            .collect();

        Self {
            product,
            price: MetricSeries::new(selling_price_history(facts), options.provisional_year),
            patients: MetricSeries::new(patient_history(facts), options.provisional_year),
            available_years,
            selected_year,
            specialisms,
        }
    }
}
