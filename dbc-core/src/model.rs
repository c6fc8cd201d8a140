//! Record types for the reference and fact tables.
//!
//! Field names follow the column names; JSON uses camelCase so the
//! frontend sees the same keys it always did (`zorgproductCd`, ...).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Medical specialism (`ref_specialisme`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefSpecialisme {
    pub specialisme_cd: String,
    pub omschrijving: String,
    pub versie: String,
    pub datum_bestand: NaiveDate,
    pub peildatum: NaiveDate,
}

/// Care profile class (`ref_zorgprofielklasse`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefZorgprofielklasse {
    pub zorgprofielklasse_cd: String,
    pub zorgprofielklasse_oms: String,
    pub versie: String,
    pub datum_bestand: NaiveDate,
    pub peildatum: NaiveDate,
}

/// Care activity (`ref_zorgactiviteit`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefZorgactiviteit {
    pub zorgactiviteit_cd: String,
    pub omschrijving: String,
    pub zorgprofielklasse_cd: String,
    pub versie: String,
    pub datum_bestand: NaiveDate,
    pub peildatum: NaiveDate,
}

/// Billable care product (`ref_zorgproduct`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefZorgproduct {
    pub zorgproduct_cd: String,
    pub latijn_oms: String,
    pub consument_oms: String,
    pub declaratie_verzekerd_cd: String,
    pub declaratie_onverzekerd_cd: Option<String>,
    pub versie: String,
    pub datum_bestand: NaiveDate,
    pub peildatum: NaiveDate,
}

/// Diagnosis per specialism (`ref_diagnose`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefDiagnose {
    pub diagnose_cd: String,
    pub specialisme_cd: String,
    pub diagnose_omschrijving: String,
    pub versie: String,
    pub datum_bestand: NaiveDate,
    pub peildatum: NaiveDate,
}

/// Yearly DBC counts per specialism/diagnosis/product (`fact_dbc`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FactDbc {
    pub jaar: i32,
    pub behandelend_specialisme_cd: String,
    pub typerende_diagnose_cd: String,
    pub zorgproduct_cd: String,
    pub aantal_pat_per_zpd: i32,
    pub aantal_subtraject_per_zpd: i32,
    pub aantal_pat_per_diag: i32,
    pub aantal_subtraject_per_diag: i32,
    pub aantal_pat_per_spc: i32,
    pub aantal_subtraject_per_spc: i32,
    /// NUMERIC(12,2) in the database
    pub gemiddelde_verkoopprijs: Option<f64>,
    pub versie: String,
    pub datum_bestand: NaiveDate,
    pub peildatum: NaiveDate,
}

/// Yearly care activity profile counts (`fact_dbc_profiel`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FactDbcProfiel {
    pub jaar: i32,
    pub behandelend_specialisme_cd: String,
    pub typerende_diagnose_cd: String,
    pub zorgproduct_cd: String,
    pub zorgactiviteit_cd: String,
    pub zorgprofielklasse_cd: String,
    pub aantal_pat: i32,
    pub aantal_subtraject: i32,
    pub aantal_zat: i32,
    pub som_aantal_zat: i32,
    pub versie: String,
    pub datum_bestand: NaiveDate,
    pub peildatum: NaiveDate,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_camel_case_keys() {
        let product = RefZorgproduct {
            zorgproduct_cd: "990017013".into(),
            latijn_oms: "Pneumonie".into(),
            consument_oms: "Longontsteking".into(),
            declaratie_verzekerd_cd: "14D195".into(),
            declaratie_onverzekerd_cd: None,
            versie: "v20240101".into(),
            datum_bestand: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            peildatum: NaiveDate::from_ymd_opt(2024, 4, 1).unwrap(),
        };

        let json = serde_json::to_value(&product).unwrap();
        assert_eq!(json["zorgproductCd"], "990017013");
        assert_eq!(json["consumentOms"], "Longontsteking");
        assert!(json["declaratieOnverzekerdCd"].is_null());
        assert_eq!(json["peildatum"], "2024-04-01");
    }
}
