//! Table layouts shared by the transform and the seeders.
//!
//! Each raw export file uses upper-case headers; the normalized files and
//! database columns use the lower-case names. `ColumnMap` pairs them up.

/// One output column and the raw header it is read from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMap {
    pub out: &'static str,
    pub input: &'static str,
}

const fn col(out: &'static str, input: &'static str) -> ColumnMap {
    ColumnMap { out, input }
}

/// Layout of one database table and the files that feed it
#[derive(Debug, Clone, Copy)]
pub struct TableSpec {
    pub table: &'static str,
    pub raw_file: &'static str,
    pub normalized_file: &'static str,
    pub columns: &'static [ColumnMap],
}

impl TableSpec {
    /// Normalized column names in order
    pub fn output_headers(&self) -> Vec<&'static str> {
        self.columns.iter().map(|c| c.out).collect()
    }

    /// Raw header names in order
    pub fn input_headers(&self) -> Vec<&'static str> {
        self.columns.iter().map(|c| c.input).collect()
    }
}

pub const REF_SPECIALISME: TableSpec = TableSpec {
    table: "ref_specialisme",
    raw_file: "06_REF_SPC.csv",
    normalized_file: "ref_specialisme.csv",
    columns: &[
        col("specialisme_cd", "SPECIALISME_CD"),
        col("omschrijving", "OMSCHRIJVING"),
        col("versie", "VERSIE"),
        col("datum_bestand", "DATUM_BESTAND"),
        col("peildatum", "PEILDATUM"),
    ],
};

pub const REF_ZORGPRODUCT: TableSpec = TableSpec {
    table: "ref_zorgproduct",
    raw_file: "05_REF_ZPD.csv",
    normalized_file: "ref_zorgproduct.csv",
    columns: &[
        col("zorgproduct_cd", "ZORGPRODUCT_CD"),
        col("latijn_oms", "LATIJN_OMS"),
        col("consument_oms", "CONSUMENT_OMS"),
        col("declaratie_verzekerd_cd", "DECLARATIE_VERZEKERD_CD"),
        col("declaratie_onverzekerd_cd", "DECLARATIE_ONVERZEKERD_CD"),
        col("versie", "VERSIE"),
        col("datum_bestand", "DATUM_BESTAND"),
        col("peildatum", "PEILDATUM"),
    ],
};

pub const REF_DIAGNOSE: TableSpec = TableSpec {
    table: "ref_diagnose",
    raw_file: "04_REF_DGN.csv",
    normalized_file: "ref_diagnose.csv",
    columns: &[
        col("diagnose_cd", "DIAGNOSE_CD"),
        col("specialisme_cd", "SPECIALISME_CD"),
        col("diagnose_omschrijving", "DIAGNOSE_OMSCHRIJVING"),
        col("versie", "VERSIE"),
        col("datum_bestand", "DATUM_BESTAND"),
        col("peildatum", "PEILDATUM"),
    ],
};

pub const FACT_DBC: TableSpec = TableSpec {
    table: "fact_dbc",
    raw_file: "01_DBC.csv",
    normalized_file: "fact_dbc.csv",
    columns: &[
        col("jaar", "JAAR"),
        col("behandelend_specialisme_cd", "BEHANDELEND_SPECIALISME_CD"),
        col("typerende_diagnose_cd", "TYPERENDE_DIAGNOSE_CD"),
        col("zorgproduct_cd", "ZORGPRODUCT_CD"),
        col("aantal_pat_per_zpd", "AANTAL_PAT_PER_ZPD"),
        col("aantal_subtraject_per_zpd", "AANTAL_SUBTRAJECT_PER_ZPD"),
        col("aantal_pat_per_diag", "AANTAL_PAT_PER_DIAG"),
        col("aantal_subtraject_per_diag", "AANTAL_SUBTRAJECT_PER_DIAG"),
        col("aantal_pat_per_spc", "AANTAL_PAT_PER_SPC"),
        col("aantal_subtraject_per_spc", "AANTAL_SUBTRAJECT_PER_SPC"),
        col("gemiddelde_verkoopprijs", "GEMIDDELDE_VERKOOPPRIJS"),
        col("versie", "VERSIE"),
        col("datum_bestand", "DATUM_BESTAND"),
        col("peildatum", "PEILDATUM"),
    ],
};

pub const FACT_DBC_PROFIEL: TableSpec = TableSpec {
    table: "fact_dbc_profiel",
    raw_file: "02_DBC_PROFIEL.csv",
    normalized_file: "fact_dbc_profiel.csv",
    columns: &[
        col("jaar", "JAAR"),
        col("behandelend_specialisme_cd", "BEHANDELEND_SPECIALISME_CD"),
        col("typerende_diagnose_cd", "TYPERENDE_DIAGNOSE_CD"),
        col("zorgproduct_cd", "ZORGPRODUCT_CD"),
        col("zorgactiviteit_cd", "ZORGACTIVITEIT_CD"),
        col("zorgprofielklasse_cd", "ZORGPROFIELKLASSE_CD"),
        col("aantal_pat", "AANTAL_PAT"),
        col("aantal_subtraject", "AANTAL_SUBTRAJECT"),
        col("aantal_zat", "AANTAL_ZAT"),
        col("som_aantal_zat", "SOM_AANTAL_ZAT"),
        col("versie", "VERSIE"),
        col("datum_bestand", "DATUM_BESTAND"),
        col("peildatum", "PEILDATUM"),
    ],
};

/// Both tables below are derived from the same raw activity file.
pub const ZORGACTIVITEIT_RAW_FILE: &str = "03_REF_ZAT.csv";

pub const REF_ZORGACTIVITEIT: TableSpec = TableSpec {
    table: "ref_zorgactiviteit",
    raw_file: ZORGACTIVITEIT_RAW_FILE,
    normalized_file: "ref_zorgactiviteit.csv",
    columns: &[
        col("zorgactiviteit_cd", "ZORGACTIVITEIT_CD"),
        col("omschrijving", "OMSCHRIJVING"),
        col("zorgprofielklasse_cd", "ZORGPROFIELKLASSE_CD"),
        col("versie", "VERSIE"),
        col("datum_bestand", "DATUM_BESTAND"),
        col("peildatum", "PEILDATUM"),
    ],
};

pub const REF_ZORGPROFIELKLASSE: TableSpec = TableSpec {
    table: "ref_zorgprofielklasse",
    raw_file: ZORGACTIVITEIT_RAW_FILE,
    normalized_file: "ref_zorgprofielklasse.csv",
    columns: &[
        col("zorgprofielklasse_cd", "ZORGPROFIELKLASSE_CD"),
        col("zorgprofielklasse_oms", "ZORGPROFIELKLASSE_OMS"),
        col("versie", "VERSIE"),
        col("datum_bestand", "DATUM_BESTAND"),
        col("peildatum", "PEILDATUM"),
    ],
};

/// Raw header holding the profile class key used for deduplication
pub const ZORGPROFIELKLASSE_KEY: &str = "ZORGPROFIELKLASSE_CD";

/// Tables in load order. Reference tables come before the facts that
/// point at them; clearing walks this list backwards.
pub const SEED_ORDER: [TableSpec; 7] = [
    REF_SPECIALISME,
    REF_ZORGPROFIELKLASSE,
    REF_ZORGACTIVITEIT,
    REF_ZORGPRODUCT,
    REF_DIAGNOSE,
    FACT_DBC,
    FACT_DBC_PROFIEL,
];

/// Table names in the order they must be cleared
pub fn clear_order() -> impl Iterator<Item = &'static str> {
    SEED_ORDER.iter().rev().map(|spec| spec.table)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_column_maps_to_upper_case_header() {
        for spec in SEED_ORDER {
            for column in spec.columns {
                assert_eq!(column.input, column.out.to_uppercase(), "{}", spec.table);
            }
        }
    }

    #[test]
    fn clear_order_is_reverse_of_seed_order() {
        let cleared: Vec<_> = clear_order().collect();
        assert_eq!(cleared.first(), Some(&"fact_dbc_profiel"));
        assert_eq!(cleared.last(), Some(&"ref_specialisme"));
        assert_eq!(cleared.len(), 7);
    }

    #[test]
    fn normalized_file_is_named_after_table() {
        for spec in SEED_ORDER {
            assert_eq!(spec.normalized_file, format!("{}.csv", spec.table));
        }
    }
}
