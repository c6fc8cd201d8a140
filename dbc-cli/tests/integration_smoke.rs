//! Smoke tests to verify command wiring

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;

/// Command isolated from the caller's database settings and config file
fn dbc(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("dbc").unwrap();
    cmd.current_dir(dir)
        .env_remove("DATABASE_URL")
        .env_remove("ZERO_UPSTREAM_DB")
        .env_remove("SEED_DATA_DIR")
        .env_remove("RUST_LOG");
    cmd
}

fn write_raw_exports(dir: &Path) {
    let files = [
        (
            "06_REF_SPC.csv",
            "SPECIALISME_CD,OMSCHRIJVING,VERSIE,DATUM_BESTAND,PEILDATUM\n\
             0303,Chirurgie,v1,2024-05-01,2024-04-01\n",
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
             1101,0303,Hernia,v1,2024-05-01,2024-04-01\n",
        ),
        (
            "01_DBC.csv",
            "JAAR,BEHANDELEND_SPECIALISME_CD,TYPERENDE_DIAGNOSE_CD,ZORGPRODUCT_CD,\
             AANTAL_PAT_PER_ZPD,AANTAL_SUBTRAJECT_PER_ZPD,AANTAL_PAT_PER_DIAG,\
             AANTAL_SUBTRAJECT_PER_DIAG,AANTAL_PAT_PER_SPC,AANTAL_SUBTRAJECT_PER_SPC,\
             GEMIDDELDE_VERKOOPPRIJS,VERSIE,DATUM_BESTAND,PEILDATUM\n\
             2023,0303,1101,990017013,10,11,12,13,14,15,1234.50,v1,2024-05-01,2024-04-01\n\
             2022,0303,1101,990017013,9,9,9,9,9,9,,v1,2024-05-01,2024-04-01\n",
        ),
        (
            "02_DBC_PROFIEL.csv",
            "JAAR,BEHANDELEND_SPECIALISME_CD,TYPERENDE_DIAGNOSE_CD,ZORGPRODUCT_CD,\
             ZORGACTIVITEIT_CD,ZORGPROFIELKLASSE_CD,AANTAL_PAT,AANTAL_SUBTRAJECT,AANTAL_ZAT,\
             SOM_AANTAL_ZAT,VERSIE,DATUM_BESTAND,PEILDATUM\n\
             2023,0303,1101,990017013,010001,1,10,10,1,10,v1,2024-05-01,2024-04-01\n",
        ),
        (
            "03_REF_ZAT.csv",
            "ZORGACTIVITEIT_CD,OMSCHRIJVING,ZORGPROFIELKLASSE_CD,ZORGPROFIELKLASSE_OMS,\
             VERSIE,DATUM_BESTAND,PEILDATUM\n\
             010001,Eerste polikliniekbezoek,1,Polikliniekbezoek,v1,2024-05-01,2024-04-01\n\
             010002,Herhaalbezoek,1,Polikliniekbezoek,v1,2024-05-01,2024-04-01\n",
        ),
    ];

    for (name, content) in files {
        fs::write(dir.join(name), content).unwrap();
    }
}

// === Help Output ===

#[test]
fn test_top_level_help_lists_commands() {
    let dir = tempfile::tempdir().unwrap();
    dbc(dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("serve"))
        .stdout(predicate::str::contains("transform"))
        .stdout(predicate::str::contains("seed"));
}

#[test]
fn test_serve_help() {
    let dir = tempfile::tempdir().unwrap();
    dbc(dir.path())
        .args(["serve", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("SPA fallback"))
        .stdout(predicate::str::contains("--provisional-year"));
}

#[test]
fn test_seed_help_lists_modes() {
    let dir = tempfile::tempdir().unwrap();
    dbc(dir.path())
        .args(["seed", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("copy"))
        .stdout(predicate::str::contains("insert"));
}

#[test]
fn test_completions_bash() {
    let dir = tempfile::tempdir().unwrap();
    dbc(dir.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("dbc"));
}

// === Configuration ===

#[test]
fn test_missing_database_url_fails_fast() {
    let dir = tempfile::tempdir().unwrap();
    dbc(dir.path())
        .arg("migrate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No database configured"));
}

#[test]
fn test_invalid_config_file_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("dbc.toml"), "[server]\nbind = 12\n").unwrap();
    dbc(dir.path())
        .arg("migrate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse config file"));
}

// === Transform ===

#[test]
fn test_transform_writes_normalized_files() {
    let dir = tempfile::tempdir().unwrap();
    let raw = dir.path().join("raw");
    fs::create_dir(&raw).unwrap();
    write_raw_exports(&raw);

    dbc(dir.path())
        .args(["transform", "--raw-dir", "raw", "--out", "data"])
        .assert()
        .success()
        .stdout(predicate::str::contains("fact_dbc.csv: 2 rows"))
        .stdout(predicate::str::contains("ref_zorgprofielklasse.csv: 1 rows"));

    let products = fs::read_to_string(dir.path().join("data/ref_zorgproduct.csv")).unwrap();
    assert!(products.starts_with("zorgproduct_cd,latijn_oms,consument_oms,"));
    assert!(products.contains("\"Longontsteking, opname\""));
}

#[test]
fn test_transform_uses_seed_data_dir() {
    let dir = tempfile::tempdir().unwrap();
    write_raw_exports(dir.path());

    dbc(dir.path())
        .env("SEED_DATA_DIR", "normalized")
        .args(["transform", "--raw-dir", "."])
        .assert()
        .success();

    assert!(dir.path().join("normalized/ref_specialisme.csv").exists());
}

#[test]
fn test_transform_missing_raw_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    dbc(dir.path())
        .args(["transform", "--raw-dir", "nowhere"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Transform failed"));
}
