//! Schema for the reference and fact tables
//!
//! Every statement is idempotent so `run` is safe on every startup.

use sqlx::PgPool;

const STATEMENTS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS ref_specialisme (
        specialisme_cd TEXT PRIMARY KEY NOT NULL,
        omschrijving TEXT NOT NULL,
        versie TEXT NOT NULL,
        datum_bestand DATE NOT NULL,
        peildatum DATE NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS ref_zorgprofielklasse (
        zorgprofielklasse_cd TEXT PRIMARY KEY NOT NULL,
        zorgprofielklasse_oms TEXT NOT NULL,
        versie TEXT NOT NULL,
        datum_bestand DATE NOT NULL,
        peildatum DATE NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS ref_zorgactiviteit (
        zorgactiviteit_cd TEXT PRIMARY KEY NOT NULL,
        omschrijving TEXT NOT NULL,
        zorgprofielklasse_cd TEXT NOT NULL,
        versie TEXT NOT NULL,
        datum_bestand DATE NOT NULL,
        peildatum DATE NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS ref_zorgproduct (
        zorgproduct_cd TEXT PRIMARY KEY NOT NULL,
        latijn_oms TEXT NOT NULL,
        consument_oms TEXT NOT NULL,
        declaratie_verzekerd_cd TEXT NOT NULL,
        declaratie_onverzekerd_cd TEXT,
        versie TEXT NOT NULL,
        datum_bestand DATE NOT NULL,
        peildatum DATE NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS ref_diagnose (
        diagnose_cd TEXT NOT NULL,
        specialisme_cd TEXT NOT NULL,
        diagnose_omschrijving TEXT NOT NULL,
        versie TEXT NOT NULL,
        datum_bestand DATE NOT NULL,
        peildatum DATE NOT NULL,
        PRIMARY KEY (diagnose_cd, specialisme_cd, peildatum)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS fact_dbc (
        jaar INTEGER NOT NULL,
        behandelend_specialisme_cd TEXT NOT NULL,
        typerende_diagnose_cd TEXT NOT NULL,
        zorgproduct_cd TEXT NOT NULL,
        aantal_pat_per_zpd INTEGER NOT NULL,
        aantal_subtraject_per_zpd INTEGER NOT NULL,
        aantal_pat_per_diag INTEGER NOT NULL,
        aantal_subtraject_per_diag INTEGER NOT NULL,
        aantal_pat_per_spc INTEGER NOT NULL,
        aantal_subtraject_per_spc INTEGER NOT NULL,
        gemiddelde_verkoopprijs NUMERIC(12, 2),
        versie TEXT NOT NULL,
        datum_bestand DATE NOT NULL,
        peildatum DATE NOT NULL,
        PRIMARY KEY (jaar, behandelend_specialisme_cd, typerende_diagnose_cd, zorgproduct_cd, peildatum)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS fact_dbc_profiel (
        jaar INTEGER NOT NULL,
        behandelend_specialisme_cd TEXT NOT NULL,
        typerende_diagnose_cd TEXT NOT NULL,
        zorgproduct_cd TEXT NOT NULL,
        zorgactiviteit_cd TEXT NOT NULL,
        zorgprofielklasse_cd TEXT NOT NULL,
        aantal_pat INTEGER NOT NULL,
        aantal_subtraject INTEGER NOT NULL,
        aantal_zat INTEGER NOT NULL,
        som_aantal_zat INTEGER NOT NULL,
        versie TEXT NOT NULL,
        datum_bestand DATE NOT NULL,
        peildatum DATE NOT NULL,
        PRIMARY KEY (
            jaar, behandelend_specialisme_cd, typerende_diagnose_cd, zorgproduct_cd,
            zorgactiviteit_cd, zorgprofielklasse_cd, peildatum
        )
    )
    "#,
    "CREATE INDEX IF NOT EXISTS fact_dbc_zorgproduct_idx ON fact_dbc (zorgproduct_cd)",
    "CREATE INDEX IF NOT EXISTS fact_dbc_profiel_zorgproduct_idx ON fact_dbc_profiel (zorgproduct_cd)",
    "CREATE INDEX IF NOT EXISTS ref_diagnose_specialisme_idx ON ref_diagnose (specialisme_cd)",
];

/// Create all tables and indexes
pub async fn run(pool: &PgPool) -> Result<(), sqlx::Error> {
    tracing::info!("Running schema migrations...");

    for statement in STATEMENTS {
        sqlx::query(statement).execute(pool).await?;
    }

    tracing::info!(statements = STATEMENTS.len(), "Schema up to date");
    Ok(())
}
