//! Specialism endpoints

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use dbc_core::{RefDiagnose, RefSpecialisme};

use crate::db::repos::{DiagnoseRepo, SpecialismeRepo};
use crate::http::error::ApiError;
use crate::http::extractors::ValidCode;
use crate::http::server::AppState;

/// GET /api/specialismen
async fn list_specialismen(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<RefSpecialisme>>, ApiError> {
    Ok(Json(SpecialismeRepo::new(&state.pool).all().await?))
}

/// GET /api/specialismen/{code}
async fn get_specialisme(
    State(state): State<Arc<AppState>>,
    ValidCode(code): ValidCode,
) -> Result<Json<RefSpecialisme>, ApiError> {
    Ok(Json(SpecialismeRepo::new(&state.pool).get(code.as_str()).await?))
}

/// GET /api/specialismen/{code}/diagnoses - 404 when the specialism is unknown
async fn specialisme_diagnoses(
    State(state): State<Arc<AppState>>,
    ValidCode(code): ValidCode,
) -> Result<Json<Vec<RefDiagnose>>, ApiError> {
    SpecialismeRepo::new(&state.pool).get(code.as_str()).await?;
    let diagnoses = DiagnoseRepo::new(&state.pool)
        .for_specialism(code.as_str())
        .await?;
    Ok(Json(diagnoses))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/specialismen", get(list_specialismen))
        .route("/api/specialismen/{code}", get(get_specialisme))
        .route("/api/specialismen/{code}/diagnoses", get(specialisme_diagnoses))
}
