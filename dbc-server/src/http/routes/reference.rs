//! Care activity and profile class lists

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use dbc_core::{RefZorgactiviteit, RefZorgprofielklasse};

use crate::db::repos::{ZorgactiviteitRepo, ZorgprofielklasseRepo};
use crate::http::error::ApiError;
use crate::http::server::AppState;

/// GET /api/zorgactiviteiten
async fn list_zorgactiviteiten(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<RefZorgactiviteit>>, ApiError> {
    Ok(Json(ZorgactiviteitRepo::new(&state.pool).all().await?))
}

/// GET /api/zorgprofielklassen
async fn list_zorgprofielklassen(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<RefZorgprofielklasse>>, ApiError> {
    Ok(Json(ZorgprofielklasseRepo::new(&state.pool).all().await?))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/zorgactiviteiten", get(list_zorgactiviteiten))
        .route("/api/zorgprofielklassen", get(list_zorgprofielklassen))
}
