//! Diagnosis endpoints

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use dbc_core::RefDiagnose;

use crate::db::repos::DiagnoseRepo;
use crate::http::error::ApiError;
use crate::http::extractors::DiagnosePath;
use crate::http::server::AppState;

/// GET /api/diagnoses
async fn list_diagnoses(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<RefDiagnose>>, ApiError> {
    Ok(Json(DiagnoseRepo::new(&state.pool).all().await?))
}

/// GET /api/diagnoses/{specialisme_cd}/{diagnose_cd}
async fn get_diagnose(
    State(state): State<Arc<AppState>>,
    path: DiagnosePath,
) -> Result<Json<RefDiagnose>, ApiError> {
    let diagnose = DiagnoseRepo::new(&state.pool)
        .get(path.diagnose_cd.as_str(), path.specialisme_cd.as_str())
        .await?;
    Ok(Json(diagnose))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/diagnoses", get(list_diagnoses))
        .route("/api/diagnoses/{specialisme_cd}/{diagnose_cd}", get(get_diagnose))
}

#[cfg(test)]
mod tests {
    use crate::http::server::test_support::offline_router;
    use crate::http::ServerConfig;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    #[tokio::test]
    async fn bad_diagnose_code_is_400() {
        let app = offline_router(&ServerConfig::default());
        let response = app
            .oneshot(
                Request::get("/api/diagnoses/0303/_x%25")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
