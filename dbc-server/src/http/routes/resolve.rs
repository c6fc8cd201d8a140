//! Detail route classification
//!
//! The frontend has a single `/:id` detail page; the shape of the id decides
//! whether it shows a specialism or a care product.

use axum::{extract::Path, routing::get, Json, Router};
use dbc_core::DetailKind;
use serde::Serialize;

use crate::http::error::ApiError;

#[derive(Debug, Serialize)]
pub struct ResolveResponse {
    pub id: String,
    pub kind: DetailKind,
}

/// GET /api/resolve/{id} - 404 when the id is neither shape
async fn resolve(Path(id): Path<String>) -> Result<Json<ResolveResponse>, ApiError> {
    match DetailKind::classify(&id) {
        Some(kind) => Ok(Json(ResolveResponse { id, kind })),
        None => Err(ApiError::NotFound {
            resource: "detail page",
            id,
        }),
    }
}

pub fn router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new().route("/api/resolve/{id}", get(resolve))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    async fn call(uri: &str) -> (StatusCode, serde_json::Value) {
        let app: Router = router();
        let response = app
            .oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn four_digits_is_specialism() {
        let (status, body) = call("/api/resolve/0303").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["kind"], "specialisme");
        assert_eq!(body["id"], "0303");
    }

    #[tokio::test]
    async fn nine_digits_is_product() {
        let (_, body) = call("/api/resolve/990017013").await;
        assert_eq!(body["kind"], "zorgproduct");
    }

    #[tokio::test]
    async fn other_shapes_are_404() {
        for uri in ["/api/resolve/12345", "/api/resolve/03a3"] {
            let (status, body) = call(uri).await;
            assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
            assert_eq!(body["error"], "not_found");
        }
    }
}
