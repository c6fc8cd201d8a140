//! Axum server setup
//!
//! - Localhost-only CORS by default
//! - Tracing middleware
//! - Graceful shutdown on SIGTERM/Ctrl+C

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::http::HeaderValue;
use axum::Router;
use dbc_core::DEFAULT_PROVISIONAL_YEAR;
use sqlx::PgPool;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use super::routes;

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to (default: 127.0.0.1:3030)
    pub bind_addr: SocketAddr,

    /// Allow permissive CORS (default: false = localhost only)
    pub cors_permissive: bool,

    /// Built frontend to serve on non-API paths
    pub static_dir: Option<PathBuf>,

    /// Year whose figures are shown as provisional
    pub provisional_year: i32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3030)),
            cors_permissive: false,
            static_dir: None,
            provisional_year: DEFAULT_PROVISIONAL_YEAR,
        }
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub provisional_year: i32,
}

fn cors_layer(permissive: bool) -> CorsLayer {
    if permissive {
        tracing::warn!("CORS: Permissive mode enabled - all origins allowed");
        return CorsLayer::permissive();
    }

    CorsLayer::new()
        .allow_origin([
            HeaderValue::from_static("http://localhost:3000"),
            HeaderValue::from_static("http://localhost:3030"),
            HeaderValue::from_static("http://localhost:5173"),
            HeaderValue::from_static("http://127.0.0.1:3000"),
            HeaderValue::from_static("http://127.0.0.1:3030"),
            HeaderValue::from_static("http://127.0.0.1:5173"),
        ])
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Assemble the full application router.
pub fn build_router(state: AppState, config: &ServerConfig) -> Router {
    let mut app = Router::new()
        .merge(routes::health::router())
        .merge(routes::zorgproducten::router())
        .merge(routes::specialismen::router())
        .merge(routes::diagnoses::router())
        .merge(routes::reference::router())
        .merge(routes::resolve::router())
        .merge(routes::query::router());

    if let Some(dir) = &config.static_dir {
        tracing::info!(static_dir = %dir.display(), "serving frontend");
        let index = ServeFile::new(dir.join("index.html"));
        app = app.fallback_service(ServeDir::new(dir).fallback(index));
    }

    app.layer(cors_layer(config.cors_permissive))
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}

/// Run the HTTP server until Ctrl+C or SIGTERM.
///
/// # Example
///
/// ```ignore
/// let pool = create_pool(&database_url).await?;
/// run_server(pool, ServerConfig::default()).await?;
/// ```
pub async fn run_server(pool: PgPool, config: ServerConfig) -> Result<(), ServerError> {
    let state = AppState {
        pool,
        provisional_year: config.provisional_year,
    };
    let app = build_router(state, &config);

    let listener = TcpListener::bind(config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting shutdown");
        }
    }
}

/// Server error type
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use sqlx::postgres::PgPoolOptions;

    /// Router over a pool that never connects. Only usable for requests
    /// that are answered before the database is touched.
    pub fn offline_router(config: &ServerConfig) -> Router {
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://offline@127.0.0.1:1/dbc")
            .expect("lazy pool");
        let state = AppState {
            pool,
            provisional_year: config.provisional_year,
        };
        build_router(state, config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    #[test]
    fn default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_addr.port(), 3030);
        assert!(!config.cors_permissive);
        assert!(config.static_dir.is_none());
        assert_eq!(config.provisional_year, 2025);
    }

    #[tokio::test]
    async fn spa_fallback_serves_index() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), "<div id=root></div>").unwrap();
        std::fs::write(dir.path().join("app.js"), "console.log(1)").unwrap();

        let config = ServerConfig {
            static_dir: Some(dir.path().to_path_buf()),
            ..ServerConfig::default()
        };
        let app = test_support::offline_router(&config);

        let response = app
            .clone()
            .oneshot(Request::get("/app.js").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"console.log(1)");

        let response = app
            .oneshot(Request::get("/zorgproduct/990017013").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"<div id=root></div>");
    }

    #[tokio::test]
    async fn unknown_path_without_frontend_is_404() {
        let app = test_support::offline_router(&ServerConfig::default());
        let response = app
            .oneshot(Request::get("/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
