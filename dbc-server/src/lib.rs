//! DBC browser server - HTTP API and seeding over PostgreSQL
//!
//! # Architecture
//!
//! - `db`: connection pool, schema and repositories
//! - `models`: validated request-side types
//! - `http`: Axum routes, extractors and error mapping
//! - `seed`: loading the exports into the database

pub mod db;
pub mod http;
pub mod models;
pub mod seed;

pub use db::create_pool;
pub use http::{run_server, ServerConfig};
