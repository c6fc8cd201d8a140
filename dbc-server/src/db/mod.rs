//! Database layer - connection pool, schema and repositories
//!
//! # Design Principles
//!
//! - Connection pool (max 5 connections) - no Arc<Mutex<Connection>>
//! - Repositories borrow the pool and return core record types
//! - Parameterized queries only; search terms are LIKE-escaped

pub mod migrations;
pub mod pool;
pub mod repos;

pub use pool::create_pool;
pub use sqlx::PgPool;
pub use repos::*;
