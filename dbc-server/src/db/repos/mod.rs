//! Repository implementations for database access
//!
//! Each repository follows these patterns:
//! - Borrows the pool; cheap to construct per request
//! - Single-row lookups return NotFound instead of Option where a 404 is wanted
//! - Decimal columns are read through a `::float8` cast

pub mod zorgproducten;
pub mod facts;
pub mod specialismen;
pub mod diagnoses;
pub mod reference;

pub use zorgproducten::ZorgproductRepo;
pub use facts::FactDbcRepo;
pub use specialismen::SpecialismeRepo;
pub use diagnoses::DiagnoseRepo;
pub use reference::{ZorgactiviteitRepo, ZorgprofielklasseRepo};

/// Database error type
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("not found: {resource} '{id}'")]
    NotFound { resource: &'static str, id: String },
}

impl DbError {
    pub fn not_found(resource: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            resource,
            id: id.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_display() {
        let err = DbError::not_found("zorgproduct", "990017013");
        assert_eq!(err.to_string(), "not found: zorgproduct '990017013'");
    }
}
