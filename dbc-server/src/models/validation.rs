//! Validation error types

use std::fmt;

/// Validation error for request models
#[derive(Debug, Clone)]
pub enum ValidationError {
    /// Field is empty when it shouldn't be
    Empty { field: &'static str },

    /// Field exceeds maximum length
    TooLong { field: &'static str, max: usize },

    /// String doesn't match the required format
    InvalidFormat { field: &'static str, reason: &'static str },

    /// Query string could not be deserialized
    InvalidQueryString { reason: String },

    /// Named query is not registered
    UnknownQuery { name: String },

    /// Arguments don't match what the query expects
    InvalidArgs { query: &'static str, reason: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "{} cannot be empty", field),
            Self::TooLong { field, max } => {
                write!(f, "{} exceeds maximum length of {} characters", field, max)
            }
            Self::InvalidFormat { field, reason } => {
                write!(f, "{}: {}", field, reason)
            }
            Self::InvalidQueryString { reason } => write!(f, "invalid query string: {}", reason),
            Self::UnknownQuery { name } => write!(f, "unknown query: '{}'", name),
            Self::InvalidArgs { query, reason } => {
                write!(f, "invalid arguments for {}: {}", query, reason)
            }
        }
    }
}

impl std::error::Error for ValidationError {}
