//! Reference code validation
//!
//! Product, specialism, diagnosis and activity codes all share one shape:
//! short ASCII alphanumerics, occasionally with `.`, `-` or `_`.

use once_cell::sync::Lazy;
use regex::Regex;

use super::ValidationError;

/// Maximum length for a reference code
const MAX_CODE_LEN: usize = 32;

static CODE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9._-]*$").expect("invalid code regex"));

/// Validated reference code
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Code(String);

impl Code {
    /// Create a code for the named field.
    ///
    /// # Example
    /// ```
    /// use dbc_server::models::Code;
    ///
    /// assert!(Code::new("zorgproduct_cd", "990017013").is_ok());
    /// assert!(Code::new("zorgproduct_cd", "").is_err());
    /// assert!(Code::new("zorgproduct_cd", "99 0017").is_err());
    /// ```
    pub fn new(field: &'static str, s: &str) -> Result<Self, ValidationError> {
        if s.is_empty() {
            return Err(ValidationError::Empty { field });
        }

        if s.len() > MAX_CODE_LEN {
            return Err(ValidationError::TooLong {
                field,
                max: MAX_CODE_LEN,
            });
        }

        if !CODE_RE.is_match(s) {
            return Err(ValidationError::InvalidFormat {
                field,
                reason: "must be alphanumeric, optionally with '.', '-' or '_'",
            });
        }

        Ok(Self(s.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}
