//! Free-text product search term

use super::ValidationError;

/// Maximum length for a search term, in characters
const MAX_SEARCH_LEN: usize = 100;

/// Validated, trimmed search term
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTerm(String);

impl SearchTerm {
    /// Parse an optional term. Blank input means "no search".
    pub fn parse(raw: Option<&str>) -> Result<Option<Self>, ValidationError> {
        let Some(trimmed) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
            return Ok(None);
        };

        if trimmed.chars().count() > MAX_SEARCH_LEN {
            return Err(ValidationError::TooLong {
                field: "search",
                max: MAX_SEARCH_LEN,
            });
        }

        Ok(Some(Self(trimmed.to_owned())))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `%term%` with LIKE wildcards in the term escaped.
    pub fn like_pattern(&self) -> String {
        format!("%{}%", escape_like(&self.0))
    }
}

/// Escape `\`, `%` and `_` so they match literally in LIKE/ILIKE.
pub fn escape_like(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if matches!(c, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_means_no_search() {
        assert_eq!(SearchTerm::parse(None).unwrap(), None);
        assert_eq!(SearchTerm::parse(Some("")).unwrap(), None);
        assert_eq!(SearchTerm::parse(Some("   ")).unwrap(), None);
    }

    #[test]
    fn trims_and_builds_pattern() {
        let term = SearchTerm::parse(Some("  knie ")).unwrap().unwrap();
        assert_eq!(term.as_str(), "knie");
        assert_eq!(term.like_pattern(), "%knie%");
    }

    #[test]
    fn escapes_wildcards() {
        assert_eq!(escape_like("50%_a\\b"), "50\\%\\_a\\\\b");
        let term = SearchTerm::parse(Some("100%")).unwrap().unwrap();
        assert_eq!(term.like_pattern(), "%100\\%%");
    }

    #[test]
    fn rejects_long_terms() {
        let long = "é".repeat(101);
        let err = SearchTerm::parse(Some(&long)).unwrap_err();
        assert!(matches!(err, ValidationError::TooLong { max: 100, .. }));
        assert!(SearchTerm::parse(Some(&"é".repeat(100))).is_ok());
    }
}
