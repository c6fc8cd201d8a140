//! Classify a bare detail id into the page it belongs to.

use serde::Serialize;

/// What kind of detail page an id refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DetailKind {
    /// Four digit specialism code, e.g. `0303`
    Specialisme,
    /// Nine digit care product code, e.g. `990017013`
    Zorgproduct,
}

impl DetailKind {
    pub fn classify(id: &str) -> Option<Self> {
        if !id.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        match id.len() {
            4 => Some(Self::Specialisme),
            9 => Some(Self::Zorgproduct),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_by_digit_count() {
        assert_eq!(DetailKind::classify("0303"), Some(DetailKind::Specialisme));
        assert_eq!(DetailKind::classify("990017013"), Some(DetailKind::Zorgproduct));
    }

    #[test]
    fn rejects_everything_else() {
        assert_eq!(DetailKind::classify(""), None);
        assert_eq!(DetailKind::classify("303"), None);
        assert_eq!(DetailKind::classify("03O3"), None);
        assert_eq!(DetailKind::classify("99001701"), None);
        assert_eq!(DetailKind::classify("９９００"), None);
    }
}
