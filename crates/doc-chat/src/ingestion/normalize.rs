//! Text normalization applied to extracted documents before querying

use serde::Serialize;
use std::fmt;

/// Case-fold extracted text.
///
/// Total and idempotent: `normalize(&normalize(x)) == normalize(x)`.
pub fn normalize(text: &str) -> String {
    text.to_lowercase()
}

/// Normalized text of the active document, used to ground every query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Context(String);

impl Context {
    /// Normalize extracted text into a context.
    ///
    /// Returns `None` when the text has no visible content.
    pub fn from_extracted(text: &str) -> Option<Self> {
        if text.trim().is_empty() {
            return None;
        }
        Some(Self(normalize(text)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Length in characters
    pub fn char_count(&self) -> usize {
        self.0.chars().count()
    }
}

impl fmt::Display for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_normalize_lowercases() {
        assert_eq!(normalize("Revenue GREW 12% in Q3"), "revenue grew 12% in q3");
        assert_eq!(normalize("ÄÖÜ Straße"), "äöü straße");
    }

    #[test]
    fn test_context_rejects_blank_text() {
        assert!(Context::from_extracted("").is_none());
        assert!(Context::from_extracted(" \n\t").is_none());

        let context = Context::from_extracted("Name | Age\nAda | 36").unwrap();
        assert_eq!(context.as_str(), "name | age\nada | 36");
        assert_eq!(context.char_count(), 19);
    }

    proptest! {
        #[test]
        fn test_normalize_is_idempotent(text in any::<String>()) {
            let once = normalize(&text);
            prop_assert_eq!(normalize(&once), once);
        }

        #[test]
        fn test_normalize_is_deterministic(text in "\\PC{0,200}") {
            prop_assert_eq!(normalize(&text), normalize(&text));
        }
    }
}
