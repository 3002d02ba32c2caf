use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::ENUM_SEPARATOR;

/// Stable key of a generated row: the enumeration index of each value, joined
/// by `/` (e.g. `0/1/3`).
///
/// Keys are positional. Adding or removing a column requires remapping every
/// stored key, see [`RowKey::with_appended`] and [`RowKey::without`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RowKey(String);

impl RowKey {
    pub fn from_indices(indices: &[usize]) -> Self {
        let tokens: Vec<String> = indices.iter().map(|i| i.to_string()).collect();
        Self(tokens.join(&ENUM_SEPARATOR.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Enumeration indices encoded in the key; unparsable tokens sort last.
    pub fn indices(&self) -> Vec<usize> {
        self.tokens()
            .into_iter()
            .map(|t| t.parse().unwrap_or(usize::MAX))
            .collect()
    }

    fn tokens(&self) -> Vec<&str> {
        if self.0.is_empty() {
            Vec::new()
        } else {
            self.0.split(ENUM_SEPARATOR).collect()
        }
    }

    /// Key for the same row after a column was appended and the row took the
    /// new column's value at `index`.
    pub fn with_appended(&self, index: usize) -> Self {
        if self.0.is_empty() {
            Self(index.to_string())
        } else {
            Self(format!("{}{}{}", self.0, ENUM_SEPARATOR, index))
        }
    }

    /// Key for the same row after column `column` was removed.
    ///
    /// Returns `None` if the key has no token at that position, or if nothing
    /// is left after removal.
    pub fn without(&self, column: usize) -> Option<Self> {
        let mut tokens = self.tokens();
        if column >= tokens.len() {
            return None;
        }
        tokens.remove(column);
        if tokens.is_empty() {
            return None;
        }
        Some(Self(tokens.join(&ENUM_SEPARATOR.to_string())))
    }
}

impl fmt::Display for RowKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RowKey {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// User text attached to one generated row.
///
/// `given` is a copy of the row values at the time of the last edit, kept so the
/// annotation can be recognised even when its key no longer resolves.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RowAnnotation {
    #[serde(default)]
    pub given: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub when: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub then: Option<String>,
}

/// Which half of an annotation is being edited.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AnnotationField {
    When,
    Then,
}

impl AnnotationField {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::When => "when",
            Self::Then => "then",
        }
    }
}

pub type Annotations = BTreeMap<RowKey, RowAnnotation>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_from_indices() {
        assert_eq!(RowKey::from_indices(&[0, 1, 3]).as_str(), "0/1/3");
        assert_eq!(RowKey::from_indices(&[]).as_str(), "");
    }

    #[test]
    fn without_splices_the_token() {
        let key = RowKey::from("2/0/5");
        assert_eq!(key.without(0), Some(RowKey::from("0/5")));
        assert_eq!(key.without(1), Some(RowKey::from("2/5")));
        assert_eq!(key.without(2), Some(RowKey::from("2/0")));
        assert_eq!(key.without(3), None);
    }

    #[test]
    fn indices_parse_numerically() {
        assert_eq!(RowKey::from("10/0").indices(), vec![10, 0]);
        assert!(RowKey::from("2/0").indices() < RowKey::from("10/0").indices());
        assert_eq!(RowKey::from("").indices(), Vec::<usize>::new());
    }

    #[test]
    fn without_last_token_is_none() {
        assert_eq!(RowKey::from("4").without(0), None);
    }

    #[test]
    fn with_appended_handles_empty_key() {
        assert_eq!(RowKey::from("").with_appended(0), RowKey::from("0"));
        assert_eq!(RowKey::from("1/2").with_appended(0), RowKey::from("1/2/0"));
    }

    #[test]
    fn annotation_omits_missing_text() {
        let json = serde_json::to_string(&RowAnnotation {
            given: vec!["x".into()],
            when: Some("foo".into()),
            then: None,
        })
        .unwrap();
        assert_eq!(json, r#"{"given":["x"],"when":"foo"}"#);
    }
}
