use serde::{Deserialize, Serialize};

/// Separator between enumeration values when an enumeration is edited as text,
/// and between tokens of a [`RowKey`](super::RowKey).
pub const ENUM_SEPARATOR: char = '/';

/// A named axis of the decision table.
///
/// `enums` is the ordered list of values this column can take. Index positions
/// are significant: they are the basis of row identity, so reordering values
/// changes which annotation a row resolves to.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ColumnDefinition {
    pub header: String,
    pub enums: Vec<String>,
}

impl ColumnDefinition {
    pub fn new(header: impl Into<String>, enums: &[&str]) -> Self {
        Self {
            header: header.into(),
            enums: enums.iter().map(|e| e.to_string()).collect(),
        }
    }

    /// The column appended by "add column": two boolean values.
    pub fn new_column() -> Self {
        Self::new("New Column", &["true", "false"])
    }

    /// Enumeration rendered as editable text, e.g. `null/object/array`.
    pub fn enums_text(&self) -> String {
        self.enums.join(&ENUM_SEPARATOR.to_string())
    }

    /// Replace the enumeration from its text form.
    ///
    /// Splitting never yields an empty list: an empty string becomes a single
    /// empty value.
    pub fn set_enums_text(&mut self, text: &str) {
        self.enums = parse_enums(text);
    }

    /// Header as it appears in the CSV export: `Header (a/b/c)`.
    pub fn export_header(&self) -> String {
        format!("{} ({})", self.header, self.enums_text())
    }

    /// Zero-based position of `value` in the enumeration (first match wins).
    pub fn position(&self, value: &str) -> Option<usize> {
        self.enums.iter().position(|e| e == value)
    }
}

pub fn parse_enums(text: &str) -> Vec<String> {
    text.split(ENUM_SEPARATOR).map(str::to_string).collect()
}

/// The column set a fresh (or reset) document starts with.
pub fn default_columns() -> Vec<ColumnDefinition> {
    vec![
        ColumnDefinition::new("With Parent Node", &["null", "object", "array"]),
        ColumnDefinition::new("From Node", &["null", "string", "number", "bool"]),
        ColumnDefinition::new(
            "To Node",
            &["null", "object", "array", "string", "number", "bool"],
        ),
    ]
}
