use serde::{Deserialize, Serialize};

use super::{default_columns, Annotations, ColumnDefinition};

/// Default name of the exported CSV file.
pub const DEFAULT_FILENAME: &str = "decision-table.csv";

/// The persisted decision table: column definitions plus annotations keyed by row.
///
/// Field names follow the stored JSON layout (`definitions`, `rowMap`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub definitions: Vec<ColumnDefinition>,
    #[serde(default)]
    pub row_map: Annotations,
}

impl Default for Document {
    fn default() -> Self {
        Self {
            definitions: default_columns(),
            row_map: Annotations::new(),
        }
    }
}

/// Counters shown above the table.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct TableStats {
    /// Number of generated rows.
    pub total: usize,
    /// Number of stored annotations.
    pub annotated: usize,
    /// Generated rows hidden by the current filters.
    pub hidden: usize,
}

/// One visible row with its key and annotation text.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RowView {
    pub key: String,
    pub values: Vec<String>,
    pub when: String,
    pub then: String,
}

/// Everything a front-end needs to render the table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TableView {
    pub filename: String,
    pub columns: Vec<ColumnDefinition>,
    pub filters: Vec<Option<String>>,
    pub stats: TableStats,
    pub rows: Vec<RowView>,
}
