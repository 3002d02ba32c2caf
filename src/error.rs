use thiserror::Error;

/// Errors from editing a decision table.
#[derive(Debug, Error)]
pub enum EditorError {
    #[error("column {index} not found (table has {len} columns)")]
    ColumnOutOfRange { index: usize, len: usize },

    #[error("row {0:?} does not match the current columns")]
    UnknownRow(Vec<String>),

    #[error("table would have more than {max} rows")]
    TooManyRows { max: usize },

    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

pub type EditorResult<T> = std::result::Result<T, EditorError>;
