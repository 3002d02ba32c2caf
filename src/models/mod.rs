//! Domain models for the decision table.
//!
//! # Core Concepts
//!
//! - [`ColumnDefinition`]: a named axis with an ordered enumeration of allowed values.
//!   The order of the columns and of each enumeration gives every generated row
//!   its positional meaning.
//! - [`RowKey`]: stable key derived from a generated row, used to attach annotations.
//! - [`RowAnnotation`]: user-entered `when`/`then` text attached to one generated row.
//! - [`Document`]: the persisted pair of column definitions and annotations.
//! - [`FilterSet`]: per-column substring/alternation filters controlling visibility.

mod annotation;
mod column;
mod document;
mod filter;

pub use annotation::*;
pub use column::*;
pub use document::*;
pub use filter::*;
