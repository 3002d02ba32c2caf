//! Row engine: pure functions recomputed from the column set on every change.
//!
//! Nothing here holds state. Expansion, keys, visibility and CSV text are all
//! derived from a [`Document`](crate::models::Document) and a
//! [`FilterSet`](crate::models::FilterSet).

mod csv;
mod expand;
mod filter;

pub use csv::*;
pub use expand::*;
pub use filter::*;

/// One value per column, drawn from that column's enumeration.
pub type GeneratedRow = Vec<String>;
