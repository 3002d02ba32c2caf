use crate::models::{ColumnDefinition, RowKey};

use super::GeneratedRow;

/// Largest number of rows a table may expand to.
pub const MAX_ROWS: usize = 100_000;

/// Product of enumeration lengths, or `None` on overflow.
///
/// No lengths at all means no columns, which has no rows.
pub fn checked_product(lengths: impl IntoIterator<Item = usize>) -> Option<usize> {
    let mut lengths = lengths.into_iter().peekable();
    if lengths.peek().is_none() {
        return Some(0);
    }
    lengths.try_fold(1usize, |acc, len| acc.checked_mul(len))
}

/// Number of rows the column set expands to, or `None` if it overflows `usize`.
pub fn checked_row_count(columns: &[ColumnDefinition]) -> Option<usize> {
    checked_product(columns.iter().map(|c| c.enums.len()))
}

/// Number of rows the column set expands to, without expanding it.
///
/// An empty column set has no rows. Saturates at `usize::MAX`.
pub fn row_count(columns: &[ColumnDefinition]) -> usize {
    checked_row_count(columns).unwrap_or(usize::MAX)
}

/// Cartesian product of every column's enumeration.
///
/// Rows follow column order, and within a column its enumeration order, so the
/// last column varies fastest.
pub fn expand_rows(columns: &[ColumnDefinition]) -> Vec<GeneratedRow> {
    expand_keyed_rows(columns)
        .into_iter()
        .map(|(_, row)| row)
        .collect()
}

/// Like [`expand_rows`], with each row's [`RowKey`] computed from its indices.
///
/// A column set over [`MAX_ROWS`] expands to nothing.
pub fn expand_keyed_rows(columns: &[ColumnDefinition]) -> Vec<(RowKey, GeneratedRow)> {
    let count = row_count(columns);
    if count > MAX_ROWS {
        tracing::warn!("Not expanding {} columns: over {} rows", columns.len(), MAX_ROWS);
        return Vec::new();
    }
    let mut rows = Vec::with_capacity(count);
    if columns.is_empty() {
        return rows;
    }
    let mut indices = Vec::with_capacity(columns.len());
    explode(columns, &mut indices, &mut rows);
    rows
}

fn explode(
    columns: &[ColumnDefinition],
    prefix: &mut Vec<usize>,
    out: &mut Vec<(RowKey, GeneratedRow)>,
) {
    let depth = prefix.len();
    let Some(column) = columns.get(depth) else {
        let row = prefix
            .iter()
            .zip(columns)
            .map(|(&i, c)| c.enums[i].clone())
            .collect();
        out.push((key_for(columns, prefix), row));
        return;
    };

    for i in 0..column.enums.len() {
        prefix.push(i);
        explode(columns, prefix, out);
        prefix.pop();
    }
}

/// Keys use the first matching position, so duplicate enum values share a key.
fn key_for(columns: &[ColumnDefinition], indices: &[usize]) -> RowKey {
    let canonical: Vec<usize> = indices
        .iter()
        .zip(columns)
        .map(|(&i, c)| c.position(&c.enums[i]).unwrap_or(i))
        .collect();
    RowKey::from_indices(&canonical)
}

/// Key of an arbitrary row against the current column set.
///
/// Returns `None` when the row's length does not match the column set or a
/// value is not part of its column's enumeration.
pub fn row_key(columns: &[ColumnDefinition], row: &[String]) -> Option<RowKey> {
    if row.len() != columns.len() || columns.is_empty() {
        return None;
    }
    let indices = row
        .iter()
        .zip(columns)
        .map(|(value, column)| column.position(value))
        .collect::<Option<Vec<_>>>()?;
    Some(RowKey::from_indices(&indices))
}
