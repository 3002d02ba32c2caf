use crate::models::{FilterSet, FILTER_ALTERNATION};

use super::GeneratedRow;

/// Whether `cell` satisfies one filter string.
///
/// The filter is an alternation of trimmed, `|`-separated substrings; the cell
/// matches if it contains any of them, ignoring case. A filter without `|` is a
/// single alternative.
pub fn cell_matches(filter: &str, cell: &str) -> bool {
    let cell = cell.to_lowercase();
    filter
        .split(FILTER_ALTERNATION)
        .map(|alt| alt.trim().to_lowercase())
        .any(|alt| cell.contains(&alt))
}

/// A row is visible when every active filter matches the value in its column.
///
/// Filters past the end of the row are ignored.
pub fn row_visible(filters: &FilterSet, row: &[String]) -> bool {
    filters.active().all(|(column, filter)| match row.get(column) {
        Some(cell) => cell_matches(filter, cell),
        None => true,
    })
}

pub fn visible_rows<'a>(
    filters: &'a FilterSet,
    rows: &'a [GeneratedRow],
) -> impl Iterator<Item = &'a GeneratedRow> + 'a {
    rows.iter().filter(move |row| row_visible(filters, row))
}
