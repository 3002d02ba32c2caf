use serde::{Deserialize, Serialize};

/// Separator between alternatives inside one filter string.
pub const FILTER_ALTERNATION: char = '|';

/// Per-column filters, index-aligned with the column set.
///
/// Missing entries and empty strings impose no constraint.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct FilterSet(Vec<Option<String>>);

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Active filter text for `column`, if any.
    pub fn get(&self, column: usize) -> Option<&str> {
        self.0
            .get(column)
            .and_then(|f| f.as_deref())
            .filter(|f| !f.is_empty())
    }

    /// Set or clear the filter of `column`, padding with empty entries as needed.
    pub fn set(&mut self, column: usize, text: Option<String>) {
        let text = text.filter(|t| !t.is_empty());
        if column >= self.0.len() {
            if text.is_none() {
                return;
            }
            self.0.resize(column + 1, None);
        }
        self.0[column] = text;
        self.trim();
    }

    /// Drop the entry of a removed column so later filters stay aligned.
    pub fn remove_column(&mut self, column: usize) {
        if column < self.0.len() {
            self.0.remove(column);
        }
        self.trim();
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.0.iter().all(|f| f.as_deref().map_or(true, str::is_empty))
    }

    /// `(column, filter)` pairs for every active filter.
    pub fn active(&self) -> impl Iterator<Item = (usize, &str)> {
        self.0
            .iter()
            .enumerate()
            .filter_map(|(i, f)| f.as_deref().filter(|f| !f.is_empty()).map(|f| (i, f)))
    }

    /// Entries padded to `columns` for display.
    pub fn aligned(&self, columns: usize) -> Vec<Option<String>> {
        (0..columns).map(|i| self.get(i).map(str::to_string)).collect()
    }

    fn trim(&mut self) {
        while matches!(self.0.last(), Some(None)) {
            self.0.pop();
        }
    }
}

impl From<Vec<Option<String>>> for FilterSet {
    fn from(filters: Vec<Option<String>>) -> Self {
        let mut set = Self(filters);
        set.trim();
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_pads_and_trims() {
        let mut filters = FilterSet::new();
        filters.set(2, Some("x".into()));
        assert_eq!(filters.get(0), None);
        assert_eq!(filters.get(2), Some("x"));

        filters.set(2, None);
        assert!(filters.is_empty());
        assert_eq!(serde_json::to_string(&filters).unwrap(), "[]");
    }

    #[test]
    fn empty_text_clears() {
        let mut filters = FilterSet::from(vec![Some("a".into())]);
        filters.set(0, Some(String::new()));
        assert!(filters.is_empty());
    }

    #[test]
    fn remove_column_shifts_later_filters() {
        let mut filters = FilterSet::from(vec![Some("a".into()), None, Some("c".into())]);
        filters.remove_column(0);
        assert_eq!(filters.get(0), None);
        assert_eq!(filters.get(1), Some("c"));
    }

    #[test]
    fn loads_sparse_json() {
        let filters: FilterSet = serde_json::from_str(r#"[null,"x|y"]"#).unwrap();
        assert_eq!(filters.active().collect::<Vec<_>>(), vec![(1, "x|y")]);
    }
}
