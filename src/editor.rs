//! The editable decision table.
//!
//! [`Editor`] owns the only mutable copy of the document, the filters and the
//! export filename. Every generated view (rows, stats, CSV) is recomputed from
//! that state through the pure functions in [`crate::engine`].

use anyhow::Result;

use crate::db::{KeyValueStore, DATA_KEY, FILENAME_KEY, FILTERS_KEY};
use crate::engine::{self, GeneratedRow, CSV_MEDIA_TYPE};
use crate::error::{EditorError, EditorResult};
use crate::export::FileSink;
use crate::models::*;
use crate::text::plain_text;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Editor {
    document: Document,
    filters: FilterSet,
    filename: String,
}

impl Default for Editor {
    fn default() -> Self {
        Self {
            document: Document::default(),
            filters: FilterSet::new(),
            filename: DEFAULT_FILENAME.to_string(),
        }
    }
}

impl Editor {
    pub fn new(document: Document, filters: FilterSet, filename: impl Into<String>) -> Self {
        Self {
            document,
            filters,
            filename: filename.into(),
        }
    }

    // ============================================================
    // Persistence
    // ============================================================

    /// Load the three persisted values, falling back to defaults for each.
    pub fn load<S: KeyValueStore>(store: &S) -> Result<Self> {
        let document = store.get_or(DATA_KEY, Document::default())?;
        let filename = store.get_or(FILENAME_KEY, DEFAULT_FILENAME.to_string())?;
        let filters = store.get_or(FILTERS_KEY, FilterSet::new())?;
        Ok(Self {
            document,
            filters,
            filename,
        })
    }

    pub fn save<S: KeyValueStore>(&self, store: &S) -> Result<()> {
        store.set(DATA_KEY, &self.document)?;
        store.set(FILENAME_KEY, &self.filename)?;
        store.set(FILTERS_KEY, &self.filters)?;
        Ok(())
    }

    // ============================================================
    // Accessors
    // ============================================================

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn columns(&self) -> &[ColumnDefinition] {
        &self.document.definitions
    }

    pub fn filters(&self) -> &FilterSet {
        &self.filters
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn rows(&self) -> Vec<GeneratedRow> {
        engine::expand_rows(self.columns())
    }

    pub fn visible_rows(&self) -> Vec<GeneratedRow> {
        engine::visible_rows(&self.filters, &self.rows())
            .cloned()
            .collect()
    }

    pub fn stats(&self) -> TableStats {
        let rows = self.rows();
        let visible = engine::visible_rows(&self.filters, &rows).count();
        TableStats {
            total: rows.len(),
            annotated: self.document.row_map.len(),
            hidden: rows.len() - visible,
        }
    }

    pub fn view(&self) -> TableView {
        let keyed = engine::expand_keyed_rows(self.columns());
        let total = keyed.len();
        let rows: Vec<RowView> = keyed
            .into_iter()
            .filter(|(_, row)| engine::row_visible(&self.filters, row))
            .map(|(key, values)| {
                let annotation = self.document.row_map.get(&key);
                RowView {
                    key: key.to_string(),
                    values,
                    when: annotation.and_then(|a| a.when.clone()).unwrap_or_default(),
                    then: annotation.and_then(|a| a.then.clone()).unwrap_or_default(),
                }
            })
            .collect();

        TableView {
            filename: self.filename.clone(),
            columns: self.document.definitions.clone(),
            filters: self.filters.aligned(self.columns().len()),
            stats: TableStats {
                total,
                annotated: self.document.row_map.len(),
                hidden: total - rows.len(),
            },
            rows,
        }
    }

    fn check_column(&self, index: usize) -> EditorResult<()> {
        let len = self.columns().len();
        if index < len {
            Ok(())
        } else {
            Err(EditorError::ColumnOutOfRange { index, len })
        }
    }

    /// Reject edits that would expand past [`engine::MAX_ROWS`].
    fn check_row_limit(lengths: impl IntoIterator<Item = usize>) -> EditorResult<()> {
        match engine::checked_product(lengths) {
            Some(count) if count <= engine::MAX_ROWS => Ok(()),
            _ => Err(EditorError::TooManyRows {
                max: engine::MAX_ROWS,
            }),
        }
    }

    // ============================================================
    // Columns
    // ============================================================

    /// Append a `New Column` with values `true/false`.
    ///
    /// Existing annotations move to the rows that take the new column's first
    /// value. Fails if the table would grow past [`engine::MAX_ROWS`].
    pub fn add_column(&mut self) -> EditorResult<()> {
        let column = ColumnDefinition::new_column();
        Self::check_row_limit(
            self.columns()
                .iter()
                .chain(std::iter::once(&column))
                .map(|c| c.enums.len()),
        )?;
        let first = column.enums.first().cloned().unwrap_or_default();
        self.document.definitions.push(column);

        let row_map = std::mem::take(&mut self.document.row_map);
        self.document.row_map = row_map
            .into_iter()
            .map(|(key, mut annotation)| {
                annotation.given.push(first.clone());
                (key.with_appended(0), annotation)
            })
            .collect();

        tracing::debug!(
            "Added column {}, {} annotations remapped",
            self.columns().len() - 1,
            self.document.row_map.len()
        );
        Ok(())
    }

    /// Remove column `index`, remapping annotations onto the remaining columns.
    ///
    /// Annotations whose keys collapse together keep the one with the lowest
    /// indices, compared numerically column by column.
    /// Removing the last column drops every annotation.
    pub fn remove_column(&mut self, index: usize) -> EditorResult<()> {
        self.check_column(index)?;
        self.document.definitions.remove(index);
        self.filters.remove_column(index);

        let mut row_map: Vec<_> = std::mem::take(&mut self.document.row_map)
            .into_iter()
            .collect();
        row_map.sort_by_cached_key(|(key, _)| key.indices());
        let before = row_map.len();
        for (key, mut annotation) in row_map {
            let Some(new_key) = key.without(index) else {
                tracing::debug!("Dropping annotation {} with no remaining columns", key);
                continue;
            };
            if index < annotation.given.len() {
                annotation.given.remove(index);
            }
            if self.document.row_map.contains_key(&new_key) {
                tracing::debug!("Dropping annotation {}: {} already taken", key, new_key);
                continue;
            }
            self.document.row_map.insert(new_key, annotation);
        }

        tracing::debug!(
            "Removed column {}, kept {} of {} annotations",
            index,
            self.document.row_map.len(),
            before
        );
        Ok(())
    }

    pub fn set_header(&mut self, index: usize, text: &str) -> EditorResult<()> {
        self.check_column(index)?;
        self.document.definitions[index].header = plain_text(text);
        Ok(())
    }

    /// Replace a column's enumeration from `a/b/c` text.
    ///
    /// Keys are positional, so annotations follow index positions, not values.
    pub fn set_enums(&mut self, index: usize, text: &str) -> EditorResult<()> {
        self.check_column(index)?;
        let enums = parse_enums(&plain_text(text));
        Self::check_row_limit(self.columns().iter().enumerate().map(|(i, c)| {
            if i == index {
                enums.len()
            } else {
                c.enums.len()
            }
        }))?;
        self.document.definitions[index].enums = enums;
        Ok(())
    }

    // ============================================================
    // Annotations
    // ============================================================

    pub fn annotation(&self, row: &[String]) -> Option<&RowAnnotation> {
        let key = engine::row_key(self.columns(), row)?;
        self.document.row_map.get(&key)
    }

    pub fn when_of(&self, row: &[String]) -> &str {
        self.annotation(row)
            .and_then(|a| a.when.as_deref())
            .unwrap_or("")
    }

    pub fn then_of(&self, row: &[String]) -> &str {
        self.annotation(row)
            .and_then(|a| a.then.as_deref())
            .unwrap_or("")
    }

    /// Set the `when` or `then` text of a row, creating its annotation on first edit.
    pub fn set_annotation(
        &mut self,
        row: &[String],
        field: AnnotationField,
        text: &str,
    ) -> EditorResult<()> {
        let key = engine::row_key(self.columns(), row)
            .ok_or_else(|| EditorError::UnknownRow(row.to_vec()))?;
        let annotation = self.document.row_map.entry(key).or_default();
        let text = Some(plain_text(text));
        match field {
            AnnotationField::When => annotation.when = text,
            AnnotationField::Then => annotation.then = text,
        }
        annotation.given = row.to_vec();
        Ok(())
    }

    pub fn set_when(&mut self, row: &[String], text: &str) -> EditorResult<()> {
        self.set_annotation(row, AnnotationField::When, text)
    }

    pub fn set_then(&mut self, row: &[String], text: &str) -> EditorResult<()> {
        self.set_annotation(row, AnnotationField::Then, text)
    }

    // ============================================================
    // Filters
    // ============================================================

    /// Set a column filter from typed text. Matching ignores case; the text is
    /// stored lower-cased.
    pub fn set_filter(&mut self, index: usize, text: &str) -> EditorResult<()> {
        self.check_column(index)?;
        self.filters
            .set(index, Some(plain_text(text).to_lowercase()));
        Ok(())
    }

    /// Filter a column down to one of its cell values.
    pub fn set_filter_by_cell(&mut self, index: usize, value: &str) -> EditorResult<()> {
        self.check_column(index)?;
        self.filters.set(index, Some(value.to_string()));
        Ok(())
    }

    pub fn clear_filter(&mut self, index: usize) -> EditorResult<()> {
        self.check_column(index)?;
        self.filters.set(index, None);
        Ok(())
    }

    // ============================================================
    // Resets and export
    // ============================================================

    pub fn reset_filters(&mut self) {
        self.filters.clear();
    }

    pub fn reset_rows(&mut self) {
        self.document.row_map.clear();
    }

    /// Default columns, no annotations, no filters, default filename.
    pub fn reset_all(&mut self) {
        *self = Self::default();
    }

    pub fn set_filename(&mut self, text: &str) {
        self.filename = plain_text(text).trim().to_string();
    }

    pub fn to_csv(&self) -> String {
        engine::to_csv(&self.document)
    }

    /// Hand the CSV to `sink` under the stored filename.
    pub fn export<F: FileSink>(&self, sink: &F) -> Result<()> {
        let filename = if self.filename.is_empty() {
            DEFAULT_FILENAME
        } else {
            self.filename.as_str()
        };
        sink.emit(&self.to_csv(), filename, CSV_MEDIA_TYPE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    fn ab() -> Editor {
        Editor::new(
            Document {
                definitions: vec![
                    ColumnDefinition::new("A", &["x", "y"]),
                    ColumnDefinition::new("B", &["1", "2"]),
                ],
                row_map: Annotations::new(),
            },
            FilterSet::new(),
            DEFAULT_FILENAME,
        )
    }

    #[test]
    fn annotation_text_is_plain() {
        let mut editor = ab();
        editor.set_when(&row(&["x", "1"]), "<b>foo</b>&nbsp;bar").unwrap();
        assert_eq!(editor.when_of(&row(&["x", "1"])), "foo bar");
        assert_eq!(editor.then_of(&row(&["x", "1"])), "");
    }

    #[test]
    fn comparison_text_is_kept() {
        let mut editor = ab();
        editor.set_header(0, "x < 5 and y > 2").unwrap();
        editor.set_when(&row(&["x", "1"]), "a < b").unwrap();
        assert_eq!(editor.columns()[0].header, "x < 5 and y > 2");
        assert_eq!(editor.when_of(&row(&["x", "1"])), "a < b");
    }

    #[test]
    fn removing_column_remaps_annotation() {
        let mut editor = ab();
        editor.set_when(&row(&["x", "1"]), "foo").unwrap();

        editor.remove_column(0).unwrap();

        assert_eq!(editor.when_of(&row(&["1"])), "foo");
        let annotation = editor.annotation(&row(&["1"])).unwrap();
        assert_eq!(annotation.given, row(&["1"]));
    }

    #[test]
    fn colliding_keys_keep_first() {
        let mut editor = ab();
        editor.set_when(&row(&["y", "1"]), "second").unwrap();
        editor.set_when(&row(&["x", "1"]), "first").unwrap();

        editor.remove_column(0).unwrap();

        assert_eq!(editor.document().row_map.len(), 1);
        assert_eq!(editor.when_of(&row(&["1"])), "first");
    }

    #[test]
    fn removing_last_column_drops_annotations() {
        let mut editor = ab();
        editor.set_when(&row(&["x", "1"]), "foo").unwrap();
        editor.remove_column(1).unwrap();
        editor.remove_column(0).unwrap();

        assert!(editor.columns().is_empty());
        assert!(editor.document().row_map.is_empty());
        assert_eq!(editor.stats().total, 0);
    }

    #[test]
    fn adding_column_moves_annotation_to_first_value() {
        let mut editor = ab();
        editor.set_then(&row(&["y", "2"]), "bar").unwrap();

        editor.add_column().unwrap();

        assert_eq!(editor.columns().len(), 3);
        assert_eq!(editor.then_of(&row(&["y", "2", "true"])), "bar");
        assert_eq!(editor.then_of(&row(&["y", "2", "false"])), "");
    }

    #[test]
    fn collisions_compare_indices_numerically() {
        let mut editor = ab();
        editor.set_enums(0, "a/b/c/d/e/f/g/h/i/j/k").unwrap();
        editor.set_when(&row(&["k", "1"]), "tenth").unwrap();
        editor.set_when(&row(&["c", "1"]), "second").unwrap();

        editor.remove_column(0).unwrap();

        assert_eq!(editor.document().row_map.len(), 1);
        assert_eq!(editor.when_of(&row(&["1"])), "second");
    }

    #[test]
    fn oversized_enums_are_rejected_unchanged() {
        let mut editor = ab();
        let wide: Vec<String> = (0..200_000).map(|i| i.to_string()).collect();

        assert!(matches!(
            editor.set_enums(0, &wide.join("/")),
            Err(EditorError::TooManyRows { .. })
        ));
        assert_eq!(editor.columns()[0].enums, row(&["x", "y"]));
        assert_eq!(editor.stats().total, 4);
    }

    #[test]
    fn adding_columns_stops_at_the_row_limit() {
        let mut editor = ab();
        let wide: Vec<String> = (0..50_000).map(|i| i.to_string()).collect();
        editor.set_enums(0, &wide.join("/")).unwrap();

        assert!(matches!(
            editor.add_column(),
            Err(EditorError::TooManyRows { .. })
        ));
        assert_eq!(editor.columns().len(), 2);
    }

    #[test]
    fn out_of_range_column_is_an_error() {
        let mut editor = ab();
        assert!(matches!(
            editor.remove_column(5),
            Err(EditorError::ColumnOutOfRange { index: 5, len: 2 })
        ));
        assert!(editor.set_header(2, "C").is_err());
    }

    #[test]
    fn unknown_row_is_an_error() {
        let mut editor = ab();
        assert!(matches!(
            editor.set_when(&row(&["z", "1"]), "foo"),
            Err(EditorError::UnknownRow(_))
        ));
    }

    #[test]
    fn typed_filter_is_lowercased() {
        let mut editor = ab();
        editor.set_filter(0, "X").unwrap();
        assert_eq!(editor.filters().get(0), Some("x"));
        assert_eq!(editor.stats().hidden, 2);
    }
}
