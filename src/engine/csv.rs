use crate::models::Document;

use super::{expand_keyed_rows, row_count};

/// Media type of the export.
pub const CSV_MEDIA_TYPE: &str = "text/csv";

/// Render the whole table, hidden rows included, as CSV text.
///
/// Each cell is written as a JSON string literal, which quotes every cell and
/// escapes embedded quotes, commas and newlines. Rows are joined with `\n`.
pub fn to_csv(document: &Document) -> String {
    let mut header: Vec<String> = document
        .definitions
        .iter()
        .map(|d| d.export_header())
        .collect();
    header.push("when".to_string());
    header.push("then".to_string());

    let mut lines = Vec::with_capacity(1 + row_count(&document.definitions).min(super::MAX_ROWS));
    lines.push(csv_line(&header));

    for (key, mut row) in expand_keyed_rows(&document.definitions) {
        let annotation = document.row_map.get(&key);
        row.push(
            annotation
                .and_then(|a| a.when.clone())
                .unwrap_or_default(),
        );
        row.push(
            annotation
                .and_then(|a| a.then.clone())
                .unwrap_or_default(),
        );
        lines.push(csv_line(&row));
    }

    lines.join("\n")
}

fn csv_line(cells: &[String]) -> String {
    cells
        .iter()
        .map(|cell| quote(cell))
        .collect::<Vec<_>>()
        .join(",")
}

fn quote(cell: &str) -> String {
    // Serializing a &str cannot fail.
    serde_json::to_string(cell).unwrap_or_else(|_| String::from("\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ColumnDefinition, RowAnnotation, RowKey};

    fn doc() -> Document {
        Document {
            definitions: vec![
                ColumnDefinition::new("A", &["x", "y"]),
                ColumnDefinition::new("B", &["1", "2"]),
            ],
            row_map: Default::default(),
        }
    }

    #[test]
    fn header_and_rows() {
        let csv = to_csv(&doc());
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[0], r#""A (x/y)","B (1/2)","when","then""#);
        assert_eq!(lines[1], r#""x","1","","""#);
        assert_eq!(lines[4], r#""y","2","","""#);
    }

    #[test]
    fn annotations_fill_last_columns() {
        let mut doc = doc();
        doc.row_map.insert(
            RowKey::from("0/1"),
            RowAnnotation {
                given: vec!["x".into(), "2".into()],
                when: Some("a \"quoted\", value".into()),
                then: Some("line\nbreak".into()),
            },
        );
        let csv = to_csv(&doc);
        let lines: Vec<&str> = csv.split('\n').collect();
        assert_eq!(lines[2], r#""x","2","a \"quoted\", value","line\nbreak""#);
    }

    #[test]
    fn empty_column_set_exports_header_only() {
        let doc = Document {
            definitions: Vec::new(),
            row_map: Default::default(),
        };
        assert_eq!(to_csv(&doc), r#""when","then""#);
    }
}
