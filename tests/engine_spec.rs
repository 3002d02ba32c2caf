use decision_table::engine::*;
use decision_table::models::*;
use speculate2::speculate;

fn columns(spec: &[(&str, &str)]) -> Vec<ColumnDefinition> {
    spec.iter()
        .map(|(header, enums)| ColumnDefinition {
            header: header.to_string(),
            enums: parse_enums(enums),
        })
        .collect()
}

fn row(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

speculate! {
    before {
        let ab = columns(&[("A", "x/y"), ("B", "1/2")]);
    }

    describe "expand_rows" {
        it "produces the cartesian product in order" {
            let rows = expand_rows(&ab);
            assert_eq!(rows, vec![row(&["x", "1"]), row(&["x", "2"]), row(&["y", "1"]), row(&["y", "2"])]);
        }

        it "matches the product of enumeration lengths" {
            let cols = columns(&[
                ("P", "a/b/c"),
                ("Q", "1"),
                ("R", "t/f"),
                ("S", "u/v/w/z"),
            ]);
            let rows = expand_rows(&cols);
            assert_eq!(rows.len(), 24);
            assert_eq!(row_count(&cols), 24);
        }

        it "draws every value from its own column" {
            let cols = default_columns();
            for generated in expand_rows(&cols) {
                assert_eq!(generated.len(), cols.len());
                for (value, column) in generated.iter().zip(&cols) {
                    assert!(column.enums.contains(value));
                }
            }
        }

        it "returns no rows for an empty column set" {
            assert!(expand_rows(&[]).is_empty());
        }
    }

    describe "row_key" {
        it "is equal for equal rows" {
            let a = row_key(&ab, &row(&["y", "2"]));
            let b = row_key(&ab, &row(&["y", "2"]));
            assert_eq!(a, b);
            assert_eq!(a, Some(RowKey::from("1/1")));
        }

        it "is shared by rows built from duplicate values" {
            let dup = columns(&[("A", "x/x"), ("B", "1")]);
            let keyed = expand_keyed_rows(&dup);
            assert_eq!(keyed.len(), 2);
            assert_eq!(keyed[0], (RowKey::from("0/0"), row(&["x", "1"])));
            assert_eq!(keyed[1], (RowKey::from("0/0"), row(&["x", "1"])));
            assert_eq!(row_key(&dup, &row(&["x", "1"])), Some(RowKey::from("0/0")));
        }

        it "is distinct for distinct rows" {
            let cols = default_columns();
            let keys: std::collections::HashSet<RowKey> = expand_rows(&cols)
                .iter()
                .filter_map(|r| row_key(&cols, r))
                .collect();
            assert_eq!(keys.len(), 72);
        }
    }

    describe "visible_rows" {
        it "hides rows failing a column filter" {
            let rows = expand_rows(&ab);
            let filters = FilterSet::from(vec![Some("x".to_string()), Some(String::new())]);
            let visible: Vec<&Vec<String>> = visible_rows(&filters, &rows).collect();
            assert_eq!(visible, vec![&rows[0], &rows[1]]);
        }

        it "does not depend on the order filters are applied in" {
            let rows = expand_rows(&default_columns());
            let both = FilterSet::from(vec![Some("obj|arr".to_string()), None, Some("null".to_string())]);
            let first = FilterSet::from(vec![Some("obj|arr".to_string())]);
            let last = FilterSet::from(vec![None, None, Some("null".to_string())]);

            let combined: Vec<Vec<String>> = visible_rows(&both, &rows).cloned().collect();
            let first_then_last: Vec<Vec<String>> = {
                let step: Vec<Vec<String>> = visible_rows(&first, &rows).cloned().collect();
                visible_rows(&last, &step).cloned().collect()
            };
            let last_then_first: Vec<Vec<String>> = {
                let step: Vec<Vec<String>> = visible_rows(&last, &rows).cloned().collect();
                visible_rows(&first, &step).cloned().collect()
            };

            assert_eq!(combined.len(), 8);
            assert_eq!(combined, first_then_last);
            assert_eq!(combined, last_then_first);
        }
    }

    describe "to_csv" {
        it "includes every generated row once, hidden or not" {
            let document = Document { definitions: ab.clone(), row_map: Annotations::new() };
            let csv = to_csv(&document);
            assert_eq!(csv.lines().count(), 5);
        }

        it "renders annotations in the last two columns" {
            let mut document = Document { definitions: ab.clone(), row_map: Annotations::new() };
            document.row_map.insert(RowKey::from("1/0"), RowAnnotation {
                given: row(&["y", "1"]),
                when: Some("foo".to_string()),
                then: None,
            });
            let csv = to_csv(&document);
            let lines: Vec<&str> = csv.lines().collect();
            assert_eq!(lines[3], r#""y","1","foo","""#);
            assert_eq!(lines[1], r#""x","1","","""#);
        }
    }
}
