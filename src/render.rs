//! Plain-text rendering of a table view for the terminal.

use crate::models::TableView;

const SEPARATOR: &str = " | ";

/// Render the view as aligned columns followed by a summary line.
///
/// Example output:
/// ```text
/// A | B | when | then
/// --+---+------+-----
/// x | 1 | foo  |
/// y | 2 |      |
///
/// Total: 4 | When/Thens: 1 | Hidden 2
/// ```
pub fn render_table(view: &TableView) -> String {
    let mut header: Vec<String> = view.columns.iter().map(|c| c.header.clone()).collect();
    header.push("when".to_string());
    header.push("then".to_string());

    let body: Vec<Vec<String>> = view
        .rows
        .iter()
        .map(|row| {
            let mut cells = row.values.clone();
            cells.push(row.when.clone());
            cells.push(row.then.clone());
            cells
        })
        .collect();

    let widths: Vec<usize> = (0..header.len())
        .map(|i| {
            body.iter()
                .map(|cells| cells[i].chars().count())
                .chain(std::iter::once(header[i].chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut output = String::new();
    push_line(&mut output, &header, &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    output.push_str(rule.join("-+-").trim_end());
    output.push('\n');
    for cells in &body {
        push_line(&mut output, cells, &widths);
    }

    output.push('\n');
    output.push_str(&format!(
        "Total: {} | When/Thens: {} | Hidden {}\n",
        view.stats.total, view.stats.annotated, view.stats.hidden
    ));
    output
}

fn push_line(output: &mut String, cells: &[String], widths: &[usize]) {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
        .collect();
    output.push_str(padded.join(SEPARATOR).trim_end());
    output.push('\n');
}
