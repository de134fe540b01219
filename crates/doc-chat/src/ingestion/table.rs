//! Row/column linearisation shared by the CSV and spreadsheet extractors

/// Separator placed between cells of one row
pub const CELL_SEPARATOR: &str = " | ";

/// Render a header row plus data rows as plain text, one line per row.
///
/// Each cell is trimmed of surrounding whitespace; column alignment is not
/// attempted.
/// Rows whose cells are all empty are dropped.
pub fn render_table<I, R, S>(rows: I) -> String
where
    I: IntoIterator<Item = R>,
    R: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut content = String::new();

    for row in rows {
        let cells: Vec<String> = row
            .into_iter()
            .map(|cell| cell.as_ref().trim().to_string())
            .collect();

        if cells.iter().all(|c| c.is_empty()) {
            continue;
        }

        content.push_str(&cells.join(CELL_SEPARATOR));
        content.push('\n');
    }

    content
}
