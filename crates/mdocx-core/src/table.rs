//! Table Extractor
//!
//! Two phases. The first `tr` fixes the column count from its header cells
//! (falling back to data cells when none are marked as header). Every later
//! row is then forced to that width: short rows are padded with empty cells,
//! long rows are truncated. Both repairs are reported as diagnostics; a row
//! is never dropped. Cells are plain text.

use mdocx_ast::{Block, SourceNode, TableRow};

use crate::diagnostics::{Diagnostic, Diagnostics};

/// Extract a table block, or `None` when the table has no usable header
pub fn extract_table(table: &SourceNode, diagnostics: &mut Diagnostics) -> Option<Block> {
    let rows = table_rows(table);
    let Some((header, body)) = rows.split_first() else {
        diagnostics.push(Diagnostic::malformed_table("Table has no rows and was skipped"));
        return None;
    };

    let header_row = header_cells(header);
    let width = header_row.len();
    if width == 0 {
        diagnostics.push(Diagnostic::malformed_table(
            "Table header row has no cells; table was skipped",
        ));
        return None;
    }

    let body_rows = body
        .iter()
        .enumerate()
        .map(|(index, row)| fit_row(row_cells(row), width, index + 1, diagnostics))
        .collect::<Vec<_>>();

    tracing::debug!(columns = width, rows = body_rows.len(), "extracted table");

    Some(Block::Table {
        header_row: TableRow::from_texts(header_row),
        body_rows,
    })
}

/// Rows owned by this table: direct `tr` children and the rows of direct
/// `thead`, `tbody` and `tfoot` sections. Rows of a table nested in a cell
/// stay in that cell.
fn table_rows(table: &SourceNode) -> Vec<&SourceNode> {
    let mut rows = Vec::new();
    for child in table.element_children() {
        match child.tag() {
            Some("tr") => rows.push(child),
            Some("thead" | "tbody" | "tfoot") => rows.extend(child.children_with_tag("tr")),
            _ => {}
        }
    }
    rows
}

/// Header cells of a row: `th` if present, else `td`
fn header_cells(row: &SourceNode) -> Vec<String> {
    let marked = cells_with_tag(row, "th");
    if marked.is_empty() {
        cells_with_tag(row, "td")
    } else {
        marked
    }
}

/// Body cells of a row: `th` and `td` in order
fn row_cells(row: &SourceNode) -> Vec<String> {
    row.element_children()
        .filter(|cell| matches!(cell.tag(), Some("th") | Some("td")))
        .map(cell_text)
        .collect()
}

fn cells_with_tag(row: &SourceNode, tag: &str) -> Vec<String> {
    row.element_children()
        .filter(|cell| cell.tag() == Some(tag))
        .map(cell_text)
        .collect()
}

fn cell_text(cell: &SourceNode) -> String {
    cell.text_content().trim().to_string()
}

/// Pad or truncate `cells` to exactly `width`
fn fit_row(
    mut cells: Vec<String>,
    width: usize,
    row_number: usize,
    diagnostics: &mut Diagnostics,
) -> TableRow {
    let found = cells.len();
    if found < width {
        cells.resize(width, String::new());
        diagnostics.push(Diagnostic::malformed_table(format!(
            "Table row {} has {} of {} cells; padded with empty cells",
            row_number, found, width
        )));
    } else if found > width {
        cells.truncate(width);
        diagnostics.push(
            Diagnostic::malformed_table(format!(
                "Table row {} has {} cells but the header has {}; extra cells were dropped",
                row_number, found, width
            ))
            .with_help("Add matching header cells to keep the extra columns"),
        );
    }
    TableRow::from_texts(cells)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::IssueKind;
    use pretty_assertions::assert_eq;

    fn row(tag: &str, cells: &[&str]) -> SourceNode {
        cells.iter().fold(SourceNode::element("tr"), |tr, text| {
            tr.with_child(SourceNode::element(tag).with_text(*text))
        })
    }

    fn table(rows: Vec<SourceNode>) -> SourceNode {
        let tbody = rows
            .into_iter()
            .fold(SourceNode::element("tbody"), |body, r| body.with_child(r));
        SourceNode::element("table").with_child(tbody)
    }

    fn body_texts(block: &Block) -> Vec<Vec<String>> {
        match block {
            Block::Table { body_rows, .. } => body_rows.iter().map(|r| r.texts()).collect(),
            other => panic!("expected table, got {:?}", other),
        }
    }

    #[test]
    fn test_short_row_is_padded() {
        let node = table(vec![row("th", &["Name", "Age"]), row("td", &["Alice"])]);
        let mut diags = Diagnostics::new();
        let block = extract_table(&node, &mut diags).unwrap();

        match &block {
            Block::Table { header_row, .. } => {
                assert_eq!(header_row.texts(), vec!["Name", "Age"]);
            }
            other => panic!("expected table, got {:?}", other),
        }
        assert_eq!(body_texts(&block), vec![vec!["Alice".to_string(), String::new()]]);
        assert_eq!(diags.count_of(IssueKind::MalformedTable), 1);
    }

    #[test]
    fn test_long_row_is_truncated() {
        let node = table(vec![
            row("th", &["A", "B"]),
            row("td", &["1", "2", "3", "4"]),
        ]);
        let mut diags = Diagnostics::new();
        let block = extract_table(&node, &mut diags).unwrap();

        assert_eq!(body_texts(&block), vec![vec!["1".to_string(), "2".to_string()]]);
        assert_eq!(diags.count_of(IssueKind::MalformedTable), 1);
        assert!(diags.as_slice()[0].help.is_some());
    }

    #[test]
    fn test_well_formed_table_has_no_diagnostics() {
        let node = table(vec![
            row("th", &["A", "B"]),
            row("td", &["1", "2"]),
            row("td", &["3", "4"]),
        ]);
        let mut diags = Diagnostics::new();
        let block = extract_table(&node, &mut diags).unwrap();
        assert_eq!(body_texts(&block).len(), 2);
        assert!(diags.is_empty());
    }

    #[test]
    fn test_header_falls_back_to_data_cells() {
        let node = table(vec![row("td", &["x", "y"]), row("td", &["1", "2"])]);
        let mut diags = Diagnostics::new();
        let block = extract_table(&node, &mut diags).unwrap();
        match block {
            Block::Table { header_row, .. } => assert_eq!(header_row.texts(), vec!["x", "y"]),
            other => panic!("expected table, got {:?}", other),
        }
    }

    #[test]
    fn test_cells_are_plain_text() {
        let header = SourceNode::element("tr").with_child(
            SourceNode::element("th")
                .with_child(SourceNode::element("strong").with_text("Bold"))
                .with_text(" head "),
        );
        let mut diags = Diagnostics::new();
        let block = extract_table(&table(vec![header]), &mut diags).unwrap();
        match block {
            Block::Table {
                header_row,
                body_rows,
            } => {
                assert_eq!(header_row.texts(), vec!["Bold head"]);
                assert!(body_rows.is_empty());
            }
            other => panic!("expected table, got {:?}", other),
        }
    }

    #[test]
    fn test_nested_table_rows_stay_in_their_cell() {
        let inner = SourceNode::element("table").with_child(row("td", &["a", "b"]));
        let outer = SourceNode::element("table")
            .with_child(row("th", &["H"]))
            .with_child(
                SourceNode::element("tr").with_child(SourceNode::element("td").with_child(inner)),
            );

        let mut diags = Diagnostics::new();
        let block = extract_table(&outer, &mut diags).unwrap();

        assert_eq!(body_texts(&block), vec![vec!["ab".to_string()]]);
        assert!(diags.is_empty());
    }

    #[test]
    fn test_thead_and_tbody_sections() {
        let node = SourceNode::element("table")
            .with_child(SourceNode::element("thead").with_child(row("th", &["A", "B"])))
            .with_child(SourceNode::element("tbody").with_child(row("td", &["1", "2"])))
            .with_child(SourceNode::element("tfoot").with_child(row("td", &["3", "4"])));

        let mut diags = Diagnostics::new();
        let block = extract_table(&node, &mut diags).unwrap();
        assert_eq!(
            body_texts(&block),
            vec![
                vec!["1".to_string(), "2".to_string()],
                vec!["3".to_string(), "4".to_string()]
            ]
        );
    }

    #[test]
    fn test_empty_table_is_dropped() {
        let mut diags = Diagnostics::new();
        assert!(extract_table(&SourceNode::element("table"), &mut diags).is_none());
        assert_eq!(diags.count_of(IssueKind::MalformedTable), 1);
    }

    #[test]
    fn test_header_without_cells_is_dropped() {
        let node = table(vec![SourceNode::element("tr"), row("td", &["1"])]);
        let mut diags = Diagnostics::new();
        assert!(extract_table(&node, &mut diags).is_none());
        assert_eq!(diags.count_of(IssueKind::MalformedTable), 1);
    }
}
