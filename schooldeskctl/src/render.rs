//! Plain-text rendering of grid views.

use std::fmt::Write;

use schooldesk_core::grid::{ActionButton, CardListView, GridView, TableView};

const MAX_CELL: usize = 32;

pub(crate) fn render(view: &GridView) -> String {
    match view {
        GridView::Table(table) => render_table(table),
        GridView::Cards(cards) => render_cards(cards),
    }
}

fn render_table(table: &TableView) -> String {
    let rows: Vec<Vec<String>> = table
        .rows
        .iter()
        .map(|row| {
            let mut cells: Vec<String> = row.cells.iter().map(|c| clip(c)).collect();
            if table.has_action_column {
                cells.push(button_labels(&row.actions));
            }
            cells
        })
        .collect();

    let mut widths: Vec<usize> = table.headers.iter().map(|h| h.chars().count()).collect();
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_line(&mut out, &table.headers, &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    push_line(&mut out, &rule, &widths);
    for row in &rows {
        push_line(&mut out, row, &widths);
    }
    if rows.is_empty() {
        out.push_str("No rows\n");
    }

    let pagination = table.pagination;
    let _ = writeln!(
        out,
        "{} of {} rows, page {} of {}",
        rows.len(),
        table.row_count,
        u64::from(pagination.page) + 1,
        pagination.page_count(table.row_count)
    );
    out
}

fn render_cards(view: &CardListView) -> String {
    let mut out = String::new();
    for card in &view.cards {
        let title = if card.title.is_empty() { "(untitled)" } else { card.title.as_str() };
        let _ = writeln!(out, "== {title} ==");
        for (header, value) in &card.fields {
            let _ = writeln!(out, "  {header}: {value}");
        }
        if !card.actions.is_empty() {
            let _ = writeln!(out, "  [{}]", button_labels(&card.actions));
        }
        out.push('\n');
    }
    if view.cards.is_empty() {
        out.push_str("No rows\n");
    }

    let pager = &view.pager;
    let prev = if pager.has_prev() { "< prev" } else { "" };
    let next = if pager.has_next() { "next >" } else { "" };
    let _ = writeln!(out, "{prev}  {}  {next}", pager.label());
    out
}

fn push_line<S: AsRef<str>>(out: &mut String, cells: &[S], widths: &[usize]) {
    let line: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{:<width$}", cell.as_ref(), width = *width))
        .collect();
    let _ = writeln!(out, "{}", line.join("  ").trim_end());
}

fn button_labels(buttons: &[ActionButton]) -> String {
    buttons
        .iter()
        .map(|b| b.label.as_str())
        .collect::<Vec<_>>()
        .join(" | ")
}

fn clip(text: &str) -> String {
    if text.chars().count() <= MAX_CELL {
        return text.to_string();
    }
    let mut clipped: String = text.chars().take(MAX_CELL - 3).collect();
    clipped.push_str("...");
    clipped
}

#[cfg(test)]
mod tests {
    use super::*;
    use schooldesk_core::grid::{Card, CardPager, TableRow};
    use schooldesk_model::{Action, PaginationModel, RowId};

    fn delete_button() -> ActionButton {
        ActionButton {
            name: "delete".into(),
            label: "Delete".into(),
            action: Action::Delete,
        }
    }

    #[test]
    fn table_aligns_columns_and_reports_totals() {
        let table = TableView {
            headers: vec!["Name".into(), "Class".into(), "Actions".into()],
            rows: vec![
                TableRow {
                    id: Some(RowId::Int(1)),
                    cells: vec!["Asha Rao".into(), "Grade 7".into()],
                    actions: vec![delete_button()],
                },
                TableRow {
                    id: Some(RowId::Int(2)),
                    cells: vec!["Li".into(), "Grade 10".into()],
                    actions: vec![delete_button()],
                },
            ],
            has_action_column: true,
            row_count: 42,
            pagination: PaginationModel::default(),
        };

        let text = render(&GridView::Table(table));
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Name      Class     Actions");
        assert_eq!(lines[2], "Asha Rao  Grade 7   Delete");
        assert_eq!(lines[4], "2 of 42 rows, page 1 of 5");
    }

    #[test]
    fn cards_show_pager() {
        let view = CardListView {
            cards: vec![Card {
                id: Some(RowId::Int(1)),
                title: "Asha Rao".into(),
                fields: vec![("Class".into(), "Grade 7".into())],
                actions: vec![],
            }],
            pager: CardPager::new(PaginationModel::new(1, 10).unwrap(), 25),
        };
        let text = render(&GridView::Cards(view));
        assert!(text.starts_with("== Asha Rao ==\n  Class: Grade 7\n"));
        assert!(text.contains("< prev  Page 2 of 3  next >"));
    }

    #[test]
    fn long_cells_are_clipped() {
        let long = "x".repeat(40);
        assert_eq!(clip(&long).chars().count(), MAX_CELL);
        assert!(clip(&long).ends_with("..."));
    }
}
