//! Desktop table and mobile card list built from the same rows and columns.

use schooldesk_model::{GridPage, PaginationModel, RowId, RowIdField};
use serde_json::Value;

use super::actions::{ActionButton, ActionColumn};
use super::columns::{CellResolver, ColumnDef, ScdNames};

/// Everything needed to lay out one page of a grid.
#[derive(Debug, Clone, Copy)]
pub struct ViewInput<'a> {
    pub page: &'a GridPage<Value>,
    pub columns: &'a [ColumnDef],
    pub actions: Option<&'a ActionColumn>,
    pub names: &'a ScdNames,
    pub row_id_field: &'a RowIdField,
    pub pagination: PaginationModel,
    pub viewport_width: u16,
    pub breakpoint: u16,
}

#[derive(Debug, Clone, PartialEq)]
pub enum GridView {
    Table(TableView),
    Cards(CardListView),
}

impl GridView {
    /// Cards below the breakpoint, a table otherwise.
    pub fn build(input: ViewInput<'_>) -> Self {
        if input.viewport_width < input.breakpoint {
            GridView::Cards(CardListView::build(input))
        } else {
            GridView::Table(TableView::build(input))
        }
    }

    pub fn row_count(&self) -> usize {
        match self {
            GridView::Table(table) => table.rows.len(),
            GridView::Cards(cards) => cards.cards.len(),
        }
    }

    pub fn is_cards(&self) -> bool {
        matches!(self, GridView::Cards(_))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    pub id: Option<RowId>,
    pub cells: Vec<String>,
    pub actions: Vec<ActionButton>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableView {
    pub headers: Vec<String>,
    pub rows: Vec<TableRow>,
    pub has_action_column: bool,
    pub row_count: u64,
    pub pagination: PaginationModel,
}

impl TableView {
    pub fn build(input: ViewInput<'_>) -> Self {
        let resolver = CellResolver::new(input.names);
        let mut headers: Vec<String> =
            input.columns.iter().map(|c| c.header_name.clone()).collect();
        if input.actions.is_some() {
            headers.push("Actions".to_string());
        }
        let rows = input
            .page
            .rows
            .iter()
            .map(|row| TableRow {
                id: input.row_id_field.row_id(row),
                cells: input
                    .columns
                    .iter()
                    .map(|column| resolver.rendered(column, row))
                    .collect(),
                actions: row_buttons(input.actions),
            })
            .collect();
        Self {
            headers,
            rows,
            has_action_column: input.actions.is_some(),
            row_count: input.page.row_count,
            pagination: input.pagination,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Card {
    pub id: Option<RowId>,
    pub title: String,
    /// `(header, value)` for every column after the first.
    pub fields: Vec<(String, String)>,
    pub actions: Vec<ActionButton>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CardListView {
    pub cards: Vec<Card>,
    pub pager: CardPager,
}

impl CardListView {
    pub fn build(input: ViewInput<'_>) -> Self {
        let resolver = CellResolver::new(input.names);
        let cards = input
            .page
            .rows
            .iter()
            .map(|row| {
                let mut cells = input
                    .columns
                    .iter()
                    .map(|column| (column.header_name.clone(), resolver.text(column, row)));
                let title = cells.next().map(|(_, value)| value).unwrap_or_default();
                Card {
                    id: input.row_id_field.row_id(row),
                    title,
                    fields: cells.collect(),
                    actions: row_buttons(input.actions),
                }
            })
            .collect();
        Self {
            cards,
            pager: CardPager::new(input.pagination, input.page.row_count),
        }
    }
}

fn row_buttons(actions: Option<&ActionColumn>) -> Vec<ActionButton> {
    actions.map(|column| column.buttons.clone()).unwrap_or_default()
}

/// Prev/next pager shown under the card list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardPager {
    pub pagination: PaginationModel,
    pub row_count: u64,
}

impl CardPager {
    pub fn new(pagination: PaginationModel, row_count: u64) -> Self {
        Self {
            pagination,
            row_count,
        }
    }

    pub fn page_count(&self) -> u64 {
        self.pagination.page_count(self.row_count)
    }

    pub fn has_prev(&self) -> bool {
        self.pagination.page > 0
    }

    pub fn has_next(&self) -> bool {
        self.next_index().is_some()
    }

    pub fn prev(&self) -> Option<PaginationModel> {
        self.has_prev()
            .then(|| self.pagination.with_page(self.pagination.page - 1))
    }

    pub fn next(&self) -> Option<PaginationModel> {
        self.next_index().map(|page| self.pagination.with_page(page))
    }

    fn next_index(&self) -> Option<u32> {
        self.pagination
            .page
            .checked_add(1)
            .filter(|next| u64::from(*next) < self.page_count())
    }

    /// e.g. `Page 2 of 5`.
    pub fn label(&self) -> String {
        format!(
            "Page {} of {}",
            u64::from(self.pagination.page) + 1,
            self.page_count()
        )
    }
}
