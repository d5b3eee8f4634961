//! The reusable data grid, minus the I/O.
//!
//! A grid turns UI state (pagination, search, selected filters) plus the
//! actor's profile into a [`GridRequest`], and turns the normalized response
//! into a [`GridView`] that is either a desktop table or a card list.

pub mod actions;
pub mod columns;
pub mod policy;
pub mod reconcile;
pub mod request;
pub mod view;

pub use actions::{ActionButton, ActionColumn, CustomAction, RowActions};
pub use columns::{
    CellError, CellResolver, ColumnDef, ColumnWidth, RowTransform, ScdNames,
};
pub use policy::{ActorPolicy, Enforcement};
pub use reconcile::{GridQuery, RequestReconciler};
pub use request::{GridRequest, RESERVED_KEYS, RequestMode};
pub use view::{
    Card, CardListView, CardPager, GridView, TableRow, TableView, ViewInput,
};
