//! Data-grid controller
//!
//! [`DataGrid`] is the stateful half of a screen: it owns pagination, search
//! and filter selection, reconciles them against the signed-in actor, drives
//! the fetch controller and lays the result out as a table or a card list.

use std::fmt;
use std::sync::Arc;

use schooldesk_core::grid::{
    ActionColumn, CardPager, GridQuery, GridView, RequestReconciler, RowTransform,
    ScdNames, ViewInput,
};
use schooldesk_core::screens::ScreenConfig;
use schooldesk_model::{
    Action, FilterSet, GridPage, PageResponse, PaginationModel, Profile, RowId,
    SortDir,
};
use serde_json::Value;

use crate::config::ClientConfig;
use crate::error::{ApiError, ApiResult};
use crate::fetch::{FetchController, FetchDeps, FetchOutcome};
use crate::notify::{Notification, Notifier};
use crate::services::ApiService;
use crate::session::SessionContext;

pub const DELETE_CONFIRM: &str = "Are you sure you want to delete this record?";
pub const DELETE_SUCCESS: &str = "Record deleted successfully";
pub const DELETE_FAILED: &str = "Failed to delete record";

/// Asks the user to confirm a destructive action.
pub trait Confirm {
    fn confirm(&self, message: &str) -> bool;
}

impl<F> Confirm for F
where
    F: Fn(&str) -> bool,
{
    fn confirm(&self, message: &str) -> bool {
        self(message)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridOptions {
    pub mobile_breakpoint: u16,
    pub page_size: u32,
}

impl Default for GridOptions {
    fn default() -> Self {
        Self::from(&ClientConfig::default())
    }
}

impl From<&ClientConfig> for GridOptions {
    fn from(config: &ClientConfig) -> Self {
        Self {
            mobile_breakpoint: config.mobile_breakpoint,
            page_size: config.default_page_size,
        }
    }
}

#[derive(Debug)]
pub enum DeleteOutcome {
    /// The user declined the confirmation.
    Cancelled,
    /// The actor may not delete on this screen.
    Denied,
    Deleted,
    Failed(ApiError),
}

pub struct DataGrid {
    screen: ScreenConfig,
    session: SessionContext,
    api: Arc<dyn ApiService>,
    notifier: Arc<dyn Notifier>,
    fetch: FetchController,
    reconciler: RequestReconciler,
    pagination: PaginationModel,
    search: String,
    sort_dir: SortDir,
    filters: FilterSet,
    names: ScdNames,
    transform: Option<RowTransform>,
    options: GridOptions,
}

impl fmt::Debug for DataGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataGrid")
            .field("screen", &self.screen.key)
            .field("pagination", &self.pagination)
            .field("search", &self.search)
            .field("filters", &self.filters)
            .field("has_transform", &self.transform.is_some())
            .field("options", &self.options)
            .finish()
    }
}

impl DataGrid {
    /// Mount a grid for `screen`. Nothing is fetched until [`DataGrid::load`].
    pub fn new(
        screen: ScreenConfig,
        session: SessionContext,
        api: Arc<dyn ApiService>,
        notifier: Arc<dyn Notifier>,
        options: GridOptions,
    ) -> Self {
        let fetch = FetchController::new(Arc::clone(&api), Arc::clone(&notifier));
        let pagination = PaginationModel::new(0, options.page_size).unwrap_or_default();
        Self {
            screen,
            session,
            api,
            notifier,
            fetch,
            reconciler: RequestReconciler::new(),
            pagination,
            search: String::new(),
            sort_dir: SortDir::Asc,
            filters: FilterSet::new(),
            names: ScdNames::default(),
            transform: None,
            options,
        }
    }

    pub fn with_row_transform(
        mut self,
        transform: impl Fn(Value) -> Value + Send + Sync + 'static,
    ) -> Self {
        self.transform = Some(Arc::new(transform));
        self
    }

    /// Start from a given page, search and filter selection without fetching.
    pub fn with_query(
        mut self,
        pagination: PaginationModel,
        search: impl Into<String>,
        filters: FilterSet,
    ) -> Self {
        self.pagination = pagination;
        self.search = search.into();
        self.filters = filters;
        self
    }

    pub fn set_names(&mut self, names: ScdNames) {
        self.names = names;
    }

    /// Send UI filters on the very first load too.
    pub fn skip_landing_load(&mut self) {
        self.reconciler.skip_first_load();
    }

    pub fn screen(&self) -> &ScreenConfig {
        &self.screen
    }

    pub fn pagination(&self) -> PaginationModel {
        self.pagination
    }

    pub fn filters(&self) -> &FilterSet {
        &self.filters
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn loading(&self) -> bool {
        self.fetch.loading()
    }

    /// Fetch the current page if anything changed since the last fetch.
    pub async fn load(&mut self) -> ApiResult<FetchOutcome> {
        let deps = self.next_deps()?;
        Ok(self.fetch.sync(deps).await)
    }

    pub async fn refresh(&self) -> FetchOutcome {
        self.fetch.refetch().await
    }

    pub async fn set_search(&mut self, search: impl Into<String>) -> ApiResult<FetchOutcome> {
        self.search = search.into();
        self.pagination = self.pagination.first_page();
        self.load().await
    }

    pub async fn set_sort_dir(&mut self, sort_dir: SortDir) -> ApiResult<FetchOutcome> {
        self.sort_dir = sort_dir;
        self.load().await
    }

    pub async fn set_filter(
        &mut self,
        key: impl Into<String>,
        value: impl Into<Value>,
    ) -> ApiResult<FetchOutcome> {
        self.filters.insert(key, value);
        self.pagination = self.pagination.first_page();
        self.load().await
    }

    pub async fn clear_filter(&mut self, key: &str) -> ApiResult<FetchOutcome> {
        if self.filters.remove(key).is_some() {
            self.pagination = self.pagination.first_page();
        }
        self.load().await
    }

    pub async fn set_page(&mut self, page: u32) -> ApiResult<FetchOutcome> {
        self.pagination = self.pagination.with_page(page);
        self.load().await
    }

    pub async fn set_page_size(&mut self, page_size: u32) -> ApiResult<FetchOutcome> {
        self.pagination = PaginationModel::new(0, page_size)
            .map_err(|err| ApiError::Core(err.into()))?;
        self.load().await
    }

    pub async fn next_page(&mut self) -> ApiResult<FetchOutcome> {
        match self.pager().next() {
            Some(next) => {
                self.pagination = next;
                self.load().await
            }
            None => Ok(FetchOutcome::Unchanged),
        }
    }

    pub async fn prev_page(&mut self) -> ApiResult<FetchOutcome> {
        match self.pager().prev() {
            Some(prev) => {
                self.pagination = prev;
                self.load().await
            }
            None => Ok(FetchOutcome::Unchanged),
        }
    }

    /// The current page, normalized. Missing or malformed data is empty.
    pub fn page(&self) -> GridPage<Value> {
        let Some(body) = self.fetch.data() else {
            return GridPage::empty();
        };
        let page = match serde_json::from_value::<PageResponse<Value>>(body) {
            Ok(response) => response.normalize(),
            Err(err) => {
                log::debug!("[DataGrid] {}: unexpected list shape: {}", self.screen.key, err);
                GridPage::empty()
            }
        };
        match &self.transform {
            Some(transform) => page.map_rows(|row| transform(row)),
            None => page,
        }
    }

    /// Row actions visible to the current actor.
    pub fn action_column(&self) -> Option<ActionColumn> {
        let permissions = self
            .session
            .profile()
            .map(|profile| profile.permissions)
            .unwrap_or_default();
        self.screen
            .actions
            .resolve(&permissions, &self.screen.entity_name)
    }

    /// Lay out the current page for a viewport `width` columns wide.
    pub fn view(&self, width: u16) -> GridView {
        let page = self.page();
        let actions = self.action_column();
        GridView::build(ViewInput {
            page: &page,
            columns: &self.screen.columns,
            actions: actions.as_ref(),
            names: &self.names,
            row_id_field: &self.screen.row_id_field,
            pagination: self.pagination,
            viewport_width: width,
            breakpoint: self.options.mobile_breakpoint,
        })
    }

    /// Confirm, delete one row, then refetch once on success.
    pub async fn delete_row(&mut self, id: &RowId, confirm: &dyn Confirm) -> DeleteOutcome {
        let Some(profile) = self.session.profile() else {
            return DeleteOutcome::Failed(ApiError::NotAuthenticated);
        };
        let allowed = self
            .action_column()
            .is_some_and(|column| column.allows(Action::Delete.as_str()));
        if !allowed {
            return DeleteOutcome::Denied;
        }
        if !confirm.confirm(DELETE_CONFIRM) {
            return DeleteOutcome::Cancelled;
        }

        let result = match self.screen.delete_url(profile.account_id, id) {
            Ok(path) => self.api.delete(&path).await,
            Err(err) => Err(err.into()),
        };

        match result {
            Ok(()) => {
                log::info!("[DataGrid] {}: deleted row {}", self.screen.key, id);
                self.notifier.notify(Notification::success(DELETE_SUCCESS));
                self.reload_after_delete().await;
                DeleteOutcome::Deleted
            }
            Err(err) => {
                log::warn!("[DataGrid] {}: delete of {} failed: {}", self.screen.key, id, err);
                self.notifier.notify(Notification::error(DELETE_FAILED));
                DeleteOutcome::Failed(err)
            }
        }
    }

    async fn reload_after_delete(&mut self) {
        if self.fetch.has_deps() {
            self.fetch.refetch().await;
            return;
        }
        // Nothing loaded yet: fetch the current page once.
        match self.next_deps() {
            Ok(deps) => {
                self.fetch.sync(deps).await;
            }
            Err(err) => {
                log::warn!("[DataGrid] {}: reload after delete skipped: {}", self.screen.key, err);
            }
        }
    }

    /// Unmount: in-flight responses are dropped.
    pub fn close(&self) {
        self.fetch.close();
    }

    fn pager(&self) -> CardPager {
        CardPager::new(self.pagination, self.page().row_count)
    }

    fn next_deps(&mut self) -> ApiResult<FetchDeps> {
        let profile: Profile = self.session.profile().ok_or(ApiError::NotAuthenticated)?;
        let query = GridQuery::new(self.pagination, &self.search, &self.filters)
            .sorted(self.sort_dir);
        let request = self.reconciler.reconcile(&profile, query);
        Ok(FetchDeps::from_request(
            Some(self.screen.list_path.clone()),
            self.screen.request_mode,
            request,
        ))
    }
}
