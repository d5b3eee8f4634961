//! Request reconciliation: decide which filters reach the backend.
//!
//! Priority, highest first:
//! 1. admin first-load suppression (UI filters withheld once per mount)
//! 2. student enforcement (own school/class/division overrides the UI)
//! 3. teacher enforcement (school forced, allocation lists unless the UI
//!    picked a class or division)
//! 4. base payload ∪ UI filters ∪ enforced filters, enforced winning

use schooldesk_model::{FilterSet, PaginationModel, Profile, SortDir};
use tracing::debug;

use super::policy::ActorPolicy;
use super::request::GridRequest;

/// UI-side inputs to one fetch.
#[derive(Debug, Clone, Copy)]
pub struct GridQuery<'a> {
    pub pagination: PaginationModel,
    pub search: &'a str,
    pub sort_dir: SortDir,
    pub ui_filters: &'a FilterSet,
}

impl<'a> GridQuery<'a> {
    pub fn new(
        pagination: PaginationModel,
        search: &'a str,
        ui_filters: &'a FilterSet,
    ) -> Self {
        Self {
            pagination,
            search,
            sort_dir: SortDir::Asc,
            ui_filters,
        }
    }

    pub fn sorted(mut self, sort_dir: SortDir) -> Self {
        self.sort_dir = sort_dir;
        self
    }
}

/// Per-mount reconciliation state.
///
/// Construct a new reconciler whenever a grid mounts; the first-load flag is
/// only ever reset that way.
#[derive(Debug)]
pub struct RequestReconciler {
    first_load_pending: bool,
}

impl Default for RequestReconciler {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestReconciler {
    pub fn new() -> Self {
        Self {
            first_load_pending: true,
        }
    }

    pub fn first_load_pending(&self) -> bool {
        self.first_load_pending
    }

    /// Treat the landing load as already done, e.g. when the caller opens the
    /// grid with an explicit filter selection.
    pub fn skip_first_load(&mut self) {
        self.first_load_pending = false;
    }

    /// Build the payload for the next fetch.
    pub fn reconcile(
        &mut self,
        profile: &Profile,
        query: GridQuery<'_>,
    ) -> GridRequest {
        let policy = ActorPolicy::for_profile(profile);
        let first_load = std::mem::replace(&mut self.first_load_pending, false);

        let mut filters = if first_load && policy.suppresses_first_load() {
            debug!(
                dropped = query.ui_filters.len(),
                "admin landing load, withholding UI filters"
            );
            FilterSet::new()
        } else {
            query.ui_filters.clone()
        };

        let enforcement = policy.enforced_filters(&filters);
        enforcement.apply_to(&mut filters);

        GridRequest::new(query.pagination)
            .with_search(query.search.trim())
            .with_sort_dir(query.sort_dir)
            .with_filters(filters)
    }
}
