//! Core data model definitions shared across SchoolDesk crates.
#![allow(missing_docs)]

pub mod actor;
pub mod error;
pub mod filters;
pub mod ids;
pub mod page;
pub mod pagination;
pub mod permissions;
pub mod prelude;

// Intentionally curated re-exports for downstream consumers.
pub use actor::{ActorKind, Profile, TeacherAllocation};
pub use error::{ModelError, Result as ModelResult};
pub use filters::{FilterSet, keys as filter_keys};
pub use ids::{AccountId, RowId, RowIdField};
pub use page::{GridPage, PageEnvelope, PageResponse};
pub use pagination::{
    DEFAULT_PAGE_SIZE, LoosePagination, PaginationModel, SortDir,
};
pub use permissions::{Action, PermissionEntry};
