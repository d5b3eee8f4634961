//! Glob-importable set of the model types most screens touch.

pub use crate::actor::{ActorKind, Profile, TeacherAllocation};
pub use crate::filters::{FilterSet, keys as filter_keys};
pub use crate::ids::{AccountId, RowId, RowIdField};
pub use crate::page::{GridPage, PageEnvelope, PageResponse};
pub use crate::pagination::{LoosePagination, PaginationModel, SortDir};
pub use crate::permissions::{Action, PermissionEntry};
