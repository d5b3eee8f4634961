//! Role-Based Access Control (RBAC) checks
//!
//! Permissions arrive with the actor's profile as a list of
//! [`PermissionEntry`] values, one per entity. Resolution is a pure lookup:
//! no caching, no network, no side effects.
//!
//! ## Example
//!
//! ```
//! use schooldesk_core::rbac::{entities, has_permission};
//! use schooldesk_model::{Action, PermissionEntry};
//!
//! let granted = vec![PermissionEntry::new("CLASS", [Action::View, Action::Edit])];
//! assert!(has_permission(&granted, entities::CLASS, &Action::Edit));
//! assert!(!has_permission(&granted, entities::CLASS, &Action::Delete));
//! ```

use schooldesk_model::{Action, PermissionEntry};

/// Well-known entity names used by the screen catalog
pub mod entities {
    pub const ADMIN: &str = "ADMIN";
    pub const STUDENT: &str = "STUDENT";
    pub const TEACHER: &str = "TEACHER";
    pub const CLASS: &str = "CLASS";
    pub const DIVISION: &str = "DIVISION";
    pub const SCHOOL: &str = "SCHOOL";
    pub const EXAM: &str = "EXAM";
    pub const ATTENDANCE: &str = "ATTENDANCE";
    pub const ASSIGNMENT: &str = "ASSIGNMENT";
    pub const QUIZ: &str = "QUIZ";
    pub const TIMETABLE: &str = "TIMETABLE";
    pub const FEE_STRUCTURE: &str = "FEE_STRUCTURE";
    pub const ROLE: &str = "ROLE";
    pub const DOCUMENT: &str = "DOCUMENT";
}

/// Whether `permissions` grant `action` on `entity_name`.
///
/// Entity names compare case-insensitively. Unknown entities deny.
pub fn has_permission(
    permissions: &[PermissionEntry],
    entity_name: &str,
    action: &Action,
) -> bool {
    permissions
        .iter()
        .filter(|entry| entry.matches_entity(entity_name))
        .any(|entry| entry.grants(action))
}

/// Permission checker bound to one actor's permission list
#[derive(Debug, Clone, Copy)]
pub struct PermissionChecker<'a> {
    permissions: &'a [PermissionEntry],
}

impl<'a> PermissionChecker<'a> {
    pub fn new(permissions: &'a [PermissionEntry]) -> Self {
        Self { permissions }
    }

    pub fn allows(&self, entity_name: &str, action: &Action) -> bool {
        has_permission(self.permissions, entity_name, action)
    }
}
