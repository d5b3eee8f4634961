//! The authenticated actor and the role-specific data it carries.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};
use crate::ids::AccountId;
use crate::permissions::PermissionEntry;

/// Role family of the current user; drives data-visibility rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ActorKind {
    Admin,
    Teacher,
    Student,
}

impl ActorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActorKind::Admin => "ADMIN",
            ActorKind::Teacher => "TEACHER",
            ActorKind::Student => "STUDENT",
        }
    }
}

impl fmt::Display for ActorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A class (and optionally one division of it) allocated to a teacher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeacherAllocation {
    pub class_id: i64,
    #[serde(default)]
    pub division_id: Option<i64>,
}

/// Profile of the signed-in actor as resolved from the session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub account_id: AccountId,
    pub user_id: i64,
    #[serde(default)]
    pub display_name: String,
    pub kind: ActorKind,
    #[serde(default)]
    pub school_id: Option<i64>,
    #[serde(default)]
    pub class_id: Option<i64>,
    #[serde(default)]
    pub division_id: Option<i64>,
    #[serde(default)]
    pub allocations: Vec<TeacherAllocation>,
    #[serde(default)]
    pub permissions: Vec<PermissionEntry>,
}

impl Profile {
    pub fn new(account_id: AccountId, user_id: i64, kind: ActorKind) -> Self {
        Self {
            account_id,
            user_id,
            display_name: String::new(),
            kind,
            school_id: None,
            class_id: None,
            division_id: None,
            allocations: Vec::new(),
            permissions: Vec::new(),
        }
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = name.into();
        self
    }

    pub fn with_scd(
        mut self,
        school_id: Option<i64>,
        class_id: Option<i64>,
        division_id: Option<i64>,
    ) -> Self {
        self.school_id = school_id;
        self.class_id = class_id;
        self.division_id = division_id;
        self
    }

    pub fn with_allocations(
        mut self,
        allocations: impl IntoIterator<Item = TeacherAllocation>,
    ) -> Self {
        self.allocations = allocations.into_iter().collect();
        self
    }

    pub fn with_permissions(
        mut self,
        permissions: impl IntoIterator<Item = PermissionEntry>,
    ) -> Self {
        self.permissions = permissions.into_iter().collect();
        self
    }

    /// Reject profiles whose role cannot be scoped to a school.
    pub fn validate(&self) -> Result<()> {
        match self.kind {
            ActorKind::Admin => Ok(()),
            ActorKind::Teacher | ActorKind::Student if self.school_id.is_none() => {
                Err(ModelError::InvalidProfile(format!(
                    "{} account {} has no school",
                    self.kind, self.account_id
                )))
            }
            _ => Ok(()),
        }
    }

    /// Human-readable name, falling back to the account id.
    pub fn label(&self) -> String {
        if self.display_name.trim().is_empty() {
            format!("account {}", self.account_id)
        } else {
            self.display_name.clone()
        }
    }
}
