//! Row actions and their permission gate.
//!
//! Every entry of the action column, built-in or custom, is checked against
//! `(permissions, entity_name, action)` before it is shown.

use schooldesk_model::{Action, PermissionEntry};
use serde::{Deserialize, Serialize};

use crate::rbac::PermissionChecker;

/// Screen-specific row action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomAction {
    pub name: String,
    pub label: String,
    /// Action the actor must hold on the screen's entity.
    pub permission: Action,
}

impl CustomAction {
    /// Custom action gated by its own name.
    pub fn new(name: impl Into<String>, label: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            permission: Action::custom(&name),
            name,
            label: label.into(),
        }
    }

    /// Gate on a different action, e.g. a "Grade" button that needs `edit`.
    pub fn requires(mut self, permission: Action) -> Self {
        self.permission = permission;
        self
    }
}

/// Which actions a screen offers on its rows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RowActions {
    pub view: bool,
    pub edit: bool,
    pub delete: bool,
    pub enroll: bool,
    #[serde(default)]
    pub custom: Vec<CustomAction>,
}

impl RowActions {
    pub fn none() -> Self {
        Self::default()
    }

    /// View, edit and delete: the common CRUD set.
    pub fn crud() -> Self {
        Self {
            view: true,
            edit: true,
            delete: true,
            ..Self::default()
        }
    }

    pub fn with_enroll(mut self) -> Self {
        self.enroll = true;
        self
    }

    pub fn with_custom(mut self, action: CustomAction) -> Self {
        self.custom.push(action);
        self
    }

    /// The action column exists only when something is configured.
    pub fn is_configured(&self) -> bool {
        self.view || self.edit || self.delete || self.enroll || !self.custom.is_empty()
    }

    /// Resolve the action column for an actor, or `None` when no actions
    /// are configured at all.
    pub fn resolve(
        &self,
        permissions: &[PermissionEntry],
        entity_name: &str,
    ) -> Option<ActionColumn> {
        if !self.is_configured() {
            return None;
        }

        let checker = PermissionChecker::new(permissions);
        let builtins = [
            (self.view, Action::View, "View"),
            (self.edit, Action::Edit, "Edit"),
            (self.delete, Action::Delete, "Delete"),
            (self.enroll, Action::Enroll, "Enroll"),
        ];
        let mut buttons: Vec<ActionButton> = builtins
            .into_iter()
            .filter(|(enabled, action, _)| {
                *enabled && checker.allows(entity_name, action)
            })
            .map(|(_, action, label)| ActionButton {
                name: action.as_str().to_string(),
                label: label.to_string(),
                action,
            })
            .collect();

        buttons.extend(
            self.custom
                .iter()
                .filter(|custom| {
                    checker.allows(entity_name, &custom.permission)
                })
                .map(|custom| ActionButton {
                    name: custom.name.clone(),
                    label: custom.label.clone(),
                    action: custom.permission.clone(),
                }),
        );

        Some(ActionColumn { buttons })
    }
}

/// One visible button of the action column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionButton {
    pub name: String,
    pub label: String,
    pub action: Action,
}

/// The resolved action column. May be empty when every action was gated away.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionColumn {
    pub buttons: Vec<ActionButton>,
}

impl ActionColumn {
    pub fn allows(&self, name: &str) -> bool {
        self.buttons.iter().any(|button| button.name == name)
    }

    pub fn labels(&self) -> Vec<&str> {
        self.buttons.iter().map(|b| b.label.as_str()).collect()
    }
}
