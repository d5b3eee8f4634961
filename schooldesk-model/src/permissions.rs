use std::fmt;

use serde::{Deserialize, Serialize};

/// Action a permission entry can grant on an entity.
///
/// Names are case-insensitive on the wire; `read` and `update` are accepted
/// as aliases for `view` and `edit`. Anything else is kept as a custom action.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Action {
    View,
    Create,
    Edit,
    Delete,
    Enroll,
    Custom(String),
}

impl Action {
    pub fn as_str(&self) -> &str {
        match self {
            Action::View => "view",
            Action::Create => "create",
            Action::Edit => "edit",
            Action::Delete => "delete",
            Action::Enroll => "enroll",
            Action::Custom(name) => name,
        }
    }

    pub fn custom(name: impl AsRef<str>) -> Self {
        Action::from(name.as_ref().to_string())
    }
}

impl From<String> for Action {
    fn from(raw: String) -> Self {
        let name = raw.trim().to_ascii_lowercase();
        match name.as_str() {
            "view" | "read" => Action::View,
            "create" | "add" => Action::Create,
            "edit" | "update" => Action::Edit,
            "delete" => Action::Delete,
            "enroll" => Action::Enroll,
            _ => Action::Custom(name),
        }
    }
}

impl From<Action> for String {
    fn from(action: Action) -> Self {
        action.as_str().to_string()
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Actions granted on one entity (e.g. `CLASS`) to the current actor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionEntry {
    pub entity_name: String,
    #[serde(default)]
    pub actions: Vec<Action>,
}

impl PermissionEntry {
    pub fn new(
        entity_name: impl Into<String>,
        actions: impl IntoIterator<Item = Action>,
    ) -> Self {
        Self {
            entity_name: entity_name.into(),
            actions: actions.into_iter().collect(),
        }
    }

    /// Whether this entry names `entity`; comparison ignores case and padding.
    pub fn matches_entity(&self, entity: &str) -> bool {
        self.entity_name.trim().eq_ignore_ascii_case(entity.trim())
    }

    pub fn grants(&self, action: &Action) -> bool {
        self.actions.iter().any(|granted| granted == action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn aliases_and_custom_actions() {
        let actions: Vec<Action> =
            serde_json::from_value(json!(["READ", "update", "Promote"])).unwrap();
        assert_eq!(
            actions,
            vec![Action::View, Action::Edit, Action::Custom("promote".into())]
        );
        assert_eq!(serde_json::to_value(&Action::Enroll).unwrap(), json!("enroll"));
    }

    #[test]
    fn entry_deserializes_from_backend_shape() {
        let entry: PermissionEntry = serde_json::from_value(json!({
            "entityName": "CLASS",
            "actions": ["view", "delete"]
        }))
        .unwrap();
        assert!(entry.matches_entity("class "));
        assert!(entry.grants(&Action::Delete));
        assert!(!entry.grants(&Action::Edit));
    }
}
