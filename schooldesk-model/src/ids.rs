use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Backend account identifier used to scope destructive requests.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct AccountId(pub i64);

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of an opaque grid row. Backends use both numeric and string keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RowId {
    Int(i64),
    Text(String),
}

impl RowId {
    /// Read a row id out of a JSON value, accepting integers and non-empty strings.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n.as_i64().map(RowId::Int),
            Value::String(s) if !s.trim().is_empty() => {
                Some(RowId::Text(s.trim().to_string()))
            }
            _ => None,
        }
    }

    /// Parse user-supplied text; numeric text becomes [`RowId::Int`].
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(
            trimmed
                .parse::<i64>()
                .map(RowId::Int)
                .unwrap_or_else(|_| RowId::Text(trimmed.to_string())),
        )
    }
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowId::Int(id) => write!(f, "{id}"),
            RowId::Text(id) => f.write_str(id),
        }
    }
}

/// Which field of a row carries its identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RowIdField(pub String);

impl Default for RowIdField {
    fn default() -> Self {
        Self("id".to_string())
    }
}

impl RowIdField {
    pub fn new(field: impl Into<String>) -> Self {
        Self(field.into())
    }

    pub fn row_id(&self, row: &Value) -> Option<RowId> {
        row.get(&self.0).and_then(RowId::from_value)
    }
}
