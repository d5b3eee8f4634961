use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ModelError, Result};

/// Well-known filter keys shared by most screens.
pub mod keys {
    pub const SCHOOL_ID: &str = "schoolId";
    pub const CLASS_ID: &str = "classId";
    pub const DIVISION_ID: &str = "divisionId";
    pub const CLASS_LIST: &str = "classList";
    pub const DIVISION_LIST: &str = "divisionList";

    /// School / class / division keys, in hierarchy order.
    pub const SCD: [&str; 3] = [SCHOOL_ID, CLASS_ID, DIVISION_ID];
}

/// Mapping of filter key to the selected value.
///
/// Keys are kept ordered so serialized payloads are stable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterSet(BTreeMap<String, Value>);

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.remove(key)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// A key is selected when it carries something other than null, an empty
    /// string or an empty list.
    pub fn is_selected(&self, key: &str) -> bool {
        self.0.get(key).is_some_and(is_meaningful)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }

    pub fn retain(&mut self, mut keep: impl FnMut(&str, &Value) -> bool) {
        self.0.retain(|k, v| keep(k, v));
    }

    /// Copy every entry of `other` into `self`; `other` wins on shared keys.
    pub fn overlay(&mut self, other: &FilterSet) {
        for (key, value) in other.iter() {
            self.0.insert(key.clone(), value.clone());
        }
    }

    /// Parse a `key=value` assignment as typed on a command line.
    ///
    /// Integers and booleans keep their JSON type, comma separated values
    /// become lists, anything else stays a string.
    pub fn parse_assignment(raw: &str) -> Result<(String, Value)> {
        let (key, value) = raw.split_once('=').ok_or_else(|| {
            ModelError::InvalidFilter(format!("expected key=value, got '{raw}'"))
        })?;
        let key = key.trim();
        if key.is_empty() {
            return Err(ModelError::InvalidFilter(format!(
                "missing filter key in '{raw}'"
            )));
        }
        let value = value.trim();
        let parsed = if value.contains(',') {
            Value::Array(
                value
                    .split(',')
                    .map(str::trim)
                    .filter(|part| !part.is_empty())
                    .map(scalar)
                    .collect(),
            )
        } else {
            scalar(value)
        };
        Ok((key.to_string(), parsed))
    }
}

impl FromIterator<(String, Value)> for FilterSet {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a FilterSet {
    type Item = (&'a String, &'a Value);
    type IntoIter = std::collections::btree_map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

fn scalar(raw: &str) -> Value {
    if let Ok(int) = raw.parse::<i64>() {
        return Value::from(int);
    }
    match raw {
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        "" => Value::Null,
        other => Value::String(other.to_string()),
    }
}

fn is_meaningful(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.trim().is_empty(),
        Value::Array(items) => !items.is_empty(),
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn selection_ignores_blank_values() {
        let filters = FilterSet::new()
            .with(keys::CLASS_ID, Value::Null)
            .with(keys::DIVISION_ID, "")
            .with(keys::SCHOOL_ID, 4)
            .with(keys::CLASS_LIST, json!([]));
        assert!(!filters.is_selected(keys::CLASS_ID));
        assert!(!filters.is_selected(keys::DIVISION_ID));
        assert!(!filters.is_selected(keys::CLASS_LIST));
        assert!(filters.is_selected(keys::SCHOOL_ID));
        assert!(!filters.is_selected("missing"));
    }

    #[test]
    fn overlay_overwrites_shared_keys() {
        let mut base = FilterSet::new().with("a", 1).with("b", 2);
        base.overlay(&FilterSet::new().with("b", 20).with("c", 30));
        assert_eq!(base.get("a"), Some(&json!(1)));
        assert_eq!(base.get("b"), Some(&json!(20)));
        assert_eq!(base.get("c"), Some(&json!(30)));
    }

    #[test]
    fn parses_typed_assignments() {
        assert_eq!(
            FilterSet::parse_assignment("classId=3").unwrap(),
            ("classId".to_string(), json!(3))
        );
        assert_eq!(
            FilterSet::parse_assignment("status = active").unwrap(),
            ("status".to_string(), json!("active"))
        );
        assert_eq!(
            FilterSet::parse_assignment("classList=1, 2,3").unwrap(),
            ("classList".to_string(), json!([1, 2, 3]))
        );
        assert_eq!(
            FilterSet::parse_assignment("archived=false").unwrap().1,
            json!(false)
        );
    }

    #[test]
    fn rejects_malformed_assignments() {
        assert!(FilterSet::parse_assignment("classId").is_err());
        assert!(FilterSet::parse_assignment("=3").is_err());
    }

    #[test]
    fn serializes_as_flat_object() {
        let filters = FilterSet::new().with("schoolId", 1).with("classId", 2);
        assert_eq!(
            serde_json::to_value(&filters).unwrap(),
            json!({ "classId": 2, "schoolId": 1 })
        );
    }
}
