//! School/class/division name prefetch
//!
//! Grids show names instead of raw SCD ids. The three lookup lists are
//! fetched concurrently when a grid mounts; any one of them failing leaves
//! that map empty and the cells fall back to the id.

use std::collections::HashMap;
use std::sync::Arc;

use schooldesk_core::grid::ScdNames;
use schooldesk_model::{PageResponse, RowId};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::services::ApiService;

const SCHOOL_NAME_FIELDS: &[&str] = &["schoolName", "name"];
const CLASS_NAME_FIELDS: &[&str] = &["className", "name"];
const DIVISION_NAME_FIELDS: &[&str] = &["divisionName", "name"];

/// Lookup endpoints, relative to the API base URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScdEndpoints {
    pub schools: String,
    pub classes: String,
    pub divisions: String,
}

impl Default for ScdEndpoints {
    fn default() -> Self {
        Self {
            schools: "schools/all".to_string(),
            classes: "classes/all".to_string(),
            divisions: "divisions/all".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ScdDirectory {
    api: Arc<dyn ApiService>,
    endpoints: ScdEndpoints,
}

impl ScdDirectory {
    pub fn new(api: Arc<dyn ApiService>, endpoints: ScdEndpoints) -> Self {
        Self { api, endpoints }
    }

    /// Fetch all three maps concurrently.
    pub async fn prefetch(&self) -> ScdNames {
        let (schools, classes, divisions) = futures::join!(
            self.fetch_names(&self.endpoints.schools, SCHOOL_NAME_FIELDS),
            self.fetch_names(&self.endpoints.classes, CLASS_NAME_FIELDS),
            self.fetch_names(&self.endpoints.divisions, DIVISION_NAME_FIELDS),
        );
        ScdNames {
            schools,
            classes,
            divisions,
        }
    }

    async fn fetch_names(
        &self,
        path: &str,
        name_fields: &[&str],
    ) -> HashMap<String, String> {
        match self.api.get_json(path).await {
            Ok(body) => names_from(body, name_fields),
            Err(err) => {
                log::warn!("[Scd] Lookup {} failed: {}", path, err);
                HashMap::new()
            }
        }
    }
}

/// `id -> name` for every row that has both.
fn names_from(body: Value, name_fields: &[&str]) -> HashMap<String, String> {
    let rows = match serde_json::from_value::<PageResponse<Value>>(body) {
        Ok(page) => page.normalize().rows,
        Err(err) => {
            log::debug!("[Scd] Unexpected lookup shape: {}", err);
            return HashMap::new();
        }
    };

    rows.iter()
        .filter_map(|row| {
            let id = row.get("id").and_then(RowId::from_value)?;
            let name = name_fields
                .iter()
                .find_map(|field| row.get(*field).and_then(Value::as_str))
                .filter(|name| !name.trim().is_empty())?;
            Some((id.to_string(), name.to_string()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn prefers_specific_name_field() {
        let body = json!([
            {"id": 1, "schoolName": "Hillside", "name": "ignored"},
            {"id": 2, "name": "Riverside"},
            {"id": 3},
            {"name": "no id"}
        ]);
        let names = names_from(body, SCHOOL_NAME_FIELDS);
        assert_eq!(names.len(), 2);
        assert_eq!(names["1"], "Hillside");
        assert_eq!(names["2"], "Riverside");
    }

    #[test]
    fn reads_paginated_lookups() {
        let body = json!({"content": [{"id": "7", "className": "Grade 7"}], "totalElements": 1});
        assert_eq!(names_from(body, CLASS_NAME_FIELDS)["7"], "Grade 7");
    }

    #[test]
    fn unexpected_shape_is_empty() {
        assert!(names_from(json!("oops"), DIVISION_NAME_FIELDS).is_empty());
    }
}
