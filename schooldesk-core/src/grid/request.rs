use schooldesk_model::{FilterSet, PaginationModel, SortDir};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Payload keys owned by the grid itself; filters may not shadow them.
pub const RESERVED_KEYS: [&str; 5] = ["page", "size", "sortBy", "sortDir", "search"];

/// How a screen's list endpoint expects to be called.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RequestMode {
    /// `POST` with the payload as a JSON body.
    #[default]
    PostJson,
    /// `GET` with the payload encoded in the query string.
    GetQuery,
    /// `GET` carrying the payload as a JSON body.
    GetWithBody,
}

/// The single payload a grid sends per fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridRequest {
    pub page: u32,
    pub size: u32,
    pub sort_by: String,
    pub sort_dir: SortDir,
    pub search: String,
    #[serde(flatten)]
    pub filters: FilterSet,
}

impl GridRequest {
    /// Base payload: sorted by `id`, ascending, empty search.
    pub fn new(pagination: PaginationModel) -> Self {
        Self {
            page: pagination.page,
            size: pagination.page_size,
            sort_by: "id".to_string(),
            sort_dir: SortDir::Asc,
            search: String::new(),
            filters: FilterSet::new(),
        }
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    pub fn with_sort_dir(mut self, sort_dir: SortDir) -> Self {
        self.sort_dir = sort_dir;
        self
    }

    /// Attach filters, dropping any that collide with base keys.
    pub fn with_filters(mut self, mut filters: FilterSet) -> Self {
        filters.retain(|key, _| !RESERVED_KEYS.contains(&key));
        self.filters = filters;
        self
    }

    pub fn pagination(&self) -> PaginationModel {
        PaginationModel {
            page: self.page,
            page_size: self.size,
        }
    }

    /// Query-string pairs for [`RequestMode::GetQuery`].
    ///
    /// Nulls are skipped, lists become repeated keys, nested objects are sent
    /// as JSON text. An empty list is sent as the key with an empty value so
    /// an empty scope stays distinguishable from no scope.
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![
            ("page".to_string(), self.page.to_string()),
            ("size".to_string(), self.size.to_string()),
            ("sortBy".to_string(), self.sort_by.clone()),
            ("sortDir".to_string(), self.sort_dir.to_string()),
            ("search".to_string(), self.search.clone()),
        ];
        for (key, value) in &self.filters {
            match value {
                Value::Null => {}
                Value::Array(items) if items.is_empty() => {
                    pairs.push((key.clone(), String::new()));
                }
                Value::Array(items) => {
                    for item in items {
                        if let Some(text) = query_scalar(item) {
                            pairs.push((key.clone(), text));
                        }
                    }
                }
                other => {
                    if let Some(text) = query_scalar(other) {
                        pairs.push((key.clone(), text));
                    }
                }
            }
        }
        pairs
    }
}

fn query_scalar(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        other => Some(other.to_string()),
    }
}
