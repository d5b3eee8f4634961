use serde::{Deserialize, Serialize};

/// Paginated envelope returned by list endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageEnvelope<T> {
    pub content: Option<Vec<T>>,
    pub total_elements: Option<u64>,
}

/// Either shape a list endpoint may answer with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PageResponse<T> {
    Bare(Vec<T>),
    Paginated(PageEnvelope<T>),
}

impl<T> PageResponse<T> {
    /// Collapse both shapes into rows plus the total row count.
    ///
    /// A missing envelope `content` is an empty page; a missing
    /// `totalElements` falls back to the number of rows received.
    pub fn normalize(self) -> GridPage<T> {
        match self {
            PageResponse::Bare(rows) => {
                let row_count = rows.len() as u64;
                GridPage { rows, row_count }
            }
            PageResponse::Paginated(envelope) => {
                let rows = envelope.content.unwrap_or_default();
                let row_count =
                    envelope.total_elements.unwrap_or(rows.len() as u64);
                GridPage { rows, row_count }
            }
        }
    }
}

/// Rows of the current page and the server-side total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridPage<T> {
    pub rows: Vec<T>,
    pub row_count: u64,
}

impl<T> Default for GridPage<T> {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            row_count: 0,
        }
    }
}

impl<T> GridPage<T> {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Apply a per-row transform, keeping the total.
    pub fn map_rows<U>(self, f: impl FnMut(T) -> U) -> GridPage<U> {
        GridPage {
            rows: self.rows.into_iter().map(f).collect(),
            row_count: self.row_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    fn decode(value: Value) -> GridPage<Value> {
        serde_json::from_value::<PageResponse<Value>>(value)
            .unwrap()
            .normalize()
    }

    #[test]
    fn envelope_reports_server_total() {
        let rows: Vec<Value> = (0..10).map(|i| json!({ "id": i })).collect();
        let page = decode(json!({ "content": rows, "totalElements": 42 }));
        assert_eq!(page.row_count, 42);
        assert_eq!(page.rows.len(), 10);
    }

    #[test]
    fn bare_array_counts_itself() {
        let page = decode(json!([{ "id": 1 }, { "id": 2 }, { "id": 3 }]));
        assert_eq!(page.row_count, 3);
        assert_eq!(page.rows.len(), 3);
    }

    #[test]
    fn null_content_is_empty() {
        let page = decode(json!({ "content": null, "totalElements": 5 }));
        assert!(page.is_empty());
        assert_eq!(page.row_count, 5);

        let page = decode(json!({ "content": [{ "id": 1 }] }));
        assert_eq!(page.row_count, 1);
    }

    #[test]
    fn envelope_fields_may_be_absent() {
        let page = decode(json!({ "totalElements": 4 }));
        assert!(page.is_empty());
        assert_eq!(page.row_count, 4);

        let page = decode(json!({}));
        assert!(page.is_empty());
        assert_eq!(page.row_count, 0);
    }

    #[test]
    fn typed_rows_decode_without_default() {
        #[derive(Debug, PartialEq, Deserialize)]
        struct Row {
            id: i64,
        }

        let page = serde_json::from_value::<PageResponse<Row>>(
            json!({ "content": [{ "id": 3 }], "totalElements": 1 }),
        )
        .unwrap()
        .normalize();
        assert_eq!(page.rows, vec![Row { id: 3 }]);
    }

    #[test]
    fn map_rows_keeps_total() {
        let page = decode(json!({ "content": [{ "id": 1 }], "totalElements": 9 }))
            .map_rows(|row| row["id"].as_i64().unwrap_or_default());
        assert_eq!(page.rows, vec![1]);
        assert_eq!(page.row_count, 9);
    }
}
