use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ModelError, Result};

/// Page size used whenever a caller does not supply a usable one.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Zero-based server-side pagination state owned by a grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationModel {
    pub page: u32,
    pub page_size: u32,
}

impl Default for PaginationModel {
    fn default() -> Self {
        Self {
            page: 0,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PaginationModel {
    pub fn new(page: u32, page_size: u32) -> Result<Self> {
        if page_size == 0 {
            return Err(ModelError::InvalidPagination(
                "page size must be greater than zero".into(),
            ));
        }
        Ok(Self { page, page_size })
    }

    /// Same page size, back to the first page.
    pub fn first_page(self) -> Self {
        Self { page: 0, ..self }
    }

    pub fn with_page(self, page: u32) -> Self {
        Self { page, ..self }
    }

    /// Number of pages needed for `row_count` rows (at least one).
    pub fn page_count(&self, row_count: u64) -> u64 {
        let size = u64::from(self.page_size.max(1));
        row_count.div_ceil(size).max(1)
    }
}

/// Pagination as it arrives from loosely typed callers.
///
/// Missing, non-numeric, negative or fractional values fall back to
/// `page = 0` and `page_size = 10`; a zero page size is treated the same way.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoosePagination {
    #[serde(default)]
    pub page: Option<Value>,
    #[serde(default)]
    pub page_size: Option<Value>,
}

impl LoosePagination {
    pub fn normalize(&self) -> PaginationModel {
        let page = self.page.as_ref().and_then(coerce_index).unwrap_or(0);
        let page_size = self
            .page_size
            .as_ref()
            .and_then(coerce_index)
            .filter(|size| *size > 0)
            .unwrap_or(DEFAULT_PAGE_SIZE);
        PaginationModel { page, page_size }
    }
}

impl From<PaginationModel> for LoosePagination {
    fn from(model: PaginationModel) -> Self {
        Self {
            page: Some(Value::from(model.page)),
            page_size: Some(Value::from(model.page_size)),
        }
    }
}

fn coerce_index(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => {
            if let Some(v) = n.as_u64() {
                return u32::try_from(v).ok();
            }
            n.as_f64()
                .filter(|f| f.is_finite() && *f >= 0.0 && f.fract() == 0.0)
                .and_then(|f| u32::try_from(f as u64).ok())
        }
        _ => None,
    }
}

/// Sort direction sent as `sortDir`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum SortDir {
    #[default]
    Asc,
    Desc,
}

impl SortDir {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDir::Asc => "asc",
            SortDir::Desc => "desc",
        }
    }
}

impl fmt::Display for SortDir {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
