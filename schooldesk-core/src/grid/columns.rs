//! Declarative columns and the cell resolver shared by both grid renderings.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use schooldesk_model::filter_keys as keys;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

/// A value getter could not produce a cell.
#[derive(Debug, Clone, Error)]
#[error("{0}")]
pub struct CellError(pub String);

pub type ValueGetter = Arc<dyn Fn(&Value) -> Result<Value, CellError> + Send + Sync>;
pub type ValueFormatter = Arc<dyn Fn(&Value) -> String + Send + Sync>;
pub type CellRenderer = Arc<dyn Fn(&Value) -> String + Send + Sync>;
/// Caller-supplied transform applied to every row of a fetched page.
pub type RowTransform = Arc<dyn Fn(Value) -> Value + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColumnWidth {
    Fixed(u16),
    Flex(f32),
}

impl Default for ColumnWidth {
    fn default() -> Self {
        ColumnWidth::Flex(1.0)
    }
}

/// Column-to-cell mapping for one field.
#[derive(Clone)]
pub struct ColumnDef {
    pub field: String,
    pub header_name: String,
    pub width: ColumnWidth,
    value_getter: Option<ValueGetter>,
    value_formatter: Option<ValueFormatter>,
    render_cell: Option<CellRenderer>,
}

impl fmt::Debug for ColumnDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnDef")
            .field("field", &self.field)
            .field("header_name", &self.header_name)
            .field("width", &self.width)
            .field("has_getter", &self.value_getter.is_some())
            .field("has_formatter", &self.value_formatter.is_some())
            .field("has_renderer", &self.render_cell.is_some())
            .finish()
    }
}

impl ColumnDef {
    pub fn new(field: impl Into<String>, header_name: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            header_name: header_name.into(),
            width: ColumnWidth::default(),
            value_getter: None,
            value_formatter: None,
            render_cell: None,
        }
    }

    pub fn width(mut self, width: u16) -> Self {
        self.width = ColumnWidth::Fixed(width);
        self
    }

    pub fn flex(mut self, flex: f32) -> Self {
        self.width = ColumnWidth::Flex(flex);
        self
    }

    pub fn value_getter(
        mut self,
        getter: impl Fn(&Value) -> Result<Value, CellError> + Send + Sync + 'static,
    ) -> Self {
        self.value_getter = Some(Arc::new(getter));
        self
    }

    pub fn value_formatter(
        mut self,
        formatter: impl Fn(&Value) -> String + Send + Sync + 'static,
    ) -> Self {
        self.value_formatter = Some(Arc::new(formatter));
        self
    }

    /// Desktop-only renderer fed the whole row.
    pub fn render_cell(
        mut self,
        renderer: impl Fn(&Value) -> String + Send + Sync + 'static,
    ) -> Self {
        self.render_cell = Some(Arc::new(renderer));
        self
    }

    fn is_scd_field(&self) -> bool {
        keys::SCD.contains(&self.field.as_str())
    }
}

/// Display names for schools, classes and divisions keyed by id text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScdNames {
    pub schools: HashMap<String, String>,
    pub classes: HashMap<String, String>,
    pub divisions: HashMap<String, String>,
}

impl ScdNames {
    pub fn is_empty(&self) -> bool {
        self.schools.is_empty() && self.classes.is_empty() && self.divisions.is_empty()
    }

    /// Name for an SCD field value, if the field is one and the id is known.
    pub fn lookup(&self, field: &str, value: &Value) -> Option<&str> {
        let map = match field {
            keys::SCHOOL_ID => &self.schools,
            keys::CLASS_ID => &self.classes,
            keys::DIVISION_ID => &self.divisions,
            _ => return None,
        };
        let id = match value {
            Value::Number(n) => n.to_string(),
            Value::String(s) => s.clone(),
            _ => return None,
        };
        map.get(&id).map(String::as_str)
    }
}

/// Computes the text of a cell the way the desktop grid does.
#[derive(Debug, Clone, Copy)]
pub struct CellResolver<'a> {
    names: &'a ScdNames,
}

impl<'a> CellResolver<'a> {
    pub fn new(names: &'a ScdNames) -> Self {
        Self { names }
    }

    /// Raw value: getter, else field (dotted paths allowed), else null.
    ///
    /// Getter failures are swallowed and fall back to the raw field.
    pub fn value(&self, column: &ColumnDef, row: &Value) -> Value {
        if let Some(getter) = &column.value_getter {
            match getter(row) {
                Ok(value) => return value,
                Err(err) => {
                    debug!(field = %column.field, error = %err, "value getter failed");
                }
            }
        }
        field_value(row, &column.field).cloned().unwrap_or(Value::Null)
    }

    /// Cell text for card and plain-text renderings.
    pub fn text(&self, column: &ColumnDef, row: &Value) -> String {
        let value = self.value(column, row);
        if let Some(formatter) = &column.value_formatter {
            return formatter(&value);
        }
        if column.value_getter.is_none()
            && column.is_scd_field()
            && let Some(name) = self.names.lookup(&column.field, &value)
        {
            return name.to_string();
        }
        value_text(&value)
    }

    /// Cell text for the desktop table: the renderer wins when present.
    pub fn rendered(&self, column: &ColumnDef, row: &Value) -> String {
        match &column.render_cell {
            Some(renderer) => renderer(row),
            None => self.text(column, row),
        }
    }
}

fn field_value<'v>(row: &'v Value, field: &str) -> Option<&'v Value> {
    if let Some(direct) = row.get(field) {
        return Some(direct);
    }
    field
        .split('.')
        .try_fold(row, |current, segment| current.get(segment))
}

/// Plain text for a JSON value; null is empty.
pub fn value_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Array(items) => items
            .iter()
            .map(value_text)
            .filter(|text| !text.is_empty())
            .collect::<Vec<_>>()
            .join(", "),
        Value::Object(_) => value.to_string(),
    }
}
