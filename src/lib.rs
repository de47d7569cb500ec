//! report-tables: expandable policy tables for compliance reports
//!
//! This library renders the interactive parts of a compliance report
//! (conditional access policies, risky applications and risky third-party
//! service principals) into an element tree with explicit view state, and
//! serializes the result into a self-contained HTML page.

pub mod classify;
pub mod config;
pub mod dates;
pub mod details;
pub mod diagnostics;
pub mod dom;
pub mod input;
pub mod page;
pub mod reporter;
pub mod show_more;
pub mod summary;
pub mod table;
pub mod theme;

use serde_json::Value;
use std::collections::HashMap;

pub use diagnostics::{Diagnostics, RenderError};
pub use page::{Action, ReportPage};
pub use table::{PresentationMode, TableDescriptor, TableType};

/// Fields of a single sub-object inside a collection cell, in source order
pub type Record = serde_json::Map<String, Value>;

/// One element of a collection cell
#[derive(Debug, Clone, PartialEq)]
pub enum CollectionItem {
    /// A sub-object such as a credential or permission record
    Record(Record),
    /// A plain value (CAP cells are lists of strings)
    Scalar(String),
}

impl CollectionItem {
    fn from_json(value: Value) -> Self {
        match value {
            Value::Object(map) => CollectionItem::Record(map),
            other => CollectionItem::Scalar(value_to_display(&other)),
        }
    }

    /// Best-effort single-line string form
    pub fn display(&self) -> String {
        match self {
            CollectionItem::Scalar(s) => s.clone(),
            CollectionItem::Record(map) => map
                .iter()
                .map(|(k, v)| format!("{}: {}", k, value_to_display(v)))
                .collect::<Vec<_>>()
                .join(", "),
        }
    }

    pub fn as_record(&self) -> Option<&Record> {
        match self {
            CollectionItem::Record(map) => Some(map),
            CollectionItem::Scalar(_) => None,
        }
    }
}

/// A table cell value, dispatched on by every renderer
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    #[default]
    Null,
    Scalar(String),
    Collection(Vec<CollectionItem>),
}

impl CellValue {
    /// Convert a raw JSON value. Objects are treated as a one-element collection.
    pub fn from_json(value: Value) -> Self {
        match value {
            Value::Null => CellValue::Null,
            Value::Array(items) => {
                CellValue::Collection(items.into_iter().map(CollectionItem::from_json).collect())
            }
            Value::Object(map) => CellValue::Collection(vec![CollectionItem::Record(map)]),
            scalar => CellValue::Scalar(value_to_display(&scalar)),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }
}

static NULL_CELL: CellValue = CellValue::Null;

/// One data item (policy, application, service principal)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    fields: HashMap<String, CellValue>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, used by tests and callers assembling rows by hand
    pub fn with(mut self, column: &str, value: CellValue) -> Self {
        self.fields.insert(column.to_string(), value);
        self
    }

    /// Build a row from a JSON object. Returns `None` for non-object values.
    pub fn from_json(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self {
                fields: map
                    .into_iter()
                    .map(|(k, v)| (k, CellValue::from_json(v)))
                    .collect(),
            }),
            _ => None,
        }
    }

    /// Cell value for a column; absent columns read as `Null`
    pub fn get(&self, column: &str) -> &CellValue {
        self.fields.get(column).unwrap_or(&NULL_CELL)
    }

    /// Scalar text for a column, if present
    pub fn scalar(&self, column: &str) -> Option<&str> {
        match self.get(column) {
            CellValue::Scalar(s) => Some(s.as_str()),
            _ => None,
        }
    }
}

/// String form of a JSON value the way the report shows it
pub fn value_to_display(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}
