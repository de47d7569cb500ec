//! Render errors and the diagnostic channel
//!
//! Nothing in the renderer is fatal: failures are recorded here (and logged)
//! while the rest of the page keeps rendering.

use thiserror::Error;

/// A non-fatal rendering failure
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    #[error("Invalid table type: {0}")]
    UnknownTableType(String),

    #[error("Malformed row {row} in {table}: {reason}")]
    MalformedRow {
        table: String,
        row: usize,
        reason: String,
    },

    #[error("Malformed {section} in report input: {reason}")]
    MalformedSection { section: String, reason: String },

    #[error("Details dialog elements not found: {0}")]
    MissingHostElement(&'static str),

    #[error("Row {row} is not rendered in {table}")]
    RowOutOfRange { table: String, row: usize },

    #[error("Column {column} does not exist in {table}")]
    ColumnOutOfRange { table: String, column: usize },

    #[error("Table {0} is not rendered on this page")]
    TableNotRendered(String),
}

/// Collects render errors for the current page
#[derive(Debug, Default, Clone)]
pub struct Diagnostics {
    entries: Vec<RenderError>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an error and mirror it to the log
    pub fn report(&mut self, error: RenderError) {
        match &error {
            RenderError::MalformedRow { .. } | RenderError::MalformedSection { .. } => {
                log::warn!("{}", error)
            }
            _ => log::error!("{}", error),
        }
        self.entries.push(error);
    }

    pub fn entries(&self) -> &[RenderError] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
