//! Expandable table engine: descriptors, cell rendering, builder and row state

pub mod builder;
pub mod cell;
pub mod descriptor;
pub mod state;

pub use builder::{build_table, build_table_named, row_element, SectionBody, TableSection};
pub use cell::{render_collapsed, render_expanded, render_row, CellContent};
pub use descriptor::{CollectionKind, ColumnDescriptor, PresentationMode, TableDescriptor, TableType};
pub use state::{collapse_all, collapse_row, expand_all, expand_row, RowViewState};

use crate::dates::DEFAULT_DATE_FORMAT;
use chrono::{DateTime, Utc};

/// Default number of characters shown before a cell is truncated
pub const DEFAULT_CHAR_LIMIT: usize = 50;

/// Inputs shared by every render call
#[derive(Debug, Clone)]
pub struct RenderContext {
    pub char_limit: usize,
    /// Instant used for credential active/expired checks
    pub now: DateTime<Utc>,
    pub date_format: String,
}

impl RenderContext {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            char_limit: DEFAULT_CHAR_LIMIT,
            now,
            date_format: DEFAULT_DATE_FORMAT.to_string(),
        }
    }

    pub fn with_char_limit(mut self, limit: usize) -> Self {
        self.char_limit = limit;
        self
    }

    pub fn with_date_format(mut self, format: &str) -> Self {
        self.date_format = format.to_string();
        self
    }
}
