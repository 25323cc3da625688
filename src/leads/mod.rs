// src/leads/mod.rs

pub mod columns;
pub mod counter;
pub mod csv;
pub mod filter;
pub mod options;
pub mod service;

pub use columns::{ColumnBinding, LeadColumns};
pub use counter::{increment_download_counts, CellUpdate};
pub use filter::{filter_rows, FilterCriteria};
pub use options::{collect_filter_options, FilterOptions};
pub use service::LeadService;

/// One spreadsheet row, cells in column order. Rows coming back from the
/// store may be shorter than the header when trailing cells are blank.
pub type Row = Vec<String>;

/// A fetched snapshot: the header row plus every data row after it.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub header: Row,
    pub rows: Vec<Row>,
}

impl Table {
    /// Split a raw row set into header and data. `None` when there are no rows at all.
    pub fn from_rows(mut rows: Vec<Row>) -> Option<Self> {
        if rows.is_empty() {
            return None;
        }
        let header = rows.remove(0);
        Some(Self { header, rows })
    }

    /// True when only the header is present.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Cell at `index`, or `None` for a row too short to reach it.
pub(crate) fn cell(row: &Row, index: usize) -> Option<&str> {
    row.get(index).map(String::as_str)
}
