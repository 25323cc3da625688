// src/error.rs

use thiserror::Error;

/// Everything a request can fail with. Each kind maps onto one HTTP status in
/// `server::handlers::error_reply`.
#[derive(Debug, Error)]
pub enum LeadError {
    /// Empty store or zero matching rows (404).
    #[error("{0}")]
    NotFound(&'static str),

    /// Required header columns are absent (400).
    #[error("One or more columns not found: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    /// Counter column sits past `Z`; addresses are single-letter only (400).
    #[error("column index {0} is outside the addressable range A-Z")]
    ColumnOutOfRange(usize),

    #[error("Too many requests from this IP, please try again later.")]
    RateLimited,

    /// Store read/write, webhook, auth or anything unexpected (500).
    #[error(transparent)]
    Upstream(#[from] anyhow::Error),
}

pub const NO_DATA: &str = "No data found in the spreadsheet";
pub const NO_MATCHES: &str = "No leads found matching the criteria";
