// src/sheets/mod.rs

use anyhow::Result;
use async_trait::async_trait;

use crate::leads::{CellUpdate, Row};

pub mod auth;
pub mod client;

pub use auth::ServiceAccount;
pub use client::SheetsClient;

/// The remote tabular store, reduced to the two calls the service makes.
#[async_trait]
pub trait SheetStore: Send + Sync {
    /// Current snapshot of the configured range, header row first.
    /// An empty range yields an empty vector.
    async fn fetch_rows(&self) -> Result<Vec<Row>>;

    /// Apply every update in one batched write.
    async fn batch_write(&self, updates: &[CellUpdate]) -> Result<()>;
}
