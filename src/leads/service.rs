// src/leads/service.rs

use chrono::Utc;
use std::sync::Arc;
use tracing::{info, instrument};

use super::{
    collect_filter_options, csv, filter_rows, increment_download_counts, FilterCriteria,
    FilterOptions, LeadColumns, Table,
};
use crate::{
    error::{LeadError, NO_DATA, NO_MATCHES},
    sheets::SheetStore,
    webhook::{DownloadEvent, Notifier},
};

/// Request-level operations over a store and a notifier. Every call works on
/// its own fresh snapshot; nothing is kept between requests.
#[derive(Clone)]
pub struct LeadService {
    store: Arc<dyn SheetStore>,
    notifier: Arc<dyn Notifier>,
}

impl LeadService {
    pub fn new(store: Arc<dyn SheetStore>, notifier: Arc<dyn Notifier>) -> Self {
        Self { store, notifier }
    }

    async fn snapshot(&self) -> Result<Option<Table>, LeadError> {
        let rows = self.store.fetch_rows().await?;
        Ok(Table::from_rows(rows))
    }

    /// Distinct values of each filterable column.
    #[instrument(level = "info", skip(self))]
    pub async fn filter_options(&self) -> Result<FilterOptions, LeadError> {
        let table = self.snapshot().await?.ok_or(LeadError::NotFound(NO_DATA))?;
        Ok(collect_filter_options(&table))
    }

    /// Filter, bump counters, write them back, notify, and return the CSV.
    ///
    /// Steps run strictly in that order; the first failure aborts the rest.
    #[instrument(level = "info", skip(self))]
    pub async fn filter_and_download(&self, criteria: FilterCriteria) -> Result<String, LeadError> {
        let table = match self.snapshot().await? {
            Some(t) if !t.is_empty() => t,
            _ => return Err(LeadError::NotFound(NO_DATA)),
        };

        let cols = LeadColumns::resolve(&table.header)?;

        let mut filtered = filter_rows(&table, &cols, &criteria);
        if filtered.is_empty() {
            return Err(LeadError::NotFound(NO_MATCHES));
        }

        let updates = increment_download_counts(&mut filtered.rows, cols.download_count)?;
        self.store.batch_write(&updates).await?;

        let body = csv::encode(&filtered);

        self.notifier
            .notify(&DownloadEvent::new(criteria, Utc::now()))
            .await?;

        info!(rows = filtered.rows.len(), "leads downloaded");
        Ok(body)
    }
}

#[cfg(test)]
pub(crate) mod fakes {
    use anyhow::{bail, Result};
    use async_trait::async_trait;
    use std::sync::Mutex;

    use crate::leads::{CellUpdate, Row};
    use crate::sheets::SheetStore;
    use crate::webhook::{DownloadEvent, Notifier};

    /// In-memory sheet. Writes are applied by sheet row number, so repeated
    /// downloads see their own increments.
    #[derive(Default)]
    pub struct MemorySheet {
        pub rows: Mutex<Vec<Row>>,
        pub writes: Mutex<Vec<Vec<CellUpdate>>>,
        pub fail_fetch: bool,
        pub fail_write: bool,
    }

    impl MemorySheet {
        pub fn with_rows(rows: Vec<Row>) -> Self {
            Self {
                rows: Mutex::new(rows),
                ..Default::default()
            }
        }
    }

    #[async_trait]
    impl SheetStore for MemorySheet {
        async fn fetch_rows(&self) -> Result<Vec<Row>> {
            if self.fail_fetch {
                bail!("fetch unavailable");
            }
            Ok(self.rows.lock().unwrap().clone())
        }

        async fn batch_write(&self, updates: &[CellUpdate]) -> Result<()> {
            if self.fail_write {
                bail!("write unavailable");
            }
            let mut rows = self.rows.lock().unwrap();
            for u in updates {
                let col = (u.column as u8 - b'A') as usize;
                let row = &mut rows[u.row - 1];
                if row.len() <= col {
                    row.resize(col + 1, String::new());
                }
                row[col] = u.value.to_string();
            }
            self.writes.lock().unwrap().push(updates.to_vec());
            Ok(())
        }
    }

    #[derive(Default)]
    pub struct RecordingNotifier {
        pub events: Mutex<Vec<DownloadEvent>>,
        pub fail: bool,
    }

    #[async_trait]
    impl Notifier for RecordingNotifier {
        async fn notify(&self, event: &DownloadEvent) -> Result<()> {
            if self.fail {
                bail!("webhook unavailable");
            }
            self.events.lock().unwrap().push(event.clone());
            Ok(())
        }
    }
}
