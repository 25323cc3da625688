// src/sheets/client.rs

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, instrument};
use url::Url;

use super::{auth::ServiceAccount, SheetStore};
use crate::leads::{CellUpdate, Row};

const SHEETS_API: &str = "https://sheets.googleapis.com/v4/spreadsheets/";

#[derive(Deserialize)]
struct ValueRange {
    /// Omitted by the API when the range is empty.
    #[serde(default)]
    values: Vec<Vec<Value>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BatchUpdateRequest {
    value_input_option: &'static str,
    data: Vec<UpdateEntry>,
}

#[derive(Serialize)]
struct UpdateEntry {
    range: String,
    values: [[u64; 1]; 1],
}

/// Google Sheets v4 values API bound to one spreadsheet tab.
pub struct SheetsClient {
    http: Client,
    auth: ServiceAccount,
    spreadsheet_id: String,
    sheet_name: String,
}

impl SheetsClient {
    pub fn new(
        http: Client,
        auth: ServiceAccount,
        spreadsheet_id: impl Into<String>,
        sheet_name: impl Into<String>,
    ) -> Self {
        Self {
            http,
            auth,
            spreadsheet_id: spreadsheet_id.into(),
            sheet_name: sheet_name.into(),
        }
    }

    fn values_url(&self) -> Result<Url> {
        values_url(&self.spreadsheet_id, &self.sheet_name)
    }

    fn batch_update_url(&self) -> Result<Url> {
        batch_update_url(&self.spreadsheet_id)
    }
}

fn spreadsheet_url(spreadsheet_id: &str, tail: &[&str]) -> Result<Url> {
    let mut url = Url::parse(SHEETS_API)?;
    url.path_segments_mut()
        .map_err(|_| anyhow!("sheets API base cannot carry a path"))?
        .pop_if_empty()
        .push(spreadsheet_id)
        .extend(tail);
    Ok(url)
}

fn values_url(spreadsheet_id: &str, range: &str) -> Result<Url> {
    spreadsheet_url(spreadsheet_id, &["values", range])
}

fn batch_update_url(spreadsheet_id: &str) -> Result<Url> {
    spreadsheet_url(spreadsheet_id, &["values:batchUpdate"])
}

/// The API hands back formatted strings by default; anything else is
/// rendered the way it would print.
fn cell_text(v: Value) -> String {
    match v {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn batch_body(sheet_name: &str, updates: &[CellUpdate]) -> BatchUpdateRequest {
    BatchUpdateRequest {
        value_input_option: "RAW",
        data: updates
            .iter()
            .map(|u| UpdateEntry {
                range: u.range(sheet_name),
                values: [[u.value]],
            })
            .collect(),
    }
}

#[async_trait]
impl SheetStore for SheetsClient {
    #[instrument(level = "info", skip(self), fields(sheet = %self.sheet_name))]
    async fn fetch_rows(&self) -> Result<Vec<Row>> {
        let url = self.values_url()?;
        let token = self.auth.access_token().await?;
        debug!(%url, "fetching values");

        let range: ValueRange = self
            .http
            .get(url.clone())
            .bearer_auth(token)
            .send()
            .await
            .with_context(|| format!("GET {} failed", url))?
            .error_for_status()
            .with_context(|| format!("Non-success status {}", url))?
            .json()
            .await
            .with_context(|| format!("decoding value range from {}", url))?;

        let rows: Vec<Row> = range
            .values
            .into_iter()
            .map(|r| r.into_iter().map(cell_text).collect())
            .collect();
        info!(rows = rows.len(), "fetched sheet snapshot");
        Ok(rows)
    }

    #[instrument(level = "info", skip(self, updates), fields(cells = updates.len()))]
    async fn batch_write(&self, updates: &[CellUpdate]) -> Result<()> {
        let url = self.batch_update_url()?;
        let token = self.auth.access_token().await?;

        self.http
            .post(url.clone())
            .bearer_auth(token)
            .json(&batch_body(&self.sheet_name, updates))
            .send()
            .await
            .with_context(|| format!("POST {} failed", url))?
            .error_for_status()
            .with_context(|| format!("Non-success status {}", url))?;

        info!("batched counter update applied");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn values_url_encodes_tab_name() {
        let url = values_url("abc123", "Hoja 1").unwrap();
        assert_eq!(
            url.as_str(),
            "https://sheets.googleapis.com/v4/spreadsheets/abc123/values/Hoja%201"
        );
    }

    #[test]
    fn batch_update_url_keeps_colon() {
        let url = batch_update_url("abc123").unwrap();
        assert_eq!(
            url.as_str(),
            "https://sheets.googleapis.com/v4/spreadsheets/abc123/values:batchUpdate"
        );
    }

    #[test]
    fn batch_body_shape() {
        let updates = vec![
            CellUpdate { column: 'E', row: 2, value: 1 },
            CellUpdate { column: 'E', row: 3, value: 4 },
        ];
        let body = serde_json::to_value(batch_body("Hoja 1", &updates)).unwrap();
        assert_eq!(
            body,
            json!({
                "valueInputOption": "RAW",
                "data": [
                    {"range": "'Hoja 1'!E2", "values": [[1]]},
                    {"range": "'Hoja 1'!E3", "values": [[4]]},
                ]
            })
        );
    }

    #[test]
    fn value_range_without_values_is_empty() {
        let range: ValueRange =
            serde_json::from_value(json!({"range": "'Hoja 1'!A1:Z1000", "majorDimension": "ROWS"}))
                .unwrap();
        assert!(range.values.is_empty());
    }

    #[test]
    fn non_string_cells_are_rendered() {
        assert_eq!(cell_text(json!("CEO")), "CEO");
        assert_eq!(cell_text(json!(3)), "3");
        assert_eq!(cell_text(json!(true)), "true");
        assert_eq!(cell_text(Value::Null), "");
    }
}
