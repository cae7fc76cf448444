//! HTTP backend for the spreadsheet host (Google Sheets v4 API shape).
//!
//! Reads go through the values endpoint, writes through `batchUpdate`. The
//! numeric sheet id each write request needs is resolved from the
//! spreadsheet metadata once and cached.

use std::collections::HashMap;

use async_trait::async_trait;
use metrics::counter;
use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use tokio::sync::Mutex;

use crate::retry::RetryPolicy;
use crate::{RawRow, SheetStore, SheetStoreError, Table};

/// Store backend over the spreadsheet HTTP API using reqwest.
pub struct ReqwestSheetStore {
    base_url: String,
    spreadsheet_id: String,
    api_token: SecretString,
    client: reqwest::Client,
    sheet_ids: Mutex<HashMap<String, i64>>,
    retry: RetryPolicy,
}

impl ReqwestSheetStore {
    pub fn new(
        base_url: &str,
        spreadsheet_id: impl Into<String>,
        api_token: SecretString,
    ) -> Self {
        let client = reqwest::Client::builder()
            .build()
            .expect("reqwest client build should not fail");
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            spreadsheet_id: spreadsheet_id.into(),
            api_token,
            client,
            sheet_ids: Mutex::new(HashMap::new()),
            retry: RetryPolicy::default(),
        }
    }

    fn get_request(&self, url: &str) -> reqwest::RequestBuilder {
        self.client
            .get(url)
            .bearer_auth(self.api_token.expose_secret())
    }

    fn post_request(&self, url: &str) -> reqwest::RequestBuilder {
        self.client
            .post(url)
            .bearer_auth(self.api_token.expose_secret())
    }

    /// Extract error information from a failed response.
    async fn error_from_response(&self, resp: reqwest::Response) -> SheetStoreError {
        let status = resp.status().as_u16();
        let body = resp.text().await.unwrap_or_default();
        let body_snippet: String = body.chars().take(256).collect();
        match status {
            401 | 403 => SheetStoreError::Auth(body_snippet),
            _ => SheetStoreError::Api {
                status,
                body: body_snippet,
            },
        }
    }

    /// The values endpoint answers a request for a range on a nonexistent
    /// sheet with 400 "Unable to parse range".
    fn is_missing_range(status: u16, body: &str) -> bool {
        status == 400 && body.contains("Unable to parse range")
    }

    /// Resolve the numeric sheet id for `table` from the spreadsheet
    /// metadata, caching every title on the first lookup.
    async fn sheet_id(&self, table: Table) -> Result<i64, SheetStoreError> {
        {
            let ids = self.sheet_ids.lock().await;
            if let Some(id) = ids.get(table.title()) {
                return Ok(*id);
            }
        }

        let url = format!(
            "{}/v4/spreadsheets/{}?fields=sheets.properties",
            self.base_url, self.spreadsheet_id
        );
        let resp = self.get_request(&url).send().await?;
        if !resp.status().is_success() {
            return Err(self.error_from_response(resp).await);
        }

        #[derive(serde::Deserialize)]
        struct Metadata {
            #[serde(default)]
            sheets: Vec<SheetEntry>,
        }
        #[derive(serde::Deserialize)]
        struct SheetEntry {
            properties: SheetProperties,
        }
        #[derive(serde::Deserialize)]
        struct SheetProperties {
            #[serde(rename = "sheetId")]
            sheet_id: i64,
            title: String,
        }

        let meta: Metadata = resp.json().await?;
        let mut ids = self.sheet_ids.lock().await;
        for sheet in meta.sheets {
            ids.insert(sheet.properties.title, sheet.properties.sheet_id);
        }
        ids.get(table.title())
            .copied()
            .ok_or_else(|| SheetStoreError::MissingSheet(table.title().to_string()))
    }

    async fn read_rows_once(&self, table: Table) -> Result<Option<Vec<RawRow>>, SheetStoreError> {
        let url = format!(
            "{}/v4/spreadsheets/{}/values/{}",
            self.base_url,
            self.spreadsheet_id,
            table.data_range()
        );
        let resp = self.get_request(&url).send().await?;
        let status = resp.status().as_u16();
        if !resp.status().is_success() {
            let err = self.error_from_response(resp).await;
            if let SheetStoreError::Api { body, .. } = &err {
                if Self::is_missing_range(status, body) {
                    return Ok(None);
                }
            }
            return Err(err);
        }

        #[derive(serde::Deserialize)]
        struct ValuesPayload {
            #[serde(default)]
            values: Vec<Vec<serde_json::Value>>,
        }

        let payload: ValuesPayload = resp.json().await?;
        let rows = payload
            .values
            .into_iter()
            .map(|row| row.into_iter().map(cell_to_string).collect())
            .collect();
        Ok(Some(rows))
    }

    async fn batch_update(&self, requests: serde_json::Value) -> Result<(), SheetStoreError> {
        let url = format!(
            "{}/v4/spreadsheets/{}:batchUpdate",
            self.base_url, self.spreadsheet_id
        );
        let resp = self
            .post_request(&url)
            .json(&json!({ "requests": requests }))
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(self.error_from_response(resp).await);
        }
        Ok(())
    }
}

/// Values come back as JSON strings for formatted cells but can be bare
/// numbers depending on render options.
fn cell_to_string(value: serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s,
        serde_json::Value::Number(n) => n.to_string(),
        serde_json::Value::Bool(b) => b.to_string(),
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Cells that parse as numbers are written as numbers so the sheet keeps
/// its numeric columns numeric; everything else is a plain string.
fn cell_value(cell: &str) -> serde_json::Value {
    if !cell.is_empty() {
        if let Ok(n) = cell.parse::<f64>() {
            return json!({ "userEnteredValue": { "numberValue": n } });
        }
    }
    json!({ "userEnteredValue": { "stringValue": cell } })
}

#[async_trait]
impl SheetStore for ReqwestSheetStore {
    async fn read_rows(&self, table: Table) -> Result<Option<Vec<RawRow>>, SheetStoreError> {
        counter!("sheet_store_reads_total", "table" => table.title()).increment(1);
        self.retry.run(|| self.read_rows_once(table)).await
    }

    async fn insert_rows_at_head(
        &self,
        table: Table,
        rows: &[RawRow],
    ) -> Result<u32, SheetStoreError> {
        if rows.is_empty() {
            return Ok(0);
        }
        counter!("sheet_store_writes_total", "table" => table.title()).increment(1);
        let sheet_id = self.sheet_id(table).await?;
        let count = rows.len();

        let cell_rows: Vec<serde_json::Value> = rows
            .iter()
            .map(|row| {
                let values: Vec<serde_json::Value> =
                    row.iter().map(|c| cell_value(c)).collect();
                json!({ "values": values })
            })
            .collect();

        // Row index 1 is the first row below the header in the API's
        // 0-based indexing.
        self.batch_update(json!([
            {
                "insertDimension": {
                    "range": {
                        "sheetId": sheet_id,
                        "dimension": "ROWS",
                        "startIndex": 1,
                        "endIndex": 1 + count
                    },
                    "inheritFromBefore": false
                }
            },
            {
                "updateCells": {
                    "rows": cell_rows,
                    "fields": "userEnteredValue",
                    "start": { "sheetId": sheet_id, "rowIndex": 1, "columnIndex": 0 }
                }
            }
        ]))
        .await?;

        tracing::debug!(table = table.title(), rows = count, "inserted block at head");
        Ok(count as u32)
    }

    async fn outline_rows(
        &self,
        table: Table,
        first_row: u32,
        count: u32,
    ) -> Result<(), SheetStoreError> {
        if count == 0 {
            return Ok(());
        }
        let sheet_id = self.sheet_id(table).await?;
        let start = first_row.saturating_sub(1);
        self.batch_update(json!([
            {
                "updateBorders": {
                    "range": {
                        "sheetId": sheet_id,
                        "startRowIndex": start,
                        "endRowIndex": start + count,
                        "startColumnIndex": 0,
                        "endColumnIndex": table.width()
                    },
                    "top": { "style": "SOLID" },
                    "bottom": { "style": "SOLID" },
                    "left": { "style": "SOLID" },
                    "right": { "style": "SOLID" }
                }
            }
        ]))
        .await
    }
}
