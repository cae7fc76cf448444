//! `SheetStore` trait and backends for the workout spreadsheet.
//!
//! All durable data lives in one hosted spreadsheet with three named sheets.
//! This crate is the typed boundary over it: a storage trait, a reqwest-based
//! HTTP backend, an in-memory backend, and row records with validated
//! coercion.

use async_trait::async_trait;
use thiserror::Error;

pub mod config;
pub mod http_store;
pub mod memory;
pub mod retry;
pub mod rows;

#[derive(Debug, Error)]
pub enum SheetStoreError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("configuration error: {0}")]
    Config(String),
    #[error("auth rejected: {0}")]
    Auth(String),
    #[error("sheet not found: {0}")]
    MissingSheet(String),
    #[error("unexpected response ({status}): {body}")]
    Api { status: u16, body: String },
}

impl SheetStoreError {
    /// Transport failures and server-side errors are worth retrying;
    /// auth failures and missing sheets are not.
    pub fn is_retryable(&self) -> bool {
        match self {
            SheetStoreError::Http(_) => true,
            SheetStoreError::Api { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

/// One data row as the values API returns it: a list of cell strings.
pub type RawRow = Vec<String>;

/// The three named sheets of the backing spreadsheet.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Table {
    Exercises,
    Workouts,
    Stats,
}

impl Table {
    pub fn title(self) -> &'static str {
        match self {
            Table::Exercises => "Exercises",
            Table::Workouts => "Workouts",
            Table::Stats => "Stats",
        }
    }

    /// Number of columns the sheet schema defines.
    pub fn width(self) -> usize {
        match self {
            Table::Exercises => 2,
            Table::Workouts => 6,
            Table::Stats => 4,
        }
    }

    /// A1 range covering every data row (row 1 is the header).
    pub fn data_range(self) -> String {
        let last_col = (b'A' + self.width() as u8 - 1) as char;
        format!("{}!A2:{}", self.title(), last_col)
    }
}

/// Storage boundary over the spreadsheet host.
///
/// Reads report an absent sheet as `Ok(None)` so callers can decide whether
/// that is an empty result or a failure; writes always treat it as an error.
#[async_trait]
pub trait SheetStore: Send + Sync + 'static {
    /// All data rows of `table` (row 2 down, header excluded).
    async fn read_rows(&self, table: Table) -> Result<Option<Vec<RawRow>>, SheetStoreError>;

    /// Insert `rows` as a block directly below the header, so the newest
    /// entries sit at the head of the sheet. Returns the row count inserted.
    async fn insert_rows_at_head(
        &self,
        table: Table,
        rows: &[RawRow],
    ) -> Result<u32, SheetStoreError>;

    /// Draw a solid outer border around a block of rows (`first_row` is the
    /// 1-based sheet row). Purely presentational; used to mark the block a
    /// single submission inserted.
    async fn outline_rows(
        &self,
        table: Table,
        first_row: u32,
        count: u32,
    ) -> Result<(), SheetStoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_range_covers_schema_width() {
        assert_eq!(Table::Exercises.data_range(), "Exercises!A2:B");
        assert_eq!(Table::Workouts.data_range(), "Workouts!A2:F");
        assert_eq!(Table::Stats.data_range(), "Stats!A2:D");
    }

    #[test]
    fn retryable_classification() {
        assert!(
            SheetStoreError::Api {
                status: 503,
                body: String::new()
            }
            .is_retryable()
        );
        assert!(
            !SheetStoreError::Api {
                status: 404,
                body: String::new()
            }
            .is_retryable()
        );
        assert!(!SheetStoreError::MissingSheet("Workouts".into()).is_retryable());
        assert!(!SheetStoreError::Auth("denied".into()).is_retryable());
    }
}
