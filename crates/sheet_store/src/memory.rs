//! In-memory backend: the default for tests and usable as a throwaway
//! local store. Same contract as the HTTP backend, including the
//! missing-sheet distinction between reads and writes.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::{RawRow, SheetStore, SheetStoreError, Table};

#[derive(Default)]
pub struct InMemorySheetStore {
    grids: Mutex<HashMap<Table, Vec<RawRow>>>,
    outlines: Mutex<Vec<(Table, u32, u32)>>,
}

impl InMemorySheetStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create `table` with the given data rows (header row implied).
    pub async fn seed(&self, table: Table, rows: Vec<RawRow>) {
        self.grids.lock().await.insert(table, rows);
    }

    /// Create `table` empty, so writes to it succeed.
    pub async fn create_table(&self, table: Table) {
        self.grids.lock().await.entry(table).or_default();
    }

    /// Outline calls recorded so far, as (table, first_row, count).
    pub async fn outlines(&self) -> Vec<(Table, u32, u32)> {
        self.outlines.lock().await.clone()
    }
}

#[async_trait]
impl SheetStore for InMemorySheetStore {
    async fn read_rows(&self, table: Table) -> Result<Option<Vec<RawRow>>, SheetStoreError> {
        Ok(self.grids.lock().await.get(&table).cloned())
    }

    async fn insert_rows_at_head(
        &self,
        table: Table,
        rows: &[RawRow],
    ) -> Result<u32, SheetStoreError> {
        let mut grids = self.grids.lock().await;
        let grid = grids
            .get_mut(&table)
            .ok_or_else(|| SheetStoreError::MissingSheet(table.title().to_string()))?;
        grid.splice(0..0, rows.iter().cloned());
        Ok(rows.len() as u32)
    }

    async fn outline_rows(
        &self,
        table: Table,
        first_row: u32,
        count: u32,
    ) -> Result<(), SheetStoreError> {
        if !self.grids.lock().await.contains_key(&table) {
            return Err(SheetStoreError::MissingSheet(table.title().to_string()));
        }
        self.outlines.lock().await.push((table, first_row, count));
        Ok(())
    }
}
