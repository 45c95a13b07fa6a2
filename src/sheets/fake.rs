// src/sheets/fake.rs

use super::{SheetError, TabularStore};
use crate::grid::RawGrid;
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

/// In-memory stand-in for the remote store. Grids are keyed by sheet name
/// (the part of the range before `!`); reads can be scripted to fail per
/// sheet.
#[derive(Default)]
pub struct FakeStore {
    grids: Mutex<HashMap<String, RawGrid>>,
    failing_sheets: Mutex<HashSet<String>>,
    pub appended: Mutex<Vec<(String, String, Vec<Vec<String>>)>>,
}

fn sheet_of(range: &str) -> String {
    range.split('!').next().unwrap_or(range).to_string()
}

impl FakeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_grid(self, sheet: &str, grid: RawGrid) -> Self {
        self.grids.lock().unwrap().insert(sheet.to_string(), grid);
        self
    }

    /// Every read against `sheet` fails until cleared.
    pub fn fail_sheet(&self, sheet: &str) {
        self.failing_sheets.lock().unwrap().insert(sheet.to_string());
    }
}

#[async_trait]
impl TabularStore for FakeStore {
    async fn read_range(&self, _spreadsheet_id: &str, range: &str) -> Result<RawGrid, SheetError> {
        let sheet = sheet_of(range);
        if self.failing_sheets.lock().unwrap().contains(&sheet) {
            return Err(SheetError::RemoteFetch(format!(
                "scripted failure for {sheet}"
            )));
        }
        Ok(self.grids.lock().unwrap().get(&sheet).cloned().unwrap_or_default())
    }

    async fn append_rows(
        &self,
        spreadsheet_id: &str,
        range: &str,
        rows: Vec<Vec<String>>,
    ) -> Result<(), SheetError> {
        let sheet = sheet_of(range);
        if self.failing_sheets.lock().unwrap().contains(&sheet) {
            return Err(SheetError::RemoteFetch(format!(
                "scripted failure for {sheet}"
            )));
        }
        self.appended
            .lock()
            .unwrap()
            .push((spreadsheet_id.to_string(), range.to_string(), rows));
        Ok(())
    }
}
