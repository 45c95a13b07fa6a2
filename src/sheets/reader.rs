// src/sheets/reader.rs

use super::{Dataset, SheetError, TabularStore};
use crate::config::Config;
use crate::grid::{map_rows, MappedRecord, RawGrid};
use std::sync::Arc;

/// Resolves a dataset to a (spreadsheet id, sheet name, range) triple,
/// fetches the raw grid, and maps it into header-keyed records. Remote
/// failures propagate to the caller untouched.
#[derive(Clone)]
pub struct SheetReader {
    store: Arc<dyn TabularStore>,
    config: Arc<Config>,
}

impl SheetReader {
    pub fn new(store: Arc<dyn TabularStore>, config: Arc<Config>) -> Self {
        Self { store, config }
    }

    pub fn store(&self) -> Arc<dyn TabularStore> {
        Arc::clone(&self.store)
    }

    pub fn config(&self) -> Arc<Config> {
        Arc::clone(&self.config)
    }

    fn resolve(&self, dataset: Dataset) -> Result<&str, SheetError> {
        self.config
            .spreadsheet_id(dataset)
            .ok_or(SheetError::Unconfigured(dataset))
    }

    /// Fetch the raw grid for `dataset`, `range` being the cell range within
    /// its sheet (default `A1:Z`).
    pub async fn fetch_grid(
        &self,
        dataset: Dataset,
        range: Option<&str>,
    ) -> Result<RawGrid, SheetError> {
        let spreadsheet_id = self.resolve(dataset)?;
        let full_range = format!("{}!{}", dataset.sheet_name(), range.unwrap_or("A1:Z"));
        self.store.read_range(spreadsheet_id, &full_range).await
    }

    /// Fetch `dataset` and map it into records.
    pub async fn fetch_records(&self, dataset: Dataset) -> Result<Vec<MappedRecord>, SheetError> {
        let grid = self.fetch_grid(dataset, None).await?;
        Ok(map_rows(&grid))
    }

    /// Same as [`fetch_records`](Self::fetch_records) with a caller-supplied
    /// cell range.
    pub async fn fetch_records_in(
        &self,
        dataset: Dataset,
        range: &str,
    ) -> Result<Vec<MappedRecord>, SheetError> {
        let grid = self.fetch_grid(dataset, Some(range)).await?;
        Ok(map_rows(&grid))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sheets::fake::FakeStore;

    fn reader_with(store: FakeStore) -> SheetReader {
        let config = Config {
            shipments_spreadsheet_id: Some("sheet-1".into()),
            ..Config::default()
        };
        SheetReader::new(Arc::new(store), Arc::new(config))
    }

    #[tokio::test]
    async fn unconfigured_dataset_is_a_configuration_error() {
        let reader = SheetReader::new(Arc::new(FakeStore::new()), Arc::new(Config::default()));
        let err = reader.fetch_records(Dataset::Shipments).await.unwrap_err();
        assert_eq!(err, SheetError::Unconfigured(Dataset::Shipments));
    }

    #[tokio::test]
    async fn fetch_maps_header_row_onto_data_rows() {
        let store = FakeStore::new().with_grid(
            "Shipments",
            vec![
                vec!["ShipmentID".into(), "Client".into()],
                vec!["SHP-1".into(), "Acme".into()],
            ],
        );
        let records = reader_with(store)
            .fetch_records(Dataset::Shipments)
            .await
            .unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["ShipmentID"], "SHP-1");
    }

    #[tokio::test]
    async fn remote_failure_propagates() {
        let store = FakeStore::new();
        store.fail_sheet("Shipments");
        let err = reader_with(store)
            .fetch_records(Dataset::Shipments)
            .await
            .unwrap_err();
        assert!(matches!(err, SheetError::RemoteFetch(_)));
    }

    #[tokio::test]
    async fn empty_sheet_yields_no_records() {
        let store = FakeStore::new().with_grid("Deliveries", Vec::new());
        let records = reader_with(store)
            .fetch_records(Dataset::Deliveries)
            .await
            .unwrap();
        assert!(records.is_empty());
    }
}
