// src/sheets/client.rs

use super::SheetError;
use crate::grid::RawGrid;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use url::Url;

/// Seam over the remote tabular store: ranged reads and insert-mode row
/// appends against a spreadsheet-like resource. The production impl speaks
/// the Google Sheets REST API; tests swap in an in-memory fake.
#[async_trait]
pub trait TabularStore: Send + Sync {
    /// Read the grid at `range` (e.g. `Shipments!A1:Z`). A sheet with no
    /// values is an empty grid, not an error.
    async fn read_range(&self, spreadsheet_id: &str, range: &str) -> Result<RawGrid, SheetError>;

    /// Append `rows` after the existing data in `range`, inserting rows
    /// rather than overwriting.
    async fn append_rows(
        &self,
        spreadsheet_id: &str,
        range: &str,
        rows: Vec<Vec<String>>,
    ) -> Result<(), SheetError>;
}

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: RawGrid,
}

#[derive(Debug, Serialize)]
struct AppendBody {
    values: Vec<Vec<String>>,
}

/// Google Sheets v4 `values` client. Authentication is out of band: an API
/// key from config, passed as a query parameter.
#[derive(Debug, Clone)]
pub struct SheetsClient {
    http: Client,
    base: Url,
    api_key: Option<String>,
}

impl SheetsClient {
    pub fn new(http: Client, base: &str, api_key: Option<String>) -> Result<Self, SheetError> {
        let base = Url::parse(base)
            .map_err(|e| SheetError::RemoteFetch(format!("invalid Sheets API base: {e}")))?;
        // a cannot-be-a-base URL (e.g. mailto:) has no path to extend
        if base.cannot_be_a_base() {
            return Err(SheetError::RemoteFetch(format!(
                "invalid Sheets API base: {base} cannot hold path segments"
            )));
        }
        Ok(Self {
            http,
            base,
            api_key,
        })
    }

    fn values_url(&self, spreadsheet_id: &str, range: &str, action: &str) -> Url {
        let mut url = self.base.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .expect("base URL validated at construction");
            segments.pop_if_empty();
            segments.extend(["v4", "spreadsheets", spreadsheet_id, "values"]);
            segments.push(&format!("{range}{action}"));
        }
        if let Some(key) = &self.api_key {
            url.query_pairs_mut().append_pair("key", key);
        }
        url
    }
}

#[async_trait]
impl TabularStore for SheetsClient {
    async fn read_range(&self, spreadsheet_id: &str, range: &str) -> Result<RawGrid, SheetError> {
        let url = self.values_url(spreadsheet_id, range, "");
        let resp = self
            .http
            .get(url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| SheetError::RemoteFetch(format!("reading {range}: {e}")))?;
        let body: ValueRange = resp
            .json()
            .await
            .map_err(|e| SheetError::RemoteFetch(format!("decoding {range}: {e}")))?;
        Ok(body.values)
    }

    async fn append_rows(
        &self,
        spreadsheet_id: &str,
        range: &str,
        rows: Vec<Vec<String>>,
    ) -> Result<(), SheetError> {
        let mut url = self.values_url(spreadsheet_id, range, ":append");
        url.query_pairs_mut()
            .append_pair("valueInputOption", "USER_ENTERED")
            .append_pair("insertDataOption", "INSERT_ROWS");
        self.http
            .post(url)
            .json(&AppendBody { values: rows })
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| SheetError::RemoteFetch(format!("appending to {range}: {e}")))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn values_url_encodes_range_and_key() {
        let client = SheetsClient::new(
            Client::new(),
            "https://sheets.googleapis.com",
            Some("secret".into()),
        )
        .unwrap();
        let url = client.values_url("sheet-1", "Shipments!A1:Z", "");
        assert_eq!(
            url.path(),
            "/v4/spreadsheets/sheet-1/values/Shipments!A1:Z"
        );
        assert_eq!(url.query(), Some("key=secret"));
    }

    #[test]
    fn base_url_without_a_path_is_rejected() {
        let err = SheetsClient::new(Client::new(), "mailto:ops@acme.com", None).unwrap_err();
        assert!(matches!(err, SheetError::RemoteFetch(_)));
        assert!(err.to_string().contains("invalid Sheets API base"));
    }

    #[test]
    fn append_url_carries_insert_options() {
        let client =
            SheetsClient::new(Client::new(), "https://sheets.googleapis.com", None).unwrap();
        let mut url = client.values_url("sheet-1", "Shipments!A2:Z2", ":append");
        url.query_pairs_mut()
            .append_pair("valueInputOption", "USER_ENTERED")
            .append_pair("insertDataOption", "INSERT_ROWS");
        let query = url.query().unwrap();
        assert!(url.path().ends_with("Shipments!A2:Z2:append"));
        assert!(query.contains("valueInputOption=USER_ENTERED"));
        assert!(query.contains("insertDataOption=INSERT_ROWS"));
    }
}
