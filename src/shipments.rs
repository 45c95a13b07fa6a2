// src/shipments.rs

use crate::model::transform::{history_item_from_record, shipment_from_record};
use crate::model::{sort_history_newest_first, Shipment, ShipmentHistoryItem};
use crate::sheets::{Dataset, SheetError, SheetReader};
use chrono::{Local, NaiveDate};
use rand::Rng;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU32, Ordering};
use tracing::{info, warn};

const REQUIRED_FIELDS: [&str; 6] = [
    "client",
    "clientEmail",
    "origin",
    "destination",
    "type",
    "purchaseOrder",
];

/// A shipment-creation request as posted by the client. Every field is
/// optional at the type level so validation can report the full missing set
/// rather than failing on the first absent field.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewShipment {
    pub client: Option<String>,
    #[serde(rename = "clientEmail")]
    pub client_email: Option<String>,
    pub origin: Option<String>,
    pub destination: Option<String>,
    #[serde(rename = "type")]
    pub shipment_type: Option<String>,
    #[serde(rename = "purchaseOrder")]
    pub purchase_order: Option<String>,
    pub eta: Option<String>,
    pub vessel: Option<String>,
    pub container: Option<String>,
}

impl NewShipment {
    fn get(&self, field: &str) -> Option<&String> {
        let value = match field {
            "client" => &self.client,
            "clientEmail" => &self.client_email,
            "origin" => &self.origin,
            "destination" => &self.destination,
            "type" => &self.shipment_type,
            "purchaseOrder" => &self.purchase_order,
            "eta" => &self.eta,
            "vessel" => &self.vessel,
            "container" => &self.container,
            _ => &None,
        };
        value.as_ref().filter(|v| !v.is_empty())
    }

    fn missing_fields(&self) -> Vec<String> {
        REQUIRED_FIELDS
            .iter()
            .filter(|&&f| self.get(f).is_none())
            .map(|f| f.to_string())
            .collect()
    }
}

/// Sheet-backed shipment repository: single-shipment resolution, status
/// updates, and creation. Handlers receive this explicitly; there is no
/// module-level state.
pub struct Tracker {
    reader: SheetReader,
    /// Suffix counter for generated ids, seeded randomly at startup so one
    /// process never hands out the same same-day id twice. Two processes can
    /// still collide; see the test below.
    id_suffix: AtomicU32,
}

impl Tracker {
    pub fn new(reader: SheetReader) -> Self {
        let seed = rand::thread_rng().gen_range(0..1000);
        Self {
            reader,
            id_suffix: AtomicU32::new(seed),
        }
    }

    /// Generated ids follow `SHP-<yyyymmdd>-<3-digit suffix>`, the suffix
    /// drawn from the monotonic counter modulo 1000.
    fn next_shipment_id(&self, today: NaiveDate) -> String {
        let suffix = self.id_suffix.fetch_add(1, Ordering::Relaxed) % 1000;
        format!("SHP-{}-{:03}", today.format("%Y%m%d"), suffix)
    }

    /// Load the full shipments dataset and linear-scan for `id`. O(n) per
    /// lookup, fine at tens to low hundreds of shipments. The matched
    /// shipment is enriched with its history; a history-fetch failure
    /// degrades to a single synthesized entry and is never surfaced.
    pub async fn shipment_by_id(&self, id: &str) -> Result<Shipment, SheetError> {
        let records = self.reader.fetch_records(Dataset::Shipments).await?;
        let mut shipment = records
            .iter()
            .map(shipment_from_record)
            .find(|s| s.id == id)
            .ok_or_else(|| SheetError::NotFound(id.to_string()))?;

        shipment.history = Some(self.history_for(&shipment).await);
        Ok(shipment)
    }

    async fn history_for(&self, shipment: &Shipment) -> Vec<ShipmentHistoryItem> {
        match self
            .reader
            .fetch_records_in(Dataset::ShipmentHistory, "A:Z")
            .await
        {
            Ok(records) => {
                let mut items: Vec<ShipmentHistoryItem> = records
                    .iter()
                    .filter(|r| r.get("ShipmentID").map(String::as_str) == Some(shipment.id.as_str()))
                    .map(history_item_from_record)
                    .collect();
                sort_history_newest_first(&mut items);
                items
            }
            Err(err) => {
                warn!(shipment = %shipment.id, %err, "history fetch failed; synthesizing from current status");
                vec![ShipmentHistoryItem {
                    date: Local::now().format("%-m/%-d/%Y").to_string(),
                    status: shipment.status.clone(),
                    notes: format!("Current status: {}", shipment.status),
                }]
            }
        }
    }

    /// Record a status change. The acknowledgment does not imply the
    /// shipment row itself was rewritten; the change lands on the history
    /// sheet best-effort and a failure there is logged, not surfaced.
    pub async fn update_status(
        &self,
        id: &str,
        status: &str,
        notes: &str,
    ) -> Result<String, SheetError> {
        let today = Local::now().format("%Y-%m-%d").to_string();
        let row = vec![
            id.to_string(),
            today,
            status.to_string(),
            notes.to_string(),
        ];
        if let Some(spreadsheet_id) = self.reader.config().spreadsheet_id(Dataset::ShipmentHistory)
        {
            if let Err(err) = self
                .reader
                .store()
                .append_rows(spreadsheet_id, "ShipmentHistory!A2:D2", vec![row])
                .await
            {
                warn!(shipment = %id, %err, "history append failed (non-critical)");
            }
        }
        info!(shipment = %id, status, "status updated");
        Ok(format!("Shipment {id} status updated to {status}"))
    }

    /// Validate, generate an id, and append a row to the shipments sheet
    /// ordered by that sheet's live header row — if headers were reordered
    /// upstream, the appended row follows suit. Unknown headers get empty
    /// cells. A failing secondary history append is non-fatal.
    pub async fn create_shipment(&self, request: &NewShipment) -> Result<Shipment, SheetError> {
        let missing = request.missing_fields();
        if !missing.is_empty() {
            return Err(SheetError::Validation(missing));
        }

        let today = Local::now().date_naive();
        let id = self.next_shipment_id(today);
        let created_at = today.format("%Y-%m-%d").to_string();
        let take = |v: &Option<String>| v.clone().unwrap_or_default();

        let mut cells: BTreeMap<&str, String> = BTreeMap::new();
        cells.insert("ShipmentID", id.clone());
        cells.insert("Client", take(&request.client));
        cells.insert("ClientEmail", take(&request.client_email));
        cells.insert("Origin", take(&request.origin));
        cells.insert("Destination", take(&request.destination));
        cells.insert("Status", "Purchase Order".to_string());
        cells.insert("ETA", take(&request.eta));
        cells.insert("Type", take(&request.shipment_type));
        cells.insert("Vessel", take(&request.vessel));
        cells.insert("Container", take(&request.container));
        cells.insert("PurchaseOrder", take(&request.purchase_order));
        cells.insert("DeliveryOrder", String::new());
        cells.insert("WebocGD", String::new());
        cells.insert("CreatedAt", created_at.clone());

        // Order the row by the sheet's current header row, not a fixed schema.
        let header_grid = self.reader.fetch_grid(Dataset::Shipments, Some("A1:Z1")).await?;
        let headers = header_grid.into_iter().next().unwrap_or_default();
        let row: Vec<String> = headers
            .iter()
            .map(|h| cells.get(h.as_str()).cloned().unwrap_or_default())
            .collect();

        let spreadsheet_id = self
            .reader
            .config()
            .spreadsheet_id(Dataset::Shipments)
            .ok_or(SheetError::Unconfigured(Dataset::Shipments))?
            .to_string();
        self.reader
            .store()
            .append_rows(&spreadsheet_id, "Shipments!A2:Z2", vec![row])
            .await?;

        let history_row = vec![
            id.clone(),
            created_at,
            "Purchase Order".to_string(),
            "Shipment created".to_string(),
        ];
        if let Err(err) = self
            .reader
            .store()
            .append_rows(&spreadsheet_id, "ShipmentHistory!A2:D2", vec![history_row])
            .await
        {
            warn!(shipment = %id, %err, "history append failed (non-critical)");
        }

        info!(shipment = %id, "shipment created");
        Ok(Shipment {
            id,
            client: take(&request.client),
            client_email: take(&request.client_email),
            origin: take(&request.origin),
            destination: take(&request.destination),
            status: "Purchase Order".to_string(),
            eta: take(&request.eta),
            shipment_type: take(&request.shipment_type),
            vessel: take(&request.vessel),
            container: take(&request.container),
            purchase_order: take(&request.purchase_order),
            delivery_order: None,
            weboc_gd: None,
            history: None,
        })
    }

    /// Fetch and transform the whole shipments dataset.
    pub async fn list_shipments(&self) -> Result<Vec<Shipment>, SheetError> {
        let records = self.reader.fetch_records(Dataset::Shipments).await?;
        Ok(records.iter().map(shipment_from_record).collect())
    }
}
