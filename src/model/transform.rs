// src/model/transform.rs

//! Per-dataset projections from generic mapped rows into typed records.
//! These are total: every input record produces exactly one output, with
//! documented defaults substituted for absent or empty fields and no
//! validation beyond that — out-of-vocabulary values pass through unchanged.

use super::{Delivery, PurchaseOrder, Shipment, ShipmentHistoryItem};
use crate::grid::MappedRecord;

fn field(record: &MappedRecord, name: &str) -> String {
    record.get(name).cloned().unwrap_or_default()
}

/// First non-empty value among the aliases, or the empty string.
fn aliased(record: &MappedRecord, names: &[&str]) -> String {
    names
        .iter()
        .filter_map(|name| record.get(*name))
        .find(|value| !value.is_empty())
        .cloned()
        .unwrap_or_default()
}

fn field_or(record: &MappedRecord, name: &str, default: &str) -> String {
    let value = field(record, name);
    if value.is_empty() {
        default.to_string()
    } else {
        value
    }
}

fn optional(record: &MappedRecord, name: &str) -> Option<String> {
    record.get(name).filter(|value| !value.is_empty()).cloned()
}

pub fn shipment_from_record(record: &MappedRecord) -> Shipment {
    Shipment {
        id: aliased(record, &["ShipmentID", "ID"]),
        client: field(record, "Client"),
        client_email: field(record, "ClientEmail"),
        origin: field(record, "Origin"),
        destination: field(record, "Destination"),
        status: field_or(record, "Status", "Purchase Order"),
        eta: field(record, "ETA"),
        shipment_type: field_or(record, "Type", "FCL"),
        vessel: field(record, "Vessel"),
        container: field(record, "Container"),
        purchase_order: field(record, "PurchaseOrder"),
        delivery_order: optional(record, "DeliveryOrder"),
        weboc_gd: optional(record, "WebocGD"),
        history: None,
    }
}

pub fn purchase_order_from_record(record: &MappedRecord) -> PurchaseOrder {
    PurchaseOrder {
        id: aliased(record, &["POID", "ID"]),
        client: field(record, "Client"),
        supplier: field(record, "Supplier"),
        order_date: field(record, "OrderDate"),
        expected_delivery: field(record, "ExpectedDelivery"),
        status: field_or(record, "Status", "Created"),
        items: field(record, "Items"),
        value: field(record, "Value"),
        currency: field_or(record, "Currency", "USD"),
    }
}

pub fn delivery_from_record(record: &MappedRecord) -> Delivery {
    Delivery {
        id: aliased(record, &["DeliveryID", "ID"]),
        shipment_id: field(record, "ShipmentID"),
        client: field(record, "Client"),
        date: field(record, "Date"),
        time: field(record, "Time"),
        location: field(record, "Location"),
        status: field_or(record, "Status", "Pending"),
        contact_person: field(record, "ContactPerson"),
        contact_phone: field(record, "ContactPhone"),
    }
}

pub fn history_item_from_record(record: &MappedRecord) -> ShipmentHistoryItem {
    ShipmentHistoryItem {
        date: field(record, "Date"),
        status: field(record, "Status"),
        notes: field(record, "Notes"),
    }
}
