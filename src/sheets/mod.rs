// src/sheets/mod.rs

pub mod client;
pub mod reader;

#[cfg(test)]
pub mod fake;

pub use client::{SheetsClient, TabularStore};
pub use reader::SheetReader;

use std::fmt;

/// The closed set of logical datasets this service knows about. Each maps to
/// a sheet within a configured spreadsheet; dispatch on this enum is always
/// exhaustive, so adding a dataset forces every call site to say what it
/// means for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dataset {
    Shipments,
    PurchaseOrders,
    Deliveries,
    Inventory,
    /// Internal audit-trail sheet; not addressable through the public
    /// dataset API.
    ShipmentHistory,
}

impl Dataset {
    /// Parse a public dataset key as it appears in `GET /dataset?type=`.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "shipments" => Some(Self::Shipments),
            "purchaseOrders" => Some(Self::PurchaseOrders),
            "deliveries" => Some(Self::Deliveries),
            "inventory" => Some(Self::Inventory),
            _ => None,
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            Self::Shipments => "shipments",
            Self::PurchaseOrders => "purchaseOrders",
            Self::Deliveries => "deliveries",
            Self::Inventory => "inventory",
            Self::ShipmentHistory => "shipmentHistory",
        }
    }

    /// Name of the sheet tab holding this dataset.
    pub fn sheet_name(self) -> &'static str {
        match self {
            Self::Shipments => "Shipments",
            Self::PurchaseOrders => "PurchaseOrders",
            Self::Deliveries => "Deliveries",
            Self::Inventory => "Inventory",
            Self::ShipmentHistory => "ShipmentHistory",
        }
    }
}

/// Failure taxonomy for the sheet-backed data layer. Every variant has a
/// fixed mapping to an HTTP status at the API boundary; secondary
/// (history/audit-trail) failures are logged at the call site and never
/// reach this type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SheetError {
    /// No spreadsheet id resolves for the dataset. Fatal; surfaced as 500.
    Unconfigured(Dataset),
    /// Network or remote-API failure. Propagated to the caller, never
    /// swallowed; the UI layer keeps stale data alongside it.
    RemoteFetch(String),
    /// Missing required fields on a write; carries the field names.
    Validation(Vec<String>),
    /// Unknown shipment identifier.
    NotFound(String),
}

impl fmt::Display for SheetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unconfigured(dataset) => {
                write!(f, "Spreadsheet ID for {} not configured", dataset.key())
            }
            Self::RemoteFetch(details) => write!(f, "{details}"),
            Self::Validation(fields) => {
                write!(f, "Missing required fields: {}", fields.join(", "))
            }
            Self::NotFound(id) => write!(f, "Shipment {id} not found"),
        }
    }
}

impl std::error::Error for SheetError {}
