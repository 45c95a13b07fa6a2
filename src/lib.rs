//! shiptrack: a shipment-tracking service backed by a Google Sheets
//! spreadsheet. The spreadsheet is the sole system of record; everything
//! served here is an ephemeral read projection recomputed on each fetch.

pub mod config;
pub mod grid;
pub mod http;
pub mod model;
pub mod notify;
pub mod poll;
pub mod sheets;
pub mod shipments;
