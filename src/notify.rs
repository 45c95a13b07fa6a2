// src/notify.rs

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotificationTemplate {
    pub subject: String,
    pub body: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NotificationRequest {
    #[serde(rename = "shipmentId", default)]
    pub shipment_id: Option<String>,
    #[serde(rename = "clientEmail", default)]
    pub client_email: Option<String>,
    #[serde(rename = "clientName", default)]
    pub client_name: Option<String>,
    #[serde(rename = "notificationType", default)]
    pub notification_type: Option<String>,
    #[serde(rename = "additionalData", default)]
    pub additional_data: BTreeMap<String, String>,
}

fn value<'a>(data: &'a BTreeMap<String, String>, key: &str, fallback: &'a str) -> &'a str {
    data.get(key).map(String::as_str).unwrap_or(fallback)
}

/// Render the template for a notification type. Unknown types fall back to a
/// generic update; absent placeholder data renders as a bracketed
/// placeholder so the gap is visible in previews.
pub fn template_for(kind: &str, data: &BTreeMap<String, String>) -> NotificationTemplate {
    let client = value(data, "clientName", "Client");
    let shipment = value(data, "shipmentId", "");
    match kind {
        "eta" => NotificationTemplate {
            subject: "Expected Time of Arrival Update".to_string(),
            body: format!(
                "Dear {client},\n\nYour shipment {shipment} is expected to arrive on {}.\n\nPlease let us know if you have any questions.\n\nRegards,\nShipTrack Pro Team",
                value(data, "etaDate", "[ETA_DATE]"),
            ),
        },
        "arrival" => NotificationTemplate {
            subject: "Vessel Arrival Notification".to_string(),
            body: format!(
                "Dear {client},\n\nYour shipment {shipment} has arrived at {} on {}.\n\nWe will keep you updated on the customs clearance process.\n\nRegards,\nShipTrack Pro Team",
                value(data, "port", "the port"),
                value(data, "arrivalDate", "[ARRIVAL_DATE]"),
            ),
        },
        "delivery" => NotificationTemplate {
            subject: "Delivery Plan Notification".to_string(),
            body: format!(
                "Dear {client},\n\nYour shipment {shipment} is ready for delivery.\n\nDelivery Details:\n- Date: {}\n- Time: {}\n- Location: {}\n\nPlease ensure someone is available to receive the shipment.\n\nRegards,\nShipTrack Pro Team",
                value(data, "deliveryDate", "[DELIVERY_DATE]"),
                value(data, "deliveryTime", "[DELIVERY_TIME]"),
                value(data, "deliveryLocation", "[DELIVERY_LOCATION]"),
            ),
        },
        "delivered" => NotificationTemplate {
            subject: "Delivery Confirmation".to_string(),
            body: format!(
                "Dear {client},\n\nYour shipment {shipment} has been successfully delivered on {}.\n\nThank you for your business.\n\nRegards,\nShipTrack Pro Team",
                value(data, "deliveredDate", "[DELIVERED_DATE]"),
            ),
        },
        _ => NotificationTemplate {
            subject: "Shipment Update".to_string(),
            body: format!(
                "Dear {client},\n\nThis is an update regarding your shipment {shipment}.\n\nRegards,\nShipTrack Pro Team"
            ),
        },
    }
}

/// Mock sender: logs the rendered email instead of delivering it. A real
/// deployment would swap in an SMTP or API transport here.
#[derive(Debug, Clone, Default)]
pub struct MockMailer;

impl MockMailer {
    pub fn send(&self, to: &str, template: &NotificationTemplate) {
        info!(to, subject = %template.subject, "sending email");
        info!(body = %template.body, "email body");
    }
}

/// First 100 characters of the body, for the API response.
pub fn preview(template: &NotificationTemplate) -> String {
    let head: String = template.body.chars().take(100).collect();
    format!("{head}...")
}
