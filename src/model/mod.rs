// src/model/mod.rs

pub mod transform;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// The six canonical shipment lifecycle stages, in timeline order. Status
/// strings outside this vocabulary are carried through untouched; derived
/// views treat them as unknown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ShipmentStatus {
    PurchaseOrder,
    OriginPort,
    InTransit,
    DestinationPort,
    CustomsClearance,
    Delivery,
}

impl ShipmentStatus {
    pub const ALL: [ShipmentStatus; 6] = [
        Self::PurchaseOrder,
        Self::OriginPort,
        Self::InTransit,
        Self::DestinationPort,
        Self::CustomsClearance,
        Self::Delivery,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::PurchaseOrder => "Purchase Order",
            Self::OriginPort => "Origin Port",
            Self::InTransit => "In Transit",
            Self::DestinationPort => "Destination Port",
            Self::CustomsClearance => "Customs Clearance",
            Self::Delivery => "Delivery",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|status| status.as_str() == s)
    }

    /// Zero-based position on the timeline.
    pub fn position(self) -> usize {
        Self::ALL.iter().position(|s| *s == self).unwrap_or(0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shipment {
    pub id: String,
    pub client: String,
    #[serde(rename = "clientEmail")]
    pub client_email: String,
    pub origin: String,
    pub destination: String,
    pub status: String,
    pub eta: String,
    #[serde(rename = "type")]
    pub shipment_type: String,
    pub vessel: String,
    pub container: String,
    #[serde(rename = "purchaseOrder")]
    pub purchase_order: String,
    #[serde(rename = "deliveryOrder")]
    pub delivery_order: Option<String>,
    #[serde(rename = "webocGD")]
    pub weboc_gd: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub history: Option<Vec<ShipmentHistoryItem>>,
}

impl Shipment {
    /// The canonical stage for timeline rendering, if the raw status is in
    /// the vocabulary.
    pub fn canonical_status(&self) -> Option<ShipmentStatus> {
        ShipmentStatus::from_str(&self.status)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShipmentHistoryItem {
    /// Free-text date as it appears in the sheet; parsed only for sorting.
    pub date: String,
    pub status: String,
    pub notes: String,
}

impl ShipmentHistoryItem {
    /// Best-effort calendar parse of the free-text date, accepting the
    /// formats the sheet has been seen to hold.
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        let s = self.date.trim();
        for fmt in ["%m/%d/%Y", "%Y-%m-%d", "%B %d, %Y"] {
            if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
                return Some(date);
            }
        }
        None
    }
}

/// Sort history items newest first by parsed calendar date. Items whose
/// dates do not parse sort after all parseable ones, keeping their relative
/// order.
pub fn sort_history_newest_first(items: &mut [ShipmentHistoryItem]) {
    items.sort_by(|a, b| match (a.parsed_date(), b.parsed_date()) {
        (Some(da), Some(db)) => db.cmp(&da),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseOrder {
    pub id: String,
    pub client: String,
    pub supplier: String,
    #[serde(rename = "orderDate")]
    pub order_date: String,
    #[serde(rename = "expectedDelivery")]
    pub expected_delivery: String,
    pub status: String,
    pub items: String,
    pub value: String,
    pub currency: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Delivery {
    pub id: String,
    #[serde(rename = "shipmentId")]
    pub shipment_id: String,
    pub client: String,
    pub date: String,
    pub time: String,
    pub location: String,
    pub status: String,
    #[serde(rename = "contactPerson")]
    pub contact_person: String,
    #[serde(rename = "contactPhone")]
    pub contact_phone: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_vocabulary_round_trips_in_order() {
        let labels: Vec<&str> = ShipmentStatus::ALL.iter().map(|s| s.as_str()).collect();
        assert_eq!(
            labels,
            [
                "Purchase Order",
                "Origin Port",
                "In Transit",
                "Destination Port",
                "Customs Clearance",
                "Delivery"
            ]
        );
        for (idx, status) in ShipmentStatus::ALL.into_iter().enumerate() {
            assert_eq!(ShipmentStatus::from_str(status.as_str()), Some(status));
            assert_eq!(status.position(), idx);
        }
        assert_eq!(ShipmentStatus::from_str("Lost At Sea"), None);
    }

    fn item(date: &str) -> ShipmentHistoryItem {
        ShipmentHistoryItem {
            date: date.to_string(),
            status: String::new(),
            notes: String::new(),
        }
    }

    #[test]
    fn history_sorts_by_calendar_date_not_lexically() {
        // Lexically "April 25, 2025" < "May 2, 2025" would already hold, but
        // "May 2, 2025" vs "April 25, 2025" in m/d/Y form breaks string order.
        let mut items = vec![item("4/25/2025"), item("5/2/2025"), item("4/10/2025")];
        sort_history_newest_first(&mut items);
        let dates: Vec<&str> = items.iter().map(|i| i.date.as_str()).collect();
        assert_eq!(dates, ["5/2/2025", "4/25/2025", "4/10/2025"]);
    }

    #[test]
    fn unparseable_dates_sort_last_in_original_order() {
        let mut items = vec![item("soon"), item("2025-05-02"), item("later")];
        sort_history_newest_first(&mut items);
        let dates: Vec<&str> = items.iter().map(|i| i.date.as_str()).collect();
        assert_eq!(dates, ["2025-05-02", "soon", "later"]);
    }

    #[test]
    fn mixed_formats_parse() {
        assert_eq!(
            item("April 25, 2025").parsed_date(),
            NaiveDate::from_ymd_opt(2025, 4, 25)
        );
        assert_eq!(
            item("2025-04-25").parsed_date(),
            NaiveDate::from_ymd_opt(2025, 4, 25)
        );
        assert_eq!(item("not a date").parsed_date(), None);
    }
}
