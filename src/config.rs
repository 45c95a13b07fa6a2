// src/config.rs

use crate::sheets::Dataset;
use std::env;

/// Runtime settings, read once from the environment at startup. Per-dataset
/// spreadsheet ids fall back to the shipments spreadsheet when not set, which
/// matches the usual single-spreadsheet deployment.
#[derive(Debug, Clone)]
pub struct Config {
    pub shipments_spreadsheet_id: Option<String>,
    pub purchase_orders_spreadsheet_id: Option<String>,
    pub deliveries_spreadsheet_id: Option<String>,
    pub inventory_spreadsheet_id: Option<String>,
    pub sheets_api_key: Option<String>,
    pub sheets_api_base: String,
    pub bind_addr: String,
    /// Dashboard shipments poll interval in seconds; 0 disables the poller.
    pub shipments_refresh_secs: u64,
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.is_empty())
}

impl Default for Config {
    fn default() -> Self {
        Self {
            shipments_spreadsheet_id: None,
            purchase_orders_spreadsheet_id: None,
            deliveries_spreadsheet_id: None,
            inventory_spreadsheet_id: None,
            sheets_api_key: None,
            sheets_api_base: "https://sheets.googleapis.com".to_string(),
            bind_addr: "127.0.0.1:3000".to_string(),
            shipments_refresh_secs: 30,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            shipments_spreadsheet_id: env_opt("SHIPMENT_SPREADSHEET_ID"),
            purchase_orders_spreadsheet_id: env_opt("PURCHASE_ORDERS_SPREADSHEET_ID"),
            deliveries_spreadsheet_id: env_opt("DELIVERIES_SPREADSHEET_ID"),
            inventory_spreadsheet_id: env_opt("INVENTORY_SPREADSHEET_ID"),
            sheets_api_key: env_opt("GOOGLE_SHEETS_API_KEY"),
            sheets_api_base: env_opt("SHEETS_API_BASE").unwrap_or(defaults.sheets_api_base),
            bind_addr: env_opt("BIND_ADDR").unwrap_or(defaults.bind_addr),
            shipments_refresh_secs: env_opt("SHIPMENTS_REFRESH_SECS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.shipments_refresh_secs),
        }
    }

    /// Resolve the spreadsheet id backing a dataset. Datasets without their
    /// own spreadsheet fall back to the shipments spreadsheet; `None` means
    /// the deployment is unconfigured for this dataset.
    pub fn spreadsheet_id(&self, dataset: Dataset) -> Option<&str> {
        let specific = match dataset {
            Dataset::Shipments | Dataset::ShipmentHistory => None,
            Dataset::PurchaseOrders => self.purchase_orders_spreadsheet_id.as_deref(),
            Dataset::Deliveries => self.deliveries_spreadsheet_id.as_deref(),
            Dataset::Inventory => self.inventory_spreadsheet_id.as_deref(),
        };
        specific.or(self.shipments_spreadsheet_id.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn datasets_fall_back_to_the_shipments_spreadsheet() {
        let config = Config {
            shipments_spreadsheet_id: Some("primary".into()),
            deliveries_spreadsheet_id: Some("deliveries-own".into()),
            ..Config::default()
        };
        assert_eq!(config.spreadsheet_id(Dataset::Shipments), Some("primary"));
        assert_eq!(
            config.spreadsheet_id(Dataset::PurchaseOrders),
            Some("primary")
        );
        assert_eq!(
            config.spreadsheet_id(Dataset::Deliveries),
            Some("deliveries-own")
        );
        assert_eq!(
            config.spreadsheet_id(Dataset::ShipmentHistory),
            Some("primary")
        );
    }

    #[test]
    fn unconfigured_deployment_resolves_to_none() {
        let config = Config::default();
        assert_eq!(config.spreadsheet_id(Dataset::Inventory), None);
    }
}
