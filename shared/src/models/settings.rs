//! Restaurant Settings Model

use serde::{Deserialize, Serialize};

/// Restaurant settings document (one per deployment)
///
/// Read at invoice time and embedded into the snapshot; editing these
/// later never touches issued invoices.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RestaurantSettings {
    pub restaurant_name: String,
    pub restaurant_address: String,
    /// Fiscal identifier printed on invoices
    pub tax_id: String,
    /// Decimal fraction, e.g. 0.12 for 12%
    pub tax_rate: f64,
    /// Decimal fraction, e.g. 0.10 for 10%
    pub service_charge_rate: f64,
    pub updated_at: i64,
}

impl RestaurantSettings {
    /// First-boot defaults, overwritten through the settings endpoint.
    pub fn seed(now: i64) -> Self {
        Self {
            restaurant_name: "Unnamed Restaurant".to_string(),
            restaurant_address: String::new(),
            tax_id: String::new(),
            tax_rate: 0.0,
            service_charge_rate: 0.0,
            updated_at: now,
        }
    }
}

/// Update settings payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettingsUpdate {
    pub restaurant_name: Option<String>,
    pub restaurant_address: Option<String>,
    pub tax_id: Option<String>,
    pub tax_rate: Option<f64>,
    pub service_charge_rate: Option<f64>,
}
