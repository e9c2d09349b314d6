//! Invoice Model
//!
//! The invoice document is the permanent legal record of a sale. It is
//! fully denormalized at issue time: restaurant identity, sale metadata,
//! line items, and the financial summary are all copied in, so the
//! document stays renderable no matter what later happens to the catalog,
//! the settings, or the staff roster. Nothing in the API mutates one.

use serde::{Deserialize, Serialize};

/// Issued invoice (immutable)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Invoice {
    /// Sequence-derived id
    pub id: u64,
    /// Source order
    pub order_id: String,
    /// Year-prefixed sequential number, e.g. `F-2026-00042`
    pub invoice_number: String,
    /// Denormalized snapshot
    pub invoice_data: InvoiceData,
    pub created_at: i64,
}

/// Denormalized invoice snapshot
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InvoiceData {
    pub restaurant_info: RestaurantInfo,
    pub sale_info: SaleInfo,
    pub items: Vec<InvoiceLine>,
    pub financial_summary: FinancialSummary,
}

/// Restaurant identity as configured at issue time
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RestaurantInfo {
    pub name: String,
    pub address: String,
    pub tax_id: String,
}

/// Sale metadata
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SaleInfo {
    pub invoice_number: String,
    /// RFC 3339 issue timestamp
    pub date: String,
    pub waiter_name: String,
    pub table_name: String,
    /// Sub-bill label when the invoice came from a split
    #[serde(skip_serializing_if = "Option::is_none")]
    pub split_label: Option<String>,
}

/// One invoiced line
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InvoiceLine {
    pub quantity: i32,
    pub product_name: String,
    /// Base unit price (before modifiers)
    pub unit_price: f64,
    /// Modifier names, for display
    #[serde(default)]
    pub modifiers: Vec<String>,
    /// `(unit_price + Σ modifier prices) × quantity`, rounded
    pub item_total: f64,
}

/// Computed financial summary
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FinancialSummary {
    pub subtotal: f64,
    /// Rate applied, frozen from settings
    pub tax_rate: f64,
    pub tax_amount: f64,
    /// Rate applied, frozen from settings
    pub service_charge_rate: f64,
    pub service_charge_amount: f64,
    pub grand_total: f64,
}
