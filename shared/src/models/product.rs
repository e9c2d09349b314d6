//! Product Model

use serde::{Deserialize, Serialize};

use super::category::Category;
use super::modifier::ModifierGroupWithOptions;

/// Product entity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    pub id: u64,
    /// Owning restaurant account
    pub owner_id: u64,
    pub name: String,
    /// Category reference (required)
    pub category_id: u64,
    /// Base price per unit; order items snapshot this at add time
    pub price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub sort_order: i32,
    pub is_active: bool,
    pub created_at: i64,
}

/// Create product payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductCreate {
    pub name: String,
    pub category_id: u64,
    pub price: f64,
    pub description: Option<String>,
    pub sort_order: Option<i32>,
}

/// Update product payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub category_id: Option<u64>,
    pub price: Option<f64>,
    pub description: Option<String>,
    pub sort_order: Option<i32>,
    pub is_active: Option<bool>,
}

/// Product joined with its category and modifier tree
///
/// The canonical read shape for order construction: one fetch renders the
/// whole customization dialog. Groups and options come back in stable
/// `(sort_order, id)` order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductWithModifiers {
    #[serde(flatten)]
    pub product: Product,
    pub category: Category,
    pub modifier_groups: Vec<ModifierGroupWithOptions>,
}
