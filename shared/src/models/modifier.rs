//! Modifier Group / Option Models
//!
//! A group is a named customization category on one product ("Choose your
//! sauce"); options are its priced choices. Order items snapshot chosen
//! options by value, so editing or deleting these rows never rewrites
//! history.

use serde::{Deserialize, Serialize};

/// Modifier group entity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModifierGroup {
    pub id: u64,
    /// Owning restaurant account
    pub owner_id: u64,
    /// Product this group belongs to
    pub product_id: u64,
    pub name: String,
    pub sort_order: i32,
    pub created_at: i64,
}

/// Create modifier group payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModifierGroupCreate {
    pub name: String,
    pub sort_order: Option<i32>,
}

/// Update modifier group payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModifierGroupUpdate {
    pub name: Option<String>,
    pub sort_order: Option<i32>,
}

/// Modifier option entity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModifierOption {
    pub id: u64,
    /// Owning restaurant account
    pub owner_id: u64,
    /// Group this option belongs to
    pub group_id: u64,
    pub name: String,
    /// Price delta per unit (may be 0)
    pub price: f64,
    pub sort_order: i32,
    pub created_at: i64,
}

/// Create modifier option payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModifierOptionCreate {
    pub name: String,
    pub price: f64,
    pub sort_order: Option<i32>,
}

/// Update modifier option payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModifierOptionUpdate {
    pub name: Option<String>,
    pub price: Option<f64>,
    pub sort_order: Option<i32>,
}

/// Group joined with its options, in stable display order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModifierGroupWithOptions {
    #[serde(flatten)]
    pub group: ModifierGroup,
    pub options: Vec<ModifierOption>,
}
