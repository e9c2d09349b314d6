//! Data models
//!
//! Shared between the server and display clients (via API). Catalog and
//! account IDs are `u64`, allocated from the store's sequence table.
//! Monetary fields are `f64` on the wire; the server does all arithmetic
//! in `Decimal` and rounds at the boundary.

pub mod category;
pub mod dining_table;
pub mod invoice;
pub mod modifier;
pub mod product;
pub mod settings;
pub mod staff;

// Re-exports
pub use category::*;
pub use dining_table::*;
pub use invoice::*;
pub use modifier::*;
pub use product::*;
pub use settings::*;
pub use staff::*;
