//! redb-based persistence layer
//!
//! # Tables
//!
//! | Table | Key | Value | Purpose |
//! |-------|-----|-------|---------|
//! | `categories` | `id` | `Category` | Menu categories |
//! | `products` | `id` | `Product` | Menu products |
//! | `modifier_groups` | `id` | `ModifierGroup` | Product customization groups |
//! | `modifier_options` | `id` | `ModifierOption` | Priced choices per group |
//! | `dining_tables` | `id` | `DiningTable` | Floor tables |
//! | `staff` | `id` | `StaffAccount` | Staff accounts |
//! | `settings` | `"restaurant"` | `RestaurantSettings` | Restaurant profile + rates |
//! | `orders` | `order_id` | `Order` | Order snapshots (all statuses) |
//! | `active_orders` | `table_id` | `order_id` | Table claim index |
//! | `invoices` | `id` | `Invoice` | Immutable invoice records |
//! | `sequences` | `name` | `u64` | Atomic counters (row ids, invoice numbers) |
//!
//! # Single database
//!
//! Everything lives in one redb file. Closing an order touches orders,
//! active_orders, dining_tables, invoices and sequences in a single write
//! transaction, which redb only guarantees within one database.
//!
//! # Durability
//!
//! redb commits with `Durability::Immediate` by default: once `commit()`
//! returns the data survives power loss, and the file is always left in a
//! consistent state (copy-on-write with atomic pointer swap).

use redb::{
    Database, ReadTransaction, ReadableDatabase, ReadableTable, TableDefinition, WriteTransaction,
};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

pub mod repository;

/// Menu categories: key = id, value = JSON-serialized Category
pub(crate) const CATEGORIES_TABLE: TableDefinition<u64, &[u8]> = TableDefinition::new("categories");

/// Menu products: key = id, value = JSON-serialized Product
pub(crate) const PRODUCTS_TABLE: TableDefinition<u64, &[u8]> = TableDefinition::new("products");

/// Modifier groups: key = id, value = JSON-serialized ModifierGroup
pub(crate) const MODIFIER_GROUPS_TABLE: TableDefinition<u64, &[u8]> =
    TableDefinition::new("modifier_groups");

/// Modifier options: key = id, value = JSON-serialized ModifierOption
pub(crate) const MODIFIER_OPTIONS_TABLE: TableDefinition<u64, &[u8]> =
    TableDefinition::new("modifier_options");

/// Floor tables: key = id, value = JSON-serialized DiningTable
pub(crate) const DINING_TABLES_TABLE: TableDefinition<u64, &[u8]> =
    TableDefinition::new("dining_tables");

/// Staff accounts: key = id, value = JSON-serialized StaffAccount
pub(crate) const STAFF_TABLE: TableDefinition<u64, &[u8]> = TableDefinition::new("staff");

/// Restaurant settings: key = "restaurant", value = JSON-serialized RestaurantSettings
pub(crate) const SETTINGS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("settings");

/// Orders: key = order_id (uuid), value = JSON-serialized Order
pub(crate) const ORDERS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("orders");

/// Table claim index: key = table_id, value = order_id of the active order.
/// At most one entry per table; existence of an entry means the table is taken.
pub(crate) const ACTIVE_ORDERS_TABLE: TableDefinition<u64, &str> =
    TableDefinition::new("active_orders");

/// Invoices: key = id, value = JSON-serialized Invoice
pub(crate) const INVOICES_TABLE: TableDefinition<u64, &[u8]> = TableDefinition::new("invoices");

/// Named counters: key = sequence name, value = last issued number
pub(crate) const SEQUENCES_TABLE: TableDefinition<&str, u64> = TableDefinition::new("sequences");

/// Settings row key (single-restaurant deployment)
pub(crate) const SETTINGS_KEY: &str = "restaurant";

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Persistence handle backed by redb
///
/// Cheap to clone; repositories and the orders manager share one handle.
#[derive(Clone)]
pub struct Store {
    db: Arc<Database>,
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store").finish_non_exhaustive()
    }
}

impl Store {
    /// Open or create the database at the given path
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let db = Database::create(path)?;
        Self::init_tables(db)
    }

    /// Open an in-memory database (for testing)
    #[cfg(test)]
    pub fn open_in_memory() -> StorageResult<Self> {
        let db = Database::builder().create_with_backend(redb::backends::InMemoryBackend::new())?;
        Self::init_tables(db)
    }

    fn init_tables(db: Database) -> StorageResult<Self> {
        // Create all tables up front so later read transactions never see a
        // missing table.
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(CATEGORIES_TABLE)?;
            let _ = write_txn.open_table(PRODUCTS_TABLE)?;
            let _ = write_txn.open_table(MODIFIER_GROUPS_TABLE)?;
            let _ = write_txn.open_table(MODIFIER_OPTIONS_TABLE)?;
            let _ = write_txn.open_table(DINING_TABLES_TABLE)?;
            let _ = write_txn.open_table(STAFF_TABLE)?;
            let _ = write_txn.open_table(SETTINGS_TABLE)?;
            let _ = write_txn.open_table(ORDERS_TABLE)?;
            let _ = write_txn.open_table(ACTIVE_ORDERS_TABLE)?;
            let _ = write_txn.open_table(INVOICES_TABLE)?;
            let _ = write_txn.open_table(SEQUENCES_TABLE)?;
        }
        write_txn.commit()?;

        Ok(Self { db: Arc::new(db) })
    }

    /// Begin a write transaction
    pub fn begin_write(&self) -> StorageResult<WriteTransaction> {
        Ok(self.db.begin_write()?)
    }

    /// Begin a read transaction
    pub fn begin_read(&self) -> StorageResult<ReadTransaction> {
        Ok(self.db.begin_read()?)
    }

    // ========== Sequence Operations ==========

    /// Increment and return a named counter (within transaction)
    ///
    /// The new value is only visible to others after the caller commits, so a
    /// number issued here is never handed out twice: concurrent writers
    /// serialize on the write transaction.
    pub fn next_sequence_txn(&self, txn: &WriteTransaction, name: &str) -> StorageResult<u64> {
        let mut table = txn.open_table(SEQUENCES_TABLE)?;
        let current = table.get(name)?.map(|g| g.value()).unwrap_or(0);
        let next = current + 1;
        table.insert(name, next)?;
        Ok(next)
    }

    /// Read a named counter without incrementing
    pub fn current_sequence(&self, name: &str) -> StorageResult<u64> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(SEQUENCES_TABLE)?;
        Ok(table.get(name)?.map(|g| g.value()).unwrap_or(0))
    }

    // ========== Active Order Index ==========

    /// Get an order by id
    pub fn get_order(&self, order_id: &str) -> StorageResult<Option<shared::order::Order>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(ORDERS_TABLE)?;
        match table.get(order_id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    /// Find the active order claiming a table, if any
    pub fn find_active_order_for_table(&self, table_id: u64) -> StorageResult<Option<String>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(ACTIVE_ORDERS_TABLE)?;
        Ok(table.get(table_id)?.map(|g| g.value().to_string()))
    }

    /// All non-terminal orders, resolved through the table claim index
    pub fn active_orders(&self) -> StorageResult<Vec<shared::order::Order>> {
        let read_txn = self.db.begin_read()?;
        let active = read_txn.open_table(ACTIVE_ORDERS_TABLE)?;
        let orders = read_txn.open_table(ORDERS_TABLE)?;

        let mut result = Vec::new();
        for row in active.iter()? {
            let (_, order_id) = row?;
            if let Some(value) = orders.get(order_id.value())? {
                result.push(serde_json::from_slice(value.value())?);
            }
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequences_are_independent() {
        let store = Store::open_in_memory().unwrap();

        let txn = store.begin_write().unwrap();
        assert_eq!(store.next_sequence_txn(&txn, "product_id").unwrap(), 1);
        assert_eq!(store.next_sequence_txn(&txn, "product_id").unwrap(), 2);
        assert_eq!(store.next_sequence_txn(&txn, "category_id").unwrap(), 1);
        txn.commit().unwrap();

        assert_eq!(store.current_sequence("product_id").unwrap(), 2);
    }

    #[test]
    fn test_sequence_in_txn_visible_after_commit() {
        let store = Store::open_in_memory().unwrap();

        let txn = store.begin_write().unwrap();
        let n = store.next_sequence_txn(&txn, "invoice_2026").unwrap();
        assert_eq!(n, 1);
        txn.commit().unwrap();

        assert_eq!(store.current_sequence("invoice_2026").unwrap(), 1);
    }

    #[test]
    fn test_sequence_rolls_back_with_txn() {
        let store = Store::open_in_memory().unwrap();

        let txn = store.begin_write().unwrap();
        let n = store.next_sequence_txn(&txn, "invoice_2026").unwrap();
        assert_eq!(n, 1);
        drop(txn); // abort

        assert_eq!(store.current_sequence("invoice_2026").unwrap(), 0);
    }
}
