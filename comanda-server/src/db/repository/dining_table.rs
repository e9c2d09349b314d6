//! Dining Table Repository

use super::{RepoError, RepoResult};
use crate::db::{ACTIVE_ORDERS_TABLE, DINING_TABLES_TABLE, Store};
use redb::ReadableTable;
use shared::models::{DiningTable, DiningTableCreate, DiningTableUpdate};
use shared::order::TableStatus;
use shared::util::now_millis;

const ID_SEQ: &str = "dining_table_id";

#[derive(Clone)]
pub struct DiningTableRepository {
    store: Store,
}

impl DiningTableRepository {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// All tables of an owner, in creation order
    pub fn find_all(&self, owner_id: u64) -> RepoResult<Vec<DiningTable>> {
        let txn = self.store.begin_read()?;
        let table = txn.open_table(DINING_TABLES_TABLE)?;

        let mut tables = Vec::new();
        for row in table.iter()? {
            let (_, value) = row?;
            let dining_table: DiningTable = serde_json::from_slice(value.value())?;
            if dining_table.owner_id == owner_id {
                tables.push(dining_table);
            }
        }
        tables.sort_by_key(|t| t.id);
        Ok(tables)
    }

    pub fn find_by_id(&self, owner_id: u64, id: u64) -> RepoResult<Option<DiningTable>> {
        let txn = self.store.begin_read()?;
        let table = txn.open_table(DINING_TABLES_TABLE)?;

        match table.get(id)? {
            Some(value) => {
                let dining_table: DiningTable = serde_json::from_slice(value.value())?;
                Ok(Some(dining_table).filter(|t| t.owner_id == owner_id))
            }
            None => Ok(None),
        }
    }

    /// Create a new table (starts AVAILABLE)
    pub fn create(&self, owner_id: u64, data: DiningTableCreate) -> RepoResult<DiningTable> {
        if data.name.trim().is_empty() {
            return Err(RepoError::Validation("Table name is required".to_string()));
        }

        let txn = self.store.begin_write()?;
        let dining_table = {
            let mut table = txn.open_table(DINING_TABLES_TABLE)?;

            for row in table.iter()? {
                let (_, value) = row?;
                let existing: DiningTable = serde_json::from_slice(value.value())?;
                if existing.owner_id == owner_id && existing.name == data.name {
                    return Err(RepoError::Duplicate(format!(
                        "Table '{}' already exists",
                        data.name
                    )));
                }
            }

            let id = self.store.next_sequence_txn(&txn, ID_SEQ)?;
            let dining_table = DiningTable {
                id,
                owner_id,
                name: data.name,
                status: TableStatus::Available,
                created_at: now_millis(),
            };
            table.insert(id, serde_json::to_vec(&dining_table)?.as_slice())?;
            dining_table
        };
        txn.commit()?;
        Ok(dining_table)
    }

    /// Rename a table
    pub fn update(&self, owner_id: u64, id: u64, data: DiningTableUpdate) -> RepoResult<DiningTable> {
        let txn = self.store.begin_write()?;
        let dining_table = {
            let mut table = txn.open_table(DINING_TABLES_TABLE)?;

            let mut dining_table: DiningTable = match table.get(id)? {
                Some(value) => serde_json::from_slice(value.value())?,
                None => return Err(RepoError::NotFound(format!("Table {} not found", id))),
            };
            if dining_table.owner_id != owner_id {
                return Err(RepoError::NotFound(format!("Table {} not found", id)));
            }

            if let Some(name) = data.name {
                if name.trim().is_empty() {
                    return Err(RepoError::Validation("Table name is required".to_string()));
                }
                for row in table.iter()? {
                    let (key, value) = row?;
                    if key.value() == id {
                        continue;
                    }
                    let existing: DiningTable = serde_json::from_slice(value.value())?;
                    if existing.owner_id == owner_id && existing.name == name {
                        return Err(RepoError::Duplicate(format!(
                            "Table '{}' already exists",
                            name
                        )));
                    }
                }
                dining_table.name = name;
            }

            table.insert(id, serde_json::to_vec(&dining_table)?.as_slice())?;
            dining_table
        };
        txn.commit()?;
        Ok(dining_table)
    }

    /// Staff-requested status flip (the OCCUPIED ↔ BILLING pair)
    ///
    /// AVAILABLE can neither be requested nor left this way; those edges
    /// belong to order creation and close/cancel.
    pub fn request_status(
        &self,
        owner_id: u64,
        id: u64,
        requested: TableStatus,
    ) -> RepoResult<DiningTable> {
        let txn = self.store.begin_write()?;
        let dining_table = {
            let mut table = txn.open_table(DINING_TABLES_TABLE)?;

            let mut dining_table: DiningTable = match table.get(id)? {
                Some(value) => serde_json::from_slice(value.value())?,
                None => return Err(RepoError::NotFound(format!("Table {} not found", id))),
            };
            if dining_table.owner_id != owner_id {
                return Err(RepoError::NotFound(format!("Table {} not found", id)));
            }

            if !dining_table.status.can_request(requested) {
                return Err(RepoError::Conflict(format!(
                    "Cannot move table '{}' from {} to {}",
                    dining_table.name, dining_table.status, requested
                )));
            }

            // OCCUPIED and BILLING must be backed by an active order
            let active = txn.open_table(ACTIVE_ORDERS_TABLE)?;
            if active.get(id)?.is_none() {
                return Err(RepoError::Conflict(format!(
                    "Table '{}' has no active order",
                    dining_table.name
                )));
            }

            dining_table.status = requested;
            table.insert(id, serde_json::to_vec(&dining_table)?.as_slice())?;
            dining_table
        };
        txn.commit()?;
        Ok(dining_table)
    }

    /// Delete a table
    ///
    /// Rejected while an active order claims it. Closed orders carry the
    /// table name as a snapshot, so history survives the delete.
    pub fn delete(&self, owner_id: u64, id: u64) -> RepoResult<()> {
        let txn = self.store.begin_write()?;
        {
            let mut table = txn.open_table(DINING_TABLES_TABLE)?;

            let dining_table: DiningTable = match table.get(id)? {
                Some(value) => serde_json::from_slice(value.value())?,
                None => return Err(RepoError::NotFound(format!("Table {} not found", id))),
            };
            if dining_table.owner_id != owner_id {
                return Err(RepoError::NotFound(format!("Table {} not found", id)));
            }

            let active = txn.open_table(ACTIVE_ORDERS_TABLE)?;
            if active.get(id)?.is_some() {
                return Err(RepoError::InUse(format!(
                    "Table '{}' has an active order",
                    dining_table.name
                )));
            }

            table.remove(id)?;
        }
        txn.commit()?;
        Ok(())
    }
}
