//! Staff Repository
//!
//! Password hashing stays in the auth layer; this repository only ever
//! sees finished PHC strings.

use super::{RepoError, RepoResult};
use crate::db::{STAFF_TABLE, Store};
use redb::ReadableTable;
use shared::models::{StaffAccount, StaffCreate, StaffRole};
use shared::util::now_millis;

const ID_SEQ: &str = "staff_id";

#[derive(Clone)]
pub struct StaffRepository {
    store: Store,
}

impl StaffRepository {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    pub fn find_by_id(&self, owner_id: u64, id: u64) -> RepoResult<Option<StaffAccount>> {
        let txn = self.store.begin_read()?;
        let table = txn.open_table(STAFF_TABLE)?;

        match table.get(id)? {
            Some(value) => {
                let account: StaffAccount = serde_json::from_slice(value.value())?;
                Ok(Some(account).filter(|a| a.owner_id == owner_id))
            }
            None => Ok(None),
        }
    }

    /// Look up an account by username (unscoped: login has no owner context)
    pub fn find_by_username(&self, username: &str) -> RepoResult<Option<StaffAccount>> {
        let txn = self.store.begin_read()?;
        let table = txn.open_table(STAFF_TABLE)?;

        for row in table.iter()? {
            let (_, value) = row?;
            let account: StaffAccount = serde_json::from_slice(value.value())?;
            if account.username == username {
                return Ok(Some(account));
            }
        }
        Ok(None)
    }

    /// Total number of accounts (first-boot seeding check)
    pub fn count(&self) -> RepoResult<u64> {
        use redb::ReadableTableMetadata;

        let txn = self.store.begin_read()?;
        let table = txn.open_table(STAFF_TABLE)?;
        Ok(table.len()?)
    }

    /// Create a staff account under an owner
    pub fn create(
        &self,
        owner_id: u64,
        data: StaffCreate,
        password_hash: String,
    ) -> RepoResult<StaffAccount> {
        if data.username.trim().is_empty() {
            return Err(RepoError::Validation("Username is required".to_string()));
        }

        let txn = self.store.begin_write()?;
        let account = {
            let mut table = txn.open_table(STAFF_TABLE)?;

            // Usernames are globally unique; login carries no owner context
            for row in table.iter()? {
                let (_, value) = row?;
                let existing: StaffAccount = serde_json::from_slice(value.value())?;
                if existing.username == data.username {
                    return Err(RepoError::Duplicate(format!(
                        "Username '{}' is taken",
                        data.username
                    )));
                }
            }

            let id = self.store.next_sequence_txn(&txn, ID_SEQ)?;
            let account = StaffAccount {
                id,
                username: data.username,
                display_name: data.display_name,
                password_hash,
                role: data.role,
                owner_id,
                is_active: true,
                created_at: now_millis(),
            };
            table.insert(id, serde_json::to_vec(&account)?.as_slice())?;
            account
        };
        txn.commit()?;
        Ok(account)
    }

    /// Create the initial owner account (its own owner_id points at itself)
    pub fn seed_owner(
        &self,
        username: &str,
        display_name: &str,
        password_hash: String,
    ) -> RepoResult<StaffAccount> {
        let txn = self.store.begin_write()?;
        let account = {
            let mut table = txn.open_table(STAFF_TABLE)?;
            let id = self.store.next_sequence_txn(&txn, ID_SEQ)?;
            let account = StaffAccount {
                id,
                username: username.to_string(),
                display_name: display_name.to_string(),
                password_hash,
                role: StaffRole::Owner,
                owner_id: id,
                is_active: true,
                created_at: now_millis(),
            };
            table.insert(id, serde_json::to_vec(&account)?.as_slice())?;
            account
        };
        txn.commit()?;
        Ok(account)
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    fn repo() -> StaffRepository {
        StaffRepository::new(Store::open_in_memory().unwrap())
    }

    fn waiter() -> StaffCreate {
        StaffCreate {
            username: "maria".to_string(),
            display_name: "María".to_string(),
            password: "ignored-by-repo".to_string(),
            role: StaffRole::Staff,
        }
    }

    #[test]
    fn test_seed_owner_points_at_itself() {
        let repo = repo();
        let owner = repo.seed_owner("admin", "Admin", "$hash".to_string()).unwrap();
        assert_eq!(owner.owner_id, owner.id);
        assert_eq!(owner.role, StaffRole::Owner);
        assert_eq!(repo.count().unwrap(), 1);
    }

    #[test]
    fn test_username_globally_unique() {
        let repo = repo();
        repo.create(1, waiter(), "$h1".to_string()).unwrap();
        // Even another owner cannot reuse the username
        let result = repo.create(2, waiter(), "$h2".to_string());
        assert!(matches!(result, Err(RepoError::Duplicate(_))));
    }

    #[test]
    fn test_login_lookup_ignores_owner_scope() {
        let repo = repo();
        repo.create(7, waiter(), "$h".to_string()).unwrap();
        let found = repo.find_by_username("maria").unwrap().unwrap();
        assert_eq!(found.owner_id, 7);
        assert!(repo.find_by_username("nobody").unwrap().is_none());
    }
}
