//! Modifier Group / Option Repositories
//!
//! Groups hang off one product; options hang off one group. Order items
//! snapshot chosen options by value, so catalog edits never rewrite order
//! history; deletion is still blocked while an active order references an
//! option, to keep the pull-back-and-edit flow coherent.

use super::{RepoError, RepoResult};
use crate::db::{
    ACTIVE_ORDERS_TABLE, MODIFIER_GROUPS_TABLE, MODIFIER_OPTIONS_TABLE, ORDERS_TABLE,
    PRODUCTS_TABLE, Store,
};
use crate::orders::money::MAX_PRICE;
use redb::{ReadableTable, WriteTransaction};
use shared::models::{
    ModifierGroup, ModifierGroupCreate, ModifierGroupUpdate, ModifierOption, ModifierOptionCreate,
    ModifierOptionUpdate, Product,
};
use shared::order::Order;
use shared::util::now_millis;

const GROUP_ID_SEQ: &str = "modifier_group_id";
const OPTION_ID_SEQ: &str = "modifier_option_id";

/// True when a non-terminal order carries a snapshot of one of these options
fn options_on_active_order(txn: &WriteTransaction, option_ids: &[u64]) -> RepoResult<bool> {
    let active = txn.open_table(ACTIVE_ORDERS_TABLE)?;
    let orders = txn.open_table(ORDERS_TABLE)?;

    for row in active.iter()? {
        let (_, order_id) = row?;
        if let Some(value) = orders.get(order_id.value())? {
            let order: Order = serde_json::from_slice(value.value())?;
            let referenced = order.items.iter().any(|item| {
                item.selected_modifiers
                    .iter()
                    .any(|m| option_ids.contains(&m.option_id))
            });
            if referenced {
                return Ok(true);
            }
        }
    }
    Ok(false)
}

// ========== Modifier Groups ==========

#[derive(Clone)]
pub struct ModifierGroupRepository {
    store: Store,
}

impl ModifierGroupRepository {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Groups of one product, in (sort_order, id) order
    pub fn find_by_product(&self, owner_id: u64, product_id: u64) -> RepoResult<Vec<ModifierGroup>> {
        let txn = self.store.begin_read()?;
        let table = txn.open_table(MODIFIER_GROUPS_TABLE)?;

        let mut groups = Vec::new();
        for row in table.iter()? {
            let (_, value) = row?;
            let group: ModifierGroup = serde_json::from_slice(value.value())?;
            if group.owner_id == owner_id && group.product_id == product_id {
                groups.push(group);
            }
        }
        groups.sort_by_key(|g| (g.sort_order, g.id));
        Ok(groups)
    }

    pub fn find_by_id(&self, owner_id: u64, id: u64) -> RepoResult<Option<ModifierGroup>> {
        let txn = self.store.begin_read()?;
        let table = txn.open_table(MODIFIER_GROUPS_TABLE)?;

        match table.get(id)? {
            Some(value) => {
                let group: ModifierGroup = serde_json::from_slice(value.value())?;
                Ok(Some(group).filter(|g| g.owner_id == owner_id))
            }
            None => Ok(None),
        }
    }

    /// Create a group on a product
    pub fn create(
        &self,
        owner_id: u64,
        product_id: u64,
        data: ModifierGroupCreate,
    ) -> RepoResult<ModifierGroup> {
        if data.name.trim().is_empty() {
            return Err(RepoError::Validation("Group name is required".to_string()));
        }

        let txn = self.store.begin_write()?;
        let group = {
            let products = txn.open_table(PRODUCTS_TABLE)?;
            let product_owned = match products.get(product_id)? {
                Some(value) => {
                    let product: Product = serde_json::from_slice(value.value())?;
                    product.owner_id == owner_id
                }
                None => false,
            };
            if !product_owned {
                return Err(RepoError::NotFound(format!(
                    "Product {} not found",
                    product_id
                )));
            }

            let mut table = txn.open_table(MODIFIER_GROUPS_TABLE)?;
            let id = self.store.next_sequence_txn(&txn, GROUP_ID_SEQ)?;
            let group = ModifierGroup {
                id,
                owner_id,
                product_id,
                name: data.name,
                sort_order: data.sort_order.unwrap_or(0),
                created_at: now_millis(),
            };
            table.insert(id, serde_json::to_vec(&group)?.as_slice())?;
            group
        };
        txn.commit()?;
        Ok(group)
    }

    pub fn update(
        &self,
        owner_id: u64,
        id: u64,
        data: ModifierGroupUpdate,
    ) -> RepoResult<ModifierGroup> {
        let txn = self.store.begin_write()?;
        let group = {
            let mut table = txn.open_table(MODIFIER_GROUPS_TABLE)?;

            let mut group: ModifierGroup = match table.get(id)? {
                Some(value) => serde_json::from_slice(value.value())?,
                None => return Err(RepoError::NotFound(format!("Group {} not found", id))),
            };
            if group.owner_id != owner_id {
                return Err(RepoError::NotFound(format!("Group {} not found", id)));
            }

            if let Some(name) = data.name {
                if name.trim().is_empty() {
                    return Err(RepoError::Validation("Group name is required".to_string()));
                }
                group.name = name;
            }
            if let Some(sort_order) = data.sort_order {
                group.sort_order = sort_order;
            }

            table.insert(id, serde_json::to_vec(&group)?.as_slice())?;
            group
        };
        txn.commit()?;
        Ok(group)
    }

    /// Delete a group, cascading its options
    ///
    /// Rejected while an active order references one of its options.
    pub fn delete(&self, owner_id: u64, id: u64) -> RepoResult<()> {
        let txn = self.store.begin_write()?;
        {
            let mut table = txn.open_table(MODIFIER_GROUPS_TABLE)?;

            let group: ModifierGroup = match table.get(id)? {
                Some(value) => serde_json::from_slice(value.value())?,
                None => return Err(RepoError::NotFound(format!("Group {} not found", id))),
            };
            if group.owner_id != owner_id {
                return Err(RepoError::NotFound(format!("Group {} not found", id)));
            }

            let mut options = txn.open_table(MODIFIER_OPTIONS_TABLE)?;
            let mut option_ids = Vec::new();
            for row in options.iter()? {
                let (key, value) = row?;
                let option: ModifierOption = serde_json::from_slice(value.value())?;
                if option.group_id == id {
                    option_ids.push(key.value());
                }
            }

            if options_on_active_order(&txn, &option_ids)? {
                return Err(RepoError::InUse(format!(
                    "Group '{}' is referenced by an active order",
                    group.name
                )));
            }

            for option_id in option_ids {
                options.remove(option_id)?;
            }
            table.remove(id)?;
        }
        txn.commit()?;
        Ok(())
    }
}

// ========== Modifier Options ==========

#[derive(Clone)]
pub struct ModifierOptionRepository {
    store: Store,
}

impl ModifierOptionRepository {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Options of one group, in (sort_order, id) order
    pub fn find_by_group(&self, owner_id: u64, group_id: u64) -> RepoResult<Vec<ModifierOption>> {
        let txn = self.store.begin_read()?;
        let table = txn.open_table(MODIFIER_OPTIONS_TABLE)?;

        let mut options = Vec::new();
        for row in table.iter()? {
            let (_, value) = row?;
            let option: ModifierOption = serde_json::from_slice(value.value())?;
            if option.owner_id == owner_id && option.group_id == group_id {
                options.push(option);
            }
        }
        options.sort_by_key(|o| (o.sort_order, o.id));
        Ok(options)
    }

    pub fn find_by_id(&self, owner_id: u64, id: u64) -> RepoResult<Option<ModifierOption>> {
        let txn = self.store.begin_read()?;
        let table = txn.open_table(MODIFIER_OPTIONS_TABLE)?;

        match table.get(id)? {
            Some(value) => {
                let option: ModifierOption = serde_json::from_slice(value.value())?;
                Ok(Some(option).filter(|o| o.owner_id == owner_id))
            }
            None => Ok(None),
        }
    }

    /// Create an option in a group
    pub fn create(
        &self,
        owner_id: u64,
        group_id: u64,
        data: ModifierOptionCreate,
    ) -> RepoResult<ModifierOption> {
        if data.name.trim().is_empty() {
            return Err(RepoError::Validation("Option name is required".to_string()));
        }
        if !(0.0..=MAX_PRICE).contains(&data.price) {
            return Err(RepoError::Validation(format!(
                "Option price must be between 0 and {}",
                MAX_PRICE
            )));
        }

        let txn = self.store.begin_write()?;
        let option = {
            let groups = txn.open_table(MODIFIER_GROUPS_TABLE)?;
            let group_owned = match groups.get(group_id)? {
                Some(value) => {
                    let group: ModifierGroup = serde_json::from_slice(value.value())?;
                    group.owner_id == owner_id
                }
                None => false,
            };
            if !group_owned {
                return Err(RepoError::NotFound(format!("Group {} not found", group_id)));
            }

            let mut table = txn.open_table(MODIFIER_OPTIONS_TABLE)?;
            let id = self.store.next_sequence_txn(&txn, OPTION_ID_SEQ)?;
            let option = ModifierOption {
                id,
                owner_id,
                group_id,
                name: data.name,
                price: data.price,
                sort_order: data.sort_order.unwrap_or(0),
                created_at: now_millis(),
            };
            table.insert(id, serde_json::to_vec(&option)?.as_slice())?;
            option
        };
        txn.commit()?;
        Ok(option)
    }

    pub fn update(
        &self,
        owner_id: u64,
        id: u64,
        data: ModifierOptionUpdate,
    ) -> RepoResult<ModifierOption> {
        let txn = self.store.begin_write()?;
        let option = {
            let mut table = txn.open_table(MODIFIER_OPTIONS_TABLE)?;

            let mut option: ModifierOption = match table.get(id)? {
                Some(value) => serde_json::from_slice(value.value())?,
                None => return Err(RepoError::NotFound(format!("Option {} not found", id))),
            };
            if option.owner_id != owner_id {
                return Err(RepoError::NotFound(format!("Option {} not found", id)));
            }

            if let Some(name) = data.name {
                if name.trim().is_empty() {
                    return Err(RepoError::Validation("Option name is required".to_string()));
                }
                option.name = name;
            }
            if let Some(price) = data.price {
                if !(0.0..=MAX_PRICE).contains(&price) {
                    return Err(RepoError::Validation(format!(
                        "Option price must be between 0 and {}",
                        MAX_PRICE
                    )));
                }
                option.price = price;
            }
            if let Some(sort_order) = data.sort_order {
                option.sort_order = sort_order;
            }

            table.insert(id, serde_json::to_vec(&option)?.as_slice())?;
            option
        };
        txn.commit()?;
        Ok(option)
    }

    /// Delete an option
    ///
    /// Rejected while an active order references it.
    pub fn delete(&self, owner_id: u64, id: u64) -> RepoResult<()> {
        let txn = self.store.begin_write()?;
        {
            let mut table = txn.open_table(MODIFIER_OPTIONS_TABLE)?;

            let option: ModifierOption = match table.get(id)? {
                Some(value) => serde_json::from_slice(value.value())?,
                None => return Err(RepoError::NotFound(format!("Option {} not found", id))),
            };
            if option.owner_id != owner_id {
                return Err(RepoError::NotFound(format!("Option {} not found", id)));
            }

            if options_on_active_order(&txn, &[id])? {
                return Err(RepoError::InUse(format!(
                    "Option '{}' is referenced by an active order",
                    option.name
                )));
            }

            table.remove(id)?;
        }
        txn.commit()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::{CategoryRepository, ProductRepository};
    use shared::models::{CategoryCreate, ProductCreate};

    fn setup() -> (Store, u64) {
        let store = Store::open_in_memory().unwrap();
        let category = CategoryRepository::new(store.clone())
            .create(
                1,
                CategoryCreate {
                    name: "Mains".to_string(),
                    sort_order: None,
                },
            )
            .unwrap();
        let product = ProductRepository::new(store.clone())
            .create(
                1,
                ProductCreate {
                    name: "Burger".to_string(),
                    category_id: category.id,
                    price: 8.0,
                    description: None,
                    sort_order: None,
                },
            )
            .unwrap();
        (store, product.id)
    }

    #[test]
    fn test_group_requires_existing_product() {
        let (store, product_id) = setup();
        let repo = ModifierGroupRepository::new(store);

        let result = repo.create(
            1,
            999,
            ModifierGroupCreate {
                name: "Sauce".to_string(),
                sort_order: None,
            },
        );
        assert!(matches!(result, Err(RepoError::NotFound(_))));

        assert!(
            repo.create(
                1,
                product_id,
                ModifierGroupCreate {
                    name: "Sauce".to_string(),
                    sort_order: None,
                },
            )
            .is_ok()
        );
    }

    #[test]
    fn test_option_price_validation() {
        let (store, product_id) = setup();
        let group = ModifierGroupRepository::new(store.clone())
            .create(
                1,
                product_id,
                ModifierGroupCreate {
                    name: "Extras".to_string(),
                    sort_order: None,
                },
            )
            .unwrap();
        let repo = ModifierOptionRepository::new(store);

        let result = repo.create(
            1,
            group.id,
            ModifierOptionCreate {
                name: "Cheese".to_string(),
                price: -0.5,
                sort_order: None,
            },
        );
        assert!(matches!(result, Err(RepoError::Validation(_))));

        // Zero-price options are fine
        assert!(
            repo.create(
                1,
                group.id,
                ModifierOptionCreate {
                    name: "Plain".to_string(),
                    price: 0.0,
                    sort_order: None,
                },
            )
            .is_ok()
        );
    }

    #[test]
    fn test_group_delete_cascades_options() {
        let (store, product_id) = setup();
        let group_repo = ModifierGroupRepository::new(store.clone());
        let option_repo = ModifierOptionRepository::new(store);

        let group = group_repo
            .create(
                1,
                product_id,
                ModifierGroupCreate {
                    name: "Extras".to_string(),
                    sort_order: None,
                },
            )
            .unwrap();
        option_repo
            .create(
                1,
                group.id,
                ModifierOptionCreate {
                    name: "Cheese".to_string(),
                    price: 1.5,
                    sort_order: None,
                },
            )
            .unwrap();

        group_repo.delete(1, group.id).unwrap();
        assert!(group_repo.find_by_id(1, group.id).unwrap().is_none());
        assert!(option_repo.find_by_group(1, group.id).unwrap().is_empty());
    }
}
