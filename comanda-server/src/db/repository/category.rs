//! Category Repository

use super::{RepoError, RepoResult};
use crate::db::{CATEGORIES_TABLE, PRODUCTS_TABLE, Store};
use redb::ReadableTable;
use shared::models::{Category, CategoryCreate, CategoryUpdate};
use shared::util::now_millis;

const ID_SEQ: &str = "category_id";

#[derive(Clone)]
pub struct CategoryRepository {
    store: Store,
}

impl CategoryRepository {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Find all categories of an owner, in (sort_order, id) order
    pub fn find_all(&self, owner_id: u64) -> RepoResult<Vec<Category>> {
        let txn = self.store.begin_read()?;
        let table = txn.open_table(CATEGORIES_TABLE)?;

        let mut categories = Vec::new();
        for row in table.iter()? {
            let (_, value) = row?;
            let category: Category = serde_json::from_slice(value.value())?;
            if category.owner_id == owner_id {
                categories.push(category);
            }
        }
        categories.sort_by_key(|c| (c.sort_order, c.id));
        Ok(categories)
    }

    /// Find category by id, scoped to the owner
    pub fn find_by_id(&self, owner_id: u64, id: u64) -> RepoResult<Option<Category>> {
        let txn = self.store.begin_read()?;
        let table = txn.open_table(CATEGORIES_TABLE)?;

        match table.get(id)? {
            Some(value) => {
                let category: Category = serde_json::from_slice(value.value())?;
                Ok(Some(category).filter(|c| c.owner_id == owner_id))
            }
            None => Ok(None),
        }
    }

    /// Create a new category
    pub fn create(&self, owner_id: u64, data: CategoryCreate) -> RepoResult<Category> {
        if data.name.trim().is_empty() {
            return Err(RepoError::Validation("Category name is required".to_string()));
        }

        let txn = self.store.begin_write()?;
        let category = {
            let mut table = txn.open_table(CATEGORIES_TABLE)?;

            // Duplicate name check inside the write transaction: redb writers
            // serialize, so two concurrent creates cannot both pass.
            for row in table.iter()? {
                let (_, value) = row?;
                let existing: Category = serde_json::from_slice(value.value())?;
                if existing.owner_id == owner_id && existing.name == data.name {
                    return Err(RepoError::Duplicate(format!(
                        "Category '{}' already exists",
                        data.name
                    )));
                }
            }

            let id = self.store.next_sequence_txn(&txn, ID_SEQ)?;
            let category = Category {
                id,
                owner_id,
                name: data.name,
                sort_order: data.sort_order.unwrap_or(0),
                created_at: now_millis(),
            };
            table.insert(id, serde_json::to_vec(&category)?.as_slice())?;
            category
        };
        txn.commit()?;
        Ok(category)
    }

    /// Update a category
    pub fn update(&self, owner_id: u64, id: u64, data: CategoryUpdate) -> RepoResult<Category> {
        let txn = self.store.begin_write()?;
        let category = {
            let mut table = txn.open_table(CATEGORIES_TABLE)?;

            let mut category: Category = match table.get(id)? {
                Some(value) => serde_json::from_slice(value.value())?,
                None => return Err(RepoError::NotFound(format!("Category {} not found", id))),
            };
            if category.owner_id != owner_id {
                return Err(RepoError::NotFound(format!("Category {} not found", id)));
            }

            if let Some(name) = data.name {
                if name.trim().is_empty() {
                    return Err(RepoError::Validation("Category name is required".to_string()));
                }
                for row in table.iter()? {
                    let (key, value) = row?;
                    if key.value() == id {
                        continue;
                    }
                    let existing: Category = serde_json::from_slice(value.value())?;
                    if existing.owner_id == owner_id && existing.name == name {
                        return Err(RepoError::Duplicate(format!(
                            "Category '{}' already exists",
                            name
                        )));
                    }
                }
                category.name = name;
            }
            if let Some(sort_order) = data.sort_order {
                category.sort_order = sort_order;
            }

            table.insert(id, serde_json::to_vec(&category)?.as_slice())?;
            category
        };
        txn.commit()?;
        Ok(category)
    }

    /// Delete a category
    ///
    /// Rejected while any product still references it; historical order
    /// integrity relies on snapshots, catalog integrity on this guard.
    pub fn delete(&self, owner_id: u64, id: u64) -> RepoResult<()> {
        let txn = self.store.begin_write()?;
        {
            let mut table = txn.open_table(CATEGORIES_TABLE)?;

            let category: Category = match table.get(id)? {
                Some(value) => serde_json::from_slice(value.value())?,
                None => return Err(RepoError::NotFound(format!("Category {} not found", id))),
            };
            if category.owner_id != owner_id {
                return Err(RepoError::NotFound(format!("Category {} not found", id)));
            }

            let products = txn.open_table(PRODUCTS_TABLE)?;
            for row in products.iter()? {
                let (_, value) = row?;
                let product: shared::models::Product = serde_json::from_slice(value.value())?;
                if product.category_id == id {
                    return Err(RepoError::InUse(format!(
                        "Category '{}' still has products",
                        category.name
                    )));
                }
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

    fn repo() -> CategoryRepository {
        CategoryRepository::new(Store::open_in_memory().unwrap())
    }

    #[test]
    fn test_create_and_find() {
        let repo = repo();
        let created = repo
            .create(
                1,
                CategoryCreate {
                    name: "Starters".to_string(),
                    sort_order: Some(2),
                },
            )
            .unwrap();
        assert_eq!(created.id, 1);
        assert_eq!(created.sort_order, 2);

        let found = repo.find_by_id(1, created.id).unwrap().unwrap();
        assert_eq!(found, created);
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let repo = repo();
        repo.create(
            1,
            CategoryCreate {
                name: "Mains".to_string(),
                sort_order: None,
            },
        )
        .unwrap();

        let result = repo.create(
            1,
            CategoryCreate {
                name: "Mains".to_string(),
                sort_order: None,
            },
        );
        assert!(matches!(result, Err(RepoError::Duplicate(_))));
    }

    #[test]
    fn test_cross_owner_invisible() {
        let repo = repo();
        let created = repo
            .create(
                1,
                CategoryCreate {
                    name: "Drinks".to_string(),
                    sort_order: None,
                },
            )
            .unwrap();

        // Another owner sees nothing, not a permission error
        assert!(repo.find_by_id(2, created.id).unwrap().is_none());
        assert!(repo.find_all(2).unwrap().is_empty());
    }

    #[test]
    fn test_find_all_sorted() {
        let repo = repo();
        for (name, sort) in [("C", 3), ("A", 1), ("B", 1)] {
            repo.create(
                1,
                CategoryCreate {
                    name: name.to_string(),
                    sort_order: Some(sort),
                },
            )
            .unwrap();
        }

        let all = repo.find_all(1).unwrap();
        let names: Vec<&str> = all.iter().map(|c| c.name.as_str()).collect();
        // Equal sort_order falls back to creation (id) order
        assert_eq!(names, vec!["A", "B", "C"]);
    }
}
