//! Product Repository

use super::{RepoError, RepoResult};
use crate::db::{
    ACTIVE_ORDERS_TABLE, CATEGORIES_TABLE, MODIFIER_GROUPS_TABLE, MODIFIER_OPTIONS_TABLE,
    ORDERS_TABLE, PRODUCTS_TABLE, Store,
};
use redb::ReadableTable;
use shared::models::{
    Category, ModifierGroup, ModifierGroupWithOptions, ModifierOption, Product, ProductCreate,
    ProductUpdate, ProductWithModifiers,
};
use crate::orders::money::MAX_PRICE;
use shared::order::Order;
use shared::util::now_millis;

const ID_SEQ: &str = "product_id";

#[derive(Clone)]
pub struct ProductRepository {
    store: Store,
}

impl ProductRepository {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Find all products of an owner, in (sort_order, id) order
    pub fn find_all(&self, owner_id: u64) -> RepoResult<Vec<Product>> {
        let txn = self.store.begin_read()?;
        let table = txn.open_table(PRODUCTS_TABLE)?;

        let mut products = Vec::new();
        for row in table.iter()? {
            let (_, value) = row?;
            let product: Product = serde_json::from_slice(value.value())?;
            if product.owner_id == owner_id {
                products.push(product);
            }
        }
        products.sort_by_key(|p| (p.sort_order, p.id));
        Ok(products)
    }

    /// Find product by id, scoped to the owner
    pub fn find_by_id(&self, owner_id: u64, id: u64) -> RepoResult<Option<Product>> {
        let txn = self.store.begin_read()?;
        let table = txn.open_table(PRODUCTS_TABLE)?;

        match table.get(id)? {
            Some(value) => {
                let product: Product = serde_json::from_slice(value.value())?;
                Ok(Some(product).filter(|p| p.owner_id == owner_id))
            }
            None => Ok(None),
        }
    }

    /// Find a product joined with its category and modifier tree
    ///
    /// One read transaction, so the returned tree is a consistent view.
    /// Groups and options come back in (sort_order, id) order.
    pub fn find_with_modifiers(
        &self,
        owner_id: u64,
        id: u64,
    ) -> RepoResult<Option<ProductWithModifiers>> {
        let txn = self.store.begin_read()?;
        let products = txn.open_table(PRODUCTS_TABLE)?;

        let product: Product = match products.get(id)? {
            Some(value) => serde_json::from_slice(value.value())?,
            None => return Ok(None),
        };
        if product.owner_id != owner_id {
            return Ok(None);
        }

        let categories = txn.open_table(CATEGORIES_TABLE)?;
        let category: Category = match categories.get(product.category_id)? {
            Some(value) => serde_json::from_slice(value.value())?,
            None => {
                return Err(RepoError::Database(format!(
                    "Category {} missing for product {}",
                    product.category_id, id
                )));
            }
        };

        let groups_table = txn.open_table(MODIFIER_GROUPS_TABLE)?;
        let mut groups: Vec<ModifierGroup> = Vec::new();
        for row in groups_table.iter()? {
            let (_, value) = row?;
            let group: ModifierGroup = serde_json::from_slice(value.value())?;
            if group.product_id == id {
                groups.push(group);
            }
        }
        groups.sort_by_key(|g| (g.sort_order, g.id));

        let options_table = txn.open_table(MODIFIER_OPTIONS_TABLE)?;
        let mut all_options: Vec<ModifierOption> = Vec::new();
        for row in options_table.iter()? {
            let (_, value) = row?;
            all_options.push(serde_json::from_slice(value.value())?);
        }

        let modifier_groups = groups
            .into_iter()
            .map(|group| {
                let mut options: Vec<ModifierOption> = all_options
                    .iter()
                    .filter(|o| o.group_id == group.id)
                    .cloned()
                    .collect();
                options.sort_by_key(|o| (o.sort_order, o.id));
                ModifierGroupWithOptions { group, options }
            })
            .collect();

        Ok(Some(ProductWithModifiers {
            product,
            category,
            modifier_groups,
        }))
    }

    /// Create a new product
    pub fn create(&self, owner_id: u64, data: ProductCreate) -> RepoResult<Product> {
        if data.name.trim().is_empty() {
            return Err(RepoError::Validation("Product name is required".to_string()));
        }
        if !(0.0..=MAX_PRICE).contains(&data.price) {
            return Err(RepoError::Validation(format!(
                "Product price must be between 0 and {}",
                MAX_PRICE
            )));
        }

        let txn = self.store.begin_write()?;
        let product = {
            let categories = txn.open_table(CATEGORIES_TABLE)?;
            let category_owned = match categories.get(data.category_id)? {
                Some(value) => {
                    let category: Category = serde_json::from_slice(value.value())?;
                    category.owner_id == owner_id
                }
                None => false,
            };
            if !category_owned {
                return Err(RepoError::NotFound(format!(
                    "Category {} not found",
                    data.category_id
                )));
            }

            let mut table = txn.open_table(PRODUCTS_TABLE)?;
            let id = self.store.next_sequence_txn(&txn, ID_SEQ)?;
            let product = Product {
                id,
                owner_id,
                name: data.name,
                category_id: data.category_id,
                price: data.price,
                description: data.description,
                sort_order: data.sort_order.unwrap_or(0),
                is_active: true,
                created_at: now_millis(),
            };
            table.insert(id, serde_json::to_vec(&product)?.as_slice())?;
            product
        };
        txn.commit()?;
        Ok(product)
    }

    /// Update a product
    ///
    /// Price changes never touch existing order items; those carry their
    /// own add-time snapshot.
    pub fn update(&self, owner_id: u64, id: u64, data: ProductUpdate) -> RepoResult<Product> {
        let txn = self.store.begin_write()?;
        let product = {
            let mut table = txn.open_table(PRODUCTS_TABLE)?;

            let mut product: Product = match table.get(id)? {
                Some(value) => serde_json::from_slice(value.value())?,
                None => return Err(RepoError::NotFound(format!("Product {} not found", id))),
            };
            if product.owner_id != owner_id {
                return Err(RepoError::NotFound(format!("Product {} not found", id)));
            }

            if let Some(name) = data.name {
                if name.trim().is_empty() {
                    return Err(RepoError::Validation("Product name is required".to_string()));
                }
                product.name = name;
            }
            if let Some(price) = data.price {
                if !(0.0..=MAX_PRICE).contains(&price) {
                    return Err(RepoError::Validation(format!(
                        "Product price must be between 0 and {}",
                        MAX_PRICE
                    )));
                }
                product.price = price;
            }
            if let Some(category_id) = data.category_id {
                let categories = txn.open_table(CATEGORIES_TABLE)?;
                let category_owned = match categories.get(category_id)? {
                    Some(value) => {
                        let category: Category = serde_json::from_slice(value.value())?;
                        category.owner_id == owner_id
                    }
                    None => false,
                };
                if !category_owned {
                    return Err(RepoError::NotFound(format!(
                        "Category {} not found",
                        category_id
                    )));
                }
                product.category_id = category_id;
            }
            if let Some(description) = data.description {
                product.description = Some(description);
            }
            if let Some(sort_order) = data.sort_order {
                product.sort_order = sort_order;
            }
            if let Some(is_active) = data.is_active {
                product.is_active = is_active;
            }

            table.insert(id, serde_json::to_vec(&product)?.as_slice())?;
            product
        };
        txn.commit()?;
        Ok(product)
    }

    /// Delete a product, cascading its modifier groups and options
    ///
    /// Rejected while an active order still lists the product. Closed and
    /// canceled orders keep rendering from their own snapshots.
    pub fn delete(&self, owner_id: u64, id: u64) -> RepoResult<()> {
        let txn = self.store.begin_write()?;
        {
            let mut products = txn.open_table(PRODUCTS_TABLE)?;

            let product: Product = match products.get(id)? {
                Some(value) => serde_json::from_slice(value.value())?,
                None => return Err(RepoError::NotFound(format!("Product {} not found", id))),
            };
            if product.owner_id != owner_id {
                return Err(RepoError::NotFound(format!("Product {} not found", id)));
            }

            let active = txn.open_table(ACTIVE_ORDERS_TABLE)?;
            let orders = txn.open_table(ORDERS_TABLE)?;
            for row in active.iter()? {
                let (_, order_id) = row?;
                if let Some(value) = orders.get(order_id.value())? {
                    let order: Order = serde_json::from_slice(value.value())?;
                    if order.items.iter().any(|i| i.product_id == id) {
                        return Err(RepoError::InUse(format!(
                            "Product '{}' is on an active order",
                            product.name
                        )));
                    }
                }
            }

            let mut groups = txn.open_table(MODIFIER_GROUPS_TABLE)?;
            let mut group_ids = Vec::new();
            for row in groups.iter()? {
                let (key, value) = row?;
                let group: ModifierGroup = serde_json::from_slice(value.value())?;
                if group.product_id == id {
                    group_ids.push(key.value());
                }
            }

            let mut options = txn.open_table(MODIFIER_OPTIONS_TABLE)?;
            let mut option_ids = Vec::new();
            for row in options.iter()? {
                let (key, value) = row?;
                let option: ModifierOption = serde_json::from_slice(value.value())?;
                if group_ids.contains(&option.group_id) {
                    option_ids.push(key.value());
                }
            }

            for option_id in option_ids {
                options.remove(option_id)?;
            }
            for group_id in group_ids {
                groups.remove(group_id)?;
            }
            products.remove(id)?;
        }
        txn.commit()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::{
        CategoryRepository, ModifierGroupRepository, ModifierOptionRepository,
    };
    use shared::models::{CategoryCreate, ModifierGroupCreate, ModifierOptionCreate};

    fn setup() -> (Store, ProductRepository, u64) {
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
        (store.clone(), ProductRepository::new(store), category.id)
    }

    fn pizza(category_id: u64) -> ProductCreate {
        ProductCreate {
            name: "Pizza".to_string(),
            category_id,
            price: 10.0,
            description: None,
            sort_order: None,
        }
    }

    #[test]
    fn test_create_requires_existing_category() {
        let (_store, repo, category_id) = setup();

        let result = repo.create(
            1,
            ProductCreate {
                name: "Ghost".to_string(),
                category_id: 999,
                price: 1.0,
                description: None,
                sort_order: None,
            },
        );
        assert!(matches!(result, Err(RepoError::NotFound(_))));

        assert!(repo.create(1, pizza(category_id)).is_ok());
    }

    #[test]
    fn test_price_validation() {
        let (_store, repo, category_id) = setup();

        let mut data = pizza(category_id);
        data.price = -1.0;
        assert!(matches!(
            repo.create(1, data),
            Err(RepoError::Validation(_))
        ));

        let mut data = pizza(category_id);
        data.price = f64::NAN;
        assert!(matches!(
            repo.create(1, data),
            Err(RepoError::Validation(_))
        ));

        let mut data = pizza(category_id);
        data.price = MAX_PRICE + 1.0;
        assert!(matches!(
            repo.create(1, data),
            Err(RepoError::Validation(_))
        ));
    }

    #[test]
    fn test_find_with_modifiers_ordering() {
        let (store, repo, category_id) = setup();
        let product = repo.create(1, pizza(category_id)).unwrap();

        let group_repo = ModifierGroupRepository::new(store.clone());
        let option_repo = ModifierOptionRepository::new(store);

        let sauce = group_repo
            .create(
                1,
                product.id,
                ModifierGroupCreate {
                    name: "Sauce".to_string(),
                    sort_order: Some(2),
                },
            )
            .unwrap();
        let size = group_repo
            .create(
                1,
                product.id,
                ModifierGroupCreate {
                    name: "Size".to_string(),
                    sort_order: Some(1),
                },
            )
            .unwrap();
        option_repo
            .create(
                1,
                sauce.id,
                ModifierOptionCreate {
                    name: "Hot".to_string(),
                    price: 0.5,
                    sort_order: Some(2),
                },
            )
            .unwrap();
        option_repo
            .create(
                1,
                sauce.id,
                ModifierOptionCreate {
                    name: "Mild".to_string(),
                    price: 0.0,
                    sort_order: Some(1),
                },
            )
            .unwrap();

        let full = repo.find_with_modifiers(1, product.id).unwrap().unwrap();
        assert_eq!(full.category.name, "Mains");
        let group_names: Vec<&str> = full
            .modifier_groups
            .iter()
            .map(|g| g.group.name.as_str())
            .collect();
        assert_eq!(group_names, vec!["Size", "Sauce"]);
        let option_names: Vec<&str> = full.modifier_groups[1]
            .options
            .iter()
            .map(|o| o.name.as_str())
            .collect();
        assert_eq!(option_names, vec!["Mild", "Hot"]);
    }

    #[test]
    fn test_delete_cascades_modifiers() {
        let (store, repo, category_id) = setup();
        let product = repo.create(1, pizza(category_id)).unwrap();

        let group_repo = ModifierGroupRepository::new(store.clone());
        let option_repo = ModifierOptionRepository::new(store);
        let group = group_repo
            .create(
                1,
                product.id,
                ModifierGroupCreate {
                    name: "Sauce".to_string(),
                    sort_order: None,
                },
            )
            .unwrap();
        option_repo
            .create(
                1,
                group.id,
                ModifierOptionCreate {
                    name: "Hot".to_string(),
                    price: 0.5,
                    sort_order: None,
                },
            )
            .unwrap();

        repo.delete(1, product.id).unwrap();

        assert!(repo.find_by_id(1, product.id).unwrap().is_none());
        assert!(group_repo.find_by_product(1, product.id).unwrap().is_empty());
        assert!(option_repo.find_by_group(1, group.id).unwrap().is_empty());
    }
}
