use super::*;
use crate::db::repository::{
    CategoryRepository, DiningTableRepository, InvoiceRepository, ModifierGroupRepository,
    ModifierOptionRepository, ProductRepository, SettingsRepository,
};
use crate::message::MessageBus;
use shared::message::{EventType, TOPIC_KITCHEN_EVENTS, TOPIC_TABLE_EVENTS, TOPIC_WAITER_EVENTS};
use shared::models::category::CategoryCreate;
use shared::models::dining_table::DiningTableCreate;
use shared::models::modifier::{ModifierGroupCreate, ModifierOptionCreate};
use shared::models::product::{ProductCreate, ProductUpdate};
use shared::models::settings::SettingsUpdate;
use shared::order::SplitGroup;

const OWNER: u64 = 1;
const STAFF_ID: u64 = 10;
const STAFF_NAME: &str = "Maria";

fn create_test_manager() -> (OrdersManager, Arc<MessageBus>, Store) {
    let store = Store::open_in_memory().unwrap();
    let bus = Arc::new(MessageBus::new());
    let manager = OrdersManager::new(store.clone(), bus.clone());
    (manager, bus, store)
}

// ========================================================================
// Catalog seeding
// ========================================================================

fn seed_table(store: &Store, name: &str) -> u64 {
    DiningTableRepository::new(store.clone())
        .create(
            OWNER,
            DiningTableCreate {
                name: name.to_string(),
            },
        )
        .unwrap()
        .id
}

fn seed_product(store: &Store, name: &str, price: f64) -> u64 {
    let categories = CategoryRepository::new(store.clone());
    let category_id = match categories.find_all(OWNER).unwrap().into_iter().next() {
        Some(category) => category.id,
        None => {
            categories
                .create(
                    OWNER,
                    CategoryCreate {
                        name: "Food".to_string(),
                        sort_order: None,
                    },
                )
                .unwrap()
                .id
        }
    };
    ProductRepository::new(store.clone())
        .create(
            OWNER,
            ProductCreate {
                name: name.to_string(),
                category_id,
                price,
                description: None,
                sort_order: None,
            },
        )
        .unwrap()
        .id
}

fn seed_option(
    store: &Store,
    product_id: u64,
    group_name: &str,
    option_name: &str,
    price: f64,
) -> u64 {
    let group = ModifierGroupRepository::new(store.clone())
        .create(
            OWNER,
            product_id,
            ModifierGroupCreate {
                name: group_name.to_string(),
                sort_order: None,
            },
        )
        .unwrap();
    ModifierOptionRepository::new(store.clone())
        .create(
            OWNER,
            group.id,
            ModifierOptionCreate {
                name: option_name.to_string(),
                price,
                sort_order: None,
            },
        )
        .unwrap()
        .id
}

fn set_rates(store: &Store, tax_rate: f64, service_charge_rate: f64) {
    SettingsRepository::new(store.clone())
        .update(SettingsUpdate {
            restaurant_name: None,
            restaurant_address: None,
            tax_id: None,
            tax_rate: Some(tax_rate),
            service_charge_rate: Some(service_charge_rate),
        })
        .unwrap();
}

fn deactivate_product(store: &Store, product_id: u64) {
    ProductRepository::new(store.clone())
        .update(
            OWNER,
            product_id,
            ProductUpdate {
                name: None,
                category_id: None,
                price: None,
                description: None,
                sort_order: None,
                is_active: Some(false),
            },
        )
        .unwrap();
}

// ========================================================================
// Order shortcuts
// ========================================================================

fn open_order_on(manager: &OrdersManager, table_id: u64) -> Order {
    manager
        .open_order(OWNER, STAFF_ID, STAFF_NAME, table_id)
        .unwrap()
}

fn add_simple_item(
    manager: &OrdersManager,
    order_id: &str,
    product_id: u64,
    quantity: i32,
) -> Order {
    manager
        .add_item(
            OWNER,
            order_id,
            &OrderItemAdd {
                product_id,
                quantity,
                option_ids: vec![],
                notes: None,
            },
        )
        .unwrap()
}

fn table_status(store: &Store, table_id: u64) -> TableStatus {
    DiningTableRepository::new(store.clone())
        .find_by_id(OWNER, table_id)
        .unwrap()
        .unwrap()
        .status
}

fn split_group(label: Option<&str>, item_ids: &[&str]) -> SplitGroup {
    SplitGroup {
        label: label.map(|s| s.to_string()),
        item_ids: item_ids.iter().map(|s| s.to_string()).collect(),
    }
}

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 0.02,
        "expected {} to be within a cent of {}",
        actual,
        expected
    );
}

mod test_core;
