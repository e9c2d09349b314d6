use super::*;

#[test]
fn test_open_order_claims_table() {
    let (manager, _bus, store) = create_test_manager();
    let table_id = seed_table(&store, "Table 5");

    let order = open_order_on(&manager, table_id);

    assert_eq!(order.status, OrderStatus::Open);
    assert_eq!(order.total, 0.0);
    assert_eq!(order.table_name, "Table 5");
    assert_eq!(order.staff_name, STAFF_NAME);
    assert_eq!(table_status(&store, table_id), TableStatus::Occupied);
    assert_eq!(
        store.find_active_order_for_table(table_id).unwrap(),
        Some(order.id)
    );
}

#[test]
fn test_second_order_on_occupied_table_rejected() {
    let (manager, _bus, store) = create_test_manager();
    let table_id = seed_table(&store, "Table 5");
    open_order_on(&manager, table_id);

    let err = manager
        .open_order(OWNER, STAFF_ID, STAFF_NAME, table_id)
        .unwrap_err();

    assert!(matches!(err, OrderError::TableOccupied(id) if id == table_id));
    // The first claim is untouched
    assert_eq!(table_status(&store, table_id), TableStatus::Occupied);
}

#[test]
fn test_open_order_on_unknown_table() {
    let (manager, _bus, _store) = create_test_manager();
    let err = manager
        .open_order(OWNER, STAFF_ID, STAFF_NAME, 999)
        .unwrap_err();
    assert!(matches!(err, OrderError::TableNotFound(999)));
}

#[test]
fn test_add_item_with_modifiers_computes_total() {
    let (manager, _bus, store) = create_test_manager();
    let table_id = seed_table(&store, "T1");
    let product_id = seed_product(&store, "Burger", 10.0);
    let cheese = seed_option(&store, product_id, "Extras", "Extra cheese", 1.5);
    let bacon = seed_option(&store, product_id, "Extras", "Bacon", 0.5);

    let order = open_order_on(&manager, table_id);
    let order = manager
        .add_item(
            OWNER,
            &order.id,
            &OrderItemAdd {
                product_id,
                quantity: 2,
                option_ids: vec![cheese, bacon],
                notes: Some("no onion".to_string()),
            },
        )
        .unwrap();

    // (10.00 + 1.50 + 0.50) × 2
    assert_eq!(order.total, 24.0);
    assert_eq!(order.items.len(), 1);
    assert_eq!(order.items[0].selected_modifiers.len(), 2);
    assert_eq!(order.items[0].notes.as_deref(), Some("no onion"));
}

#[test]
fn test_item_snapshots_survive_catalog_edits() {
    let (manager, _bus, store) = create_test_manager();
    let table_id = seed_table(&store, "T1");
    let product_id = seed_product(&store, "Burger", 10.0);

    let order = open_order_on(&manager, table_id);
    let order = add_simple_item(&manager, &order.id, product_id, 1);
    assert_eq!(order.total, 10.0);

    // Reprice the product after the item was added
    ProductRepository::new(store.clone())
        .update(
            OWNER,
            product_id,
            ProductUpdate {
                name: None,
                category_id: None,
                price: Some(99.0),
                description: None,
                sort_order: None,
                is_active: None,
            },
        )
        .unwrap();

    // Existing line keeps the add-time price; a new line gets the new one
    let order = add_simple_item(&manager, &order.id, product_id, 1);
    assert_eq!(order.items[0].price, 10.0);
    assert_eq!(order.items[1].price, 99.0);
    assert_eq!(order.total, 109.0);
}

#[test]
fn test_add_item_requires_open_status() {
    let (manager, _bus, store) = create_test_manager();
    let table_id = seed_table(&store, "T1");
    let product_id = seed_product(&store, "Burger", 10.0);

    let order = open_order_on(&manager, table_id);
    add_simple_item(&manager, &order.id, product_id, 1);
    manager.send_to_kitchen(OWNER, &order.id).unwrap();

    let err = manager
        .add_item(
            OWNER,
            &order.id,
            &OrderItemAdd {
                product_id,
                quantity: 1,
                option_ids: vec![],
                notes: None,
            },
        )
        .unwrap_err();

    assert!(matches!(
        err,
        OrderError::OrderNotEditable(OrderStatus::Cooking)
    ));
}

#[test]
fn test_add_item_unknown_product() {
    let (manager, _bus, store) = create_test_manager();
    let table_id = seed_table(&store, "T1");
    let order = open_order_on(&manager, table_id);

    let err = manager
        .add_item(
            OWNER,
            &order.id,
            &OrderItemAdd {
                product_id: 404,
                quantity: 1,
                option_ids: vec![],
                notes: None,
            },
        )
        .unwrap_err();

    assert!(matches!(err, OrderError::ProductNotFound(404)));
}

#[test]
fn test_add_item_inactive_product_rejected() {
    let (manager, _bus, store) = create_test_manager();
    let table_id = seed_table(&store, "T1");
    let product_id = seed_product(&store, "Seasonal special", 15.0);
    deactivate_product(&store, product_id);

    let order = open_order_on(&manager, table_id);
    let err = manager
        .add_item(
            OWNER,
            &order.id,
            &OrderItemAdd {
                product_id,
                quantity: 1,
                option_ids: vec![],
                notes: None,
            },
        )
        .unwrap_err();

    assert!(matches!(err, OrderError::ProductUnavailable(id) if id == product_id));
}

#[test]
fn test_modifier_from_another_product_rejected() {
    let (manager, _bus, store) = create_test_manager();
    let table_id = seed_table(&store, "T1");
    let burger = seed_product(&store, "Burger", 10.0);
    let pizza = seed_product(&store, "Pizza", 12.0);
    let pizza_option = seed_option(&store, pizza, "Size", "Large", 2.0);

    let order = open_order_on(&manager, table_id);
    let err = manager
        .add_item(
            OWNER,
            &order.id,
            &OrderItemAdd {
                product_id: burger,
                quantity: 1,
                option_ids: vec![pizza_option],
                notes: None,
            },
        )
        .unwrap_err();

    assert!(matches!(err, OrderError::ModifierNotFound(id) if id == pizza_option));
}

#[test]
fn test_quantity_zero_removes_item() {
    let (manager, _bus, store) = create_test_manager();
    let table_id = seed_table(&store, "T1");
    let product_id = seed_product(&store, "Burger", 10.0);

    let order = open_order_on(&manager, table_id);
    let order = add_simple_item(&manager, &order.id, product_id, 2);
    let item_id = order.items[0].id.clone();
    assert_eq!(order.total, 20.0);

    let order = manager
        .update_item_quantity(OWNER, &order.id, &item_id, 0)
        .unwrap();

    assert!(order.items.is_empty());
    assert_eq!(order.total, 0.0);
}

#[test]
fn test_update_quantity_recomputes_total() {
    let (manager, _bus, store) = create_test_manager();
    let table_id = seed_table(&store, "T1");
    let product_id = seed_product(&store, "Burger", 10.0);
    let cheese = seed_option(&store, product_id, "Extras", "Cheese", 1.5);

    let order = open_order_on(&manager, table_id);
    let order = manager
        .add_item(
            OWNER,
            &order.id,
            &OrderItemAdd {
                product_id,
                quantity: 1,
                option_ids: vec![cheese],
                notes: None,
            },
        )
        .unwrap();
    let item_id = order.items[0].id.clone();
    assert_eq!(order.total, 11.5);

    let order = manager
        .update_item_quantity(OWNER, &order.id, &item_id, 3)
        .unwrap();
    assert_eq!(order.total, 34.5);

    // Idempotent: same quantity again gives the same total
    let order = manager
        .update_item_quantity(OWNER, &order.id, &item_id, 3)
        .unwrap();
    assert_eq!(order.total, 34.5);
}

#[test]
fn test_remove_item_recomputes_total() {
    let (manager, _bus, store) = create_test_manager();
    let table_id = seed_table(&store, "T1");
    let burger = seed_product(&store, "Burger", 10.0);
    let drink = seed_product(&store, "Cola", 2.5);

    let order = open_order_on(&manager, table_id);
    let order = add_simple_item(&manager, &order.id, burger, 1);
    let burger_line = order.items[0].id.clone();
    let order = add_simple_item(&manager, &order.id, drink, 2);
    assert_eq!(order.total, 15.0);

    let order = manager
        .remove_item(OWNER, &order.id, &burger_line)
        .unwrap();
    assert_eq!(order.items.len(), 1);
    assert!(order.find_item(&burger_line).is_none());
    assert_eq!(order.total, 5.0);
}

#[test]
fn test_update_unknown_item() {
    let (manager, _bus, store) = create_test_manager();
    let table_id = seed_table(&store, "T1");
    let order = open_order_on(&manager, table_id);

    let err = manager
        .update_item_quantity(OWNER, &order.id, "ghost", 2)
        .unwrap_err();
    assert!(matches!(err, OrderError::ItemNotFound(_)));

    let err = manager.remove_item(OWNER, &order.id, "ghost").unwrap_err();
    assert!(matches!(err, OrderError::ItemNotFound(_)));
}

#[test]
fn test_cross_owner_order_invisible() {
    let (manager, _bus, store) = create_test_manager();
    let table_id = seed_table(&store, "T1");
    let product_id = seed_product(&store, "Burger", 10.0);
    let order = open_order_on(&manager, table_id);

    let other_owner = 2;
    assert!(matches!(
        manager.get_order(other_owner, &order.id).unwrap_err(),
        OrderError::OrderNotFound(_)
    ));
    assert!(matches!(
        manager
            .add_item(
                other_owner,
                &order.id,
                &OrderItemAdd {
                    product_id,
                    quantity: 1,
                    option_ids: vec![],
                    notes: None,
                },
            )
            .unwrap_err(),
        OrderError::OrderNotFound(_)
    ));
}

#[test]
fn test_list_active_excludes_terminal_orders() {
    let (manager, _bus, store) = create_test_manager();
    let t1 = seed_table(&store, "T1");
    let t2 = seed_table(&store, "T2");
    let t3 = seed_table(&store, "T3");

    let first = open_order_on(&manager, t1);
    let second = open_order_on(&manager, t2);
    let third = open_order_on(&manager, t3);
    manager.cancel_order(OWNER, &second.id).unwrap();

    let active = manager.list_active(OWNER).unwrap();
    let ids: Vec<&str> = active.iter().map(|order| order.id.as_str()).collect();
    assert_eq!(ids, vec![first.id.as_str(), third.id.as_str()]);
}
