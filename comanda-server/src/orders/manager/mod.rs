//! OrdersManager - order lifecycle transactions
//!
//! Every operation is one redb write transaction over the shared store:
//! precondition checks, the mutation, the derived-state updates (order
//! total, table claim index, table status) and any invoice all commit or
//! roll back together. Events go out strictly after commit, so a consumer
//! can never observe a notification for state that did not happen.
//!
//! ```text
//! operation(args)
//!     ├─ 1. Begin write transaction (serialized by redb)
//!     ├─ 2. Load + validate (status edges, ownership, catalog refs)
//!     ├─ 3. Mutate order / items, recompute total from the full list
//!     ├─ 4. Side tables: claim index, table status, invoices, sequences
//!     ├─ 5. Commit
//!     └─ 6. Publish event(s)
//! ```

mod error;
pub use error::*;

#[cfg(test)]
mod tests;

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Datelike, Utc};
use redb::{ReadableTable, WriteTransaction};
use uuid::Uuid;

use shared::message::{
    InvoiceIssuedPayload, KitchenTicketPayload, PosEvent, ReadyAlertPayload, TableChangedPayload,
};
use shared::models::dining_table::DiningTable;
use shared::models::invoice::Invoice;
use shared::models::modifier::{ModifierGroup, ModifierOption};
use shared::models::product::Product;
use shared::models::settings::RestaurantSettings;
use shared::order::{
    ModifierSnapshot, Order, OrderItem, OrderItemAdd, OrderStatus, SplitPlan, TableStatus,
    validate_partition,
};
use shared::util::now_millis;

use super::{invoice, money};
use crate::db::{
    ACTIVE_ORDERS_TABLE, DINING_TABLES_TABLE, INVOICES_TABLE, MODIFIER_GROUPS_TABLE,
    MODIFIER_OPTIONS_TABLE, ORDERS_TABLE, PRODUCTS_TABLE, SETTINGS_KEY, SETTINGS_TABLE, Store,
};
use crate::message::EventPublisher;

/// Sequence name for invoice row ids (invoice numbers use per-year names)
const INVOICE_ID_SEQ: &str = "invoice_id";

/// Order lifecycle coordinator
///
/// Shares the [`Store`] with the repositories; publishes post-commit
/// events through the [`EventPublisher`] seam.
pub struct OrdersManager {
    store: Store,
    bus: Arc<dyn EventPublisher>,
}

impl std::fmt::Debug for OrdersManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrdersManager")
            .field("store", &self.store)
            .field("bus", &"<EventPublisher>")
            .finish()
    }
}

impl OrdersManager {
    pub fn new(store: Store, bus: Arc<dyn EventPublisher>) -> Self {
        tracing::info!("Orders manager started");
        Self { store, bus }
    }

    fn publish(&self, event: PosEvent) {
        self.bus.publish(event.topic(), event);
    }

    // ========== Reads ==========

    pub fn get_order(&self, owner_id: u64, order_id: &str) -> OrderResult<Order> {
        self.store
            .get_order(order_id)?
            .filter(|order| order.owner_id == owner_id)
            .ok_or_else(|| OrderError::OrderNotFound(order_id.to_string()))
    }

    /// All non-terminal orders, oldest first
    pub fn list_active(&self, owner_id: u64) -> OrderResult<Vec<Order>> {
        let mut orders: Vec<Order> = self
            .store
            .active_orders()?
            .into_iter()
            .filter(|order| order.owner_id == owner_id)
            .collect();
        orders.sort_by_key(|order| order.created_at);
        Ok(orders)
    }

    // ========== Lifecycle ==========

    /// Claim a table and open an OPEN order on it
    ///
    /// The AVAILABLE check and the claim are one write transaction: two
    /// concurrent creates serialize on redb's single writer and the second
    /// one sees the claim index entry.
    pub fn open_order(
        &self,
        owner_id: u64,
        staff_id: u64,
        staff_name: &str,
        table_id: u64,
    ) -> OrderResult<Order> {
        let now = now_millis();
        let txn = self.store.begin_write()?;
        let order = {
            let mut tables = txn.open_table(DINING_TABLES_TABLE)?;
            let mut active = txn.open_table(ACTIVE_ORDERS_TABLE)?;

            let mut table: DiningTable = match tables.get(table_id)? {
                Some(value) => serde_json::from_slice(value.value())?,
                None => return Err(OrderError::TableNotFound(table_id)),
            };
            if table.owner_id != owner_id {
                return Err(OrderError::TableNotFound(table_id));
            }
            if active.get(table_id)?.is_some() {
                return Err(OrderError::TableOccupied(table_id));
            }

            let order = Order {
                id: Uuid::new_v4().to_string(),
                table_id,
                table_name: table.name.clone(),
                staff_id,
                staff_name: staff_name.to_string(),
                owner_id,
                status: OrderStatus::Open,
                items: Vec::new(),
                total: 0.0,
                sent_to_kitchen_at: None,
                created_at: now,
                updated_at: now,
                closed_at: None,
            };

            active.insert(table_id, order.id.as_str())?;
            table.status = TableStatus::Occupied;
            tables.insert(table_id, serde_json::to_vec(&table)?.as_slice())?;
            order
        };
        Self::store_order(&txn, &order)?;
        txn.commit()?;

        self.publish(PosEvent::table_changed(&TableChangedPayload {
            table_id,
            status: TableStatus::Occupied,
        }));
        tracing::info!(order_id = %order.id, table_id, staff_id, "Order opened");
        Ok(order)
    }

    /// Add a line to an OPEN order
    ///
    /// The product and option rows are read fresh inside this transaction
    /// and snapshotted by value into the item.
    pub fn add_item(&self, owner_id: u64, order_id: &str, req: &OrderItemAdd) -> OrderResult<Order> {
        if req.quantity <= 0 || req.quantity > money::MAX_QUANTITY {
            return Err(OrderError::InvalidQuantity(req.quantity));
        }

        let now = now_millis();
        let txn = self.store.begin_write()?;
        let mut order = Self::load_order(&txn, owner_id, order_id)?;
        if order.status != OrderStatus::Open {
            return Err(OrderError::OrderNotEditable(order.status));
        }

        let item = Self::snapshot_item(&txn, owner_id, req, now)?;
        order.items.push(item);
        order.total = money::compute_total(&order.items);
        order.updated_at = now;
        Self::store_order(&txn, &order)?;
        txn.commit()?;

        tracing::debug!(order_id, total = order.total, "Item added");
        Ok(order)
    }

    /// Change a line's quantity; zero or below removes the line
    pub fn update_item_quantity(
        &self,
        owner_id: u64,
        order_id: &str,
        item_id: &str,
        quantity: i32,
    ) -> OrderResult<Order> {
        if quantity > money::MAX_QUANTITY {
            return Err(OrderError::InvalidQuantity(quantity));
        }

        let now = now_millis();
        let txn = self.store.begin_write()?;
        let mut order = Self::load_order(&txn, owner_id, order_id)?;
        if order.status != OrderStatus::Open {
            return Err(OrderError::OrderNotEditable(order.status));
        }

        let idx = order
            .items
            .iter()
            .position(|item| item.id == item_id)
            .ok_or_else(|| OrderError::ItemNotFound(item_id.to_string()))?;

        if quantity <= 0 {
            order.items.remove(idx);
        } else {
            order.items[idx].quantity = quantity;
        }
        order.total = money::compute_total(&order.items);
        order.updated_at = now;
        Self::store_order(&txn, &order)?;
        txn.commit()?;

        tracing::debug!(order_id, item_id, quantity, total = order.total, "Item quantity updated");
        Ok(order)
    }

    /// Remove a line from an OPEN order
    pub fn remove_item(&self, owner_id: u64, order_id: &str, item_id: &str) -> OrderResult<Order> {
        let now = now_millis();
        let txn = self.store.begin_write()?;
        let mut order = Self::load_order(&txn, owner_id, order_id)?;
        if order.status != OrderStatus::Open {
            return Err(OrderError::OrderNotEditable(order.status));
        }

        let idx = order
            .items
            .iter()
            .position(|item| item.id == item_id)
            .ok_or_else(|| OrderError::ItemNotFound(item_id.to_string()))?;
        order.items.remove(idx);
        order.total = money::compute_total(&order.items);
        order.updated_at = now;
        Self::store_order(&txn, &order)?;
        txn.commit()?;

        tracing::debug!(order_id, item_id, total = order.total, "Item removed");
        Ok(order)
    }

    /// Route the order to a status along a legal edge
    ///
    /// Terminal targets delegate to [`Self::close_order`] /
    /// [`Self::cancel_order`], so the invoice and table side effects can
    /// never be skipped by going through the bare transition endpoint.
    pub fn transition(
        &self,
        owner_id: u64,
        order_id: &str,
        next: OrderStatus,
    ) -> OrderResult<Order> {
        match next {
            OrderStatus::Cooking => self.send_to_kitchen(owner_id, order_id),
            OrderStatus::Ready => self.mark_ready(owner_id, order_id),
            OrderStatus::Delivered => self.mark_delivered(owner_id, order_id),
            OrderStatus::Open => self.pull_back(owner_id, order_id),
            OrderStatus::Closed => self
                .close_order(owner_id, order_id)
                .map(|(order, _)| order),
            OrderStatus::Canceled => self.cancel_order(owner_id, order_id),
        }
    }

    /// OPEN → COOKING (also COOKING after a pull-back)
    ///
    /// Publishes a kitchen ticket carrying the complete order so displays
    /// render without a follow-up fetch. A send after the pull-back edit
    /// is flagged as a re-send of the full updated list, never a delta.
    pub fn send_to_kitchen(&self, owner_id: u64, order_id: &str) -> OrderResult<Order> {
        let now = now_millis();
        let txn = self.store.begin_write()?;
        let mut order = Self::load_order(&txn, owner_id, order_id)?;
        if !order.status.can_transition_to(OrderStatus::Cooking) {
            return Err(OrderError::InvalidTransition {
                from: order.status,
                to: OrderStatus::Cooking,
            });
        }

        let resend = order.sent_to_kitchen_at.is_some();
        if !resend {
            order.sent_to_kitchen_at = Some(now);
        }
        order.status = OrderStatus::Cooking;
        order.updated_at = now;
        Self::store_order(&txn, &order)?;
        txn.commit()?;

        let payload = KitchenTicketPayload {
            order: order.clone(),
        };
        let event = if resend {
            PosEvent::ticket_resend(&payload)
        } else {
            PosEvent::ticket_new(&payload)
        };
        self.publish(event);
        tracing::info!(order_id, resend, items = order.items.len(), "Order sent to kitchen");
        Ok(order)
    }

    /// COOKING → READY; alerts the waiter topic
    pub fn mark_ready(&self, owner_id: u64, order_id: &str) -> OrderResult<Order> {
        let order = self.step_status(owner_id, order_id, OrderStatus::Ready)?;
        self.publish(PosEvent::order_ready(&ReadyAlertPayload {
            table_id: order.table_id,
            table_name: order.table_name.clone(),
        }));
        tracing::info!(order_id, table = %order.table_name, "Order ready for pickup");
        Ok(order)
    }

    /// READY → DELIVERED
    pub fn mark_delivered(&self, owner_id: u64, order_id: &str) -> OrderResult<Order> {
        self.step_status(owner_id, order_id, OrderStatus::Delivered)
    }

    /// COOKING → OPEN: pull a kitchen-routed order back for edits
    ///
    /// `sent_to_kitchen_at` stays set, so the next kitchen send is flagged
    /// as a re-send.
    pub fn pull_back(&self, owner_id: u64, order_id: &str) -> OrderResult<Order> {
        self.step_status(owner_id, order_id, OrderStatus::Open)
    }

    /// Close the order with one invoice (quick-checkout shortcut: legal
    /// from any non-terminal status)
    ///
    /// One transaction: invoice number from the atomic sequence, invoice
    /// snapshot, order CLOSED, table freed. Events follow commit.
    pub fn close_order(&self, owner_id: u64, order_id: &str) -> OrderResult<(Order, Invoice)> {
        let issued_at = Utc::now();
        let now = issued_at.timestamp_millis();

        let txn = self.store.begin_write()?;
        let mut order = Self::load_order(&txn, owner_id, order_id)?;
        if order.status.is_terminal() {
            return Err(OrderError::InvalidTransition {
                from: order.status,
                to: OrderStatus::Closed,
            });
        }

        let settings = Self::read_settings(&txn, now)?;
        let invoice = self.issue_invoice(&txn, &order, &order.items, &settings, None, &issued_at)?;

        order.status = OrderStatus::Closed;
        order.closed_at = Some(now);
        order.updated_at = now;
        Self::store_order(&txn, &order)?;

        Self::release_claim(&txn, order.table_id)?;
        let table_event = Self::free_table(&txn, order.table_id)?;
        txn.commit()?;

        if let Some(event) = table_event {
            self.publish(event);
        }
        self.publish(PosEvent::invoice_issued(&InvoiceIssuedPayload {
            order_id: order.id.clone(),
            invoice_number: invoice.invoice_number.clone(),
            grand_total: invoice.invoice_data.financial_summary.grand_total,
        }));
        tracing::info!(
            order_id,
            invoice = %invoice.invoice_number,
            total = invoice.invoice_data.financial_summary.grand_total,
            "Order closed"
        );
        Ok((order, invoice))
    }

    /// Close the order as split bills: one invoice per group of the plan
    ///
    /// The plan must be an exact partition of the order's items. All
    /// invoices, the CLOSED order and the freed table commit together; no
    /// partial-split state ever exists.
    pub fn close_with_splits(
        &self,
        owner_id: u64,
        order_id: &str,
        plan: &SplitPlan,
    ) -> OrderResult<(Order, Vec<Invoice>)> {
        let issued_at = Utc::now();
        let now = issued_at.timestamp_millis();

        let txn = self.store.begin_write()?;
        let mut order = Self::load_order(&txn, owner_id, order_id)?;
        if order.status.is_terminal() {
            return Err(OrderError::InvalidTransition {
                from: order.status,
                to: OrderStatus::Closed,
            });
        }
        validate_partition(&order.items, plan)?;

        let settings = Self::read_settings(&txn, now)?;

        // Numbers are drawn inside this one transaction, so each order's
        // split invoices come out contiguous.
        let issued = {
            let by_id: HashMap<&str, &OrderItem> = order
                .items
                .iter()
                .map(|item| (item.id.as_str(), item))
                .collect();
            let mut issued = Vec::with_capacity(plan.splits.len());
            for group in &plan.splits {
                let group_items: Vec<OrderItem> = group
                    .item_ids
                    .iter()
                    .filter_map(|id| by_id.get(id.as_str()).map(|&item| item.clone()))
                    .collect();
                let invoice = self.issue_invoice(
                    &txn,
                    &order,
                    &group_items,
                    &settings,
                    group.label.clone(),
                    &issued_at,
                )?;
                issued.push(invoice);
            }
            issued
        };

        order.status = OrderStatus::Closed;
        order.closed_at = Some(now);
        order.updated_at = now;
        Self::store_order(&txn, &order)?;

        Self::release_claim(&txn, order.table_id)?;
        let table_event = Self::free_table(&txn, order.table_id)?;
        txn.commit()?;

        if let Some(event) = table_event {
            self.publish(event);
        }
        for invoice in &issued {
            self.publish(PosEvent::invoice_issued(&InvoiceIssuedPayload {
                order_id: order.id.clone(),
                invoice_number: invoice.invoice_number.clone(),
                grand_total: invoice.invoice_data.financial_summary.grand_total,
            }));
        }
        tracing::info!(order_id, splits = issued.len(), "Order closed with split bills");
        Ok((order, issued))
    }

    /// Cancel the order (the deletion path): legal from any non-terminal
    /// status, items or not
    ///
    /// The order row is retained as CANCELED for audit; the table frees
    /// atomically. No invoice.
    pub fn cancel_order(&self, owner_id: u64, order_id: &str) -> OrderResult<Order> {
        let now = now_millis();
        let txn = self.store.begin_write()?;
        let mut order = Self::load_order(&txn, owner_id, order_id)?;
        if order.status.is_terminal() {
            return Err(OrderError::InvalidTransition {
                from: order.status,
                to: OrderStatus::Canceled,
            });
        }

        order.status = OrderStatus::Canceled;
        order.closed_at = Some(now);
        order.updated_at = now;
        Self::store_order(&txn, &order)?;

        Self::release_claim(&txn, order.table_id)?;
        let table_event = Self::free_table(&txn, order.table_id)?;
        txn.commit()?;

        if let Some(event) = table_event {
            self.publish(event);
        }
        tracing::info!(order_id, "Order canceled");
        Ok(order)
    }

    // ========== Transaction helpers ==========

    fn load_order(txn: &WriteTransaction, owner_id: u64, order_id: &str) -> OrderResult<Order> {
        let table = txn.open_table(ORDERS_TABLE)?;
        let order: Order = match table.get(order_id)? {
            Some(value) => serde_json::from_slice(value.value())?,
            None => return Err(OrderError::OrderNotFound(order_id.to_string())),
        };
        // Cross-tenant ids look exactly like missing ones
        if order.owner_id != owner_id {
            return Err(OrderError::OrderNotFound(order_id.to_string()));
        }
        Ok(order)
    }

    fn store_order(txn: &WriteTransaction, order: &Order) -> OrderResult<()> {
        let mut table = txn.open_table(ORDERS_TABLE)?;
        table.insert(order.id.as_str(), serde_json::to_vec(order)?.as_slice())?;
        Ok(())
    }

    /// Generic load + edge check + store step (no side effects)
    fn step_status(&self, owner_id: u64, order_id: &str, next: OrderStatus) -> OrderResult<Order> {
        let now = now_millis();
        let txn = self.store.begin_write()?;
        let mut order = Self::load_order(&txn, owner_id, order_id)?;
        if !order.status.can_transition_to(next) {
            return Err(OrderError::InvalidTransition {
                from: order.status,
                to: next,
            });
        }
        order.status = next;
        order.updated_at = now;
        Self::store_order(&txn, &order)?;
        txn.commit()?;
        Ok(order)
    }

    /// Resolve a product and its chosen options into a line snapshot
    fn snapshot_item(
        txn: &WriteTransaction,
        owner_id: u64,
        req: &OrderItemAdd,
        now: i64,
    ) -> OrderResult<OrderItem> {
        let products = txn.open_table(PRODUCTS_TABLE)?;
        let product: Product = match products.get(req.product_id)? {
            Some(value) => serde_json::from_slice(value.value())?,
            None => return Err(OrderError::ProductNotFound(req.product_id)),
        };
        if product.owner_id != owner_id {
            return Err(OrderError::ProductNotFound(req.product_id));
        }
        if !product.is_active {
            return Err(OrderError::ProductUnavailable(req.product_id));
        }

        let groups = txn.open_table(MODIFIER_GROUPS_TABLE)?;
        let options = txn.open_table(MODIFIER_OPTIONS_TABLE)?;
        let mut selected = Vec::with_capacity(req.option_ids.len());
        for &option_id in &req.option_ids {
            let option: ModifierOption = match options.get(option_id)? {
                Some(value) => serde_json::from_slice(value.value())?,
                None => return Err(OrderError::ModifierNotFound(option_id)),
            };
            let group: ModifierGroup = match groups.get(option.group_id)? {
                Some(value) => serde_json::from_slice(value.value())?,
                None => return Err(OrderError::ModifierNotFound(option_id)),
            };
            if option.owner_id != owner_id || group.product_id != product.id {
                return Err(OrderError::ModifierNotFound(option_id));
            }
            selected.push(ModifierSnapshot {
                option_id: option.id,
                name: option.name,
                price: option.price,
            });
        }

        Ok(OrderItem {
            id: Uuid::new_v4().to_string(),
            product_id: product.id,
            product_name: product.name,
            price: product.price,
            quantity: req.quantity,
            selected_modifiers: selected,
            notes: req.notes.clone(),
            created_at: now,
        })
    }

    fn read_settings(txn: &WriteTransaction, now: i64) -> OrderResult<RestaurantSettings> {
        let table = txn.open_table(SETTINGS_TABLE)?;
        match table.get(SETTINGS_KEY)? {
            Some(value) => Ok(serde_json::from_slice(value.value())?),
            // Closing before anyone saved settings: zero rates
            None => Ok(RestaurantSettings::seed(now)),
        }
    }

    /// Draw the next invoice number and write the invoice row
    fn issue_invoice(
        &self,
        txn: &WriteTransaction,
        order: &Order,
        items: &[OrderItem],
        settings: &RestaurantSettings,
        split_label: Option<String>,
        issued_at: &DateTime<Utc>,
    ) -> OrderResult<Invoice> {
        let year = issued_at.year();
        let seq = self
            .store
            .next_sequence_txn(txn, &format!("invoice_{}", year))?;
        let invoice_number = format!("F-{}-{:05}", year, seq);
        let id = self.store.next_sequence_txn(txn, INVOICE_ID_SEQ)?;

        let data = invoice::build_invoice_data(
            order,
            items,
            settings,
            &invoice_number,
            split_label,
            issued_at,
        );
        let record = Invoice {
            id,
            order_id: order.id.clone(),
            invoice_number,
            invoice_data: data,
            created_at: issued_at.timestamp_millis(),
        };

        let mut invoices = txn.open_table(INVOICES_TABLE)?;
        invoices.insert(id, serde_json::to_vec(&record)?.as_slice())?;
        Ok(record)
    }

    fn release_claim(txn: &WriteTransaction, table_id: u64) -> OrderResult<()> {
        let mut active = txn.open_table(ACTIVE_ORDERS_TABLE)?;
        active.remove(table_id)?;
        Ok(())
    }

    /// Flip the table back to AVAILABLE, returning the event to publish
    /// after commit
    fn free_table(txn: &WriteTransaction, table_id: u64) -> OrderResult<Option<PosEvent>> {
        let mut tables = txn.open_table(DINING_TABLES_TABLE)?;
        let row = tables.get(table_id)?.map(|value| value.value().to_vec());
        let Some(bytes) = row else {
            return Ok(None);
        };
        let mut table: DiningTable = serde_json::from_slice(&bytes)?;
        table.status = TableStatus::Available;
        tables.insert(table_id, serde_json::to_vec(&table)?.as_slice())?;
        Ok(Some(PosEvent::table_changed(&TableChangedPayload {
            table_id,
            status: TableStatus::Available,
        })))
    }
}
