//! Invoice Repository
//!
//! Read-only: invoices are written exclusively by the orders manager,
//! inside the same transaction that closes the order. Nothing in the
//! API can mutate or delete one.

use super::RepoResult;
use crate::db::{INVOICES_TABLE, Store};
use redb::ReadableTable;
use shared::models::Invoice;

#[derive(Clone)]
pub struct InvoiceRepository {
    store: Store,
}

impl InvoiceRepository {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// All invoices, newest first
    pub fn find_all(&self) -> RepoResult<Vec<Invoice>> {
        let txn = self.store.begin_read()?;
        let table = txn.open_table(INVOICES_TABLE)?;

        let mut invoices = Vec::new();
        for row in table.iter()? {
            let (_, value) = row?;
            invoices.push(serde_json::from_slice::<Invoice>(value.value())?);
        }
        invoices.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(invoices)
    }

    pub fn find_by_id(&self, id: u64) -> RepoResult<Option<Invoice>> {
        let txn = self.store.begin_read()?;
        let table = txn.open_table(INVOICES_TABLE)?;

        match table.get(id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    /// Invoices issued for one order (splits produce several)
    pub fn find_by_order(&self, order_id: &str) -> RepoResult<Vec<Invoice>> {
        let txn = self.store.begin_read()?;
        let table = txn.open_table(INVOICES_TABLE)?;

        let mut invoices = Vec::new();
        for row in table.iter()? {
            let (_, value) = row?;
            let invoice: Invoice = serde_json::from_slice(value.value())?;
            if invoice.order_id == order_id {
                invoices.push(invoice);
            }
        }
        invoices.sort_by_key(|i| i.id);
        Ok(invoices)
    }

    pub fn find_by_number(&self, invoice_number: &str) -> RepoResult<Option<Invoice>> {
        let txn = self.store.begin_read()?;
        let table = txn.open_table(INVOICES_TABLE)?;

        for row in table.iter()? {
            let (_, value) = row?;
            let invoice: Invoice = serde_json::from_slice(value.value())?;
            if invoice.invoice_number == invoice_number {
                return Ok(Some(invoice));
            }
        }
        Ok(None)
    }
}
