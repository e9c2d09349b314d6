//! Invoice snapshot builder
//!
//! Pure assembly: given an order, the item set being billed (the whole
//! order, or one split group), and the settings read in the issuing
//! transaction, produce the fully denormalized [`InvoiceData`] document.
//! Everything is copied by value so the invoice stays renderable after any
//! later catalog, settings, or staff change.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use shared::models::invoice::{
    FinancialSummary, InvoiceData, InvoiceLine, RestaurantInfo, SaleInfo,
};
use shared::models::settings::RestaurantSettings;
use shared::order::{Order, OrderItem};

use super::money;

/// Compute the financial summary over the item set being billed
///
/// ```text
/// subtotal       = Σ item_total(item)
/// tax            = subtotal × tax_rate
/// service_charge = subtotal × service_charge_rate
/// grand_total    = subtotal + tax + service_charge
/// ```
///
/// Tax and service charge are rounded to cents individually so the printed
/// columns add up to the printed grand total.
pub fn financial_summary(
    items: &[OrderItem],
    tax_rate: f64,
    service_charge_rate: f64,
) -> FinancialSummary {
    let subtotal: Decimal = items.iter().map(money::item_total).sum();
    let tax = money::round_money(subtotal * money::to_decimal(tax_rate));
    let service = money::round_money(subtotal * money::to_decimal(service_charge_rate));
    let grand = subtotal + tax + service;

    FinancialSummary {
        subtotal: money::to_f64(subtotal),
        tax_rate,
        tax_amount: money::to_f64(tax),
        service_charge_rate,
        service_charge_amount: money::to_f64(service),
        grand_total: money::to_f64(grand),
    }
}

/// Assemble the denormalized invoice document
pub fn build_invoice_data(
    order: &Order,
    items: &[OrderItem],
    settings: &RestaurantSettings,
    invoice_number: &str,
    split_label: Option<String>,
    issued_at: &DateTime<Utc>,
) -> InvoiceData {
    let lines = items
        .iter()
        .map(|item| InvoiceLine {
            quantity: item.quantity,
            product_name: item.product_name.clone(),
            unit_price: item.price,
            modifiers: item
                .selected_modifiers
                .iter()
                .map(|m| m.name.clone())
                .collect(),
            item_total: money::to_f64(money::item_total(item)),
        })
        .collect();

    InvoiceData {
        restaurant_info: RestaurantInfo {
            name: settings.restaurant_name.clone(),
            address: settings.restaurant_address.clone(),
            tax_id: settings.tax_id.clone(),
        },
        sale_info: SaleInfo {
            invoice_number: invoice_number.to_string(),
            date: issued_at.to_rfc3339(),
            waiter_name: order.staff_name.clone(),
            table_name: order.table_name.clone(),
            split_label,
        },
        items: lines,
        financial_summary: financial_summary(items, settings.tax_rate, settings.service_charge_rate),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::order::{ModifierSnapshot, OrderStatus};

    fn test_order() -> Order {
        Order {
            id: "order-1".to_string(),
            table_id: 5,
            table_name: "Table 5".to_string(),
            staff_id: 2,
            staff_name: "Maria".to_string(),
            owner_id: 1,
            status: OrderStatus::Delivered,
            items: vec![],
            total: 0.0,
            sent_to_kitchen_at: None,
            created_at: 0,
            updated_at: 0,
            closed_at: None,
        }
    }

    fn plain_item(id: &str, price: f64, quantity: i32) -> OrderItem {
        OrderItem {
            id: id.to_string(),
            product_id: 1,
            product_name: format!("Product {}", id),
            price,
            quantity,
            selected_modifiers: vec![],
            notes: None,
            created_at: 0,
        }
    }

    fn test_settings() -> RestaurantSettings {
        RestaurantSettings {
            restaurant_name: "La Comanda".to_string(),
            restaurant_address: "Calle Mayor 1".to_string(),
            tax_id: "B12345678".to_string(),
            tax_rate: 0.12,
            service_charge_rate: 0.10,
            updated_at: 0,
        }
    }

    #[test]
    fn test_financial_summary_reference_case() {
        // 5.00×1 + 3.00×2 = 11.00; 12% tax, 10% service
        let items = vec![plain_item("a", 5.0, 1), plain_item("b", 3.0, 2)];
        let summary = financial_summary(&items, 0.12, 0.10);

        assert_eq!(summary.subtotal, 11.0);
        assert_eq!(summary.tax_amount, 1.32);
        assert_eq!(summary.service_charge_amount, 1.10);
        assert_eq!(summary.grand_total, 13.42);
    }

    #[test]
    fn test_financial_summary_zero_rates() {
        let items = vec![plain_item("a", 10.0, 1)];
        let summary = financial_summary(&items, 0.0, 0.0);

        assert_eq!(summary.subtotal, 10.0);
        assert_eq!(summary.tax_amount, 0.0);
        assert_eq!(summary.service_charge_amount, 0.0);
        assert_eq!(summary.grand_total, 10.0);
    }

    #[test]
    fn test_modifiers_included_in_totals_and_lines() {
        let mut item = plain_item("a", 10.0, 2);
        item.selected_modifiers = vec![
            ModifierSnapshot {
                option_id: 1,
                name: "Extra cheese".to_string(),
                price: 1.5,
            },
            ModifierSnapshot {
                option_id: 2,
                name: "Large".to_string(),
                price: 0.5,
            },
        ];

        let data = build_invoice_data(
            &test_order(),
            &[item],
            &test_settings(),
            "F-2026-00001",
            None,
            &Utc::now(),
        );

        assert_eq!(data.items.len(), 1);
        assert_eq!(data.items[0].item_total, 24.0);
        assert_eq!(data.items[0].modifiers, vec!["Extra cheese", "Large"]);
        assert_eq!(data.financial_summary.subtotal, 24.0);
    }

    #[test]
    fn test_snapshot_carries_identity_fields() {
        let data = build_invoice_data(
            &test_order(),
            &[plain_item("a", 5.0, 1)],
            &test_settings(),
            "F-2026-00042",
            Some("seat 2".to_string()),
            &Utc::now(),
        );

        assert_eq!(data.restaurant_info.name, "La Comanda");
        assert_eq!(data.restaurant_info.tax_id, "B12345678");
        assert_eq!(data.sale_info.invoice_number, "F-2026-00042");
        assert_eq!(data.sale_info.waiter_name, "Maria");
        assert_eq!(data.sale_info.table_name, "Table 5");
        assert_eq!(data.sale_info.split_label.as_deref(), Some("seat 2"));
        assert_eq!(data.financial_summary.tax_rate, 0.12);
    }

    #[test]
    fn test_summary_covers_only_passed_items() {
        // A split group bills only its own items
        let all = vec![plain_item("a", 5.0, 1), plain_item("b", 3.0, 2)];
        let group = &all[..1];
        let summary = financial_summary(group, 0.12, 0.10);
        assert_eq!(summary.subtotal, 5.0);
    }
}
