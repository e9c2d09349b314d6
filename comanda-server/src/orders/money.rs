//! Money calculation utilities using rust_decimal for precision
//!
//! All arithmetic runs on `Decimal` and converts to `f64` only at the
//! storage/serialization boundary. The order total is always recomputed
//! from the full item list; incremental add/subtract arithmetic drifts
//! once modifiers enter the picture and is deliberately absent here.

use rust_decimal::prelude::*;
use shared::order::OrderItem;

/// Rounding for monetary values (2 decimal places, half away from zero)
const DECIMAL_PLACES: u32 = 2;

/// Tolerance for monetary comparisons (0.01)
pub const MONEY_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Maximum allowed price per unit (€1,000,000)
pub const MAX_PRICE: f64 = 1_000_000.0;
/// Maximum allowed quantity per item
pub const MAX_QUANTITY: i32 = 9999;

/// Convert f64 to Decimal for calculation
#[inline]
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_default()
}

/// Convert Decimal back to f64 for storage, rounded to 2 decimal places
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or_default()
}

/// Round a monetary Decimal to cents
#[inline]
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// Per-unit price of an item including its modifier snapshot
///
/// `price + Σ selected_modifiers.price`
pub fn unit_price(item: &OrderItem) -> Decimal {
    let modifiers: Decimal = item
        .selected_modifiers
        .iter()
        .map(|m| to_decimal(m.price))
        .sum();
    to_decimal(item.price) + modifiers
}

/// Line total of an item
///
/// `(price + Σ selected_modifiers.price) × quantity`, rounded to cents
pub fn item_total(item: &OrderItem) -> Decimal {
    round_money(unit_price(item) * Decimal::from(item.quantity))
}

/// Canonical order total: full recompute over the item list
///
/// Called inside the same transaction as every item write. The cached
/// `Order::total` is only ever the result of this function.
pub fn compute_total(items: &[OrderItem]) -> f64 {
    let total: Decimal = items.iter().map(item_total).sum();
    to_f64(total)
}

/// Compare two monetary values for equality (within 0.01 tolerance)
pub fn money_eq(a: f64, b: f64) -> bool {
    let diff = (to_decimal(a) - to_decimal(b)).abs();
    diff < MONEY_TOLERANCE
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::order::ModifierSnapshot;

    fn item(price: f64, quantity: i32, modifiers: &[f64]) -> OrderItem {
        OrderItem {
            id: "i1".to_string(),
            product_id: 1,
            product_name: "Item".to_string(),
            price,
            quantity,
            selected_modifiers: modifiers
                .iter()
                .enumerate()
                .map(|(idx, p)| ModifierSnapshot {
                    option_id: idx as u64 + 1,
                    name: format!("Mod {}", idx),
                    price: *p,
                })
                .collect(),
            notes: None,
            created_at: 0,
        }
    }

    #[test]
    fn test_decimal_beats_f64_accumulation() {
        // Classic floating point problem: 0.1 + 0.2 != 0.3
        assert_ne!(0.1_f64 + 0.2_f64, 0.3);
        let sum = to_decimal(0.1) + to_decimal(0.2);
        assert_eq!(to_f64(sum), 0.3);
    }

    #[test]
    fn test_item_total_with_modifiers() {
        // 10.00 base + 1.50 + 0.50 modifiers, quantity 2
        let item = item(10.0, 2, &[1.5, 0.5]);
        assert_eq!(to_f64(item_total(&item)), 24.0);
    }

    #[test]
    fn test_compute_total_sums_lines() {
        let items = vec![item(5.0, 1, &[]), item(3.0, 2, &[])];
        assert_eq!(compute_total(&items), 11.0);
    }

    #[test]
    fn test_compute_total_empty() {
        assert_eq!(compute_total(&[]), 0.0);
    }

    #[test]
    fn test_compute_total_many_penny_items() {
        let items: Vec<OrderItem> = (0..100).map(|_| item(0.01, 1, &[])).collect();
        assert_eq!(compute_total(&items), 1.0);
    }

    #[test]
    fn test_recompute_is_idempotent() {
        let items = vec![item(9.99, 3, &[0.25]), item(2.5, 1, &[])];
        let first = compute_total(&items);
        let second = compute_total(&items);
        assert_eq!(first, second);
    }

    #[test]
    fn test_money_eq_tolerance() {
        assert!(money_eq(100.0, 100.0));
        assert!(money_eq(100.004, 100.006));
        assert!(!money_eq(100.0, 100.02));
    }

    #[test]
    fn test_rounding_half_away_from_zero() {
        let value = Decimal::new(5, 3); // 0.005
        assert_eq!(round_money(value).to_f64().unwrap(), 0.01);
        let value = Decimal::new(4, 3); // 0.004
        assert_eq!(round_money(value).to_f64().unwrap(), 0.0);
    }
}
