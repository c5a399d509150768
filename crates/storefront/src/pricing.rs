//! Price display and purchasability helpers.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// Prices at or below this are data errors upstream, never sellable.
const MIN_SELLABLE_PRICE: i64 = 100;

/// Whether a product can actually be bought.
///
/// The in-stock flag alone is not trusted: the backend occasionally flags
/// zero-priced placeholder rows as available.
#[must_use]
pub fn is_purchasable(price: Decimal, in_stock: bool) -> bool {
    price > Decimal::from(MIN_SELLABLE_PRICE) && in_stock
}

/// Percentage off, floored to a whole number.
///
/// Returns 0 when there is no sale price, the sale price is zero, or the
/// base price is not positive.
#[must_use]
pub fn discount_percentage(price: Decimal, sale_price: Option<Decimal>) -> i64 {
    let Some(sale) = sale_price.filter(|s| !s.is_zero()) else {
        return 0;
    };
    if price <= Decimal::ZERO {
        return 0;
    }

    ((price - sale) / price * Decimal::from(100))
        .floor()
        .to_i64()
        .unwrap_or(0)
}

/// Format a price for display: rounded to a whole amount, thousands
/// separated by commas, with an optional currency suffix.
#[must_use]
pub fn format_price(price: Decimal, currency: Option<&str>) -> String {
    let rounded = price
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i128()
        .unwrap_or(0);

    let formatted = group_thousands(rounded);
    match currency {
        Some(currency) if !currency.is_empty() => format!("{formatted} {currency}"),
        _ => formatted,
    }
}

/// Insert a comma every three digits from the right.
fn group_thousands(value: i128) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);

    let offset = digits.len() % 3;
    for (i, c) in digits.chars().enumerate() {
        if i != 0 && (i + 3 - offset) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    if value < 0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}
