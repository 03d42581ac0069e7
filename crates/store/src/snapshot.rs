//! Point-in-time view of the cart handed to listeners.

use basket_core::CartLine;
use rust_decimal::Decimal;
use serde::Serialize;

/// The cart as it stood right after a change.
///
/// A snapshot owns its lines, so a listener may keep it around or hand it to
/// another thread without touching the store again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartSnapshot {
    /// Lines in cart order.
    pub items: Vec<CartLine>,
    /// Sum of all line quantities.
    pub total_items: u64,
    /// Sum of `price * quantity` over all lines, unrounded.
    #[serde(with = "rust_decimal::serde::str")]
    pub total_price: Decimal,
}

impl CartSnapshot {
    /// Build a snapshot from the current lines.
    #[must_use]
    pub fn from_lines(lines: &[CartLine]) -> Self {
        Self {
            items: lines.to_vec(),
            total_items: total_items(lines),
            total_price: total_price(lines),
        }
    }

    /// Whether the cart holds no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Sum of line quantities.
pub(crate) fn total_items(lines: &[CartLine]) -> u64 {
    lines
        .iter()
        .map(|line| u64::from(line.quantity.get()))
        .sum()
}

/// Sum of line totals.
///
/// A sum too large for [`Decimal`] is capped at [`Decimal::MAX`] and logged,
/// since the result is no longer exact.
pub(crate) fn total_price(lines: &[CartLine]) -> Decimal {
    let total = lines.iter().try_fold(Decimal::ZERO, |total, line| {
        line.price
            .checked_times(line.quantity)
            .and_then(|line_total| total.checked_add(line_total))
    });

    total.map_or_else(
        || {
            tracing::warn!(
                lines = lines.len(),
                "Cart total exceeds the largest representable amount, capped"
            );
            Decimal::MAX
        },
        |total| total.normalize(),
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use basket_core::{NewCartLine, Price, ProductId, Quantity};

    use super::*;

    fn line(id: &str, cents: i64, quantity: u32) -> CartLine {
        let mut line = CartLine::from(NewCartLine::new(
            ProductId::parse(id).unwrap(),
            id,
            Price::from_cents(cents).unwrap(),
        ));
        line.quantity = Quantity::new(quantity).unwrap();
        line
    }

    #[test]
    fn test_empty_snapshot() {
        let snapshot = CartSnapshot::from_lines(&[]);
        assert!(snapshot.is_empty());
        assert_eq!(snapshot.total_items, 0);
        assert_eq!(snapshot.total_price, Decimal::ZERO);
    }

    #[test]
    fn test_totals_are_exact() {
        let snapshot = CartSnapshot::from_lines(&[line("a", 10, 3), line("b", 20, 1)]);
        assert_eq!(snapshot.total_items, 4);
        // 0.10 * 3 + 0.20 is exactly 0.50, no float drift
        assert_eq!(snapshot.total_price, Decimal::new(5, 1));
    }

    #[test]
    fn test_total_caps_instead_of_overflowing() {
        let mut huge = line("a", 0, 2);
        huge.price = Price::new(Decimal::MAX).unwrap();
        assert_eq!(total_price(&[huge.clone()]), Decimal::MAX);

        huge.quantity = Quantity::ONE;
        assert_eq!(total_price(&[huge.clone(), huge]), Decimal::MAX);
    }

    #[test]
    fn test_serialized_field_names() {
        let snapshot = CartSnapshot::from_lines(&[line("a", 250, 2)]);
        let value = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(value["totalItems"], 2);
        assert_eq!(value["totalPrice"], "5");
        assert_eq!(value["items"][0]["id"], "a");
    }
}
