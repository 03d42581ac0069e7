//! Display data for cart widgets.
//!
//! Listeners that render the cart (the bottom cart bar, the cart sidebar)
//! build a [`CartView`] from the snapshot they receive instead of formatting
//! numbers themselves. Rounding happens here and only here; the store's
//! totals stay exact.

use rust_decimal::{Decimal, RoundingStrategy};

use basket_core::CartLine;

use crate::snapshot::CartSnapshot;

/// Currency symbol used by the `From<&CartSnapshot>` conversion.
pub const DEFAULT_CURRENCY_SYMBOL: &str = "$";

/// Cart item display data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartItemView {
    pub id: String,
    pub title: String,
    pub quantity: u32,
    pub price: String,
    pub line_price: String,
    pub image: Option<ImageView>,
}

/// Image display data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageView {
    pub url: String,
}

/// Cart display data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    /// Exact total with two decimals, for item lists.
    pub subtotal: String,
    /// Total rounded to whole units, for the cart bar badge.
    pub badge_total: String,
    pub item_count: u64,
    /// "1 item" or "N items".
    pub items_label: String,
    /// False when the cart is empty and the bar should slide away.
    pub visible: bool,
}

impl CartView {
    /// Create an empty cart view.
    #[must_use]
    pub fn empty() -> Self {
        Self::render(&CartSnapshot::from_lines(&[]), DEFAULT_CURRENCY_SYMBOL)
    }

    /// Build the view for `snapshot`, prefixing amounts with `symbol`.
    #[must_use]
    pub fn render(snapshot: &CartSnapshot, symbol: &str) -> Self {
        Self {
            items: snapshot
                .items
                .iter()
                .map(|line| CartItemView::render(line, symbol))
                .collect(),
            subtotal: format_price(snapshot.total_price, symbol),
            badge_total: format_whole(snapshot.total_price, symbol),
            item_count: snapshot.total_items,
            items_label: items_label(snapshot.total_items),
            visible: snapshot.total_items > 0,
        }
    }
}

impl CartItemView {
    /// Build the view for one line.
    #[must_use]
    pub fn render(line: &CartLine, symbol: &str) -> Self {
        Self {
            id: line.id.to_string(),
            title: line.name.clone(),
            quantity: line.quantity.get(),
            price: format_price(line.price.amount(), symbol),
            line_price: format_price(line.line_total(), symbol),
            image: line.image.as_ref().map(|url| ImageView { url: url.clone() }),
        }
    }
}

impl From<&CartSnapshot> for CartView {
    fn from(snapshot: &CartSnapshot) -> Self {
        Self::render(snapshot, DEFAULT_CURRENCY_SYMBOL)
    }
}

// =============================================================================
// Formatting
// =============================================================================

/// Format an amount with two decimals, half away from zero.
fn format_price(amount: Decimal, symbol: &str) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("{symbol}{rounded:.2}")
}

/// Format an amount rounded to a whole number, half away from zero.
fn format_whole(amount: Decimal, symbol: &str) -> String {
    let rounded = amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    format!("{symbol}{rounded:.0}")
}

fn items_label(count: u64) -> String {
    if count == 1 {
        "1 item".to_string()
    } else {
        format!("{count} items")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use basket_core::{NewCartLine, Price, ProductId, Quantity};

    use super::*;

    fn line(id: &str, cents: i64, quantity: u32) -> CartLine {
        let mut line = CartLine::from(
            NewCartLine::new(
                ProductId::parse(id).unwrap(),
                format!("Item {id}"),
                Price::from_cents(cents).unwrap(),
            )
            .with_image(format!("/img/{id}.png")),
        );
        line.quantity = Quantity::new(quantity).unwrap();
        line
    }

    #[test]
    fn test_empty_view_is_hidden() {
        let view = CartView::empty();
        assert!(!view.visible);
        assert!(view.items.is_empty());
        assert_eq!(view.subtotal, "$0.00");
        assert_eq!(view.badge_total, "$0");
        assert_eq!(view.items_label, "0 items");
    }

    #[test]
    fn test_single_item_label() {
        let view = CartView::from(&CartSnapshot::from_lines(&[line("a", 500, 1)]));
        assert!(view.visible);
        assert_eq!(view.items_label, "1 item");
        assert_eq!(view.item_count, 1);
    }

    #[test]
    fn test_amounts_and_rounding() {
        let snapshot = CartSnapshot::from_lines(&[line("a", 1250, 2), line("b", 199, 1)]);
        let view = CartView::from(&snapshot);

        assert_eq!(view.items_label, "3 items");
        assert_eq!(view.subtotal, "$26.99");
        assert_eq!(view.badge_total, "$27");

        let first = view.items.first().unwrap();
        assert_eq!(first.title, "Item a");
        assert_eq!(first.price, "$12.50");
        assert_eq!(first.line_price, "$25.00");
        assert_eq!(first.image.as_ref().unwrap().url, "/img/a.png");
    }

    #[test]
    fn test_half_rounds_up() {
        let view = CartView::render(&CartSnapshot::from_lines(&[line("a", 250, 1)]), "");
        assert_eq!(view.badge_total, "3");
        assert_eq!(view.subtotal, "2.50");
    }

    #[test]
    fn test_custom_symbol() {
        let view = CartView::render(&CartSnapshot::from_lines(&[line("a", 100, 1)]), "€");
        assert_eq!(view.subtotal, "€1.00");
    }
}
