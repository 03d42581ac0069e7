//! Cart line types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{id::ProductId, price::Price, quantity::Quantity};

/// A product a widget asks to add to the cart.
///
/// This is what a product card knows at click time. The quantity is not part
/// of it: every add contributes exactly one unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCartLine {
    /// Product identifier.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Unit price.
    pub price: Price,
    /// Image URL, display only.
    pub image: Option<String>,
}

impl NewCartLine {
    /// Create a new line request without an image.
    #[must_use]
    pub fn new(id: ProductId, name: impl Into<String>, price: Price) -> Self {
        Self {
            id,
            name: name.into(),
            price,
            image: None,
        }
    }

    /// Attach an image URL.
    #[must_use]
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }
}

/// One distinct product in the cart.
///
/// `name`, `price` and `image` are captured when the line is first created
/// and are never refreshed by later adds of the same product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    /// Product identifier, unique within a cart.
    pub id: ProductId,
    /// Display name at add time.
    pub name: String,
    /// Unit price at add time.
    pub price: Price,
    /// Image URL, display only.
    pub image: Option<String>,
    /// Number of units, at least 1.
    pub quantity: Quantity,
}

impl CartLine {
    /// `price * quantity` for this line.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price.times(self.quantity)
    }
}

impl From<NewCartLine> for CartLine {
    fn from(line: NewCartLine) -> Self {
        Self {
            id: line.id,
            name: line.name,
            price: line.price,
            image: line.image,
            quantity: Quantity::ONE,
        }
    }
}
