//! Line quantity type.

use core::fmt;
use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};

/// Errors that can occur when constructing a [`Quantity`].
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityError {
    /// A stored quantity of zero was requested.
    #[error("quantity must be at least 1")]
    Zero,
    /// The requested quantity is below zero.
    #[error("quantity cannot be negative: {0}")]
    Negative(i64),
    /// The requested quantity does not fit in a line.
    #[error("quantity {0} exceeds the maximum of {max}", max = u32::MAX)]
    TooLarge(i64),
    /// Incrementing would overflow the maximum quantity.
    #[error("quantity cannot be incremented past {max}", max = u32::MAX)]
    Overflow,
}

/// The quantity of a cart line.
///
/// Always at least 1: a line whose quantity would reach zero is removed from
/// the cart rather than stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Quantity(NonZeroU32);

impl Quantity {
    /// A quantity of one, the amount a single add contributes.
    pub const ONE: Self = Self(NonZeroU32::MIN);

    /// Create a quantity.
    ///
    /// # Errors
    ///
    /// Returns [`QuantityError::Zero`] for `0`.
    pub fn new(quantity: u32) -> Result<Self, QuantityError> {
        NonZeroU32::new(quantity).map(Self).ok_or(QuantityError::Zero)
    }

    /// Interpret a caller-requested absolute quantity.
    ///
    /// `0` means "remove the line" and yields `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns [`QuantityError::Negative`] below zero and
    /// [`QuantityError::TooLarge`] above `u32::MAX`.
    pub fn from_requested(requested: i64) -> Result<Option<Self>, QuantityError> {
        if requested < 0 {
            return Err(QuantityError::Negative(requested));
        }
        let value = u32::try_from(requested).map_err(|_| QuantityError::TooLarge(requested))?;
        Ok(NonZeroU32::new(value).map(Self))
    }

    /// Get the quantity as a plain integer.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0.get()
    }

    /// The next quantity up.
    ///
    /// # Errors
    ///
    /// Returns [`QuantityError::Overflow`] at `u32::MAX`.
    pub fn checked_increment(self) -> Result<Self, QuantityError> {
        self.0
            .checked_add(1)
            .map(Self)
            .ok_or(QuantityError::Overflow)
    }

    /// The next quantity down, or `None` when this is the last unit.
    #[must_use]
    pub fn decrement(self) -> Option<Self> {
        NonZeroU32::new(self.0.get() - 1).map(Self)
    }
}

impl Default for Quantity {
    fn default() -> Self {
        Self::ONE
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u32> for Quantity {
    type Error = QuantityError;

    fn try_from(quantity: u32) -> Result<Self, Self::Error> {
        Self::new(quantity)
    }
}

impl From<Quantity> for u32 {
    fn from(quantity: Quantity) -> Self {
        quantity.get()
    }
}
