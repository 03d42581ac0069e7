//! CLI command implementations.

pub mod cart;

use basket_store::CartError;
use thiserror::Error;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CliError {
    /// The cart refused the input.
    #[error("{0}")]
    Cart(#[from] CartError),

    /// The snapshot could not be printed as JSON.
    #[error("Failed to encode snapshot: {0}")]
    Json(#[from] serde_json::Error),
}
