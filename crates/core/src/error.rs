//! Domain error model.

use thiserror::Error;

use crate::id::ProductId;

/// Result type used across the domain layer.
pub type StockResult<T> = Result<T, StockError>;

/// Errors surfaced by the stock ledger and the sale coordinator.
///
/// Keep this focused on the transaction path. Alert delivery failures are
/// logged and swallowed by callers; they never appear here.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StockError {
    /// Malformed request shape — caller error, rejected before any read.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A referenced product id does not exist.
    #[error("product {0} not found")]
    ProductNotFound(ProductId),

    /// Requested quantity exceeds what the ledger holds.
    #[error("insufficient stock for product \"{name}\": available quantity {available}")]
    InsufficientStock { name: String, available: u64 },

    /// Underlying store failure during commit. The transaction was not applied
    /// and may be retried from validation.
    #[error("fatal store error: {0}")]
    Fatal(String),
}

impl StockError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn fatal(msg: impl Into<String>) -> Self {
        Self::Fatal(msg.into())
    }
}
