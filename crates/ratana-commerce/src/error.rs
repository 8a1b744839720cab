//! Storefront error types.

use thiserror::Error;

/// Errors that can occur in cart and checkout operations.
#[derive(Error, Debug)]
pub enum StorefrontError {
    /// Item not in cart.
    #[error("Item not in cart: {0}")]
    ItemNotInCart(String),

    /// Invalid quantity.
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(i64),

    /// Cart already holds the maximum number of distinct items.
    #[error("Cart is full: {count} distinct items (limit {limit})")]
    CapacityExceeded { count: usize, limit: usize },

    /// Insufficient stock.
    #[error("Insufficient stock for {product_id}: requested {requested}, available {available}")]
    InsufficientStock {
        product_id: String,
        requested: i64,
        available: i64,
    },

    /// No delivery address on file for the user.
    #[error("No delivery address on file for user {0}")]
    AddressMissing(String),

    /// Checkout attempted on an empty cart.
    #[error("Cart is empty")]
    EmptyCart,

    /// Arithmetic overflow in a money or quantity calculation.
    #[error("Arithmetic overflow in price calculation")]
    Overflow,

    /// Document store failure.
    #[error("Store error: {0}")]
    Store(#[from] ratana_store::StoreError),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for StorefrontError {
    fn from(e: serde_json::Error) -> Self {
        StorefrontError::Serialization(e.to_string())
    }
}

impl StorefrontError {
    /// Whether the underlying failure is transient and the operation, if
    /// idempotent, may be retried.
    pub fn is_transient(&self) -> bool {
        matches!(self, StorefrontError::Store(e) if e.is_transient())
    }
}
