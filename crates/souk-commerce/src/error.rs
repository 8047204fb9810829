//! Commerce error types.

use thiserror::Error;

/// Errors that can occur in cart and shipping operations.
#[derive(Error, Debug)]
pub enum CommerceError {
    /// Cart not found.
    #[error("Cart not found: {0}")]
    CartNotFound(String),

    /// Cart item not found.
    #[error("Cart item not found: {0}")]
    CartItemNotFound(String),

    /// Product not found.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Cart does not belong to the requesting buyer.
    #[error("Cart {cart_id} does not belong to buyer {buyer_id}")]
    NotCartOwner { cart_id: String, buyer_id: String },

    /// Requested quantity exceeds available stock.
    #[error("Insufficient stock for {product_id}: requested {requested}, available {available}")]
    StockExceeded {
        product_id: String,
        requested: i64,
        available: i64,
    },

    /// Invalid quantity.
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(i64),

    /// Quantity exceeds maximum allowed per line item.
    #[error("Quantity {0} exceeds maximum allowed ({1})")]
    QuantityExceedsLimit(i64, i64),

    /// Cart has already been checked out and is frozen.
    #[error("Cart already checked out: {0}")]
    CartAlreadyCheckedOut(String),

    /// Currency mismatch.
    #[error("Currency mismatch: expected {expected}, got {got}")]
    CurrencyMismatch { expected: String, got: String },

    /// Arithmetic overflow.
    #[error("Arithmetic overflow in money calculation")]
    Overflow,

    /// Upstream provider error.
    #[error("Provider error: {0}")]
    Provider(String),

    /// Cart storage error.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl CommerceError {
    /// Whether the caller can correct this error and retry (as opposed to a
    /// missing resource, an authorization failure, or an infrastructure
    /// fault).
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            CommerceError::StockExceeded { .. }
                | CommerceError::InvalidQuantity(_)
                | CommerceError::QuantityExceedsLimit(_, _)
                | CommerceError::CartAlreadyCheckedOut(_)
        )
    }
}

impl From<serde_json::Error> for CommerceError {
    fn from(e: serde_json::Error) -> Self {
        CommerceError::Serialization(e.to_string())
    }
}
