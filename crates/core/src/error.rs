//! Domain error model.

use thiserror::Error;

use crate::id::ProductId;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic cart rules (identifiers, stock
/// ceilings, missing line items). Transport and storage concerns belong elsewhere.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// The product has no line item in the cart.
    #[error("product {0} is not in the cart")]
    NotInCart(ProductId),

    /// The requested quantity is above the remote stock ceiling.
    #[error("requested amount {requested} for product {product_id} exceeds stock of {available}")]
    OutOfStock {
        product_id: ProductId,
        requested: u32,
        available: u32,
    },
}

impl DomainError {
    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn out_of_stock(product_id: ProductId, requested: u32, available: u32) -> Self {
        Self::OutOfStock {
            product_id,
            requested,
            available,
        }
    }
}
