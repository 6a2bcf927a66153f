//! Cart operation errors.

use rocketshoes_core::DomainError;
use thiserror::Error;

use crate::catalog::ApiError;
use crate::notice::{CartOperation, OUT_OF_STOCK};
use crate::storage::StorageError;

/// Why a cart operation did not commit.
///
/// Never leaves the manager's public operations: each variant is collapsed
/// into one notice message per operation.
#[derive(Debug, Error)]
pub enum CartError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error("catalog lookup failed: {0}")]
    Api(#[from] ApiError),
    #[error("durable store failed: {0}")]
    Storage(#[from] StorageError),
}

impl CartError {
    pub fn is_out_of_stock(&self) -> bool {
        matches!(self, CartError::Domain(DomainError::OutOfStock { .. }))
    }

    /// Message shown to the shopper when `operation` fails with this error.
    pub fn notice_message(&self, operation: CartOperation) -> &'static str {
        if self.is_out_of_stock() {
            OUT_OF_STOCK
        } else {
            operation.failure_message()
        }
    }
}
