//! `rocketshoes-core`: storefront cart domain building blocks.
//!
//! This crate contains **pure domain** types (no IO, no HTTP, no storage).

pub mod cart;
pub mod error;
pub mod id;
pub mod product;

pub use cart::{Cart, LineItem};
pub use error::{DomainError, DomainResult};
pub use id::ProductId;
pub use product::{Product, Stock};
