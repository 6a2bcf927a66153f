//! `rocketshoes-cart`
//!
//! **Responsibility:** the storefront shopping cart as an observable state
//! container.
//!
//! This crate provides:
//! - `CartManager`: add / remove / update line items, each mediated by a
//!   remote stock check
//! - Write-through persistence to a durable key-value store
//! - Synchronous change notification for any number of subscribers
//! - User-visible notices for every rejected or failed operation
//!
//! The catalog API stays the authority on stock; nothing is cached between
//! operations.

pub mod catalog;
pub mod config;
pub mod error;
pub mod manager;
pub mod notice;
pub mod state;
pub mod storage;

pub use catalog::{ApiError, CatalogApi, HttpCatalogApi};
pub use config::CartConfig;
pub use error::CartError;
pub use manager::{CartManager, UpdateProductAmount};
pub use notice::{BusNotifier, CartOperation, Notice, NoticeLevel, Notifier, TracingNotifier};
pub use state::{CartState, SubscriptionId};
pub use storage::{DEFAULT_CART_KEY, FileStore, InMemoryStore, KeyValueStore, StorageError};

pub use rocketshoes_core::{Cart, LineItem, Product, ProductId, Stock};
