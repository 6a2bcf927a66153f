//! Publish/subscribe plumbing for storefront front-end events.
//!
//! Used to fan out user-visible notices (toasts) to any number of renderers.

pub mod bus;
pub mod in_memory_bus;

pub use bus::{EventBus, Subscription};
pub use in_memory_bus::{InMemoryBusError, InMemoryEventBus};
