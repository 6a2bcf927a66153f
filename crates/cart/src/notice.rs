//! User-visible notices (toasts) raised by cart operations.

use chrono::{DateTime, Utc};
use rocketshoes_events::EventBus;
use serde::{Deserialize, Serialize};

/// Requested quantity is above what the catalog has in stock.
pub const OUT_OF_STOCK: &str = "Quantidade solicitada fora de estoque";
/// `add_product` failed for any reason other than stock.
pub const ADD_FAILED: &str = "Erro na adição do produto";
/// `remove_product` targeted a product that is not in the cart.
pub const REMOVE_FAILED: &str = "Erro na remoção do produto";
/// `update_product_amount` failed for any reason other than stock.
pub const UPDATE_FAILED: &str = "Erro na alteração de quantidade do produto";

/// The cart operation that raised a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CartOperation {
    Add,
    Remove,
    UpdateAmount,
}

impl CartOperation {
    pub fn as_str(&self) -> &'static str {
        match self {
            CartOperation::Add => "add",
            CartOperation::Remove => "remove",
            CartOperation::UpdateAmount => "update_amount",
        }
    }

    /// Generic message for a failure of this operation.
    pub fn failure_message(&self) -> &'static str {
        match self {
            CartOperation::Add => ADD_FAILED,
            CartOperation::Remove => REMOVE_FAILED,
            CartOperation::UpdateAmount => UPDATE_FAILED,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Error,
}

/// A transient message for the shopper.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub operation: CartOperation,
    pub message: String,
    pub raised_at: DateTime<Utc>,
}

impl Notice {
    pub fn error(operation: CartOperation, message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            operation,
            message: message.into(),
            raised_at: Utc::now(),
        }
    }
}

/// Sink for notices; the front-end decides how to show them.
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}

impl<N> Notifier for std::sync::Arc<N>
where
    N: Notifier + ?Sized,
{
    fn notify(&self, notice: Notice) {
        (**self).notify(notice)
    }
}

/// Notifier that only logs.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notice: Notice) {
        tracing::warn!(
            operation = notice.operation.as_str(),
            message = %notice.message,
            "cart notice"
        );
    }
}

/// Notifier that publishes every notice on an event bus, so any number of
/// toast renderers can subscribe.
#[derive(Debug, Clone)]
pub struct BusNotifier<B> {
    bus: B,
}

impl<B> BusNotifier<B> {
    pub fn new(bus: B) -> Self {
        Self { bus }
    }

    pub fn bus(&self) -> &B {
        &self.bus
    }
}

impl<B> Notifier for BusNotifier<B>
where
    B: EventBus<Notice>,
{
    fn notify(&self, notice: Notice) {
        if let Err(err) = self.bus.publish(notice) {
            tracing::error!("failed to publish cart notice: {err:?}");
        }
    }
}
