//! The cart manager: mutations mediated by stock checks, written through to
//! the durable store, observed by subscribers.

use std::sync::Arc;

use rocketshoes_core::{Cart, ProductId};
use serde::{Deserialize, Serialize};

use crate::catalog::CatalogApi;
use crate::error::CartError;
use crate::notice::{CartOperation, Notice, Notifier};
use crate::state::{CartState, SubscriptionId};
use crate::storage::{DEFAULT_CART_KEY, KeyValueStore, StorageError};

/// Arguments of [`CartManager::update_product_amount`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductAmount {
    pub product_id: ProductId,
    /// Requested quantity; zero or below is ignored.
    pub amount: i64,
}

/// Shopping cart state container.
///
/// Operations never return errors: every rejection or failure ends as a
/// [`Notice`] on the notifier and leaves the cart untouched. Each operation
/// is expected to finish before the next one starts; two overlapping calls
/// may both compute from the same base cart.
pub struct CartManager<A, S, N> {
    api: A,
    store: S,
    notifier: N,
    key: String,
    state: CartState,
}

impl<A, S, N> CartManager<A, S, N>
where
    A: CatalogApi,
    S: KeyValueStore,
    N: Notifier,
{
    /// Load the cart persisted under [`DEFAULT_CART_KEY`].
    pub fn new(api: A, store: S, notifier: N) -> Self {
        Self::with_key(api, store, notifier, DEFAULT_CART_KEY)
    }

    /// Load the cart persisted under `key`.
    ///
    /// A missing entry is an empty cart. So is an unreadable or unparseable
    /// one; that case is logged and the bad value is left in place until the
    /// next commit overwrites it.
    pub fn with_key(api: A, store: S, notifier: N, key: impl Into<String>) -> Self {
        let key = key.into();
        let initial = load_cart(&store, &key);
        tracing::info!(key = %key, items = initial.len(), "cart loaded");

        Self {
            api,
            store,
            notifier,
            key,
            state: CartState::new(initial),
        }
    }

    /// Current cart snapshot.
    pub fn cart(&self) -> Arc<Cart> {
        self.state.get()
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Run `callback` with the new cart after every commit.
    pub fn subscribe<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&Arc<Cart>) + Send + Sync + 'static,
    {
        self.state.subscribe(callback)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.state.unsubscribe(id)
    }

    /// Add one unit of a product.
    pub async fn add_product(&self, product_id: ProductId) {
        if let Err(err) = self.try_add_product(product_id).await {
            self.report(CartOperation::Add, product_id, err);
        }
    }

    /// Remove a product's line item entirely.
    pub fn remove_product(&self, product_id: ProductId) {
        if let Err(err) = self.try_remove_product(product_id) {
            self.report(CartOperation::Remove, product_id, err);
        }
    }

    /// Set a product's quantity.
    ///
    /// Quantities of zero or below are ignored without a lookup. A product
    /// that has no line item is also left alone, without a notice.
    pub async fn update_product_amount(&self, update: UpdateProductAmount) {
        let UpdateProductAmount { product_id, amount } = update;
        if amount <= 0 {
            tracing::debug!(%product_id, amount, "ignoring non-positive amount");
            return;
        }

        if let Err(err) = self.try_update_product_amount(product_id, amount).await {
            self.report(CartOperation::UpdateAmount, product_id, err);
        }
    }

    /// Empty the cart, persisting the empty state.
    pub fn clear(&self) -> Result<(), CartError> {
        self.commit(Cart::new())
    }

    async fn try_add_product(&self, product_id: ProductId) -> Result<(), CartError> {
        let stock = self.api.stock(product_id).await?;
        let product = self.api.product(product_id).await?;

        let next = self.state.get().with_added(product, stock)?;
        self.commit(next)
    }

    fn try_remove_product(&self, product_id: ProductId) -> Result<(), CartError> {
        let next = self.state.get().without(product_id)?;
        self.commit(next)
    }

    async fn try_update_product_amount(
        &self,
        product_id: ProductId,
        amount: i64,
    ) -> Result<(), CartError> {
        let stock = self.api.stock(product_id).await?;

        // Anything past u32 is certainly past the stock ceiling.
        let requested = u32::try_from(amount).unwrap_or(u32::MAX);

        match self.state.get().with_amount(product_id, requested, stock)? {
            Some(next) => self.commit(next),
            None => {
                tracing::debug!(%product_id, "product not in cart; amount left unchanged");
                Ok(())
            }
        }
    }

    /// Persist `next`, then publish it to memory and subscribers.
    ///
    /// The durable write goes first: if it fails, neither copy changes.
    fn commit(&self, next: Cart) -> Result<(), CartError> {
        let payload = serde_json::to_string(&next).map_err(StorageError::from)?;
        self.store.set(&self.key, &payload)?;

        let committed = self.state.replace(next);
        tracing::info!(
            key = %self.key,
            items = committed.len(),
            units = committed.total_amount(),
            "cart committed"
        );
        Ok(())
    }

    fn report(&self, operation: CartOperation, product_id: ProductId, err: CartError) {
        let message = err.notice_message(operation);
        tracing::warn!(
            operation = operation.as_str(),
            %product_id,
            error = %err,
            "cart operation rejected"
        );
        self.notifier.notify(Notice::error(operation, message));
    }
}

fn load_cart<S: KeyValueStore>(store: &S, key: &str) -> Cart {
    match store.get(key) {
        Ok(Some(raw)) => match serde_json::from_str(&raw) {
            Ok(cart) => cart,
            Err(err) => {
                tracing::warn!(key = %key, "stored cart is unparseable; starting empty: {err}");
                Cart::new()
            }
        },
        Ok(None) => Cart::new(),
        Err(err) => {
            tracing::warn!(key = %key, "failed to read stored cart; starting empty: {err}");
            Cart::new()
        }
    }
}

impl<A, S, N> core::fmt::Debug for CartManager<A, S, N> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CartManager")
            .field("key", &self.key)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}
