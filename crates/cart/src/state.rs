//! Observable holder for the current cart.
//!
//! Every consumer reads the same `Arc<Cart>`; `replace` is the only way to
//! change it and notifies all subscribers synchronously, in subscription
//! order, before returning.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use rocketshoes_core::Cart;

type Subscriber = Arc<dyn Fn(&Arc<Cart>) + Send + Sync>;

/// Handle returned by [`CartState::subscribe`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

pub struct CartState {
    cart: RwLock<Arc<Cart>>,
    subscribers: RwLock<Vec<(SubscriptionId, Subscriber)>>,
    next_id: AtomicU64,
}

impl CartState {
    pub fn new(initial: Cart) -> Self {
        Self {
            cart: RwLock::new(Arc::new(initial)),
            subscribers: RwLock::new(Vec::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Current snapshot.
    pub fn get(&self) -> Arc<Cart> {
        self.cart
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Swap in `next` and notify every subscriber with it.
    pub fn replace(&self, next: Cart) -> Arc<Cart> {
        let next = Arc::new(next);
        *self.cart.write().unwrap_or_else(PoisonError::into_inner) = next.clone();

        // Snapshot the list so callbacks may (un)subscribe without deadlocking.
        let subscribers: Vec<Subscriber> = self
            .subscribers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(_, callback)| callback.clone())
            .collect();

        for callback in subscribers {
            callback(&next);
        }

        next
    }

    /// Register `callback` to run after every change.
    pub fn subscribe<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&Arc<Cart>) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let callback: Subscriber = Arc::new(callback);
        self.subscribers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id, callback));
        id
    }

    /// Returns `false` when `id` was not subscribed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subs = self.subscribers.write().unwrap_or_else(PoisonError::into_inner);
        let before = subs.len();
        subs.retain(|(sub_id, _)| *sub_id != id);
        subs.len() != before
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl Default for CartState {
    fn default() -> Self {
        Self::new(Cart::new())
    }
}

impl core::fmt::Debug for CartState {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CartState")
            .field("cart", &self.get())
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rocketshoes_core::{LineItem, Product, ProductId};
    use std::sync::Mutex;
    use std::sync::atomic::AtomicUsize;

    fn one_item_cart() -> Cart {
        Cart::from(vec![LineItem::new(Product::new(ProductId::new(1), "Tênis", 99.9))])
    }

    #[test]
    fn subscribers_see_the_same_snapshot_as_readers() {
        let state = Arc::new(CartState::default());
        let seen: Arc<Mutex<Vec<Arc<Cart>>>> = Arc::new(Mutex::new(Vec::new()));

        let seen_clone = seen.clone();
        state.subscribe(move |cart| seen_clone.lock().unwrap().push(cart.clone()));

        let committed = state.replace(one_item_cart());

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert!(Arc::ptr_eq(&seen[0], &committed));
        assert!(Arc::ptr_eq(&state.get(), &committed));
    }

    #[test]
    fn unsubscribed_callbacks_are_not_called() {
        let state = CartState::default();
        let calls = Arc::new(AtomicUsize::new(0));

        let calls_clone = calls.clone();
        let id = state.subscribe(move |_| {
            calls_clone.fetch_add(1, Ordering::SeqCst);
        });

        state.replace(Cart::new());
        assert!(state.unsubscribe(id));
        assert!(!state.unsubscribe(id));
        state.replace(Cart::new());

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(state.subscriber_count(), 0);
    }

    #[test]
    fn callback_may_subscribe_during_notification() {
        let state = Arc::new(CartState::default());

        let inner = state.clone();
        state.subscribe(move |_| {
            inner.subscribe(|_| {});
        });

        state.replace(Cart::new());
        assert_eq!(state.subscriber_count(), 2);
    }
}
