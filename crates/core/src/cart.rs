//! Cart line items and the pure rules that govern them.
//!
//! Every rule here is deterministic: it takes the current cart plus whatever
//! the catalog answered, and returns the next cart (or a `DomainError`).
//! Fetching and persisting happen in `rocketshoes-cart`.

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::id::ProductId;
use crate::product::{Product, Stock};

/// One product in the cart with its requested quantity.
///
/// Serialized flat: the product fields and `amount` live in the same object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    #[serde(flatten)]
    pub product: Product,
    pub amount: u32,
}

impl LineItem {
    /// New line item with a quantity of one.
    pub fn new(product: Product) -> Self {
        Self { product, amount: 1 }
    }

    pub fn id(&self) -> ProductId {
        self.product.id
    }

    pub fn subtotal(&self) -> f64 {
        self.product.price * f64::from(self.amount)
    }
}

/// Ordered sequence of line items; insertion order is preserved.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<LineItem>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: ProductId) -> Option<&LineItem> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub fn contains(&self, id: ProductId) -> bool {
        self.get(id).is_some()
    }

    /// Sum of every line item's quantity.
    pub fn total_amount(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.amount)).sum()
    }

    /// Sum of every line item's subtotal.
    pub fn total(&self) -> f64 {
        self.items.iter().map(LineItem::subtotal).sum()
    }

    /// Add one unit of `product`.
    ///
    /// An existing line item is incremented in place; a new one is appended
    /// with `amount = 1`. Rejected only when the line item's amount equals
    /// the stock ceiling.
    pub fn with_added(&self, product: Product, stock: Stock) -> DomainResult<Cart> {
        let id = product.id;
        let mut next = self.clone();

        match next.items.iter_mut().find(|item| item.id() == id) {
            Some(item) => {
                if item.amount == stock.amount {
                    return Err(DomainError::out_of_stock(
                        id,
                        item.amount.saturating_add(1),
                        stock.amount,
                    ));
                }
                item.amount = item.amount.saturating_add(1);
            }
            None => next.items.push(LineItem::new(product)),
        }

        Ok(next)
    }

    /// Drop the line item for `id`.
    pub fn without(&self, id: ProductId) -> DomainResult<Cart> {
        if !self.contains(id) {
            return Err(DomainError::NotInCart(id));
        }

        Ok(Cart {
            items: self
                .items
                .iter()
                .filter(|item| item.id() != id)
                .cloned()
                .collect(),
        })
    }

    /// Set the quantity of an existing line item.
    ///
    /// Returns `Ok(None)` when there is nothing to do: the product has no
    /// line item, or `amount` is zero.
    pub fn with_amount(
        &self,
        id: ProductId,
        amount: u32,
        stock: Stock,
    ) -> DomainResult<Option<Cart>> {
        if amount == 0 {
            return Ok(None);
        }
        if amount > stock.amount {
            return Err(DomainError::out_of_stock(id, amount, stock.amount));
        }

        let mut next = self.clone();
        match next.items.iter_mut().find(|item| item.id() == id) {
            Some(item) => {
                item.amount = amount;
                Ok(Some(next))
            }
            None => Ok(None),
        }
    }
}

impl From<Vec<LineItem>> for Cart {
    fn from(items: Vec<LineItem>) -> Self {
        Self { items }
    }
}

impl FromIterator<LineItem> for Cart {
    fn from_iter<I: IntoIterator<Item = LineItem>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn product(id: u64) -> Product {
        Product::new(ProductId::new(id), format!("Tênis {id}"), 100.0 + id as f64)
    }

    fn stock(id: u64, amount: u32) -> Stock {
        Stock {
            id: ProductId::new(id),
            amount,
        }
    }

    fn cart_of(entries: &[(u64, u32)]) -> Cart {
        entries
            .iter()
            .map(|(id, amount)| LineItem {
                product: product(*id),
                amount: *amount,
            })
            .collect()
    }

    #[test]
    fn add_to_empty_cart_appends_single_unit() {
        let cart = Cart::new().with_added(product(1), stock(1, 5)).unwrap();
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.items()[0].id(), ProductId::new(1));
        assert_eq!(cart.items()[0].amount, 1);
    }

    #[test]
    fn add_at_stock_ceiling_is_rejected() {
        let cart = cart_of(&[(1, 1)]);
        let err = cart.with_added(product(1), stock(1, 1)).unwrap_err();
        assert_eq!(err, DomainError::out_of_stock(ProductId::new(1), 2, 1));
    }

    #[test]
    fn add_new_product_with_zero_stock_appends_single_unit() {
        let cart = Cart::new().with_added(product(4), stock(4, 0)).unwrap();
        assert_eq!(cart, cart_of(&[(4, 1)]));
    }

    #[test]
    fn add_above_a_dropped_ceiling_still_increments() {
        let cart = cart_of(&[(1, 3)]);
        let next = cart.with_added(product(1), stock(1, 2)).unwrap();
        assert_eq!(next, cart_of(&[(1, 4)]));
    }

    #[test]
    fn without_missing_id_reports_not_in_cart() {
        let cart = cart_of(&[(3, 2)]);
        let err = cart.without(ProductId::new(9)).unwrap_err();
        assert_eq!(err, DomainError::NotInCart(ProductId::new(9)));
    }

    #[test]
    fn without_removes_only_that_item() {
        let cart = cart_of(&[(1, 1), (2, 4), (3, 2)]);
        let next = cart.without(ProductId::new(2)).unwrap();
        assert_eq!(next, cart_of(&[(1, 1), (3, 2)]));
    }

    #[test]
    fn with_amount_above_stock_is_rejected() {
        let cart = cart_of(&[(2, 1)]);
        let err = cart.with_amount(ProductId::new(2), 6, stock(2, 5)).unwrap_err();
        assert_eq!(err, DomainError::out_of_stock(ProductId::new(2), 6, 5));
    }

    #[test]
    fn with_amount_zero_is_nothing_to_do() {
        let cart = cart_of(&[(2, 3)]);
        let next = cart.with_amount(ProductId::new(2), 0, stock(2, 5)).unwrap();
        assert!(next.is_none());
    }

    #[test]
    fn with_amount_for_absent_item_is_nothing_to_do() {
        let cart = cart_of(&[(2, 1)]);
        let next = cart.with_amount(ProductId::new(8), 2, stock(8, 5)).unwrap();
        assert!(next.is_none());
    }

    #[test]
    fn with_amount_sets_exact_quantity() {
        let cart = cart_of(&[(1, 1), (2, 1)]);
        let next = cart.with_amount(ProductId::new(2), 5, stock(2, 5)).unwrap().unwrap();
        assert_eq!(next, cart_of(&[(1, 1), (2, 5)]));
    }

    #[test]
    fn totals_sum_subtotals() {
        let cart = cart_of(&[(1, 2), (2, 1)]);
        assert_eq!(cart.total_amount(), 3);
        assert!((cart.total() - (101.0 * 2.0 + 102.0)).abs() < f64::EPSILON);
    }

    #[test]
    fn line_item_serializes_flat() {
        let item = LineItem {
            product: product(1),
            amount: 3,
        };
        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(
            value,
            json!({ "id": 1, "title": "Tênis 1", "price": 101.0, "image": "", "amount": 3 })
        );
    }

    #[test]
    fn stored_cart_with_extra_fields_round_trips() {
        let raw = json!([
            { "id": 1, "title": "A", "price": 139.9, "image": "a.jpg", "amount": 2, "color": "red" },
            { "id": 5, "title": "B", "price": 99.0, "image": "b.jpg", "amount": 1 }
        ]);
        let cart: Cart = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(cart.len(), 2);
        assert_eq!(cart.items()[0].amount, 2);
        assert_eq!(cart.items()[0].product.extra.get("color"), Some(&json!("red")));
        assert_eq!(serde_json::to_value(&cart).unwrap(), raw);
    }

    mod properties {
        use super::*;

        fn distinct_cart() -> impl Strategy<Value = Vec<(u64, u32)>> {
            prop::collection::btree_map(1u64..500, 1u32..20, 0..8)
                .prop_map(|m| m.into_iter().collect())
        }

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 256,
                ..ProptestConfig::default()
            })]

            /// Property: adding a product not yet in the cart appends exactly
            /// one line item with amount 1 at the end.
            #[test]
            fn add_new_product_appends_at_end(
                entries in distinct_cart(),
                ceiling in 1u32..50
            ) {
                let cart = cart_of(&entries);
                let id = 1000;
                let next = cart.with_added(product(id), stock(id, ceiling)).unwrap();

                prop_assert_eq!(next.len(), cart.len() + 1);
                prop_assert_eq!(&next.items()[..cart.len()], cart.items());
                let last = next.items().last().unwrap();
                prop_assert_eq!(last.id(), ProductId::new(id));
                prop_assert_eq!(last.amount, 1);
            }

            /// Property: adding a product below its ceiling increments only
            /// that line item, in place.
            #[test]
            fn add_existing_below_ceiling_increments_in_place(
                entries in distinct_cart().prop_filter("non-empty", |e| !e.is_empty()),
                pick in any::<prop::sample::Index>(),
                headroom in 1u32..10
            ) {
                let cart = cart_of(&entries);
                let idx = pick.index(entries.len());
                let (id, amount) = entries[idx];

                let next = cart.with_added(product(id), stock(id, amount + headroom)).unwrap();

                prop_assert_eq!(next.len(), cart.len());
                for (i, (before, after)) in cart.items().iter().zip(next.items()).enumerate() {
                    if i == idx {
                        prop_assert_eq!(after.id(), before.id());
                        prop_assert_eq!(after.amount, before.amount + 1);
                    } else {
                        prop_assert_eq!(after, before);
                    }
                }
            }

            /// Property: at the ceiling, add is rejected.
            #[test]
            fn add_existing_at_ceiling_is_rejected(
                entries in distinct_cart().prop_filter("non-empty", |e| !e.is_empty()),
                pick in any::<prop::sample::Index>()
            ) {
                let cart = cart_of(&entries);
                let (id, amount) = entries[pick.index(entries.len())];

                let is_out_of_stock = matches!(
                    cart.with_added(product(id), stock(id, amount)),
                    Err(DomainError::OutOfStock { .. })
                );
                prop_assert!(is_out_of_stock);
            }

            /// Property: a quantity above stock never yields a new cart.
            #[test]
            fn with_amount_above_stock_never_mutates(
                entries in distinct_cart().prop_filter("non-empty", |e| !e.is_empty()),
                pick in any::<prop::sample::Index>(),
                ceiling in 0u32..20,
                excess in 1u32..20
            ) {
                let cart = cart_of(&entries);
                let (id, _) = entries[pick.index(entries.len())];
                prop_assert!(cart.with_amount(ProductId::new(id), ceiling + excess, stock(id, ceiling)).is_err());
            }
        }
    }
}
