//! # Cart Arithmetic Engine
//!
//! Computes the new cart aggregate and the affected item totals for each
//! cart-line lifecycle event. Pure: no I/O, no clock, no hidden state.
//!
//! ## Item Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │    absent ──create(qty)──► present(qty > 0) ──delete──► absent          │
//! │                              │        ▲                                 │
//! │                              └update──┘                                 │
//! │                                (new qty > 0)                            │
//! │                                                                         │
//! │  Every event yields TWO writes that must commit together:               │
//! │    1. the cart_items row (insert / update / delete)                     │
//! │    2. the carts row aggregate (quantity, price, weight)                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Arithmetic
//! ```text
//! create:  item.price  = qty × product.offer
//!          item.weight = round2(qty × product.weight)
//!          cart        += (qty, item.price), weight = round2(cart + item.weight)
//!
//! update:  diff = new − old
//!          item.price  = new × snapshot.offer
//!          item.weight = round2(new × snapshot.weight)
//!          cart ±= |diff| × (1, snapshot.offer, snapshot.weight)
//!          cart.weight = round2(cart.weight)
//!
//! delete:  cart −= (item.qty, item.price)
//!          cart.weight = round2(cart.weight − item.weight)
//! ```
//!
//! Weight is rounded at every step rather than once at the end, so the
//! cart weight may drift from the sum of item weights by up to 0.015 g per
//! update. Quantity and price are integers and never drift.

use serde::Serialize;

use crate::error::{CoreError, CoreResult};
use crate::money::{format_rupiah, Money};
use crate::types::{Cart, CartItem, Product};
use crate::validation::Quantity;
use crate::weight::{format_weight, round2};

// =============================================================================
// Snapshots
// =============================================================================

/// Aggregate fields written to the cart row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CartAggregate {
    pub quantity: i64,
    pub total_price: String,
    pub total_price_value: i64,
    pub total_weight: String,
    pub total_weight_value: f64,
}

impl CartAggregate {
    /// Aggregate of a freshly created cart: `Rp 0`, `0.00gr`.
    pub fn empty() -> CoreResult<Self> {
        Self::from_values(0, 0, 0.0)
    }

    fn from_values(quantity: i64, price: i64, weight: f64) -> CoreResult<Self> {
        Ok(CartAggregate {
            quantity,
            total_price: format_rupiah(price)?,
            total_price_value: price,
            total_weight: format_weight(weight),
            total_weight_value: weight,
        })
    }
}

/// Totals written to the affected cart_items row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemTotals {
    pub quantity: i64,
    pub total_price: String,
    pub total_price_value: i64,
    pub total_weight: String,
    pub total_weight_value: f64,
}

impl ItemTotals {
    fn compute(quantity: Quantity, unit_price: Money, unit_weight: f64) -> CoreResult<Self> {
        let qty = quantity.get();
        let price = unit_price.checked_mul_quantity(qty)?;
        let weight = round2(qty as f64 * unit_weight);

        Ok(ItemTotals {
            quantity: qty,
            total_price: price.format()?,
            total_price_value: price.rupiah(),
            total_weight: format_weight(weight),
            total_weight_value: weight,
        })
    }
}

/// Output of create/update: both rows' new values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CartItemChange {
    pub item: ItemTotals,
    pub cart: CartAggregate,
}

// =============================================================================
// Operations
// =============================================================================

/// Adds a new line for `product` to `cart`.
///
/// The caller must have checked that the cart holds no line for this
/// product yet; merging into an existing line goes through
/// [`calculate_update_cart_item`].
///
/// ## Example
/// ```text
/// cart {qty 0, Rp 0, 0.00gr} + product {offer 9000, 500 g} × 2
///   → item {qty 2, Rp 18.000, 1.00kg}
///   → cart {qty 2, Rp 18.000, 1.00kg}
/// ```
pub fn calculate_create_cart_item(
    cart: &Cart,
    product: &Product,
    quantity: Quantity,
) -> CoreResult<CartItemChange> {
    let item = ItemTotals::compute(quantity, product.offer_price(), product.weight_value)?;

    let cart_quantity = add_quantity(cart.quantity, item.quantity)?;
    let cart_price = cart
        .total_price()
        .checked_add(Money::from_rupiah(item.total_price_value))?;
    let cart_weight = round2(cart.total_weight_value + item.total_weight_value);

    Ok(CartItemChange {
        cart: CartAggregate::from_values(cart_quantity, cart_price.rupiah(), cart_weight)?,
        item,
    })
}

/// Sets an existing line to `quantity`.
///
/// Item totals are recomputed from the line's snapshot. The cart aggregate
/// is adjusted by the difference only, never recomputed from scratch.
///
/// ## Errors
/// - `CoreError::ItemNotInCart` if `item.cart_id != cart.id`
/// - `CoreError::AmountOverflow` on arithmetic overflow
pub fn calculate_update_cart_item(
    cart: &Cart,
    item: &CartItem,
    quantity: Quantity,
) -> CoreResult<CartItemChange> {
    ensure_owned(cart, item)?;

    let unit_price = item.unit_price();
    let unit_weight = item.product_weight_value;
    let totals = ItemTotals::compute(quantity, unit_price, unit_weight)?;

    let diff = quantity
        .get()
        .checked_sub(item.quantity)
        .ok_or(CoreError::AmountOverflow {
            operation: "quantity difference",
        })?;
    let diff_abs = diff.checked_abs().ok_or(CoreError::AmountOverflow {
        operation: "quantity difference",
    })?;
    let price_delta = unit_price.checked_mul_quantity(diff_abs)?;
    let weight_delta = diff_abs as f64 * unit_weight;

    let (cart_quantity, cart_price, cart_weight) = if diff > 0 {
        (
            add_quantity(cart.quantity, diff_abs)?,
            cart.total_price().checked_add(price_delta)?,
            cart.total_weight_value + weight_delta,
        )
    } else {
        (
            sub_quantity(cart.quantity, diff_abs)?,
            cart.total_price().checked_sub(price_delta)?,
            cart.total_weight_value - weight_delta,
        )
    };

    Ok(CartItemChange {
        cart: CartAggregate::from_values(cart_quantity, cart_price.rupiah(), round2(cart_weight))?,
        item: totals,
    })
}

/// Removes a line from the cart.
///
/// There is no underflow guard: the caller must pass an item whose totals
/// were actually counted into this cart's aggregate.
pub fn calculate_delete_cart_item(cart: &Cart, item: &CartItem) -> CoreResult<CartAggregate> {
    ensure_owned(cart, item)?;

    let cart_quantity = sub_quantity(cart.quantity, item.quantity)?;
    let cart_price = cart
        .total_price()
        .checked_sub(Money::from_rupiah(item.total_price_value))?;
    let cart_weight = round2(cart.total_weight_value - item.total_weight_value);

    CartAggregate::from_values(cart_quantity, cart_price.rupiah(), cart_weight)
}

// =============================================================================
// Helpers
// =============================================================================

fn ensure_owned(cart: &Cart, item: &CartItem) -> CoreResult<()> {
    if item.cart_id != cart.id {
        return Err(CoreError::ItemNotInCart {
            item_uid: item.uid.clone(),
            cart_uid: cart.uid.clone(),
        });
    }
    Ok(())
}

fn add_quantity(current: i64, delta: i64) -> CoreResult<i64> {
    current.checked_add(delta).ok_or(CoreError::AmountOverflow {
        operation: "cart quantity",
    })
}

fn sub_quantity(current: i64, delta: i64) -> CoreResult<i64> {
    current.checked_sub(delta).ok_or(CoreError::AmountOverflow {
        operation: "cart quantity",
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ProductStatus;
    use chrono::Utc;
    use proptest::prelude::*;

    fn empty_cart() -> Cart {
        let now = Utc::now();
        Cart {
            id: 1,
            uid: "cart-1".to_string(),
            quantity: 0,
            total_price: "Rp 0".to_string(),
            total_price_value: 0,
            total_weight: "0.00gr".to_string(),
            total_weight_value: 0.0,
            user_id: 1,
            version: 0,
            items: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    fn product(id: i64, offer: i64, weight: f64) -> Product {
        let now = Utc::now();
        Product {
            id,
            uid: format!("product-{id}"),
            name: format!("Produk {id}"),
            slug: format!("produk-{id}"),
            sku: None,
            description: "Deskripsi produk yang cukup panjang untuk lolos.".to_string(),
            images: vec![format!("https://cdn.example.com/{id}.jpg")],
            weight: format_weight(weight),
            weight_value: weight,
            base_price: format_rupiah(offer).unwrap(),
            base_price_value: offer,
            offer_price: format_rupiah(offer).unwrap(),
            offer_price_value: offer,
            discount: 0,
            stock: 100,
            status: ProductStatus::Active,
            created_at: now,
            updated_at: now,
        }
    }

    fn qty(n: i64) -> Quantity {
        Quantity::new(n).unwrap()
    }

    /// Builds the row the gateway would insert and applies the aggregate.
    fn apply_create(cart: &mut Cart, product: &Product, change: &CartItemChange, id: i64) {
        let now = Utc::now();
        cart.items.push(CartItem {
            id,
            uid: format!("item-{id}"),
            quantity: change.item.quantity,
            total_price: change.item.total_price.clone(),
            total_price_value: change.item.total_price_value,
            total_weight: change.item.total_weight.clone(),
            total_weight_value: change.item.total_weight_value,
            product_name: product.name.clone(),
            product_slug: product.slug.clone(),
            product_image: product.images[0].clone(),
            product_weight: product.weight.clone(),
            product_weight_value: product.weight_value,
            base_price: product.base_price.clone(),
            base_price_value: product.base_price_value,
            offer_price: product.offer_price.clone(),
            offer_price_value: product.offer_price_value,
            discount: product.discount,
            cart_id: cart.id,
            product_id: product.id,
            created_at: now,
            updated_at: now,
        });
        apply_aggregate(cart, &change.cart);
    }

    fn apply_update(cart: &mut Cart, index: usize, change: &CartItemChange) {
        let item = &mut cart.items[index];
        item.quantity = change.item.quantity;
        item.total_price = change.item.total_price.clone();
        item.total_price_value = change.item.total_price_value;
        item.total_weight = change.item.total_weight.clone();
        item.total_weight_value = change.item.total_weight_value;
        apply_aggregate(cart, &change.cart);
    }

    fn apply_aggregate(cart: &mut Cart, aggregate: &CartAggregate) {
        cart.quantity = aggregate.quantity;
        cart.total_price = aggregate.total_price.clone();
        cart.total_price_value = aggregate.total_price_value;
        cart.total_weight = aggregate.total_weight.clone();
        cart.total_weight_value = aggregate.total_weight_value;
        cart.version += 1;
    }

    #[test]
    fn test_empty_aggregate() {
        let empty = CartAggregate::empty().unwrap();
        assert_eq!(empty.quantity, 0);
        assert_eq!(empty.total_price, "Rp 0");
        assert_eq!(empty.total_weight, "0.00gr");
    }

    #[test]
    fn test_create_into_empty_cart() {
        let cart = empty_cart();
        let change = calculate_create_cart_item(&cart, &product(10, 9000, 500.0), qty(2)).unwrap();

        assert_eq!(change.item.quantity, 2);
        assert_eq!(change.item.total_price_value, 18000);
        assert_eq!(change.item.total_price, "Rp 18.000");
        assert_eq!(change.item.total_weight_value, 1000.0);
        assert_eq!(change.item.total_weight, "1.00kg");

        assert_eq!(change.cart.quantity, 2);
        assert_eq!(change.cart.total_price_value, 18000);
        assert_eq!(change.cart.total_price, "Rp 18.000");
        assert_eq!(change.cart.total_weight, "1.00kg");
    }

    #[test]
    fn test_create_adds_to_existing_aggregate() {
        let mut cart = empty_cart();
        let first = product(10, 9000, 500.0);
        let change = calculate_create_cart_item(&cart, &first, qty(2)).unwrap();
        apply_create(&mut cart, &first, &change, 1);

        let second = product(11, 12500, 333.33);
        let change = calculate_create_cart_item(&cart, &second, qty(3)).unwrap();
        assert_eq!(change.item.total_weight_value, 999.99);
        assert_eq!(change.item.total_weight, "999.99gr");
        assert_eq!(change.cart.quantity, 5);
        assert_eq!(change.cart.total_price_value, 18000 + 37500);
        assert_eq!(change.cart.total_weight_value, 1999.99);
        assert_eq!(change.cart.total_weight, "2.00kg");
    }

    #[test]
    fn test_update_increase_adjusts_by_delta() {
        let mut cart = empty_cart();
        let p = product(10, 9000, 500.0);
        let change = calculate_create_cart_item(&cart, &p, qty(2)).unwrap();
        apply_create(&mut cart, &p, &change, 1);

        // Another line contributes to the aggregate; a full recompute from
        // this single item would lose it.
        cart.quantity += 4;
        cart.total_price_value += 4000;

        let change = calculate_update_cart_item(&cart, &cart.items[0], qty(5)).unwrap();
        assert_eq!(change.item.quantity, 5);
        assert_eq!(change.item.total_price_value, 45000);
        assert_eq!(change.item.total_weight, "2.50kg");
        assert_eq!(change.cart.quantity, 2 + 4 + 3);
        assert_eq!(change.cart.total_price_value, 18000 + 4000 + 27000);
        assert_eq!(change.cart.total_weight_value, 2500.0);
    }

    #[test]
    fn test_update_decrease_and_unchanged() {
        let mut cart = empty_cart();
        let p = product(10, 9000, 500.0);
        let change = calculate_create_cart_item(&cart, &p, qty(5)).unwrap();
        apply_create(&mut cart, &p, &change, 1);

        let change = calculate_update_cart_item(&cart, &cart.items[0], qty(1)).unwrap();
        assert_eq!(change.cart.quantity, 1);
        assert_eq!(change.cart.total_price_value, 9000);
        assert_eq!(change.cart.total_weight, "500.00gr");

        let change = calculate_update_cart_item(&cart, &cart.items[0], qty(5)).unwrap();
        assert_eq!(change.cart.quantity, cart.quantity);
        assert_eq!(change.cart.total_price_value, cart.total_price_value);
    }

    #[test]
    fn test_update_uses_snapshot_not_live_price() {
        let mut cart = empty_cart();
        let p = product(10, 9000, 500.0);
        let change = calculate_create_cart_item(&cart, &p, qty(1)).unwrap();
        apply_create(&mut cart, &p, &change, 1);

        // The catalog price rises afterwards; the line keeps its snapshot.
        let _repriced = product(10, 20000, 500.0);
        let change = calculate_update_cart_item(&cart, &cart.items[0], qty(2)).unwrap();
        assert_eq!(change.item.total_price_value, 18000);
    }

    #[test]
    fn test_delete_restores_aggregate() {
        let mut cart = empty_cart();
        let p = product(10, 9000, 500.0);
        let change = calculate_create_cart_item(&cart, &p, qty(2)).unwrap();
        apply_create(&mut cart, &p, &change, 1);

        let aggregate = calculate_delete_cart_item(&cart, &cart.items[0]).unwrap();
        assert_eq!(aggregate, CartAggregate::empty().unwrap());
    }

    #[test]
    fn test_foreign_item_rejected() {
        let mut cart = empty_cart();
        let p = product(10, 9000, 500.0);
        let change = calculate_create_cart_item(&cart, &p, qty(2)).unwrap();
        apply_create(&mut cart, &p, &change, 1);

        let mut other = empty_cart();
        other.id = 2;
        other.uid = "cart-2".to_string();

        assert!(matches!(
            calculate_update_cart_item(&other, &cart.items[0], qty(3)),
            Err(CoreError::ItemNotInCart { .. })
        ));
        assert!(matches!(
            calculate_delete_cart_item(&other, &cart.items[0]),
            Err(CoreError::ItemNotInCart { .. })
        ));
    }

    #[test]
    fn test_price_overflow_is_reported() {
        let cart = empty_cart();
        let p = product(10, i64::MAX / 2, 500.0);
        assert!(matches!(
            calculate_create_cart_item(&cart, &p, qty(3)),
            Err(CoreError::AmountOverflow { .. })
        ));
    }

    // =========================================================================
    // Property Tests
    // =========================================================================

    #[derive(Debug, Clone)]
    enum Op {
        Add { product: usize, qty: i64 },
        Update { slot: usize, qty: i64 },
        Delete { slot: usize },
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            (0usize..4, 1i64..=50).prop_map(|(product, qty)| Op::Add { product, qty }),
            (0usize..8, 1i64..=50).prop_map(|(slot, qty)| Op::Update { slot, qty }),
            (0usize..8).prop_map(|slot| Op::Delete { slot }),
        ]
    }

    fn catalog_strategy() -> impl Strategy<Value = Vec<Product>> {
        // Weights have at most two decimals, like validated catalog input.
        prop::collection::vec((0i64..=2_000_000, 10_000i64..=500_000), 4).prop_map(|rows| {
            rows.into_iter()
                .enumerate()
                .map(|(i, (offer, centigrams))| {
                    product(100 + i as i64, offer, centigrams as f64 / 100.0)
                })
                .collect()
        })
    }

    proptest! {
        #[test]
        fn aggregate_matches_items_after_every_operation(
            catalog in catalog_strategy(),
            ops in prop::collection::vec(op_strategy(), 1..60),
        ) {
            let mut cart = empty_cart();
            let mut next_id = 1;
            let mut updates = 0u32;

            for op in ops {
                match op {
                    Op::Add { product, qty: n } => {
                        let p = &catalog[product];
                        match cart.items.iter().position(|i| i.product_id == p.id) {
                            Some(index) => {
                                let merged = (cart.items[index].quantity + n).min(999);
                                let change = calculate_update_cart_item(
                                    &cart, &cart.items[index], qty(merged),
                                ).unwrap();
                                apply_update(&mut cart, index, &change);
                                updates += 1;
                            }
                            None => {
                                let change = calculate_create_cart_item(&cart, p, qty(n)).unwrap();
                                apply_create(&mut cart, p, &change, next_id);
                                next_id += 1;
                            }
                        }
                    }
                    Op::Update { slot, qty: n } => {
                        if cart.items.is_empty() {
                            continue;
                        }
                        let index = slot % cart.items.len();
                        let change = calculate_update_cart_item(
                            &cart, &cart.items[index], qty(n),
                        ).unwrap();
                        apply_update(&mut cart, index, &change);
                        updates += 1;
                    }
                    Op::Delete { slot } => {
                        if cart.items.is_empty() {
                            continue;
                        }
                        let index = slot % cart.items.len();
                        let aggregate = calculate_delete_cart_item(&cart, &cart.items[index]).unwrap();
                        cart.items.remove(index);
                        apply_aggregate(&mut cart, &aggregate);
                    }
                }

                let quantity: i64 = cart.items.iter().map(|i| i.quantity).sum();
                let price: i64 = cart.items.iter().map(|i| i.total_price_value).sum();
                let weight: f64 = cart.items.iter().map(|i| i.total_weight_value).sum();

                prop_assert_eq!(cart.quantity, quantity);
                prop_assert_eq!(cart.total_price_value, price);

                let drift = (cart.total_weight_value - weight).abs();
                let bound = 0.015 * f64::from(updates) + 1e-6;
                prop_assert!(
                    drift <= bound,
                    "weight drift {} exceeds {} after {} updates", drift, bound, updates
                );
            }
        }

        #[test]
        fn item_weight_has_two_decimals(centigrams in 10_000i64..=500_000, n in 1i64..=999) {
            let p = product(1, 5000, centigrams as f64 / 100.0);
            let change = calculate_create_cart_item(&empty_cart(), &p, qty(n)).unwrap();
            let scaled = change.item.total_weight_value * 100.0;
            prop_assert!((scaled - scaled.round()).abs() < 1e-6);
        }
    }
}
