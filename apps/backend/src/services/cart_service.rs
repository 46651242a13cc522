//! # Cart Service
//!
//! Cart use cases. The arithmetic lives in `pasar_core::cart`; this service
//! loads the rows it needs, runs the engine and hands both resulting
//! snapshots to the gateway in one call.
//!
//! ## Add Product Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  add_product(user_id, product_uid, qty)                                 │
//! │     │                                                                   │
//! │     ├── cart for user? ────────── no ──► Ok(None)                       │
//! │     ├── product by uid? ───────── no ──► Ok(None)                       │
//! │     ├── product ACTIVE? ───────── no ──► ValidationError                │
//! │     │                                                                   │
//! │     ├── line for product exists?                                        │
//! │     │     yes ──► update_cart_item(existing.qty + qty)                  │
//! │     │     no  ──► create_cart_item(qty)                                 │
//! │     │                                                                   │
//! │     └── reload ──► Ok(Some(CartView))                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A write computed from a cart that someone else changed in the meantime
//! fails with a `Conflict`; nothing is retried here.

use tracing::{debug, info};

use pasar_core::cart::{
    calculate_create_cart_item, calculate_delete_cart_item, calculate_update_cart_item,
};
use pasar_core::{Cart, CartItem, CartView, Product, Quantity};
use pasar_db::{CartAggregateUpdate, CartGateway, CartItemUpdate, NewCartItemRecord};

use crate::error::{ApiError, ApiResult};

/// Cart use cases over any [`CartGateway`].
#[derive(Debug, Clone)]
pub struct CartService<G> {
    gateway: G,
}

impl<G: CartGateway> CartService<G> {
    pub fn new(gateway: G) -> Self {
        CartService { gateway }
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// The user's cart as callers see it.
    pub async fn get_cart_by_user_id(&self, user_id: i64) -> ApiResult<Option<CartView>> {
        let cart = self.gateway.get_cart_by_user_id(user_id).await?;
        Ok(cart.as_ref().map(CartView::from))
    }

    /// The user's cart with ids and version, for further mutations.
    pub async fn get_cart_model_by_user_id(&self, user_id: i64) -> ApiResult<Option<Cart>> {
        Ok(self.gateway.get_cart_by_user_id(user_id).await?)
    }

    pub async fn get_cart_item_by_uid(&self, uid: &str) -> ApiResult<Option<CartItem>> {
        Ok(self.gateway.get_cart_item_by_uid(uid).await?)
    }

    pub async fn get_cart_item_by_product_id(
        &self,
        cart_id: i64,
        product_id: i64,
    ) -> ApiResult<Option<CartItem>> {
        Ok(self
            .gateway
            .get_cart_item_by_product_id(cart_id, product_id)
            .await?)
    }

    // =========================================================================
    // Engine-backed writes
    // =========================================================================

    /// Adds a new line for `product`. Returns the line's uid.
    pub async fn create_cart_item(
        &self,
        cart: &Cart,
        product: &Product,
        quantity: Quantity,
    ) -> ApiResult<String> {
        let change = calculate_create_cart_item(cart, product, quantity)?;

        debug!(
            cart_uid = %cart.uid,
            product_uid = %product.uid,
            quantity = quantity.get(),
            cart_total = change.cart.total_price_value,
            "Creating cart item"
        );

        let item = NewCartItemRecord::snapshot(cart, product, change.item);
        let aggregate = CartAggregateUpdate::for_cart(cart, change.cart);
        let uid = self.gateway.create_cart_item(&item, &aggregate).await?;

        Ok(uid)
    }

    /// Sets an existing line to `quantity`.
    pub async fn update_cart_item(
        &self,
        cart: &Cart,
        item: &CartItem,
        quantity: Quantity,
    ) -> ApiResult<()> {
        let change = calculate_update_cart_item(cart, item, quantity)?;

        debug!(
            cart_uid = %cart.uid,
            item_uid = %item.uid,
            from = item.quantity,
            to = quantity.get(),
            "Updating cart item"
        );

        let update = CartItemUpdate::new(item, change.item);
        let aggregate = CartAggregateUpdate::for_cart(cart, change.cart);
        self.gateway.update_cart_item(&update, &aggregate).await?;

        Ok(())
    }

    /// Removes a line and takes its totals off the cart.
    pub async fn delete_cart_item(&self, cart: &Cart, item: &CartItem) -> ApiResult<()> {
        let aggregate = calculate_delete_cart_item(cart, item)?;

        debug!(cart_uid = %cart.uid, item_uid = %item.uid, "Deleting cart item");

        let aggregate = CartAggregateUpdate::for_cart(cart, aggregate);
        self.gateway
            .delete_cart_item_by_uid(&item.uid, &aggregate)
            .await?;

        Ok(())
    }

    // =========================================================================
    // Handler-level operations
    // =========================================================================

    /// Puts `quantity` of a product into the user's cart, merging with an
    /// existing line for the same product.
    ///
    /// `Ok(None)` when the user has no cart or the product does not exist.
    pub async fn add_product(
        &self,
        user_id: i64,
        product_uid: &str,
        quantity: i64,
    ) -> ApiResult<Option<CartView>> {
        let quantity = Quantity::new(quantity)?;

        let Some(cart) = self.gateway.get_cart_by_user_id(user_id).await? else {
            return Ok(None);
        };
        let Some(product) = self.gateway.get_product_by_uid(product_uid).await? else {
            return Ok(None);
        };

        if !product.is_active() {
            return Err(ApiError::validation(format!(
                "Product {} is not available",
                product.name
            )));
        }

        match cart.item_for_product(product.id) {
            Some(existing) => {
                let merged = Quantity::new(existing.quantity.saturating_add(quantity.get()))?;
                self.update_cart_item(&cart, existing, merged).await?;
            }
            None => {
                self.create_cart_item(&cart, &product, quantity).await?;
            }
        }

        info!(user_id, product_uid, quantity = quantity.get(), "Product added to cart");

        self.get_cart_by_user_id(user_id).await
    }

    /// Sets the quantity of one of the user's lines.
    ///
    /// `Ok(None)` when the user has no cart or the line is not in it.
    pub async fn change_quantity(
        &self,
        user_id: i64,
        item_uid: &str,
        quantity: i64,
    ) -> ApiResult<Option<CartView>> {
        let quantity = Quantity::new(quantity)?;

        let Some(cart) = self.gateway.get_cart_by_user_id(user_id).await? else {
            return Ok(None);
        };
        let Some(item) = cart.items.iter().find(|item| item.uid == item_uid) else {
            return Ok(None);
        };

        self.update_cart_item(&cart, item, quantity).await?;
        self.get_cart_by_user_id(user_id).await
    }

    /// Removes one of the user's lines.
    ///
    /// `Ok(None)` when the user has no cart or the line is not in it.
    pub async fn remove_item(&self, user_id: i64, item_uid: &str) -> ApiResult<Option<CartView>> {
        let Some(cart) = self.gateway.get_cart_by_user_id(user_id).await? else {
            return Ok(None);
        };
        let Some(item) = cart.items.iter().find(|item| item.uid == item_uid) else {
            return Ok(None);
        };

        self.delete_cart_item(&cart, item).await?;
        self.get_cart_by_user_id(user_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::test_support::TestApp;

    fn assert_aggregate_matches_items(cart: &Cart) {
        let quantity: i64 = cart.items.iter().map(|item| item.quantity).sum();
        let price: i64 = cart.items.iter().map(|item| item.total_price_value).sum();
        let weight: f64 = cart.items.iter().map(|item| item.total_weight_value).sum();

        assert_eq!(cart.quantity, quantity);
        assert_eq!(cart.total_price_value, price);
        assert!((cart.total_weight_value - weight).abs() < 0.05);
    }

    #[tokio::test]
    async fn test_create_cart_item_scenario() {
        let app = TestApp::new().await;
        let user = app.user("sari@example.com").await;
        let product = app.product_model("Kopi Susu Gula Aren", 10000, 10, 500.0).await;
        let service = &app.state.carts;

        let cart = service.get_cart_model_by_user_id(user.id).await.unwrap().unwrap();
        let uid = service
            .create_cart_item(&cart, &product, Quantity::new(2).unwrap())
            .await
            .unwrap();

        let item = service.get_cart_item_by_uid(&uid).await.unwrap().unwrap();
        assert_eq!(item.total_price_value, 18000);
        assert_eq!(item.total_weight, "1.00kg");

        let cart = service.get_cart_model_by_user_id(user.id).await.unwrap().unwrap();
        assert_eq!(cart.quantity, 2);
        assert_eq!(cart.total_price_value, 18000);
        assert_eq!(cart.total_price, "Rp 18.000");

        let by_product = service
            .get_cart_item_by_product_id(cart.id, product.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(by_product.uid, uid);
    }

    #[tokio::test]
    async fn test_update_adjusts_by_delta() {
        let app = TestApp::new().await;
        let user = app.user("sari@example.com").await;
        let kopi = app.product_model("Kopi Susu Gula Aren", 10000, 10, 500.0).await;
        let teh = app.product_model("Teh Melati Wangi", 12500, 0, 100.0).await;
        let service = &app.state.carts;

        let cart = app.cart(user.id).await;
        service
            .create_cart_item(&cart, &kopi, Quantity::new(2).unwrap())
            .await
            .unwrap();
        let cart = app.cart(user.id).await;
        service
            .create_cart_item(&cart, &teh, Quantity::new(1).unwrap())
            .await
            .unwrap();

        let cart = app.cart(user.id).await;
        let line = cart.item_for_product(kopi.id).unwrap().clone();
        service
            .update_cart_item(&cart, &line, Quantity::new(5).unwrap())
            .await
            .unwrap();

        let cart = app.cart(user.id).await;
        let line = cart.item_for_product(kopi.id).unwrap();
        assert_eq!(line.quantity, 5);
        assert_eq!(line.total_price_value, 45000);
        assert_eq!(cart.quantity, 6);
        assert_eq!(cart.total_price_value, 45000 + 12500);
        assert_eq!(cart.total_weight, "2.60kg");
        assert_aggregate_matches_items(&cart);
    }

    #[tokio::test]
    async fn test_add_product_merges_lines() {
        let app = TestApp::new().await;
        let user = app.user("sari@example.com").await;
        let kopi = app.product("Kopi Susu Gula Aren", 10000, 10, 500.0).await;
        let service = &app.state.carts;

        service.add_product(user.id, &kopi.uid, 2).await.unwrap().unwrap();
        let view = service.add_product(user.id, &kopi.uid, 3).await.unwrap().unwrap();

        assert_eq!(view.cart_items.len(), 1);
        assert_eq!(view.quantity, 5);
        assert_eq!(view.cart_items[0].quantity, 5);
        assert_eq!(view.total_price_value, 45000);
        assert_eq!(view.total_weight, "2.50kg");
    }

    #[tokio::test]
    async fn test_add_product_rejects_bad_input() {
        let app = TestApp::new().await;
        let user = app.user("sari@example.com").await;
        let kopi = app.product("Kopi Susu Gula Aren", 10000, 10, 500.0).await;
        let service = &app.state.carts;

        let err = service.add_product(user.id, &kopi.uid, 0).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        service.add_product(user.id, &kopi.uid, 998).await.unwrap();
        let err = service.add_product(user.id, &kopi.uid, 2).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let cart = app.cart(user.id).await;
        assert_eq!(cart.quantity, 998);
    }

    #[tokio::test]
    async fn test_add_product_refuses_inactive_product() {
        let app = TestApp::new().await;
        let user = app.user("sari@example.com").await;
        let kopi = app.product("Kopi Susu Gula Aren", 10000, 10, 500.0).await;

        let mut input = TestApp::input("Kopi Susu Gula Aren", 10000, 10, 500.0);
        input.status = "INACTIVE".to_string();
        let inactive = pasar_core::NewProduct::new(input).unwrap();
        app.state
            .products
            .update_by_uid(&kopi.uid, &inactive)
            .await
            .unwrap()
            .unwrap();

        let err = app.state.carts.add_product(user.id, &kopi.uid, 1).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert!(app.cart(user.id).await.is_empty());
    }

    #[tokio::test]
    async fn test_missing_rows_are_none() {
        let app = TestApp::new().await;
        let user = app.user("sari@example.com").await;
        let kopi = app.product("Kopi Susu Gula Aren", 10000, 10, 500.0).await;
        let service = &app.state.carts;

        assert!(service.get_cart_by_user_id(9999).await.unwrap().is_none());
        assert!(service.add_product(9999, &kopi.uid, 1).await.unwrap().is_none());
        assert!(service.add_product(user.id, "no-such-product", 1).await.unwrap().is_none());
        assert!(service.change_quantity(user.id, "no-such-item", 1).await.unwrap().is_none());
        assert!(service.remove_item(user.id, "no-such-item").await.unwrap().is_none());
        assert!(service.get_cart_item_by_uid("no-such-item").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_change_quantity_and_remove() {
        let app = TestApp::new().await;
        let user = app.user("sari@example.com").await;
        let kopi = app.product("Kopi Susu Gula Aren", 10000, 10, 500.0).await;
        let teh = app.product("Teh Melati Wangi", 12500, 0, 100.0).await;
        let service = &app.state.carts;

        service.add_product(user.id, &kopi.uid, 2).await.unwrap();
        let view = service.add_product(user.id, &teh.uid, 4).await.unwrap().unwrap();
        let teh_line = view
            .cart_items
            .iter()
            .find(|item| item.product_slug == teh.slug)
            .unwrap()
            .uid
            .clone();

        let view = service.change_quantity(user.id, &teh_line, 1).await.unwrap().unwrap();
        assert_eq!(view.quantity, 3);
        assert_eq!(view.total_price_value, 18000 + 12500);

        let view = service.remove_item(user.id, &teh_line).await.unwrap().unwrap();
        assert_eq!(view.cart_items.len(), 1);
        assert_eq!(view.quantity, 2);
        assert_eq!(view.total_price_value, 18000);
        assert_eq!(view.total_weight, "1.00kg");

        assert_aggregate_matches_items(&app.cart(user.id).await);
    }

    #[tokio::test]
    async fn test_lines_of_other_users_are_invisible() {
        let app = TestApp::new().await;
        let sari = app.user("sari@example.com").await;
        let budi = app.user("budi@example.com").await;
        let kopi = app.product("Kopi Susu Gula Aren", 10000, 10, 500.0).await;
        let service = &app.state.carts;

        let view = service.add_product(sari.id, &kopi.uid, 2).await.unwrap().unwrap();
        let line = view.cart_items[0].uid.clone();

        assert!(service.change_quantity(budi.id, &line, 9).await.unwrap().is_none());
        assert!(service.remove_item(budi.id, &line).await.unwrap().is_none());

        let sari_cart = app.cart(sari.id).await;
        let budi_cart = app.cart(budi.id).await;
        let err = service.delete_cart_item(&budi_cart, &sari_cart.items[0]).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(app.cart(sari.id).await.quantity, 2);
    }

    #[tokio::test]
    async fn test_stale_cart_is_conflict() {
        let app = TestApp::new().await;
        let user = app.user("sari@example.com").await;
        let kopi = app.product_model("Kopi Susu Gula Aren", 10000, 10, 500.0).await;
        let teh = app.product_model("Teh Melati Wangi", 12500, 0, 100.0).await;
        let service = &app.state.carts;

        let stale = app.cart(user.id).await;
        service
            .create_cart_item(&stale, &kopi, Quantity::new(1).unwrap())
            .await
            .unwrap();

        let err = service
            .create_cart_item(&stale, &teh, Quantity::new(1).unwrap())
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::Conflict);
        assert_eq!(err.http_status(), 409);

        let cart = app.cart(user.id).await;
        assert_eq!(cart.items.len(), 1);
        assert_aggregate_matches_items(&cart);
    }

    #[tokio::test]
    async fn test_random_walk_keeps_aggregate() {
        let app = TestApp::new().await;
        let user = app.user("sari@example.com").await;
        let catalog = [
            app.product("Kopi Susu Gula Aren", 10000, 10, 500.0).await,
            app.product("Teh Melati Wangi", 12500, 0, 100.0).await,
            app.product("Gula Aren Bubuk", 30000, 25, 333.0).await,
        ];
        let service = &app.state.carts;

        // Deterministic mix of adds, changes and removals
        for step in 0..24_usize {
            let product = &catalog[step % catalog.len()];
            match step % 4 {
                0 | 1 => {
                    service
                        .add_product(user.id, &product.uid, (step % 5 + 1) as i64)
                        .await
                        .unwrap();
                }
                2 => {
                    let cart = app.cart(user.id).await;
                    if let Some(item) = cart.items.first() {
                        let uid = item.uid.clone();
                        service
                            .change_quantity(user.id, &uid, (step % 7 + 1) as i64)
                            .await
                            .unwrap();
                    }
                }
                _ => {
                    let cart = app.cart(user.id).await;
                    if let Some(item) = cart.items.last() {
                        let uid = item.uid.clone();
                        service.remove_item(user.id, &uid).await.unwrap();
                    }
                }
            }
            assert_aggregate_matches_items(&app.cart(user.id).await);
        }
    }
}
