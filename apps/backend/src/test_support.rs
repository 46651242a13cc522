//! Shared fixtures for service tests.

use std::sync::Arc;

use pasar_core::{
    AesGcmCipher, Cart, NewProduct, NewUser, PageLimit, Product, ProductInput, ProductView, User,
};
use pasar_db::{CartGateway, Database, DbConfig};

use crate::auth::tests::SECRET;
use crate::auth::JwtVerifier;
use crate::bootstrap::AppState;

const CURSOR_KEY: &str = "000102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1e1f";

/// Services over a migrated in-memory database.
pub(crate) struct TestApp {
    pub state: AppState,
}

impl TestApp {
    pub const DEFAULT_LIMIT: i64 = 4;

    pub async fn new() -> Self {
        let db = Database::new(DbConfig::in_memory())
            .await
            .expect("in-memory database");
        let cipher = AesGcmCipher::from_hex_key(CURSOR_KEY).expect("cursor key");
        let limit = PageLimit::new(Self::DEFAULT_LIMIT).expect("page limit");

        let verifier = JwtVerifier::new(SECRET);
        let state = AppState::new(db, Arc::new(cipher), Arc::new(verifier), limit);
        TestApp { state }
    }

    /// Admin-style input for an active product.
    pub fn input(name: &str, base_price: i64, discount: i64, weight: f64) -> ProductInput {
        ProductInput {
            name: name.to_string(),
            sku: None,
            description: format!("{name} pilihan, dikemas rapi dan dikirim dari gudang Bandung."),
            images: vec![format!("https://cdn.example.com/{}.jpg", name.len())],
            weight_value: weight,
            base_price_value: base_price,
            discount,
            stock: 100,
            status: "ACTIVE".to_string(),
        }
    }

    /// Creates a product through the service and returns its view.
    pub async fn product(
        &self,
        name: &str,
        base_price: i64,
        discount: i64,
        weight: f64,
    ) -> ProductView {
        let product = NewProduct::new(Self::input(name, base_price, discount, weight))
            .expect("valid product");
        let uid = self.state.products.create(&product).await.expect("product create");
        self.state
            .products
            .get_by_uid(&uid)
            .await
            .expect("product read")
            .expect("product exists")
    }

    /// Like [`product`](Self::product), but the stored model with its id.
    pub async fn product_model(
        &self,
        name: &str,
        base_price: i64,
        discount: i64,
        weight: f64,
    ) -> Product {
        let view = self.product(name, base_price, discount, weight).await;
        self.state
            .db
            .carts()
            .get_product_by_uid(&view.uid)
            .await
            .expect("product read")
            .expect("product exists")
    }

    pub async fn user(&self, email: &str) -> User {
        let new_user = NewUser::new(&format!("auth-{email}"), email).expect("valid user");
        self.state.users.sign_up(&new_user).await.expect("sign up")
    }

    /// The user's cart as currently stored.
    pub async fn cart(&self, user_id: i64) -> Cart {
        self.state
            .carts
            .get_cart_model_by_user_id(user_id)
            .await
            .expect("cart read")
            .expect("cart exists")
    }
}
