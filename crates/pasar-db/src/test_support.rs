//! Shared fixtures for repository tests.

use pasar_core::metadata::Metadata;
use pasar_core::{NewProduct, NewUser, Product, ProductInput, User};

use crate::gateway::{ProductGateway, ProductRecord, UserGateway};
use crate::{Database, DbConfig};

/// A migrated in-memory database.
pub(crate) struct TestContext {
    pub db: Database,
}

impl TestContext {
    pub async fn new() -> Self {
        let db = Database::new(DbConfig::in_memory())
            .await
            .expect("in-memory database");
        TestContext { db }
    }

    /// A valid product record with one image and ample stock.
    pub fn record(name: &str, base_price: i64, discount: i64, weight: f64) -> ProductRecord {
        let product = NewProduct::new(ProductInput {
            name: name.to_string(),
            sku: None,
            description: format!("{name} pilihan, dikemas rapi dan dikirim dari gudang Bandung."),
            images: vec![format!("https://cdn.example.com/{}.jpg", name.len())],
            weight_value: weight,
            base_price_value: base_price,
            discount,
            stock: 100,
            status: "ACTIVE".to_string(),
        })
        .expect("valid product input");

        ProductRecord::derive(&product).expect("derivable product")
    }

    pub async fn product(&self, name: &str, base_price: i64, discount: i64, weight: f64) -> Product {
        let repo = self.db.products();
        let uid = repo
            .create(&Metadata::generate(), &Self::record(name, base_price, discount, weight))
            .await
            .expect("product insert");
        repo.get_by_uid(&uid)
            .await
            .expect("product read")
            .expect("product exists")
    }

    pub async fn user(&self, email: &str) -> User {
        let new_user = NewUser::new(&format!("auth-{email}"), email).expect("valid user");
        self.db
            .users()
            .create_user(&new_user, false)
            .await
            .expect("user insert")
    }
}
