//! # Persistence Gateway
//!
//! The storage contract the service layer is written against, plus the
//! write payloads that travel through it.
//!
//! ## Shape of a Cart Mutation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  service ──► cart engine (pure) ──► CartItemChange                      │
//! │                                         │                               │
//! │                 ┌───────────────────────┴──────────────┐                │
//! │                 ▼                                      ▼                │
//! │        NewCartItemRecord /                    CartAggregateUpdate       │
//! │        CartItemUpdate / item uid              (uid + expected version)  │
//! │                 │                                      │                │
//! │                 └──────────────┬───────────────────────┘                │
//! │                                ▼                                        │
//! │                  CartGateway: ONE transaction                           │
//! │                  1. UPDATE carts ... WHERE version = ?                  │
//! │                  2. INSERT / UPDATE / DELETE cart_items                 │
//! │                  commit, or roll back both                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Lookups return `Ok(None)` when nothing matches. Errors are reserved for
//! storage failures and rejected writes.

use chrono::{DateTime, Utc};

use pasar_core::metadata::{slugify, Metadata};
use pasar_core::pricing::calculate_price;
use pasar_core::weight::format_weight;
use pasar_core::{
    Admin, Cart, CartAggregate, CartItem, CoreResult, ItemTotals, NewProduct, NewUser,
    PageDirection, PageLimit, Product, ProductStatus, User,
};

use crate::error::DbResult;

// =============================================================================
// Write Payloads
// =============================================================================

/// Every stored product column except identity and timestamps.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductRecord {
    pub name: String,
    pub slug: String,
    pub sku: Option<String>,
    pub description: String,
    pub images: Vec<String>,
    pub weight: String,
    pub weight_value: f64,
    pub base_price: String,
    pub base_price_value: i64,
    pub offer_price: String,
    pub offer_price_value: i64,
    pub discount: i64,
    pub stock: i64,
    pub status: ProductStatus,
}

impl ProductRecord {
    /// Derives slug, display strings and the offer price from validated
    /// input.
    pub fn derive(product: &NewProduct) -> CoreResult<Self> {
        let price = calculate_price(product.base_price_value, product.discount)?;

        Ok(ProductRecord {
            name: product.name.clone(),
            slug: slugify(&product.name),
            sku: product.sku.clone(),
            description: product.description.clone(),
            images: product.images.clone(),
            weight: format_weight(product.weight_value),
            weight_value: product.weight_value,
            base_price: price.base,
            base_price_value: product.base_price_value,
            offer_price: price.offer,
            offer_price_value: price.offer_value,
            discount: product.discount.percent(),
            stock: product.stock,
            status: product.status,
        })
    }
}

/// A cart line about to be inserted, with its product snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCartItemRecord {
    pub metadata: Metadata,
    pub cart_id: i64,
    pub product_id: i64,
    pub totals: ItemTotals,
    pub product_name: String,
    pub product_slug: String,
    pub product_image: String,
    pub product_weight: String,
    pub product_weight_value: f64,
    pub base_price: String,
    pub base_price_value: i64,
    pub offer_price: String,
    pub offer_price_value: i64,
    pub discount: i64,
}

impl NewCartItemRecord {
    /// Snapshots `product` into a new line of `cart`.
    pub fn snapshot(cart: &Cart, product: &Product, totals: ItemTotals) -> Self {
        NewCartItemRecord {
            metadata: Metadata::generate(),
            cart_id: cart.id,
            product_id: product.id,
            totals,
            product_name: product.name.clone(),
            product_slug: product.slug.clone(),
            product_image: product.primary_image().unwrap_or_default().to_string(),
            product_weight: product.weight.clone(),
            product_weight_value: product.weight_value,
            base_price: product.base_price.clone(),
            base_price_value: product.base_price_value,
            offer_price: product.offer_price.clone(),
            offer_price_value: product.offer_price_value,
            discount: product.discount,
        }
    }
}

/// New totals for an existing line.
#[derive(Debug, Clone, PartialEq)]
pub struct CartItemUpdate {
    pub uid: String,
    pub totals: ItemTotals,
    pub updated_at: DateTime<Utc>,
}

impl CartItemUpdate {
    pub fn new(item: &CartItem, totals: ItemTotals) -> Self {
        CartItemUpdate {
            uid: item.uid.clone(),
            totals,
            updated_at: Utc::now(),
        }
    }
}

/// New aggregate for a cart, guarded by the version the caller read.
#[derive(Debug, Clone, PartialEq)]
pub struct CartAggregateUpdate {
    pub cart_uid: String,
    pub expected_version: i64,
    pub aggregate: CartAggregate,
    pub updated_at: DateTime<Utc>,
}

impl CartAggregateUpdate {
    pub fn for_cart(cart: &Cart, aggregate: CartAggregate) -> Self {
        CartAggregateUpdate {
            cart_uid: cart.uid.clone(),
            expected_version: cart.version,
            aggregate,
            updated_at: Utc::now(),
        }
    }
}

// =============================================================================
// Gateway Traits
// =============================================================================

/// Catalog storage.
pub trait ProductGateway: Send + Sync {
    /// Inserts a product and returns its uid.
    async fn create(&self, metadata: &Metadata, record: &ProductRecord) -> DbResult<String>;

    /// One keyset page, always in ascending id order.
    ///
    /// `cursor_id` is ignored for [`PageDirection::First`].
    async fn list(
        &self,
        limit: PageLimit,
        cursor_id: i64,
        direction: PageDirection,
    ) -> DbResult<Vec<Product>>;

    async fn get_by_uid(&self, uid: &str) -> DbResult<Option<Product>>;

    /// Replaces every column of a product. `None` if no product has `uid`.
    async fn update_by_uid(
        &self,
        uid: &str,
        record: &ProductRecord,
        updated_at: DateTime<Utc>,
    ) -> DbResult<Option<Product>>;

    /// `false` if no product had `uid`.
    async fn delete_by_uid(&self, uid: &str) -> DbResult<bool>;

    async fn count(&self) -> DbResult<i64>;
}

/// Cart and cart-line storage.
///
/// Every write takes the aggregate the engine computed and applies it in
/// the same transaction as the line change.
pub trait CartGateway: Send + Sync {
    /// The user's cart with its items ordered by id.
    async fn get_cart_by_user_id(&self, user_id: i64) -> DbResult<Option<Cart>>;

    async fn get_cart_by_uid(&self, uid: &str) -> DbResult<Option<Cart>>;

    async fn get_cart_item_by_uid(&self, uid: &str) -> DbResult<Option<CartItem>>;

    /// The line for `product_id` inside cart `cart_id`.
    async fn get_cart_item_by_product_id(
        &self,
        cart_id: i64,
        product_id: i64,
    ) -> DbResult<Option<CartItem>>;

    async fn get_product_by_uid(&self, uid: &str) -> DbResult<Option<Product>>;

    /// Inserts a line and writes the aggregate. Returns the new line's uid.
    async fn create_cart_item(
        &self,
        item: &NewCartItemRecord,
        aggregate: &CartAggregateUpdate,
    ) -> DbResult<String>;

    async fn update_cart_item(
        &self,
        item: &CartItemUpdate,
        aggregate: &CartAggregateUpdate,
    ) -> DbResult<()>;

    async fn delete_cart_item_by_uid(
        &self,
        uid: &str,
        aggregate: &CartAggregateUpdate,
    ) -> DbResult<()>;
}

/// User and admin storage.
pub trait UserGateway: Send + Sync {
    /// Registers a user together with an empty cart and, for admins, the
    /// admin row.
    async fn create_user(&self, user: &NewUser, is_admin: bool) -> DbResult<User>;

    async fn get_user_by_uid(&self, uid: &str) -> DbResult<Option<User>>;

    async fn get_user_by_auth_uid(&self, auth_uid: &str) -> DbResult<Option<User>>;

    async fn get_user_by_email(&self, email: &str) -> DbResult<Option<User>>;

    async fn get_admin_by_user_id(&self, user_id: i64) -> DbResult<Option<Admin>>;
}
