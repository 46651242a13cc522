//! # Domain Types
//!
//! Core domain types used throughout pasar.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │      Cart       │   │    CartItem     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id / uid       │   │  id / uid       │   │  id / uid       │       │
//! │  │  base/offer     │   │  quantity       │   │  quantity       │       │
//! │  │  discount       │   │  total_price    │   │  totals         │       │
//! │  │  weight         │   │  total_weight   │   │  product snap-  │       │
//! │  │  stock, status  │   │  version        │   │  shot fields    │       │
//! │  └─────────────────┘   │  items[] ───────┼──►│  cart_id (FK)   │       │
//! │                        └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐                             │
//! │  │      User       │   │      Admin      │                             │
//! │  │  auth_uid       │◄──┤  user_id (FK)   │                             │
//! │  └─────────────────┘   └─────────────────┘                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity Pattern
//! Every row has:
//! - `id`: integer primary key. Used for relations and keyset pagination,
//!   never shown to callers.
//! - `uid`: UUID string. The only identifier that leaves the backend.
//!
//! The `*View` types are the caller-facing shapes; they drop every integer
//! id so identifiers cannot be enumerated.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;

// =============================================================================
// Product Status
// =============================================================================

/// Whether a product is listed for sale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "UPPERCASE"))]
#[ts(export)]
#[serde(rename_all = "UPPERCASE")]
pub enum ProductStatus {
    Active,
    Inactive,
}

impl ProductStatus {
    /// Parses `ACTIVE` / `INACTIVE`.
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        match raw {
            "ACTIVE" => Ok(ProductStatus::Active),
            "INACTIVE" => Ok(ProductStatus::Inactive),
            _ => Err(ValidationError::NotAllowed {
                field: "status".to_string(),
                allowed: vec!["ACTIVE".to_string(), "INACTIVE".to_string()],
            }),
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            ProductStatus::Active => "ACTIVE",
            ProductStatus::Inactive => "INACTIVE",
        }
    }
}

// =============================================================================
// Product
// =============================================================================

/// A catalog entry. Source of truth for unit price and unit weight at the
/// moment an item is first added to a cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Product {
    pub id: i64,
    pub uid: String,
    pub name: String,
    pub slug: String,
    pub sku: Option<String>,
    pub description: String,

    /// Image URLs, stored as a JSON array.
    #[cfg_attr(feature = "sqlx", sqlx(json))]
    pub images: Vec<String>,

    /// Display weight, e.g. `"250.00gr"`.
    pub weight: String,
    /// Weight in grams.
    pub weight_value: f64,

    pub base_price: String,
    pub base_price_value: i64,

    /// Price after discount.
    pub offer_price: String,
    pub offer_price_value: i64,

    /// Percentage discount, 0..=100.
    pub discount: i64,
    pub stock: i64,
    pub status: ProductStatus,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    #[inline]
    pub fn offer_price(&self) -> Money {
        Money::from_rupiah(self.offer_price_value)
    }

    /// First image, snapshotted onto cart items.
    pub fn primary_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }

    pub fn is_active(&self) -> bool {
        self.status == ProductStatus::Active
    }
}

// =============================================================================
// Cart
// =============================================================================

/// A user's cart with its denormalized aggregate.
///
/// ## Aggregate Invariant
/// After every committed mutation:
/// ```text
///   quantity          == Σ items.quantity
///   total_price_value == Σ items.total_price_value
///   total_weight_value ≈ Σ items.total_weight_value   (2-decimal rounding)
/// ```
/// `version` increases by one on every aggregate write; the database
/// refuses an update whose expected version is stale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Cart {
    pub id: i64,
    pub uid: String,
    pub quantity: i64,
    pub total_price: String,
    pub total_price_value: i64,
    pub total_weight: String,
    pub total_weight_value: f64,
    pub user_id: i64,
    pub version: i64,

    /// Loaded separately; ordered by item id.
    #[cfg_attr(feature = "sqlx", sqlx(skip))]
    #[serde(default)]
    pub items: Vec<CartItem>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Cart {
    #[inline]
    pub fn total_price(&self) -> Money {
        Money::from_rupiah(self.total_price_value)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Finds the line for a product, if the cart already holds one.
    pub fn item_for_product(&self, product_id: i64) -> Option<&CartItem> {
        self.items.iter().find(|item| item.product_id == product_id)
    }
}

// =============================================================================
// Cart Item
// =============================================================================

/// One cart line. Carries a snapshot of the product taken when the line
/// was created; later catalog price changes do not reach it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct CartItem {
    pub id: i64,
    pub uid: String,
    pub quantity: i64,
    pub total_price: String,
    pub total_price_value: i64,
    pub total_weight: String,
    pub total_weight_value: f64,

    // Product snapshot
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

    pub cart_id: i64,
    pub product_id: i64,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CartItem {
    /// Snapshotted unit price.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_rupiah(self.offer_price_value)
    }
}

// =============================================================================
// Users
// =============================================================================

/// A registered shopper.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct User {
    pub id: i64,
    pub uid: String,
    /// Subject identifier from the identity provider.
    pub auth_uid: String,
    pub email: String,
    pub name: String,
    pub phone: String,
    pub profile_image: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Marks a user as a catalog administrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Admin {
    pub id: i64,
    pub uid: String,
    pub email: String,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Views
// =============================================================================

/// Product as returned to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProductView {
    pub uid: String,
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
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl From<&Product> for ProductView {
    fn from(product: &Product) -> Self {
        ProductView {
            uid: product.uid.clone(),
            name: product.name.clone(),
            slug: product.slug.clone(),
            sku: product.sku.clone(),
            description: product.description.clone(),
            images: product.images.clone(),
            weight: product.weight.clone(),
            weight_value: product.weight_value,
            base_price: product.base_price.clone(),
            base_price_value: product.base_price_value,
            offer_price: product.offer_price.clone(),
            offer_price_value: product.offer_price_value,
            discount: product.discount,
            stock: product.stock,
            status: product.status,
            created_at: product.created_at,
            updated_at: product.updated_at,
        }
    }
}

/// Cart line as returned to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CartItemView {
    pub uid: String,
    pub quantity: i64,
    pub total_price: String,
    pub total_price_value: i64,
    pub total_weight: String,
    pub total_weight_value: f64,
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

impl From<&CartItem> for CartItemView {
    fn from(item: &CartItem) -> Self {
        CartItemView {
            uid: item.uid.clone(),
            quantity: item.quantity,
            total_price: item.total_price.clone(),
            total_price_value: item.total_price_value,
            total_weight: item.total_weight.clone(),
            total_weight_value: item.total_weight_value,
            product_name: item.product_name.clone(),
            product_slug: item.product_slug.clone(),
            product_image: item.product_image.clone(),
            product_weight: item.product_weight.clone(),
            product_weight_value: item.product_weight_value,
            base_price: item.base_price.clone(),
            base_price_value: item.base_price_value,
            offer_price: item.offer_price.clone(),
            offer_price_value: item.offer_price_value,
            discount: item.discount,
        }
    }
}

/// Cart as returned to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CartView {
    pub uid: String,
    pub quantity: i64,
    pub total_price: String,
    pub total_price_value: i64,
    pub total_weight: String,
    pub total_weight_value: f64,
    pub cart_items: Vec<CartItemView>,
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        CartView {
            uid: cart.uid.clone(),
            quantity: cart.quantity,
            total_price: cart.total_price.clone(),
            total_price_value: cart.total_price_value,
            total_weight: cart.total_weight.clone(),
            total_weight_value: cart.total_weight_value,
            cart_items: cart.items.iter().map(CartItemView::from).collect(),
        }
    }
}

/// One page of the product catalog.
///
/// Cursors are opaque ciphertexts; an empty string means "no cursor".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProductPage {
    pub products: Vec<ProductView>,
    pub is_first_page: bool,
    pub limit: i64,
    pub prev_cursor: String,
    pub next_cursor: String,
}

// =============================================================================
// Unit Tests
// =============================================================================
