//! # pasar-core: Pure Business Logic for pasar
//!
//! The cart arithmetic engine, the price calculator, the display
//! formatters and the pagination cursor codec. No database, no network.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        pasar Architecture                               │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 HTTP layer (external collaborator)              │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │            apps/backend: services, config, token verifier      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ pasar-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌─────────┐  │   │
//! │  │   │  money  │ │ pricing │ │  cart   │ │ cursor  │ │validat- │  │   │
//! │  │   │ weight  │ │         │ │ engine  │ │ AES-GCM │ │  ion    │  │   │
//! │  │   └─────────┘ └─────────┘ └─────────┘ └─────────┘ └─────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ types only (sqlx feature)              │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              pasar-db: SQLite persistence gateway               │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`cart`] - Cart arithmetic engine (create / update / delete line)
//! - [`cursor`] - Opaque keyset cursors and the AES-GCM cipher
//! - [`pricing`] - Offer price from base price and discount
//! - [`money`] - Integer rupiah and the rupiah formatter
//! - [`weight`] - Gram rounding and weight formatter
//! - [`validation`] - Validated value objects
//! - [`types`] - Domain models and caller-facing views
//! - [`metadata`] - Row identifiers, timestamps, slugs
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use pasar_core::pricing::calculate_price;
//! use pasar_core::validation::Discount;
//! use pasar_core::weight::format_weight;
//!
//! let price = calculate_price(10000, Discount::new(10).unwrap()).unwrap();
//! assert_eq!(price.offer_value, 9000);
//! assert_eq!(format_weight(1500.0), "1.50kg");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod cursor;
pub mod error;
pub mod metadata;
pub mod money;
pub mod pricing;
pub mod types;
pub mod validation;
pub mod weight;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{CartAggregate, CartItemChange, ItemTotals};
pub use cursor::{AesGcmCipher, CursorCipher, PageCursors};
pub use error::{CoreError, CoreResult, CryptoError, FormatError, ValidationError};
pub use money::Money;
pub use types::*;
pub use validation::{Discount, NewProduct, NewUser, PageDirection, PageLimit, ProductInput, Quantity};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum quantity of a single cart line.
///
/// ## Business Reason
/// Prevents accidental over-ordering (e.g., typing 1000 instead of 10).
pub const MAX_ITEM_QUANTITY: i64 = 999;

/// Discounts are whole percentages.
pub const MAX_DISCOUNT_PERCENT: i64 = 100;

/// Largest page a caller may request.
pub const MAX_PAGE_LIMIT: i64 = 100;

/// Catalog rules for new and updated products.
pub const MIN_PRODUCT_NAME_LENGTH: usize = 5;
pub const MIN_DESCRIPTION_LENGTH: usize = 30;
pub const MIN_PRODUCT_WEIGHT_GRAMS: f64 = 100.0;
pub const MIN_BASE_PRICE: i64 = 5000;
