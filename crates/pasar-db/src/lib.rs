//! # pasar-db: Persistence Gateway for pasar
//!
//! SQLite storage for the catalog, carts and users, via sqlx.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        pasar Data Flow                                  │
//! │                                                                         │
//! │  apps/backend service (add_product, list products, sign_up)            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     pasar-db (THIS CRATE)                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │  + gateway    │    │  (embedded)  │  │   │
//! │  │   │               │    │    traits     │    │              │  │   │
//! │  │   │ SqlitePool    │◄───│ ProductRepo   │    │ 0001_initial │  │   │
//! │  │   │ WAL, FK on    │    │ CartRepo      │    │ _schema.sql  │  │   │
//! │  │   │               │    │ UserRepo      │    │              │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database                             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`gateway`] - Storage traits and write payloads
//! - [`repository`] - SQLite implementations of the traits
//! - [`error`] - Database error types
//!
//! ## Usage
//!
//! ```rust,ignore
//! use pasar_db::{Database, DbConfig, ProductGateway};
//!
//! let db = Database::new(DbConfig::new("pasar.db")).await?;
//! let first_page = db.products().list(limit, 0, PageDirection::First).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod gateway;
pub mod migrations;
pub mod pool;
pub mod repository;

#[cfg(test)]
pub(crate) mod test_support;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use gateway::{
    CartAggregateUpdate, CartGateway, CartItemUpdate, NewCartItemRecord, ProductGateway,
    ProductRecord, UserGateway,
};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::cart::CartRepository;
pub use repository::product::ProductRepository;
pub use repository::user::UserRepository;
