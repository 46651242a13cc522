//! # Repository Module
//!
//! SQLite implementations of the gateway traits.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  CartService<C: CartGateway, P: ProductGateway>                        │
//! │       │                                                                 │
//! │       │  carts.create_cart_item(&record, &aggregate)                   │
//! │       ▼                                                                 │
//! │  CartRepository (impl CartGateway)                                     │
//! │  ├── get_cart_by_user_id / get_cart_by_uid                             │
//! │  ├── get_cart_item_by_uid / get_cart_item_by_product_id                │
//! │  └── create / update / delete cart item  (transactional)               │
//! │       │                                                                 │
//! │       │  SQL                                                            │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! │                                                                         │
//! │  Services only see the traits, so tests and other stores can stand     │
//! │  in for these types.                                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`ProductRepository`](product::ProductRepository) - Catalog CRUD and keyset pages
//! - [`CartRepository`](cart::CartRepository) - Carts, lines and aggregate writes
//! - [`UserRepository`](user::UserRepository) - Users, admins and sign-up

pub mod cart;
pub mod product;
pub mod user;
