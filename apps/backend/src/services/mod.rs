//! # Services
//!
//! Use cases the HTTP layer calls. Each service is generic over the
//! gateway trait it needs, so tests and alternative stores plug in without
//! touching the service.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  CartService<G: CartGateway>                                            │
//! │     └── pasar_core::cart engine ──► gateway (item + aggregate, one tx) │
//! │                                                                         │
//! │  ProductService<G: ProductGateway>                                      │
//! │     ├── price calculator + formatter on create / update                 │
//! │     └── CursorCipher for list cursors                                   │
//! │                                                                         │
//! │  UserService<G: UserGateway>                                            │
//! │     └── TokenVerifier for authenticate / authorize_admin                │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod cart_service;
pub mod product_service;
pub mod user_service;

pub use cart_service::CartService;
pub use product_service::ProductService;
pub use user_service::UserService;
