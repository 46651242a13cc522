//! # pasar-backend
//!
//! Application layer of the pasar commerce backend: configuration, tracing,
//! token verification, the API error taxonomy and the cart, product and
//! user services an HTTP front end calls.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        pasar-backend                                    │
//! │                                                                         │
//! │  AppConfig::load ──► init_tracing ──► bootstrap ──► AppState            │
//! │                                                      │                  │
//! │                      ┌───────────────────────────────┼──────────────┐   │
//! │                      ▼                               ▼              ▼   │
//! │                CartService                  ProductService   UserService│
//! │                      │                               │              │   │
//! │                      └──────────── pasar-db ─────────┴──────────────┘   │
//! │                                                                         │
//! │  Every call returns Result<_, ApiError>; ApiError::http_status() gives │
//! │  the status class. "Not found" is Ok(None), never an error.            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod auth;
pub mod bootstrap;
pub mod config;
pub mod error;
pub mod services;
pub mod telemetry;

#[cfg(test)]
pub(crate) mod test_support;

pub use auth::{extract_bearer_token, AuthError, Identity, JwtVerifier, TokenVerifier};
pub use bootstrap::{bootstrap, AppState, BootstrapError};
pub use config::{AppConfig, AppEnv, ConfigError};
pub use error::{ApiError, ApiResult, ErrorCode};
pub use services::{CartService, ProductService, UserService};
pub use telemetry::init_tracing;
