//! Application bootstrap.
//!
//! Turns a validated [`AppConfig`] into the shared [`AppState`]: opens the
//! database (running migrations), builds the cursor cipher and the token
//! verifier, and hands them to the services.

use std::sync::Arc;

use tracing::info;

use pasar_core::{CursorCipher, PageLimit};
use pasar_db::{CartRepository, Database, DbConfig, DbError, ProductRepository, UserRepository};

use crate::auth::{JwtVerifier, TokenVerifier};
use crate::config::{AppConfig, ConfigError};
use crate::services::{CartService, ProductService, UserService};

/// Startup failures.
#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Database unavailable: {0}")]
    Database(#[from] DbError),
}

/// Shared application state.
pub struct AppState {
    pub db: Database,
    pub carts: CartService<CartRepository>,
    pub products: ProductService<ProductRepository>,
    pub users: UserService<UserRepository>,
}

impl AppState {
    /// Wires services around an open database.
    pub fn new(
        db: Database,
        cipher: Arc<dyn CursorCipher>,
        verifier: Arc<dyn TokenVerifier>,
        default_limit: PageLimit,
    ) -> Self {
        AppState {
            carts: CartService::new(db.carts()),
            products: ProductService::new(db.products(), cipher, default_limit),
            users: UserService::new(db.users(), verifier),
            db,
        }
    }

    /// Closes the pool. Call once, after the last request finished.
    pub async fn shutdown(&self) {
        self.db.close().await;
        info!("Database pool closed");
    }
}

/// Builds the application state from configuration.
pub async fn bootstrap(config: &AppConfig) -> Result<AppState, BootstrapError> {
    config.validate()?;

    let cipher = config.cursor_cipher()?;
    let default_limit = config.page_limit()?;

    let db_config = DbConfig::new(&config.database_path).max_connections(config.db_max_connections);
    let db_config = if db_config.is_in_memory() {
        DbConfig::in_memory()
    } else {
        db_config
    };

    let db = Database::new(db_config).await?;

    info!(
        env = ?config.app_env,
        cursor_key_bits = cipher.key_bits(),
        default_page_limit = default_limit.get(),
        "Application state ready"
    );

    Ok(AppState::new(
        db,
        Arc::new(cipher),
        Arc::new(JwtVerifier::new(&config.access_token_secret)),
        default_limit,
    ))
}
