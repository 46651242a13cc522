//! Tracing subscriber setup.
//!
//! Development prints readable lines at `debug`; production writes JSON at
//! `info`. `RUST_LOG` replaces the default filter in both.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::AppEnv;

/// Default filter per environment. sqlx statement logging stays at warn.
fn default_filter(env: AppEnv) -> &'static str {
    match env {
        AppEnv::Development => "debug,sqlx=warn",
        AppEnv::Production => "info,sqlx=warn",
    }
}

/// Installs the global subscriber. Fails if one is already installed.
pub fn init_tracing(env: AppEnv) -> Result<(), TryInitError> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter(env)));

    let registry = tracing_subscriber::registry().with(filter);

    match env {
        AppEnv::Production => registry.with(fmt::layer().json().with_target(true)).try_init(),
        AppEnv::Development => registry.with(fmt::layer().with_target(true)).try_init(),
    }
}
