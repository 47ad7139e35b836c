//! A waitlist signup service: validates `{name, email}` submissions, stores them in Postgres,
//! reports the number of entries and sends a best-effort confirmation email.

pub mod app;
pub mod config;
pub mod database;
pub mod email_client;
mod error;
pub mod model;
pub mod notifier;
pub mod templ_manager;
pub mod web;

pub use app::{router, serve, App, AppState};
pub use email_client::EmailClient;
pub use error::{Error, Result};

use tracing_subscriber::EnvFilter;

/// Console tracing for development. Respects `RUST_LOG`, defaults to `debug` for this crate.
pub fn init_dbg_tracing() {
    tracing_subscriber::fmt()
        .without_time()
        .with_target(false)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("waitlist=debug,tower_http=debug,info")),
        )
        .compact()
        .init();
}

/// Tracing for release builds: timestamps, no ANSI colors. Respects `RUST_LOG`, defaults to `info`.
pub fn init_production_tracing() {
    tracing_subscriber::fmt()
        .with_ansi(false)
        .with_target(true)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
}
