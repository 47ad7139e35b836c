use crate::{app, config, database, email_client};

pub type Result<T> = core::result::Result<T, Error>;

/// Everything that can go wrong while starting and serving the app.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("database error: {0}")]
    Database(#[from] database::Error),
    #[error("email client error: {0}")]
    EmailClient(#[from] email_client::Error),
    #[error("templating error: {0}")]
    Tera(#[from] tera::Error),
    #[error("serving error: {0}")]
    Serve(#[from] app::serve::ServeError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
