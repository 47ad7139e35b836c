use std::time::Duration;

use sqlx::{postgres::PgPoolOptions, Connection, PgConnection, PgPool};
use tracing::info;

use crate::config::DbConfig;

/// Owns the single connection pool of the app. Cheap to clone.
#[derive(Clone, Debug)]
pub struct DbManager {
    db: PgPool,
}

impl DbManager {
    /// Connects to the database and runs the pending migrations.
    pub async fn init(db_config: &DbConfig) -> Result<Self> {
        info!("{:<20} - Initializing the DB pool", "init_db");
        let max_cons = if cfg!(test) { 1 } else { 5 };

        let con_opts = db_config.connection_options();

        let db_pool = PgPoolOptions::new()
            .max_connections(max_cons)
            .acquire_timeout(Duration::from_millis(500))
            .connect_with(con_opts)
            .await
            .map_err(|ex| Error::FailToCreatePool(ex.to_string()))?;

        sqlx::migrate!("./migrations").run(&db_pool).await?;
        info!("{:<20} - Migrations applied", "init_db");

        Ok(Self { db: db_pool })
    }

    /// Creates the database named in `db_config` before connecting to it.
    /// Used to get a fresh, throwaway database for tests.
    pub async fn init_new_database(db_config: &DbConfig) -> Result<Self> {
        let mut connection =
            PgConnection::connect_with(&db_config.connection_options_without_db()).await?;

        let sql = format!(r#"CREATE DATABASE "{}";"#, db_config.db_name);
        sqlx::query(&sql).execute(&mut connection).await?;

        Self::init(db_config).await
    }

    pub fn db(&self) -> &PgPool {
        &self.db
    }
}

// ###################################
// ->   ERROR
// ###################################
pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to create db pool: {0}")]
    FailToCreatePool(String),
    #[error("sqlx error: {0}")]
    Sqlx(#[from] sqlx::Error),
    #[error("sqlx migration error: {0}")]
    SqlxMigrate(#[from] sqlx::migrate::MigrateError),
}
