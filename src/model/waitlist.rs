use async_trait::async_trait;
use chrono::Utc;
use tracing::{info, Instrument};
use uuid::Uuid;

use super::{StoreError, StoreResult, WaitlistEntry, WaitlistStore};
use crate::{database::DbManager, web::types::ValidWaitlistEntry};

/// Postgres SQLSTATE for `unique_violation`.
const UNIQUE_VIOLATION: &str = "23505";

/// `WaitlistStore` backed by the `waitlist` table.
#[derive(Clone, Debug)]
pub struct PgWaitlistStore {
    database_mgr: DbManager,
}

impl PgWaitlistStore {
    pub fn new(database_mgr: DbManager) -> Self {
        Self { database_mgr }
    }
}

#[async_trait]
impl WaitlistStore for PgWaitlistStore {
    async fn add_entry(&self, entry: &ValidWaitlistEntry) -> StoreResult<WaitlistEntry> {
        let q_span = tracing::info_span!("Adding waitlist entry to the database");

        let stored: WaitlistEntry = sqlx::query_as(
            r#"
            INSERT INTO waitlist (id, name, email, created_at)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, email, created_at
        "#,
        )
        .bind(Uuid::new_v4())
        .bind(entry.name.as_ref())
        .bind(entry.email.as_ref())
        .bind(Utc::now())
        .fetch_one(self.database_mgr.db())
        .instrument(q_span)
        .await
        .map_err(classify_insert_error)?;

        info!("New waitlist entry successfully added: {}", stored.id);

        Ok(stored)
    }

    async fn count_entries(&self) -> StoreResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM waitlist")
            .fetch_one(self.database_mgr.db())
            .await?;

        Ok(count)
    }
}

// ###################################
// ->   HELPERS
// ###################################

/// Turns a unique violation into `StoreError::DuplicateKey`, everything else stays a sqlx error.
fn classify_insert_error(error: sqlx::Error) -> StoreError {
    let is_unique_violation = match &error {
        sqlx::Error::Database(er) => er.code().as_deref() == Some(UNIQUE_VIOLATION),
        _ => false,
    };

    if is_unique_violation {
        StoreError::DuplicateKey
    } else {
        StoreError::Sqlx(error)
    }
}
