//! Waitlist persistence.
//!
//! `WaitlistStore` is the only data access seam of the app. Handlers get it injected through
//! `AppState`, the production implementation is `PgWaitlistStore`.

mod waitlist;

pub use waitlist::PgWaitlistStore;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::web::types::ValidWaitlistEntry;

/// A persisted waitlist entry. Never updated or deleted once stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct WaitlistEntry {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

#[async_trait]
pub trait WaitlistStore: Send + Sync {
    /// Stores a new entry and returns it with its generated `id` and `created_at`.
    /// Fails with `StoreError::DuplicateKey` if the email is already on the waitlist.
    async fn add_entry(&self, entry: &ValidWaitlistEntry) -> StoreResult<WaitlistEntry>;

    /// The number of committed entries.
    async fn count_entries(&self) -> StoreResult<i64>;
}

// ###################################
// ->   ERROR
// ###################################
pub type StoreResult<T> = core::result::Result<T, StoreError>;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("an entry with this email already exists")]
    DuplicateKey,
    #[error("sqlx error: {0}")]
    Sqlx(#[from] sqlx::Error),
}
