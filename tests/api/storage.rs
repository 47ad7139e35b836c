//! `PgWaitlistStore` against a real Postgres. Every test creates its own throwaway database.
//! Run with `cargo test -- --ignored` while the database from `config/local.toml` is up.

use anyhow::Result;
use claims::assert_matches;
use uuid::Uuid;
use waitlist::{
    config::{AppConfig, Environment},
    database::DbManager,
    model::{PgWaitlistStore, StoreError, WaitlistStore},
    web::types::{DeserWaitlistEntry, ValidWaitlistEntry},
};

async fn pg_store() -> Result<PgWaitlistStore> {
    let config_dir = std::env::current_dir()?.join("config");
    let mut config = AppConfig::load_from(config_dir, Environment::Local)?;
    config.db_config.db_name = Uuid::new_v4().to_string();

    let dm = DbManager::init_new_database(&config.db_config).await?;
    Ok(PgWaitlistStore::new(dm))
}

fn entry(name: &str, email: &str) -> Result<ValidWaitlistEntry> {
    let entry = ValidWaitlistEntry::try_from(DeserWaitlistEntry::new(name, email))?;
    Ok(entry)
}

#[tokio::test]
#[ignore = "needs a running Postgres"]
async fn pg_add_entry_assigns_id_and_timestamp() -> Result<()> {
    let store = pg_store().await?;
    assert_eq!(store.count_entries().await?, 0);

    let stored = store.add_entry(&entry("Alex", "alex@example.com")?).await?;

    assert_eq!(stored.name, "Alex");
    assert_eq!(stored.email, "alex@example.com");
    assert!(!stored.id.is_nil());
    assert_eq!(store.count_entries().await?, 1);

    Ok(())
}

#[tokio::test]
#[ignore = "needs a running Postgres"]
async fn pg_duplicate_email_is_a_duplicate_key() -> Result<()> {
    let store = pg_store().await?;

    store.add_entry(&entry("Alex", "alex@example.com")?).await?;
    let second = store.add_entry(&entry("Someone Else", "alex@example.com")?).await;

    assert_matches!(second, Err(StoreError::DuplicateKey));
    assert_eq!(store.count_entries().await?, 1);

    Ok(())
}
