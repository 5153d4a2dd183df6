use configs::DatabaseConfig;
use sea_orm::ConnectionTrait;

use crate::entity_store::EntityStore;

/// Config for a SQLite file under the temp dir, unique per call.
pub fn temp_sqlite_config() -> DatabaseConfig {
    let path = std::env::temp_dir().join(format!("store_{}.db", uuid::Uuid::new_v4()));
    let mut cfg = DatabaseConfig::new(format!("sqlite://{}?mode=rwc", path.display()));
    cfg.max_connections = 4;
    cfg.min_connections = 1;
    cfg.acquire_timeout_secs = 10;
    cfg
}

/// Store over a fresh database with the product table created.
pub async fn fresh_store() -> Result<(EntityStore, DatabaseConfig), anyhow::Error> {
    let cfg = temp_sqlite_config();
    let store = EntityStore::construct(&cfg).await?;
    store.ensure_created().await?;
    Ok((store, cfg))
}

/// Store over `TEST_POSTGRES_URL` with the product table recreated, or `None` when the
/// variable is unset. The database is wiped, so point it at a disposable one.
pub async fn postgres_store() -> Result<Option<EntityStore>, anyhow::Error> {
    let Ok(url) = std::env::var("TEST_POSTGRES_URL") else {
        eprintln!("TEST_POSTGRES_URL missing; skip PostgreSQL tests");
        return Ok(None);
    };
    let store = EntityStore::construct(&DatabaseConfig::new(url)).await?;
    store.connection().execute_unprepared("DROP TABLE IF EXISTS product").await?;
    store.ensure_created().await?;
    Ok(Some(store))
}
