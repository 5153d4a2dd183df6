

/// Transaction handling
pub mod transaction_tests;

use sea_orm::DatabaseConnection;

use crate::db::{connect_with_config, DatabaseConfig};

/// SQLite file under the temp dir, unique per test.
pub fn temp_sqlite_config() -> DatabaseConfig {
    let path = std::env::temp_dir().join(format!("models_{}.db", uuid::Uuid::new_v4()));
    let mut cfg = DatabaseConfig::new(format!("sqlite://{}?mode=rwc", path.display()));
    cfg.max_connections = 4;
    cfg.min_connections = 1;
    cfg.acquire_timeout_secs = 10;
    cfg
}

/// Fresh database with the product table created.
pub async fn setup_test_db() -> anyhow::Result<DatabaseConnection> {
    let db = connect_with_config(&temp_sqlite_config()).await?;
    crate::product::create_table(&db).await?;
    Ok(db)
}
