use std::time::Duration;

use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use tracing::debug;

pub use configs::DatabaseConfig;

/// Translate a validated [`DatabaseConfig`] into sea-orm pool options.
pub fn connect_options(cfg: &DatabaseConfig) -> ConnectOptions {
    let mut opt = ConnectOptions::new(cfg.url.trim().to_string());
    opt.max_connections(cfg.max_connections)
        .min_connections(cfg.min_connections)
        .connect_timeout(Duration::from_secs(cfg.connect_timeout_secs))
        .acquire_timeout(Duration::from_secs(cfg.acquire_timeout_secs))
        .idle_timeout(Duration::from_secs(cfg.idle_timeout_secs))
        .max_lifetime(Duration::from_secs(cfg.max_lifetime_secs))
        .sqlx_logging(cfg.sqlx_logging)
        .connect_lazy(cfg.connect_lazy);
    opt
}

/// Build the connection pool. With `connect_lazy` set no connection is opened until first use.
pub async fn connect_with_config(cfg: &DatabaseConfig) -> Result<DatabaseConnection, DbErr> {
    debug!(
        max_connections = cfg.max_connections,
        min_connections = cfg.min_connections,
        lazy = cfg.connect_lazy,
        sqlite = cfg.is_sqlite(),
        "building database pool"
    );
    Database::connect(connect_options(cfg)).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn options_carry_pool_settings() {
        let mut cfg = DatabaseConfig::new("  sqlite::memory:  ");
        cfg.max_connections = 3;
        cfg.min_connections = 1;
        cfg.acquire_timeout_secs = 5;
        let opt = connect_options(&cfg);
        assert_eq!(opt.get_url(), "sqlite::memory:");
        assert_eq!(opt.get_max_connections(), Some(3));
        assert_eq!(opt.get_min_connections(), Some(1));
        assert_eq!(opt.get_acquire_timeout(), Some(Duration::from_secs(5)));
        assert!(!opt.get_sqlx_logging());
    }
}
