use anyhow::Context;
use common::utils::logging::init_logging_from_env;
use configs::AppConfig;
use dotenvy::dotenv;
use store::EntityStore;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    init_logging_from_env();

    let cfg = AppConfig::load_and_validate().context("loading configuration")?;
    let store = EntityStore::construct(&cfg.database).await?;

    if cfg.startup.ensure_created {
        store.ensure_created().await.context("creating product table")?;
    }
    if cfg.startup.seed {
        let inserted = store.seed().await.context("seeding product catalog")?;
        info!(inserted, "catalog seed finished");
    }

    let total = store.products().count().await?;
    info!(total, "product store ready");
    Ok(())
}
