use std::sync::Arc;

use configs::DatabaseConfig;
use models::db::connect_with_config;
use models::product;
use sea_orm::{ConnectionTrait, DatabaseConnection, TransactionTrait};
use tracing::{info, warn};

use crate::collection::{ProductCollection, SeaOrmProducts};
use crate::errors::StoreError;
use crate::unit_of_work::{UnitOfWork, UnitOfWorkFuture};

/// Handle binding a connection configuration to the product collection.
///
/// The collection handle is created once at construction and shared by every call to
/// [`EntityStore::products`] and by clones of the store. Dropping the last clone releases
/// the pool.
#[derive(Clone)]
pub struct EntityStore {
    db: DatabaseConnection,
    products: Arc<SeaOrmProducts>,
}

impl EntityStore {
    /// Validate `config` and build a pool for it. A lazy pool (the default) opens no
    /// connection here, so only configuration problems can fail construction.
    pub async fn construct(config: &DatabaseConfig) -> Result<Self, StoreError> {
        config.validate()?;
        let db = connect_with_config(config)
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;
        info!(
            backend = ?db.get_database_backend(),
            lazy = config.connect_lazy,
            max_connections = config.max_connections,
            "entity store constructed"
        );
        Ok(Self::from_connection(db))
    }

    /// Construct from `DATABASE_URL` and the `DB_*` variables.
    pub async fn from_env() -> Result<Self, StoreError> {
        let config = DatabaseConfig::from_env()?;
        Self::construct(&config).await
    }

    /// Compose a store over an existing pool; stores built this way share its data.
    pub fn from_connection(db: DatabaseConnection) -> Self {
        let products = Arc::new(SeaOrmProducts::new(db.clone()));
        Self { db, products }
    }

    pub fn products(&self) -> Arc<dyn ProductCollection> {
        self.products.clone()
    }

    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }

    /// Create the product table if it does not exist yet.
    pub async fn ensure_created(&self) -> Result<(), StoreError> {
        product::create_table(&self.db).await?;
        Ok(())
    }

    pub async fn begin(&self) -> Result<UnitOfWork, StoreError> {
        let txn = self.db.begin().await?;
        Ok(UnitOfWork::new(txn))
    }

    /// Run `f` inside a unit of work: commit when it returns `Ok`, roll back when it
    /// returns `Err`. The transaction never outlives this call.
    pub async fn in_unit_of_work<F, T>(&self, f: F) -> Result<T, StoreError>
    where
        F: for<'u> FnOnce(&'u UnitOfWork) -> UnitOfWorkFuture<'u, T> + Send,
        T: Send,
    {
        let uow = self.begin().await?;
        let outcome = f(&uow).await;
        match outcome {
            Ok(value) => {
                uow.commit().await?;
                Ok(value)
            }
            Err(e) => {
                if let Err(rollback_err) = uow.rollback().await {
                    warn!(error = %rollback_err, "rollback after failed unit of work also failed");
                }
                Err(e)
            }
        }
    }
}

impl std::fmt::Debug for EntityStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntityStore")
            .field("backend", &self.db.get_database_backend())
            .finish_non_exhaustive()
    }
}
