use std::future::Future;
use std::pin::Pin;

use models::product;
use sea_orm::DatabaseTransaction;
use tracing::debug;

use crate::collection::{ProductCollection, SeaOrmProducts};
use crate::errors::StoreError;

/// Future returned by the closure given to [`crate::EntityStore::in_unit_of_work`].
pub type UnitOfWorkFuture<'u, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + Send + 'u>>;

/// An open transaction over the product collection.
///
/// Writes made through [`UnitOfWork::products`] become visible to other connections only
/// after [`UnitOfWork::commit`]. Dropping an uncommitted unit of work rolls it back.
pub struct UnitOfWork {
    products: SeaOrmProducts<DatabaseTransaction>,
}

impl UnitOfWork {
    pub(crate) fn new(txn: DatabaseTransaction) -> Self {
        debug!("unit of work started");
        Self { products: SeaOrmProducts::new(txn) }
    }

    pub fn products(&self) -> &dyn ProductCollection {
        &self.products
    }

    /// Hold off other writers of the product table until this unit of work ends.
    pub async fn lock_products(&self) -> Result<(), StoreError> {
        product::lock_for_writes(self.products.connection()).await?;
        Ok(())
    }

    pub async fn commit(self) -> Result<(), StoreError> {
        self.products.into_inner().commit().await?;
        debug!("unit of work committed");
        Ok(())
    }

    pub async fn rollback(self) -> Result<(), StoreError> {
        self.products.into_inner().rollback().await?;
        debug!("unit of work rolled back");
        Ok(())
    }
}
