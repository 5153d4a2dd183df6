use async_trait::async_trait;
use models::product::{self, Filter};
use models::Product;
use sea_orm::{ConnectionTrait, DatabaseConnection};
use tracing::debug;

use crate::errors::StoreError;
use crate::pagination::Pagination;

/// Read/write capability over the product collection.
///
/// Implemented by the sea-orm backed [`SeaOrmProducts`] (over a pool or a transaction)
/// and by [`memory::InMemoryProducts`] for callers that need no database.
#[async_trait]
pub trait ProductCollection: Send + Sync {
    async fn find(&self, id: i32) -> Result<Option<Product>, StoreError>;
    /// Store a new product. An `id` of `0` lets the backend assign one.
    async fn insert(&self, product: Product) -> Result<Product, StoreError>;
    /// Replace the product with the same `id`; `NotFound` if there is none.
    async fn update(&self, product: Product) -> Result<Product, StoreError>;
    /// Returns whether a product was removed.
    async fn delete(&self, id: i32) -> Result<bool, StoreError>;
    /// Matching products in ascending `id` order, one page at a time.
    async fn query(&self, query: &ProductQuery) -> Result<Vec<Product>, StoreError>;
    async fn count(&self) -> Result<u64, StoreError>;
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProductQuery {
    pub filter: Filter,
    pub pagination: Pagination,
}

impl ProductQuery {
    pub fn new() -> Self { Self::default() }

    pub fn name_contains(mut self, term: impl Into<String>) -> Self {
        self.filter.name_contains = Some(term.into());
        self
    }

    pub fn price_between(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.filter.min_price = min;
        self.filter.max_price = max;
        self
    }

    pub fn page(mut self, page: u32, per_page: u32) -> Self {
        self.pagination = Pagination::new(page, per_page);
        self
    }
}

/// sea-orm backed collection over any connection: the pool or an open transaction.
#[derive(Clone, Debug)]
pub struct SeaOrmProducts<C = DatabaseConnection> {
    conn: C,
}

impl<C> SeaOrmProducts<C> {
    pub fn new(conn: C) -> Self { Self { conn } }

    pub fn connection(&self) -> &C { &self.conn }

    pub fn into_inner(self) -> C { self.conn }
}

#[async_trait]
impl<C> ProductCollection for SeaOrmProducts<C>
where
    C: ConnectionTrait + Send + Sync,
{
    async fn find(&self, id: i32) -> Result<Option<Product>, StoreError> {
        Ok(product::find(&self.conn, id).await?)
    }

    async fn insert(&self, new: Product) -> Result<Product, StoreError> {
        let stored = product::insert(&self.conn, new).await?;
        debug!(id = stored.id, "product inserted");
        Ok(stored)
    }

    async fn update(&self, changed: Product) -> Result<Product, StoreError> {
        let stored = product::update(&self.conn, changed).await?;
        debug!(id = stored.id, "product updated");
        Ok(stored)
    }

    async fn delete(&self, id: i32) -> Result<bool, StoreError> {
        let removed = product::delete(&self.conn, id).await?;
        debug!(id, removed, "product delete");
        Ok(removed)
    }

    async fn query(&self, query: &ProductQuery) -> Result<Vec<Product>, StoreError> {
        let (offset, limit) = query.pagination.bounds();
        Ok(product::search(&self.conn, &query.filter, offset, limit).await?)
    }

    async fn count(&self) -> Result<u64, StoreError> {
        Ok(product::count(&self.conn).await?)
    }
}

/// In-memory collection for tests and tooling that must not touch a database.
pub mod memory {
    use super::*;
    use std::collections::BTreeMap;
    use std::sync::Arc;
    use tokio::sync::RwLock;

    /// Clones share the same rows.
    #[derive(Clone, Default)]
    pub struct InMemoryProducts {
        rows: Arc<RwLock<Rows>>,
    }

    #[derive(Default)]
    struct Rows {
        by_id: BTreeMap<i32, Product>,
        // highest id ever stored; deleted ids are not handed out again
        last_id: i32,
    }

    impl InMemoryProducts {
        pub fn new() -> Self { Self::default() }
    }

    #[async_trait]
    impl ProductCollection for InMemoryProducts {
        async fn find(&self, id: i32) -> Result<Option<Product>, StoreError> {
            Ok(self.rows.read().await.by_id.get(&id).cloned())
        }

        async fn insert(&self, mut new: Product) -> Result<Product, StoreError> {
            let mut rows = self.rows.write().await;
            if new.id == 0 {
                new.id = rows
                    .last_id
                    .checked_add(1)
                    .ok_or_else(|| StoreError::Db("product id space exhausted".into()))?;
            } else if rows.by_id.contains_key(&new.id) {
                return Err(StoreError::Conflict(format!("product {} already exists", new.id)));
            }
            rows.last_id = rows.last_id.max(new.id);
            rows.by_id.insert(new.id, new.clone());
            Ok(new)
        }

        async fn update(&self, changed: Product) -> Result<Product, StoreError> {
            let mut rows = self.rows.write().await;
            match rows.by_id.get_mut(&changed.id) {
                Some(row) => {
                    *row = changed.clone();
                    Ok(changed)
                }
                None => Err(StoreError::not_found("product", changed.id)),
            }
        }

        async fn delete(&self, id: i32) -> Result<bool, StoreError> {
            Ok(self.rows.write().await.by_id.remove(&id).is_some())
        }

        async fn query(&self, query: &ProductQuery) -> Result<Vec<Product>, StoreError> {
            let (offset, limit) = query.pagination.bounds();
            let rows = self.rows.read().await;
            Ok(rows
                .by_id
                .values()
                .filter(|p| query.filter.matches(p))
                .skip(offset as usize)
                .take(limit as usize)
                .cloned()
                .collect())
        }

        async fn count(&self) -> Result<u64, StoreError> {
            Ok(self.rows.read().await.by_id.len() as u64)
        }
    }
}
