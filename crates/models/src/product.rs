use sea_orm::sea_query::{Expr, Func, LikeExpr};
use sea_orm::ActiveValue::{NotSet, Set, Unchanged};
use sea_orm::{
    entity::prelude::*, ConnectionTrait, DatabaseBackend, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
    Schema, Select, Statement,
};
use tracing::debug;

use crate::errors::ModelError;

/// A catalog product. `id == 0` means the identity has not been assigned yet.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "product")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub image_url: String,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match *self {}
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        price: f64,
        image_url: impl Into<String>,
    ) -> Self {
        Self {
            id: 0,
            name: name.into(),
            description: description.into(),
            price,
            image_url: image_url.into(),
        }
    }

    pub fn with_id(mut self, id: i32) -> Self {
        self.id = id;
        self
    }
}

/// Row filter shared by the SQL and in-memory collections.
///
/// Name matching folds ASCII letters only, which is what SQLite's `lower()` does. Non-ASCII
/// letters must match case exactly; PostgreSQL's `lower()` folds them in stored names, so an
/// upper-case non-ASCII term finds nothing there.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Filter {
    /// Substring of `name`, ASCII case-insensitive.
    pub name_contains: Option<String>,
    /// Inclusive lower price bound.
    pub min_price: Option<f64>,
    /// Inclusive upper price bound.
    pub max_price: Option<f64>,
}

impl Filter {
    fn name_term(&self) -> Option<String> {
        self.name_contains
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_ascii_lowercase)
    }

    pub fn apply(&self, mut select: Select<Entity>) -> Select<Entity> {
        if let Some(term) = self.name_term() {
            let pattern = LikeExpr::new(format!("%{}%", escape_like(&term))).escape('\\');
            select = select.filter(Expr::expr(Func::lower(Expr::col((Entity, Column::Name)))).like(pattern));
        }
        if let Some(min) = self.min_price {
            select = select.filter(Column::Price.gte(min));
        }
        if let Some(max) = self.max_price {
            select = select.filter(Column::Price.lte(max));
        }
        select
    }

    pub fn matches(&self, product: &Model) -> bool {
        if let Some(term) = self.name_term() {
            if !product.name.to_ascii_lowercase().contains(&term) {
                return false;
            }
        }
        self.min_price.map_or(true, |min| product.price >= min)
            && self.max_price.map_or(true, |max| product.price <= max)
    }
}

fn escape_like(term: &str) -> String {
    let mut out = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// `CREATE TABLE IF NOT EXISTS` derived from the entity definition.
pub async fn create_table<C: ConnectionTrait>(db: &C) -> Result<(), ModelError> {
    let backend = db.get_database_backend();
    let mut stmt = Schema::new(backend).create_table_from_entity(Entity);
    stmt.if_not_exists();
    db.execute(backend.build(&stmt)).await?;
    debug!(?backend, "product table ensured");
    Ok(())
}

pub async fn find<C: ConnectionTrait>(db: &C, id: i32) -> Result<Option<Model>, ModelError> {
    Ok(Entity::find_by_id(id).one(db).await?)
}

pub async fn insert<C: ConnectionTrait>(db: &C, product: Model) -> Result<Model, ModelError> {
    let am = ActiveModel {
        id: if product.id == 0 { NotSet } else { Set(product.id) },
        name: Set(product.name),
        description: Set(product.description),
        price: Set(product.price),
        image_url: Set(product.image_url),
    };
    let explicit_id = product.id != 0;
    let stored = am.insert(db).await?;
    if explicit_id {
        if let Some(stmt) = sequence_resync_statement(db.get_database_backend()) {
            db.execute(stmt).await?;
            debug!(id = stored.id, "product id sequence resynced");
        }
    }
    Ok(stored)
}

/// Moves the PostgreSQL `SERIAL` sequence past the highest stored id so that an insert with
/// an explicit id does not collide with later generated ones. SQLite's `AUTOINCREMENT`
/// already tracks explicit ids.
pub fn sequence_resync_statement(backend: DatabaseBackend) -> Option<Statement> {
    match backend {
        DatabaseBackend::Postgres => Some(Statement::from_string(
            backend,
            format!(
                "SELECT setval(pg_get_serial_sequence('{table}', 'id'), GREATEST((SELECT MAX(id) FROM {table}), 1))",
                table = Entity.table_name()
            ),
        )),
        _ => None,
    }
}

/// Block other writers of the product table until the surrounding transaction ends.
///
/// Only PostgreSQL needs the explicit lock. SQLite admits one writer at a time, so a second
/// writer fails with a busy error instead of interleaving.
pub async fn lock_for_writes<C: ConnectionTrait>(db: &C) -> Result<(), ModelError> {
    if let Some(stmt) = write_lock_statement(db.get_database_backend()) {
        db.execute(stmt).await?;
    }
    Ok(())
}

fn write_lock_statement(backend: DatabaseBackend) -> Option<Statement> {
    match backend {
        DatabaseBackend::Postgres => Some(Statement::from_string(
            backend,
            format!("LOCK TABLE {} IN EXCLUSIVE MODE", Entity.table_name()),
        )),
        _ => None,
    }
}

/// Replace every column of the row with the same id.
pub async fn update<C: ConnectionTrait>(db: &C, product: Model) -> Result<Model, ModelError> {
    let id = product.id;
    let am = ActiveModel {
        id: Unchanged(id),
        name: Set(product.name),
        description: Set(product.description),
        price: Set(product.price),
        image_url: Set(product.image_url),
    };
    am.update(db).await.map_err(|e| match ModelError::from(e) {
        ModelError::NotFound(_) => ModelError::NotFound(format!("product {id}")),
        other => other,
    })
}

pub async fn delete<C: ConnectionTrait>(db: &C, id: i32) -> Result<bool, ModelError> {
    let res = Entity::delete_by_id(id).exec(db).await?;
    Ok(res.rows_affected > 0)
}

pub async fn search<C: ConnectionTrait>(
    db: &C,
    filter: &Filter,
    offset: u64,
    limit: u64,
) -> Result<Vec<Model>, ModelError> {
    let rows = filter
        .apply(Entity::find())
        .order_by_asc(Column::Id)
        .offset(offset)
        .limit(limit)
        .all(db)
        .await?;
    Ok(rows)
}

pub async fn count<C: ConnectionTrait>(db: &C) -> Result<u64, ModelError> {
    Ok(Entity::find().count(db).await?)
}
