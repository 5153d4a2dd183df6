//! Typed data-access handle over the product table.
//! - `EntityStore` binds a validated connection configuration to one product collection.
//! - `ProductCollection` is the capability callers read and write through.
//! - `UnitOfWork` scopes writes in a transaction.

pub mod errors;
pub mod pagination;
pub mod collection;
pub mod entity_store;
pub mod unit_of_work;
pub mod seed;
#[cfg(test)]
pub mod test_support;
#[cfg(test)]
mod tests;

pub use collection::{ProductCollection, ProductQuery, SeaOrmProducts};
pub use entity_store::EntityStore;
pub use errors::StoreError;
pub use models::Product;
pub use unit_of_work::{UnitOfWork, UnitOfWorkFuture};
