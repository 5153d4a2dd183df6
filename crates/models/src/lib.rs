//! sea-orm entity definitions and the row-level operations on them.

pub mod errors;
pub mod db;
pub mod product;

pub use product::Model as Product;

#[cfg(test)]
mod tests;
