//! Cross-crate helpers shared by the store crates and binaries.

pub mod utils;
