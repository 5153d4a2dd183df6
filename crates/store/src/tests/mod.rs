/// Construction and accessor contract of `EntityStore`
pub mod entity_store_tests;
