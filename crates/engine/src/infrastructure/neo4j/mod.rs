//! Neo4j-backed character storage.

mod character_store;
mod helpers;
mod schema;

pub use character_store::Neo4jCharacterStore;
pub use schema::ensure_schema;
