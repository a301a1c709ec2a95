//! Storage layer for eventboard
//!
//! PostgreSQL backend (sqlx) plus an in-memory backend with identical
//! semantics, both reachable through `StorageBackend`.

mod backend;
pub mod error;
mod memory;
mod pg_migrations;
mod pg_storage;
#[cfg(test)]
mod tests;
pub mod traits;

pub use backend::StorageBackend;
pub use error::StorageError;
pub use memory::MemoryStorage;
pub use pg_storage::PgStorage;
