//! Storage backend trait abstraction
//!
//! One async trait per aggregate. `PgStorage`, `MemoryStorage` and the
//! dispatching `StorageBackend` all implement every trait.

pub mod catalog;
pub mod event;
pub mod subscriber;

pub use catalog::{GameSystemStore, LocationStore};
pub use event::EventStore;
pub use subscriber::SubscriberStore;
