//! Unified storage backend with enum dispatch.

use async_trait::async_trait;
use chrono::NaiveDate;
use eventboard_core::{
    Event, EventQuery, EventRecord, EventWithRelations, GameSystem, Location, ReviewAction,
    Subscriber, SubscriptionFilter,
};

use crate::error::StorageError;
use crate::memory::MemoryStorage;
use crate::pg_storage::PgStorage;
use crate::traits::{EventStore, GameSystemStore, LocationStore, SubscriberStore};

macro_rules! dispatch {
    ($self:expr, $trait:path, $method:ident ( $($arg:expr),* $(,)? )) => {
        match $self {
            StorageBackend::Postgres(s) => <PgStorage as $trait>::$method(s, $($arg),*).await,
            StorageBackend::Memory(s) => <MemoryStorage as $trait>::$method(s, $($arg),*).await,
        }
    };
}

#[derive(Clone, Debug)]
pub enum StorageBackend {
    Postgres(PgStorage),
    Memory(MemoryStorage),
}

impl StorageBackend {
    pub async fn new_postgres(database_url: &str) -> Result<Self, StorageError> {
        Ok(Self::Postgres(PgStorage::new(database_url).await?))
    }

    #[must_use]
    pub fn new_memory() -> Self {
        Self::Memory(MemoryStorage::new())
    }

    /// Short backend name for logs.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Postgres(_) => "postgres",
            Self::Memory(_) => "memory",
        }
    }
}

// ── LocationStore ────────────────────────────────────────────────

#[async_trait]
impl LocationStore for StorageBackend {
    async fn list_locations(&self) -> Result<Vec<Location>, StorageError> {
        dispatch!(self, LocationStore, list_locations())
    }

    async fn get_or_create_location(&self, name: &str) -> Result<Location, StorageError> {
        dispatch!(self, LocationStore, get_or_create_location(name))
    }
}

// ── GameSystemStore ──────────────────────────────────────────────

#[async_trait]
impl GameSystemStore for StorageBackend {
    async fn list_game_systems(&self) -> Result<Vec<GameSystem>, StorageError> {
        dispatch!(self, GameSystemStore, list_game_systems())
    }

    async fn get_or_create_game_system(&self, name: &str) -> Result<GameSystem, StorageError> {
        dispatch!(self, GameSystemStore, get_or_create_game_system(name))
    }
}

// ── EventStore ───────────────────────────────────────────────────

#[async_trait]
impl EventStore for StorageBackend {
    async fn list_events(
        &self,
        query: &EventQuery,
    ) -> Result<Vec<EventWithRelations>, StorageError> {
        dispatch!(self, EventStore, list_events(query))
    }

    async fn get_event(&self, id: i64) -> Result<Option<EventWithRelations>, StorageError> {
        dispatch!(self, EventStore, get_event(id))
    }

    async fn upsert_event(
        &self,
        record: &EventRecord,
        location_id: i64,
        game_system_id: i64,
    ) -> Result<(Event, bool), StorageError> {
        dispatch!(self, EventStore, upsert_event(record, location_id, game_system_id))
    }

    async fn submit_event(
        &self,
        record: &EventRecord,
        location_id: i64,
        game_system_id: i64,
        submitted_by: &str,
    ) -> Result<Event, StorageError> {
        dispatch!(self, EventStore, submit_event(record, location_id, game_system_id, submitted_by))
    }

    async fn pending_events(&self) -> Result<Vec<EventWithRelations>, StorageError> {
        dispatch!(self, EventStore, pending_events())
    }

    async fn review_event(&self, id: i64, action: ReviewAction) -> Result<Event, StorageError> {
        dispatch!(self, EventStore, review_event(id, action))
    }

    async fn expire_old_events(&self, cutoff: NaiveDate) -> Result<u64, StorageError> {
        dispatch!(self, EventStore, expire_old_events(cutoff))
    }

    async fn events_for_subscriber(
        &self,
        filter: &SubscriptionFilter,
        today: NaiveDate,
    ) -> Result<Vec<EventWithRelations>, StorageError> {
        dispatch!(self, EventStore, events_for_subscriber(filter, today))
    }
}

// ── SubscriberStore ──────────────────────────────────────────────

#[async_trait]
impl SubscriberStore for StorageBackend {
    async fn active_subscribers(&self) -> Result<Vec<Subscriber>, StorageError> {
        dispatch!(self, SubscriberStore, active_subscribers())
    }

    async fn upsert_subscriber(
        &self,
        email: &str,
        filter: &SubscriptionFilter,
    ) -> Result<Subscriber, StorageError> {
        dispatch!(self, SubscriberStore, upsert_subscriber(email, filter))
    }

    async fn deactivate_subscriber(&self, email: &str) -> Result<bool, StorageError> {
        dispatch!(self, SubscriberStore, deactivate_subscriber(email))
    }
}
