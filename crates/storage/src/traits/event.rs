use async_trait::async_trait;
use chrono::NaiveDate;
use eventboard_core::{
    Event, EventQuery, EventRecord, EventWithRelations, ReviewAction, SubscriptionFilter,
};

use crate::error::StorageError;

/// Event listing, dedup upsert and moderation.
#[async_trait]
pub trait EventStore: Send + Sync {
    /// Non-expired events matching `query`, date ascending, paginated.
    async fn list_events(
        &self,
        query: &EventQuery,
    ) -> Result<Vec<EventWithRelations>, StorageError>;

    /// Fetch one event with its relations.
    async fn get_event(&self, id: i64) -> Result<Option<EventWithRelations>, StorageError>;

    /// Insert a new event or refresh the one sharing its dedup hash.
    ///
    /// Returns `true` when a row was inserted. A refreshed event gets the new
    /// `last_seen_at`, the record's `source_url` if it has one, and is no
    /// longer expired.
    async fn upsert_event(
        &self,
        record: &EventRecord,
        location_id: i64,
        game_system_id: i64,
    ) -> Result<(Event, bool), StorageError>;

    /// Upsert a user submission and mark it `pending_review`.
    async fn submit_event(
        &self,
        record: &EventRecord,
        location_id: i64,
        game_system_id: i64,
        submitted_by: &str,
    ) -> Result<Event, StorageError>;

    /// Events awaiting review, date ascending.
    async fn pending_events(&self) -> Result<Vec<EventWithRelations>, StorageError>;

    /// Approve or reject a submission. Rejection also expires the event.
    async fn review_event(&self, id: i64, action: ReviewAction) -> Result<Event, StorageError>;

    /// Mark every non-expired event dated before `cutoff` as expired.
    async fn expire_old_events(&self, cutoff: NaiveDate) -> Result<u64, StorageError>;

    /// Upcoming (`date >= today`) non-expired events selected by `filter`.
    async fn events_for_subscriber(
        &self,
        filter: &SubscriptionFilter,
        today: NaiveDate,
    ) -> Result<Vec<EventWithRelations>, StorageError>;
}
