use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use eventboard_core::{
    BatchSummary, EventInput, EventQuery, EventRecord, EventWithRelations, GameSystem, Location,
    ReviewAction, MAX_BATCH_EVENTS,
};
use eventboard_storage::traits::{EventStore, GameSystemStore, LocationStore};
use eventboard_storage::StorageBackend;

use crate::ServiceError;

pub struct EventService {
    storage: Arc<StorageBackend>,
}

impl EventService {
    #[must_use]
    pub const fn new(storage: Arc<StorageBackend>) -> Self {
        Self { storage }
    }

    /// Resolve (creating if needed) the location and game system named by `record`.
    async fn resolve_relations(
        &self,
        record: &EventRecord,
    ) -> Result<(Location, GameSystem), ServiceError> {
        let location = self.storage.get_or_create_location(&record.location_name).await?;
        let game_system = self.storage.get_or_create_game_system(&record.game_system).await?;
        Ok((location, game_system))
    }

    /// Upsert a normalized record. Returns the event and whether it was inserted.
    pub async fn upsert_record(
        &self,
        record: &EventRecord,
    ) -> Result<(EventWithRelations, bool), ServiceError> {
        let (location, game_system) = self.resolve_relations(record).await?;
        let (event, created) =
            self.storage.upsert_event(record, location.id, game_system.id).await?;
        Ok((EventWithRelations { event, location, game_system }, created))
    }

    pub async fn create_event(
        &self,
        input: &EventInput,
    ) -> Result<EventWithRelations, ServiceError> {
        let record = EventRecord::from_input(input, Utc::now())?;
        let (event, created) = self.upsert_record(&record).await?;
        tracing::info!(event_id = event.event.id, created, title = %event.event.title, "event upserted");
        Ok(event)
    }

    /// Upsert each input independently; failures are counted, not propagated.
    pub async fn create_events_batch(
        &self,
        inputs: &[EventInput],
    ) -> Result<BatchSummary, ServiceError> {
        if inputs.len() > MAX_BATCH_EVENTS {
            return Err(ServiceError::InvalidInput(format!(
                "batch of {} exceeds the limit of {MAX_BATCH_EVENTS} events",
                inputs.len()
            )));
        }
        let now = Utc::now();
        let mut summary = BatchSummary::default();
        for input in inputs {
            let outcome = match EventRecord::from_input(input, now) {
                Ok(record) => self.upsert_record(&record).await.map(|(_, created)| created),
                Err(e) => Err(e.into()),
            };
            match outcome {
                Ok(created) => summary.record(created),
                Err(e) => {
                    summary.errors += 1;
                    tracing::warn!(title = %input.title, error = %e, "batch item failed");
                },
            }
        }
        tracing::info!(
            created = summary.created,
            updated = summary.updated,
            errors = summary.errors,
            "batch processed"
        );
        Ok(summary)
    }

    pub async fn list_events(
        &self,
        query: &EventQuery,
    ) -> Result<Vec<EventWithRelations>, ServiceError> {
        query.validate()?;
        Ok(self.storage.list_events(query).await?)
    }

    /// Every listed event in the calendar month containing `today`.
    pub async fn month_events(
        &self,
        today: NaiveDate,
    ) -> Result<Vec<EventWithRelations>, ServiceError> {
        self.list_events(&EventQuery::month_of(today)).await
    }

    pub async fn list_locations(&self) -> Result<Vec<Location>, ServiceError> {
        Ok(self.storage.list_locations().await?)
    }

    pub async fn list_game_systems(&self) -> Result<Vec<GameSystem>, ServiceError> {
        Ok(self.storage.list_game_systems().await?)
    }

    /// Record a user submission pending admin review.
    pub async fn submit_event(
        &self,
        input: &EventInput,
        user_sub: &str,
    ) -> Result<EventWithRelations, ServiceError> {
        let mut record = EventRecord::from_input(input, Utc::now())?;
        // Submissions are always stamped with the time they were received.
        record.last_seen_at = Utc::now();
        let (location, game_system) = self.resolve_relations(&record).await?;
        let event =
            self.storage.submit_event(&record, location.id, game_system.id, user_sub).await?;
        tracing::info!(event_id = event.id, submitted_by = user_sub, "event submitted for review");
        Ok(EventWithRelations { event, location, game_system })
    }

    pub async fn pending_events(&self) -> Result<Vec<EventWithRelations>, ServiceError> {
        Ok(self.storage.pending_events().await?)
    }

    pub async fn review_event(
        &self,
        id: i64,
        action: ReviewAction,
    ) -> Result<EventWithRelations, ServiceError> {
        let event = self.storage.review_event(id, action).await.map_err(|e| {
            if e.is_not_found() {
                ServiceError::NotFound(format!("event {id}"))
            } else {
                e.into()
            }
        })?;
        tracing::info!(event_id = id, ?action, "event reviewed");
        self.storage
            .get_event(event.id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("event {id}")))
    }
}
