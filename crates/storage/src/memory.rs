//! In-process storage backend.
//!
//! Same semantics as `PgStorage`, kept in a single `RwLock`-guarded state.
//! Used by tests and by `serve` when no database is configured.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use eventboard_core::{
    make_slug, slug_candidates, Event, EventQuery, EventRecord, EventWithRelations, GameSystem,
    Location, ReviewAction, SubmissionStatus, Subscriber, SubscriptionFilter,
};
use tokio::sync::RwLock;

use crate::error::StorageError;
use crate::traits::{EventStore, GameSystemStore, LocationStore, SubscriberStore};

#[derive(Debug, Default)]
struct MemoryState {
    locations: Vec<Location>,
    game_systems: Vec<GameSystem>,
    events: Vec<Event>,
    subscribers: Vec<Subscriber>,
    ids: IdSequences,
}

/// Per-table id sequences, like one `BIGSERIAL` per Postgres table.
#[derive(Debug, Default)]
struct IdSequences {
    location: i64,
    game_system: i64,
    event: i64,
    subscriber: i64,
}

fn bump(seq: &mut i64) -> i64 {
    *seq += 1;
    *seq
}

impl MemoryState {

    fn with_relations(&self, event: &Event) -> Result<EventWithRelations, StorageError> {
        let location = self
            .locations
            .iter()
            .find(|l| l.id == event.location_id)
            .cloned()
            .ok_or_else(|| StorageError::not_found("location", event.location_id))?;
        let game_system = self
            .game_systems
            .iter()
            .find(|g| g.id == event.game_system_id)
            .cloned()
            .ok_or_else(|| StorageError::not_found("game_system", event.game_system_id))?;
        Ok(EventWithRelations { event: event.clone(), location, game_system })
    }

    /// Events passing `keep`, date ascending, with relations attached.
    fn collect_sorted(
        &self,
        keep: impl Fn(&Event) -> bool,
    ) -> Result<Vec<EventWithRelations>, StorageError> {
        let mut events: Vec<&Event> = self.events.iter().filter(|e| keep(e)).collect();
        events.sort_by_key(|e| (e.date, e.id));
        events.into_iter().map(|e| self.with_relations(e)).collect()
    }

    fn insert_event(
        &mut self,
        record: &EventRecord,
        location_id: i64,
        game_system_id: i64,
    ) -> &mut Event {
        let now = Utc::now();
        let id = bump(&mut self.ids.event);
        self.events.push(Event {
            id,
            location_id,
            game_system_id,
            title: record.title.clone(),
            date: record.date,
            start_time: record.time.clone(),
            description: record.description.clone(),
            source_url: record.source_url.clone(),
            source_type: record.source_type.clone(),
            last_seen_at: Some(record.last_seen_at),
            is_expired: false,
            dedup_hash: record.dedup_hash.clone(),
            submitted_by: None,
            submission_status: None,
            created_at: now,
            updated_at: now,
        });
        let last = self.events.len() - 1;
        &mut self.events[last]
    }
}

#[derive(Clone, Debug, Default)]
pub struct MemoryStorage {
    state: Arc<RwLock<MemoryState>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LocationStore for MemoryStorage {
    async fn list_locations(&self) -> Result<Vec<Location>, StorageError> {
        let state = self.state.read().await;
        let mut locations = state.locations.clone();
        locations.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(locations)
    }

    async fn get_or_create_location(&self, name: &str) -> Result<Location, StorageError> {
        let mut state = self.state.write().await;
        if let Some(existing) = state.locations.iter().find(|l| l.name == name) {
            return Ok(existing.clone());
        }
        let location = Location::named(bump(&mut state.ids.location), name, Utc::now());
        state.locations.push(location.clone());
        Ok(location)
    }
}

#[async_trait]
impl GameSystemStore for MemoryStorage {
    async fn list_game_systems(&self) -> Result<Vec<GameSystem>, StorageError> {
        let state = self.state.read().await;
        let mut systems = state.game_systems.clone();
        systems.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(systems)
    }

    async fn get_or_create_game_system(&self, name: &str) -> Result<GameSystem, StorageError> {
        let mut state = self.state.write().await;
        if let Some(existing) = state.game_systems.iter().find(|g| g.name == name) {
            return Ok(existing.clone());
        }
        let base = make_slug(name);
        let slug = slug_candidates(&base)
            .find(|candidate| !state.game_systems.iter().any(|g| &g.slug == candidate))
            .ok_or_else(|| StorageError::Duplicate(format!("no free slug for {name}")))?;
        let game_system = GameSystem {
            id: bump(&mut state.ids.game_system),
            name: name.to_owned(),
            slug,
            publisher: None,
            created_at: Utc::now(),
        };
        state.game_systems.push(game_system.clone());
        Ok(game_system)
    }
}

#[async_trait]
impl EventStore for MemoryStorage {
    async fn list_events(
        &self,
        query: &EventQuery,
    ) -> Result<Vec<EventWithRelations>, StorageError> {
        let state = self.state.read().await;
        let all = state.collect_sorted(|e| query.matches(e))?;
        Ok(all.into_iter().skip(query.skip).take(query.limit).collect())
    }

    async fn get_event(&self, id: i64) -> Result<Option<EventWithRelations>, StorageError> {
        let state = self.state.read().await;
        state.events.iter().find(|e| e.id == id).map(|e| state.with_relations(e)).transpose()
    }

    async fn upsert_event(
        &self,
        record: &EventRecord,
        location_id: i64,
        game_system_id: i64,
    ) -> Result<(Event, bool), StorageError> {
        let mut state = self.state.write().await;
        if let Some(existing) = state.events.iter_mut().find(|e| e.dedup_hash == record.dedup_hash)
        {
            existing.last_seen_at = Some(record.last_seen_at);
            if let Some(url) = &record.source_url {
                existing.source_url = Some(url.clone());
            }
            existing.is_expired = false;
            existing.updated_at = Utc::now();
            return Ok((existing.clone(), false));
        }
        let event = state.insert_event(record, location_id, game_system_id).clone();
        Ok((event, true))
    }

    async fn submit_event(
        &self,
        record: &EventRecord,
        location_id: i64,
        game_system_id: i64,
        submitted_by: &str,
    ) -> Result<Event, StorageError> {
        let mut state = self.state.write().await;
        let position = state.events.iter().position(|e| e.dedup_hash == record.dedup_hash);
        let event = match position {
            Some(idx) => {
                let existing = &mut state.events[idx];
                existing.last_seen_at = Some(record.last_seen_at);
                existing.is_expired = false;
                existing.updated_at = Utc::now();
                existing
            },
            None => state.insert_event(record, location_id, game_system_id),
        };
        event.submitted_by = Some(submitted_by.to_owned());
        event.submission_status = Some(SubmissionStatus::PendingReview);
        Ok(event.clone())
    }

    async fn pending_events(&self) -> Result<Vec<EventWithRelations>, StorageError> {
        let state = self.state.read().await;
        state.collect_sorted(|e| e.submission_status == Some(SubmissionStatus::PendingReview))
    }

    async fn review_event(&self, id: i64, action: ReviewAction) -> Result<Event, StorageError> {
        let mut state = self.state.write().await;
        let event = state
            .events
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| StorageError::not_found("event", id))?;
        match action {
            ReviewAction::Approve => event.submission_status = Some(SubmissionStatus::Approved),
            ReviewAction::Reject => {
                event.submission_status = Some(SubmissionStatus::Rejected);
                event.is_expired = true;
            },
        }
        event.updated_at = Utc::now();
        Ok(event.clone())
    }

    async fn expire_old_events(&self, cutoff: NaiveDate) -> Result<u64, StorageError> {
        let mut state = self.state.write().await;
        let now = Utc::now();
        let mut count = 0_u64;
        for event in state.events.iter_mut().filter(|e| !e.is_expired && e.date < cutoff) {
            event.is_expired = true;
            event.updated_at = now;
            count += 1;
        }
        Ok(count)
    }

    async fn events_for_subscriber(
        &self,
        filter: &SubscriptionFilter,
        today: NaiveDate,
    ) -> Result<Vec<EventWithRelations>, StorageError> {
        let state = self.state.read().await;
        state.collect_sorted(|e| !e.is_expired && e.date >= today && filter.matches(e))
    }
}

#[async_trait]
impl SubscriberStore for MemoryStorage {
    async fn active_subscribers(&self) -> Result<Vec<Subscriber>, StorageError> {
        let state = self.state.read().await;
        Ok(state.subscribers.iter().filter(|s| s.is_active).cloned().collect())
    }

    async fn upsert_subscriber(
        &self,
        email: &str,
        filter: &SubscriptionFilter,
    ) -> Result<Subscriber, StorageError> {
        let mut state = self.state.write().await;
        if let Some(existing) = state.subscribers.iter_mut().find(|s| s.email == email) {
            existing.filter = filter.clone();
            existing.is_active = true;
            return Ok(existing.clone());
        }
        let subscriber = Subscriber {
            id: bump(&mut state.ids.subscriber),
            email: email.to_owned(),
            filter: filter.clone(),
            is_active: true,
            created_at: Utc::now(),
        };
        state.subscribers.push(subscriber.clone());
        Ok(subscriber)
    }

    async fn deactivate_subscriber(&self, email: &str) -> Result<bool, StorageError> {
        let mut state = self.state.write().await;
        match state.subscribers.iter_mut().find(|s| s.email == email) {
            Some(subscriber) => {
                subscriber.is_active = false;
                Ok(true)
            },
            None => Ok(false),
        }
    }
}
