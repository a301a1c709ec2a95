//! PostgreSQL storage backend using sqlx.
//!
//! Split into modular files by aggregate.

#![allow(clippy::absolute_paths, reason = "std paths in error handling are clear")]

mod catalog;
mod events;
mod subscribers;

use chrono::{DateTime, Utc};
use eventboard_core::{
    Event, EventWithRelations, GameSystem, Location, SubmissionStatus, Subscriber,
    SubscriptionFilter, PG_POOL_ACQUIRE_TIMEOUT_SECS, PG_POOL_IDLE_TIMEOUT_SECS,
    PG_POOL_MAX_CONNECTIONS,
};
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Row};

use crate::error::StorageError;

use super::pg_migrations::run_pg_migrations;

pub(crate) const LOCATION_COLUMNS: &str =
    "id, name, city, state, website, discord_url, facebook_url, created_at";

pub(crate) const GAME_SYSTEM_COLUMNS: &str = "id, name, slug, publisher, created_at";

pub(crate) const EVENT_COLUMNS: &str = "id, location_id, game_system_id, title, date, start_time, \
     description, source_url, source_type, last_seen_at, is_expired, dedup_hash, submitted_by, \
     submission_status, created_at, updated_at";

/// Event columns plus prefixed location and game system columns, for `events e` joins.
pub(crate) const EVENT_WITH_RELATIONS_SELECT: &str = "SELECT e.id, e.location_id, \
     e.game_system_id, e.title, e.date, e.start_time, e.description, e.source_url, \
     e.source_type, e.last_seen_at, e.is_expired, e.dedup_hash, e.submitted_by, \
     e.submission_status, e.created_at, e.updated_at, \
     l.name AS l_name, l.city AS l_city, l.state AS l_state, l.website AS l_website, \
     l.discord_url AS l_discord_url, l.facebook_url AS l_facebook_url, \
     l.created_at AS l_created_at, \
     g.name AS g_name, g.slug AS g_slug, g.publisher AS g_publisher, \
     g.created_at AS g_created_at \
     FROM events e \
     JOIN locations l ON l.id = e.location_id \
     JOIN game_systems g ON g.id = e.game_system_id";

pub(crate) const SUBSCRIBER_COLUMNS: &str =
    "id, email, location_ids, game_system_ids, is_active, created_at";

#[derive(Clone, Debug)]
pub struct PgStorage {
    pool: PgPool,
}

impl PgStorage {
    pub async fn new(database_url: &str) -> Result<Self, StorageError> {
        let pool = PgPoolOptions::new()
            .max_connections(PG_POOL_MAX_CONNECTIONS)
            .acquire_timeout(std::time::Duration::from_secs(PG_POOL_ACQUIRE_TIMEOUT_SECS))
            .idle_timeout(std::time::Duration::from_secs(PG_POOL_IDLE_TIMEOUT_SECS))
            .test_before_acquire(true)
            .connect(database_url)
            .await?;
        run_pg_migrations(&pool).await.map_err(|e| StorageError::Migration(e.to_string()))?;
        tracing::info!("PgStorage initialized");
        Ok(Self { pool })
    }
}

/// Decode a JSONB list column. Anything but a list of `T` is corrupt data.
pub(crate) fn parse_json_list<T: serde::de::DeserializeOwned>(
    val: &serde_json::Value,
    context: &str,
) -> Result<Vec<T>, StorageError> {
    serde_json::from_value(val.clone()).map_err(|e| StorageError::DataCorruption {
        context: context.to_owned(),
        source: Box::new(e),
    })
}

/// Convert `usize` to `i64` for SQL LIMIT/OFFSET binds.
/// Saturates to `i64::MAX` on overflow (only possible on 128-bit targets).
pub(crate) fn usize_to_i64(val: usize) -> i64 {
    i64::try_from(val).unwrap_or(i64::MAX)
}

/// Parse `SubmissionStatus` from a nullable text column, dropping unknown values.
fn parse_pg_submission_status(s: Option<&str>) -> Option<SubmissionStatus> {
    let s = s?;
    s.parse().map_or_else(
        |_| {
            tracing::warn!(invalid_status = %s, "corrupt submission_status in DB, ignoring");
            None
        },
        Some,
    )
}

pub(crate) fn row_to_location(row: &PgRow) -> Result<Location, StorageError> {
    Ok(Location {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        city: row.try_get("city")?,
        state: row.try_get("state")?,
        website: row.try_get("website")?,
        discord_url: row.try_get("discord_url")?,
        facebook_url: row.try_get("facebook_url")?,
        created_at: row.try_get("created_at")?,
    })
}

pub(crate) fn row_to_game_system(row: &PgRow) -> Result<GameSystem, StorageError> {
    Ok(GameSystem {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        slug: row.try_get("slug")?,
        publisher: row.try_get("publisher")?,
        created_at: row.try_get("created_at")?,
    })
}

pub(crate) fn row_to_event(row: &PgRow) -> Result<Event, StorageError> {
    let status: Option<String> = row.try_get("submission_status")?;
    Ok(Event {
        id: row.try_get("id")?,
        location_id: row.try_get("location_id")?,
        game_system_id: row.try_get("game_system_id")?,
        title: row.try_get("title")?,
        date: row.try_get("date")?,
        start_time: row.try_get("start_time")?,
        description: row.try_get("description")?,
        source_url: row.try_get("source_url")?,
        source_type: row.try_get("source_type")?,
        last_seen_at: row.try_get("last_seen_at")?,
        is_expired: row.try_get("is_expired")?,
        dedup_hash: row.try_get("dedup_hash")?,
        submitted_by: row.try_get("submitted_by")?,
        submission_status: parse_pg_submission_status(status.as_deref()),
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

pub(crate) fn row_to_event_with_relations(
    row: &PgRow,
) -> Result<EventWithRelations, StorageError> {
    let event = row_to_event(row)?;
    let location = Location {
        id: event.location_id,
        name: row.try_get("l_name")?,
        city: row.try_get("l_city")?,
        state: row.try_get("l_state")?,
        website: row.try_get("l_website")?,
        discord_url: row.try_get("l_discord_url")?,
        facebook_url: row.try_get("l_facebook_url")?,
        created_at: row.try_get("l_created_at")?,
    };
    let game_system = GameSystem {
        id: event.game_system_id,
        name: row.try_get("g_name")?,
        slug: row.try_get("g_slug")?,
        publisher: row.try_get("g_publisher")?,
        created_at: row.try_get("g_created_at")?,
    };
    Ok(EventWithRelations { event, location, game_system })
}

pub(crate) fn row_to_subscriber(row: &PgRow) -> Result<Subscriber, StorageError> {
    let location_ids: serde_json::Value = row.try_get("location_ids")?;
    let game_system_ids: serde_json::Value = row.try_get("game_system_ids")?;
    let created_at: DateTime<Utc> = row.try_get("created_at")?;
    let id: i64 = row.try_get("id")?;
    Ok(Subscriber {
        id,
        email: row.try_get("email")?,
        filter: SubscriptionFilter::new(
            parse_json_list(&location_ids, &format!("subscriber {id} location_ids"))?,
            parse_json_list(&game_system_ids, &format!("subscriber {id} game_system_ids"))?,
        ),
        is_active: row.try_get("is_active")?,
        created_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn json_list_decodes_ids() {
        let ids: Vec<i64> = parse_json_list(&json!([1, 2, 3]), "ids").unwrap();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn non_list_json_is_data_corruption() {
        let err = parse_json_list::<i64>(&json!({"oops": true}), "subscriber 7 location_ids")
            .unwrap_err();
        assert!(matches!(err, StorageError::DataCorruption { .. }));
        assert!(err.to_string().contains("subscriber 7 location_ids"));
    }
}
