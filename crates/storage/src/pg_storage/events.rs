//! EventStore implementation for PgStorage.

use super::*;

use crate::traits::EventStore;
use async_trait::async_trait;
use chrono::NaiveDate;
use eventboard_core::{EventQuery, EventRecord, ReviewAction};

#[async_trait]
impl EventStore for PgStorage {
    async fn list_events(
        &self,
        query: &EventQuery,
    ) -> Result<Vec<EventWithRelations>, StorageError> {
        let rows = sqlx::query(&format!(
            "{EVENT_WITH_RELATIONS_SELECT}
             WHERE e.is_expired = FALSE
               AND ($1::BIGINT IS NULL OR e.location_id = $1)
               AND (cardinality($2::BIGINT[]) = 0 OR e.game_system_id = ANY($2))
               AND ($3::DATE IS NULL OR e.date >= $3)
               AND ($4::DATE IS NULL OR e.date <= $4)
             ORDER BY e.date ASC, e.id ASC
             LIMIT $5 OFFSET $6"
        ))
        .bind(query.location_id)
        .bind(&query.game_system_ids)
        .bind(query.date_from)
        .bind(query.date_to)
        .bind(usize_to_i64(query.limit))
        .bind(usize_to_i64(query.skip))
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(row_to_event_with_relations).collect()
    }

    async fn get_event(&self, id: i64) -> Result<Option<EventWithRelations>, StorageError> {
        let row = sqlx::query(&format!("{EVENT_WITH_RELATIONS_SELECT} WHERE e.id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(|r| row_to_event_with_relations(&r)).transpose()
    }

    async fn upsert_event(
        &self,
        record: &EventRecord,
        location_id: i64,
        game_system_id: i64,
    ) -> Result<(Event, bool), StorageError> {
        // `xmax = 0` only holds for a freshly inserted tuple.
        let row = sqlx::query(&format!(
            "INSERT INTO events (location_id, game_system_id, title, date, start_time,
                                 description, source_url, source_type, last_seen_at, dedup_hash)
             VALUES ($1,$2,$3,$4,$5,$6,$7,$8,$9,$10)
             ON CONFLICT (dedup_hash) DO UPDATE SET
               last_seen_at = EXCLUDED.last_seen_at,
               source_url = COALESCE(EXCLUDED.source_url, events.source_url),
               is_expired = FALSE,
               updated_at = NOW()
             RETURNING {EVENT_COLUMNS}, (xmax = 0) AS inserted"
        ))
        .bind(location_id)
        .bind(game_system_id)
        .bind(&record.title)
        .bind(record.date)
        .bind(&record.time)
        .bind(&record.description)
        .bind(&record.source_url)
        .bind(&record.source_type)
        .bind(record.last_seen_at)
        .bind(&record.dedup_hash)
        .fetch_one(&self.pool)
        .await?;
        let inserted: bool = row.try_get("inserted")?;
        Ok((row_to_event(&row)?, inserted))
    }

    async fn submit_event(
        &self,
        record: &EventRecord,
        location_id: i64,
        game_system_id: i64,
        submitted_by: &str,
    ) -> Result<Event, StorageError> {
        let row = sqlx::query(&format!(
            "INSERT INTO events (location_id, game_system_id, title, date, start_time,
                                 description, source_url, source_type, last_seen_at, dedup_hash,
                                 submitted_by, submission_status)
             VALUES ($1,$2,$3,$4,$5,$6,$7,$8,$9,$10,$11,$12)
             ON CONFLICT (dedup_hash) DO UPDATE SET
               last_seen_at = EXCLUDED.last_seen_at,
               submitted_by = EXCLUDED.submitted_by,
               submission_status = EXCLUDED.submission_status,
               is_expired = FALSE,
               updated_at = NOW()
             RETURNING {EVENT_COLUMNS}"
        ))
        .bind(location_id)
        .bind(game_system_id)
        .bind(&record.title)
        .bind(record.date)
        .bind(&record.time)
        .bind(&record.description)
        .bind(&record.source_url)
        .bind(&record.source_type)
        .bind(record.last_seen_at)
        .bind(&record.dedup_hash)
        .bind(submitted_by)
        .bind(SubmissionStatus::PendingReview.as_str())
        .fetch_one(&self.pool)
        .await?;
        row_to_event(&row)
    }

    async fn pending_events(&self) -> Result<Vec<EventWithRelations>, StorageError> {
        let rows = sqlx::query(&format!(
            "{EVENT_WITH_RELATIONS_SELECT}
             WHERE e.submission_status = $1
             ORDER BY e.date ASC, e.id ASC"
        ))
        .bind(SubmissionStatus::PendingReview.as_str())
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(row_to_event_with_relations).collect()
    }

    async fn review_event(&self, id: i64, action: ReviewAction) -> Result<Event, StorageError> {
        let (status, expire) = match action {
            ReviewAction::Approve => (SubmissionStatus::Approved, false),
            ReviewAction::Reject => (SubmissionStatus::Rejected, true),
        };
        let row = sqlx::query(&format!(
            "UPDATE events SET submission_status = $1,
                               is_expired = is_expired OR $2,
                               updated_at = NOW()
             WHERE id = $3
             RETURNING {EVENT_COLUMNS}"
        ))
        .bind(status.as_str())
        .bind(expire)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        match row {
            Some(r) => row_to_event(&r),
            None => Err(StorageError::not_found("event", id)),
        }
    }

    async fn expire_old_events(&self, cutoff: NaiveDate) -> Result<u64, StorageError> {
        let result = sqlx::query(
            "UPDATE events SET is_expired = TRUE, updated_at = NOW()
             WHERE date < $1 AND is_expired = FALSE",
        )
        .bind(cutoff)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    async fn events_for_subscriber(
        &self,
        filter: &SubscriptionFilter,
        today: NaiveDate,
    ) -> Result<Vec<EventWithRelations>, StorageError> {
        if filter.is_empty() {
            return Ok(Vec::new());
        }
        let rows = sqlx::query(&format!(
            "{EVENT_WITH_RELATIONS_SELECT}
             WHERE (e.location_id = ANY($1) OR e.game_system_id = ANY($2))
               AND e.is_expired = FALSE
               AND e.date >= $3
             ORDER BY e.date ASC, e.id ASC"
        ))
        .bind(&filter.location_ids)
        .bind(&filter.game_system_ids)
        .bind(today)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(row_to_event_with_relations).collect()
    }
}
