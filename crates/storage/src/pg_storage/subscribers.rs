//! SubscriberStore implementation for PgStorage.

use super::*;

use crate::traits::SubscriberStore;
use async_trait::async_trait;

#[async_trait]
impl SubscriberStore for PgStorage {
    async fn active_subscribers(&self) -> Result<Vec<Subscriber>, StorageError> {
        let rows = sqlx::query(&format!(
            "SELECT {SUBSCRIBER_COLUMNS} FROM subscribers WHERE is_active = TRUE ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(row_to_subscriber).collect()
    }

    async fn upsert_subscriber(
        &self,
        email: &str,
        filter: &SubscriptionFilter,
    ) -> Result<Subscriber, StorageError> {
        let row = sqlx::query(&format!(
            "INSERT INTO subscribers (email, location_ids, game_system_ids)
             VALUES ($1, $2, $3)
             ON CONFLICT (email) DO UPDATE SET
               location_ids = EXCLUDED.location_ids,
               game_system_ids = EXCLUDED.game_system_ids,
               is_active = TRUE
             RETURNING {SUBSCRIBER_COLUMNS}"
        ))
        .bind(email)
        .bind(serde_json::to_value(&filter.location_ids)?)
        .bind(serde_json::to_value(&filter.game_system_ids)?)
        .fetch_one(&self.pool)
        .await?;
        row_to_subscriber(&row)
    }

    async fn deactivate_subscriber(&self, email: &str) -> Result<bool, StorageError> {
        let result = sqlx::query("UPDATE subscribers SET is_active = FALSE WHERE email = $1")
            .bind(email)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
