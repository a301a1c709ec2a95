use std::sync::Arc;

use eventboard_core::{validate_email, Subscriber, SubscriptionFilter};
use eventboard_storage::traits::SubscriberStore;
use eventboard_storage::StorageBackend;

use crate::ServiceError;

pub struct SubscriberService {
    storage: Arc<StorageBackend>,
}

impl SubscriberService {
    #[must_use]
    pub const fn new(storage: Arc<StorageBackend>) -> Self {
        Self { storage }
    }

    /// Create or update a subscription. Re-subscribing replaces the filter.
    pub async fn subscribe(
        &self,
        email: &str,
        filter: &SubscriptionFilter,
    ) -> Result<Subscriber, ServiceError> {
        let email = validate_email(email)?;
        let subscriber = self.storage.upsert_subscriber(&email, filter).await?;
        tracing::info!(
            subscriber_id = subscriber.id,
            locations = filter.location_ids.len(),
            games = filter.game_system_ids.len(),
            "subscription saved"
        );
        Ok(subscriber)
    }

    /// Deactivate a subscription. Returns `false` if the email was unknown.
    pub async fn unsubscribe(&self, email: &str) -> Result<bool, ServiceError> {
        let email = validate_email(email)?;
        let found = self.storage.deactivate_subscriber(&email).await?;
        tracing::info!(found, "unsubscribe processed");
        Ok(found)
    }
}
