use async_trait::async_trait;
use eventboard_core::{Subscriber, SubscriptionFilter};

use crate::error::StorageError;

/// Newsletter recipients.
#[async_trait]
pub trait SubscriberStore: Send + Sync {
    async fn active_subscribers(&self) -> Result<Vec<Subscriber>, StorageError>;

    /// Create a subscriber, or replace the filter of an existing one and reactivate it.
    async fn upsert_subscriber(
        &self,
        email: &str,
        filter: &SubscriptionFilter,
    ) -> Result<Subscriber, StorageError>;

    /// Returns `false` when no subscriber has this email.
    async fn deactivate_subscriber(&self, email: &str) -> Result<bool, StorageError>;
}
