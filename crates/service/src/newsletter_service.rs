use std::sync::Arc;

use chrono::NaiveDate;
use eventboard_core::{EventQuery, NewsletterSummary, NEWSLETTER_SUBJECT, PREVIEW_EVENT_LIMIT};
use eventboard_mail::{build_preview_email, build_subscriber_email, Mailer};
use eventboard_storage::traits::{EventStore, SubscriberStore};
use eventboard_storage::StorageBackend;

use crate::ServiceError;

pub struct NewsletterService {
    storage: Arc<StorageBackend>,
    mailer: Arc<dyn Mailer>,
}

impl NewsletterService {
    #[must_use]
    pub fn new(storage: Arc<StorageBackend>, mailer: Arc<dyn Mailer>) -> Self {
        Self { storage, mailer }
    }

    /// Send each active subscriber their upcoming matching events.
    ///
    /// Subscribers with nothing to read are skipped. A failed send is logged
    /// and counted; the run continues.
    pub async fn run_newsletter(&self, today: NaiveDate) -> Result<NewsletterSummary, ServiceError> {
        let subscribers = self.storage.active_subscribers().await?;
        let mut summary = NewsletterSummary::default();

        for subscriber in &subscribers {
            let events = self.storage.events_for_subscriber(&subscriber.filter, today).await?;
            if events.is_empty() {
                summary.skipped += 1;
                continue;
            }
            let html = build_subscriber_email(&events);
            match self.mailer.send(&subscriber.email, NEWSLETTER_SUBJECT, &html).await {
                Ok(()) => summary.sent += 1,
                Err(e) => {
                    tracing::error!(subscriber_id = subscriber.id, error = %e, "newsletter send failed");
                    summary.errors += 1;
                },
            }
        }

        tracing::info!(
            subscribers = subscribers.len(),
            sent = summary.sent,
            skipped = summary.skipped,
            errors = summary.errors,
            "newsletter run complete"
        );
        Ok(summary)
    }

    /// Render the monthly preview (calendar plus table) for the month of `today`.
    pub async fn preview_email(
        &self,
        website_url: &str,
        today: NaiveDate,
    ) -> Result<String, ServiceError> {
        let query = EventQuery { limit: PREVIEW_EVENT_LIMIT, ..EventQuery::month_of(today) };
        let events = self.storage.list_events(&query).await?;
        tracing::debug!(events = events.len(), "rendering preview email");
        Ok(build_preview_email(&events, website_url, today))
    }
}
