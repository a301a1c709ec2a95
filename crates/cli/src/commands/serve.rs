use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Result;
use eventboard_http::{create_router, AppState, AuthConfig, Settings};
use eventboard_mail::SmtpMailer;
use eventboard_service::{EventService, ImportService, NewsletterService, SubscriberService};
use eventboard_storage::StorageBackend;

use crate::open_storage;

/// Wire every service over one storage backend and the SMTP mailer.
pub(crate) fn build_state(storage: Arc<StorageBackend>, settings: Settings) -> Result<AppState> {
    let mailer = Arc::new(SmtpMailer::from_env()?);
    let event_service = Arc::new(EventService::new(Arc::clone(&storage)));
    let auth = AuthConfig::from_env();
    if auth.is_open() {
        tracing::warn!("neither ADMIN_SECRET nor AUTH0_DOMAIN set, admin routes are open");
    }
    Ok(AppState {
        subscriber_service: Arc::new(SubscriberService::new(Arc::clone(&storage))),
        import_service: Arc::new(ImportService::new(
            Arc::clone(&storage),
            Arc::clone(&event_service),
        )),
        newsletter_service: Arc::new(NewsletterService::new(storage, mailer)),
        event_service,
        auth,
        settings,
    })
}

pub(crate) async fn run(port: u16, host: &str) -> Result<ExitCode> {
    let storage = open_storage().await?;
    let state = Arc::new(build_state(storage, Settings::from_env())?);

    let router = create_router(state);
    let addr = format!("{host}:{port}");
    tracing::info!("Starting HTTP server on {}", addr);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, router).await?;

    Ok(ExitCode::SUCCESS)
}
