//! HTTP API server for eventboard.

#![allow(missing_docs, reason = "Internal crate with self-explanatory API")]
#![allow(unreachable_pub, reason = "pub items are re-exported")]
#![allow(clippy::absolute_paths, reason = "Explicit paths for clarity")]
#![allow(missing_debug_implementations, reason = "Internal types")]
#![allow(clippy::missing_docs_in_private_items, reason = "Internal crate")]
#![allow(clippy::implicit_return, reason = "Implicit return is idiomatic Rust")]
#![allow(clippy::question_mark_used, reason = "? operator is idiomatic Rust")]
#![allow(clippy::min_ident_chars, reason = "Short closure params are idiomatic")]
#![allow(clippy::exhaustive_structs, reason = "HTTP types are stable")]
#![allow(clippy::single_call_fn, reason = "Helper functions improve readability")]

pub mod api_error;
pub mod auth;
mod handlers;
mod query_types;
mod response_types;
mod spa;

use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    routing::{get, patch, post},
    Json, Router,
};
use eventboard_core::{env_non_empty, env_or};
use eventboard_service::{EventService, ImportService, NewsletterService, SubscriberService};
use tower_http::cors::{Any, CorsLayer};

pub use auth::{AuthConfig, Claims, JwtVerifier};
pub use response_types::HealthResponse;

pub const DEFAULT_WEBSITE_URL: &str = "http://localhost:8000/";
pub const DEFAULT_IMPORT_DATA_DIR: &str = "data";

/// Deployment settings that handlers need at request time.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Link target in the preview email header.
    pub website_url: String,
    /// Directory scanned by `POST /admin/import`.
    pub import_data_dir: PathBuf,
    /// Built SPA; served as a fallback when the directory exists.
    pub frontend_dist: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            website_url: DEFAULT_WEBSITE_URL.to_owned(),
            import_data_dir: PathBuf::from(DEFAULT_IMPORT_DATA_DIR),
            frontend_dist: None,
        }
    }
}

impl Settings {
    /// Read `WEBSITE_URL`, `IMPORT_DATA_DIR` and `FRONTEND_DIST`.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            website_url: env_or("WEBSITE_URL", DEFAULT_WEBSITE_URL),
            import_data_dir: PathBuf::from(env_or("IMPORT_DATA_DIR", DEFAULT_IMPORT_DATA_DIR)),
            frontend_dist: env_non_empty("FRONTEND_DIST").map(PathBuf::from),
        }
    }
}

/// Shared application state for all HTTP handlers.
pub struct AppState {
    pub event_service: Arc<EventService>,
    pub subscriber_service: Arc<SubscriberService>,
    pub import_service: Arc<ImportService>,
    pub newsletter_service: Arc<NewsletterService>,
    pub auth: AuthConfig,
    pub settings: Settings,
}

pub fn create_router(state: Arc<AppState>) -> Router {
    let dist = state.settings.frontend_dist.clone();
    let cors = CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any);

    let api = Router::new()
        .route("/health", get(health))
        .route(
            "/events",
            get(handlers::events::list_events).post(handlers::events::create_event),
        )
        .route("/events/batch", post(handlers::events::create_events_batch))
        .route("/events/submit", post(handlers::events::submit_event))
        .route("/locations", get(handlers::catalog::list_locations))
        .route("/games", get(handlers::catalog::list_game_systems))
        .route("/subscribe", post(handlers::subscriptions::subscribe))
        .route("/unsubscribe", post(handlers::subscriptions::unsubscribe))
        .route("/admin/review", get(handlers::admin::review_queue))
        .route("/admin/events/{id}/review", patch(handlers::admin::review_event))
        .route("/admin/import", post(handlers::admin::trigger_import))
        .route("/admin/newsletter", post(handlers::admin::trigger_newsletter))
        .route("/admin/preview-email", get(handlers::admin::preview_email))
        .with_state(state);

    spa::with_frontend(api, dist.as_deref()).layer(cors)
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}
