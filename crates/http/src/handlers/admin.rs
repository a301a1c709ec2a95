use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use std::sync::Arc;

use eventboard_core::{EventOut, ImportSummary, NewsletterSummary};

use crate::api_error::ApiError;
use crate::auth::AdminGuard;
use crate::query_types::ReviewRequest;
use crate::AppState;

pub async fn review_queue(
    State(state): State<Arc<AppState>>,
    _admin: AdminGuard,
) -> Result<Json<Vec<EventOut>>, ApiError> {
    let pending = state.event_service.pending_events().await?;
    Ok(Json(pending.into_iter().map(EventOut::from).collect()))
}

pub async fn review_event(
    State(state): State<Arc<AppState>>,
    AdminGuard(admin): AdminGuard,
    Path(id): Path<i64>,
    Json(req): Json<ReviewRequest>,
) -> Result<Json<EventOut>, ApiError> {
    let event = state.event_service.review_event(id, req.action).await?;
    tracing::info!(event_id = id, reviewer = %admin.sub, "review recorded");
    Ok(Json(event.into()))
}

pub async fn trigger_import(
    State(state): State<Arc<AppState>>,
    _admin: AdminGuard,
) -> Result<Json<ImportSummary>, ApiError> {
    let today = Utc::now().date_naive();
    let summary =
        state.import_service.run_import(&state.settings.import_data_dir, today).await?;
    Ok(Json(summary))
}

pub async fn trigger_newsletter(
    State(state): State<Arc<AppState>>,
    _admin: AdminGuard,
) -> Result<Json<NewsletterSummary>, ApiError> {
    let today = Utc::now().date_naive();
    Ok(Json(state.newsletter_service.run_newsletter(today).await?))
}

/// Monthly preview as a downloadable HTML file.
pub async fn preview_email(
    State(state): State<Arc<AppState>>,
    _admin: AdminGuard,
) -> Result<Response, ApiError> {
    let today = Utc::now().date_naive();
    let html =
        state.newsletter_service.preview_email(&state.settings.website_url, today).await?;
    let disposition =
        format!("attachment; filename=\"preview-email-{}.html\"", today.format("%Y-%m"));
    Ok((
        [
            (header::CONTENT_TYPE, "text/html; charset=utf-8".to_owned()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        html,
    )
        .into_response())
}
