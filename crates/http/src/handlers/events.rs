use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use eventboard_core::{BatchSummary, EventInput, EventOut};

use crate::api_error::ApiError;
use crate::auth::UserGuard;
use crate::query_types::parse_event_query;
use crate::AppState;

pub async fn create_event(
    State(state): State<Arc<AppState>>,
    Json(input): Json<EventInput>,
) -> Result<(StatusCode, Json<EventOut>), ApiError> {
    let event = state.event_service.create_event(&input).await?;
    Ok((StatusCode::CREATED, Json(event.into())))
}

pub async fn create_events_batch(
    State(state): State<Arc<AppState>>,
    Json(inputs): Json<Vec<EventInput>>,
) -> Result<Json<BatchSummary>, ApiError> {
    Ok(Json(state.event_service.create_events_batch(&inputs).await?))
}

pub async fn list_events(
    State(state): State<Arc<AppState>>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Json<Vec<EventOut>>, ApiError> {
    let query = parse_event_query(&params).map_err(ApiError::BadRequest)?;
    let events = state.event_service.list_events(&query).await?;
    Ok(Json(events.into_iter().map(EventOut::from).collect()))
}

pub async fn submit_event(
    State(state): State<Arc<AppState>>,
    UserGuard(claims): UserGuard,
    Json(input): Json<EventInput>,
) -> Result<(StatusCode, Json<EventOut>), ApiError> {
    let event = state.event_service.submit_event(&input, &claims.sub).await?;
    Ok((StatusCode::CREATED, Json(event.into())))
}
