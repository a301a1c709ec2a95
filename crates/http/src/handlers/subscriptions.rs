use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;

use eventboard_core::SubscriptionFilter;

use crate::api_error::ApiError;
use crate::query_types::{SubscribeRequest, UnsubscribeRequest};
use crate::response_types::{SubscribeOut, UnsubscribeOut};
use crate::AppState;

pub async fn subscribe(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SubscribeRequest>,
) -> Result<(StatusCode, Json<SubscribeOut>), ApiError> {
    let filter = SubscriptionFilter::new(req.location_ids, req.game_system_ids);
    let subscriber = state.subscriber_service.subscribe(&req.email, &filter).await?;
    Ok((StatusCode::CREATED, Json(subscriber.into())))
}

pub async fn unsubscribe(
    State(state): State<Arc<AppState>>,
    Json(req): Json<UnsubscribeRequest>,
) -> Result<Json<UnsubscribeOut>, ApiError> {
    let unsubscribed = state.subscriber_service.unsubscribe(&req.email).await?;
    Ok(Json(UnsubscribeOut { email: req.email.trim().to_owned(), unsubscribed }))
}
