use axum::{extract::State, Json};
use std::sync::Arc;

use eventboard_core::{GameSystem, Location};

use crate::api_error::ApiError;
use crate::AppState;

pub async fn list_locations(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Location>>, ApiError> {
    Ok(Json(state.event_service.list_locations().await?))
}

pub async fn list_game_systems(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<GameSystem>>, ApiError> {
    Ok(Json(state.event_service.list_game_systems().await?))
}
