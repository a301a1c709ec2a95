//! Response types (Serialize)

use eventboard_core::Subscriber;
use serde::Serialize;

#[derive(Debug, Serialize)]
#[non_exhaustive]
pub struct HealthResponse {
    pub status: &'static str,
}

#[derive(Debug, Serialize)]
pub struct SubscribeOut {
    pub id: i64,
    pub email: String,
    pub location_ids: Vec<i64>,
    pub game_system_ids: Vec<i64>,
    pub is_active: bool,
}

impl From<Subscriber> for SubscribeOut {
    fn from(sub: Subscriber) -> Self {
        Self {
            id: sub.id,
            email: sub.email,
            location_ids: sub.filter.location_ids,
            game_system_ids: sub.filter.game_system_ids,
            is_active: sub.is_active,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UnsubscribeOut {
    pub email: String,
    pub unsubscribed: bool,
}
