use axum::{extract::Extension, Json};
use serde::{Deserialize, Serialize};

use crate::domains::matching::{Match, SwipeAction};
use crate::server::app::AppState;
use crate::server::routes::ApiError;

#[derive(Deserialize)]
pub struct SwipeRequest {
    pub swiper_id: i64,
    pub swiped_id: i64,
    pub action: SwipeAction,
}

#[derive(Serialize)]
pub struct SwipeResponse {
    pub matched: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub r#match: Option<Match>,
}

pub async fn swipe_handler(
    Extension(state): Extension<AppState>,
    Json(request): Json<SwipeRequest>,
) -> Result<Json<SwipeResponse>, ApiError> {
    let matched = state
        .match_engine
        .swipe(request.swiper_id, request.swiped_id, request.action)
        .await?;

    Ok(Json(SwipeResponse {
        matched: matched.is_some(),
        r#match: matched,
    }))
}
