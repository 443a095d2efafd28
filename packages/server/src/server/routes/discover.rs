use axum::extract::{Extension, Query};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::domains::matching::CandidateFilter;
use crate::domains::users::{Gender, User};
use crate::server::app::AppState;
use crate::server::routes::ApiError;

#[derive(Deserialize)]
pub struct DiscoverQuery {
    pub user_id: i64,
    pub min_age: Option<u16>,
    pub max_age: Option<u16>,
    pub gender: Option<Gender>,
    pub radius_km: Option<f64>,
}

#[derive(Serialize)]
pub struct DiscoverResponse {
    pub candidates: Vec<User>,
}

pub async fn discover_handler(
    Extension(state): Extension<AppState>,
    Query(query): Query<DiscoverQuery>,
) -> Result<Json<DiscoverResponse>, ApiError> {
    let filter = CandidateFilter {
        min_age: query.min_age,
        max_age: query.max_age,
        gender: query.gender,
        radius_km: query.radius_km,
    };

    let candidates = state
        .discovery_engine
        .fetch_candidates(query.user_id, &filter)
        .await?;

    Ok(Json(DiscoverResponse { candidates }))
}
