use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::geocode::{Place, DEFAULT_SEARCH_LIMIT};
use crate::handlers::trip::{validate_waypoint, Waypoint};
use crate::AppState;

const MAX_SEARCH_LIMIT: usize = 20;

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: String,
    pub limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct ReverseQuery {
    pub lat: f64,
    pub lng: f64,
}

/// Search places by name
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> AppResult<Json<Vec<Place>>> {
    let limit = params
        .limit
        .unwrap_or(DEFAULT_SEARCH_LIMIT)
        .clamp(1, MAX_SEARCH_LIMIT);

    Ok(Json(state.geocoder.search_places(&params.q, limit).await))
}

/// Resolve a coordinate to a place
pub async fn reverse(
    State(state): State<AppState>,
    Query(params): Query<ReverseQuery>,
) -> AppResult<Json<Place>> {
    validate_waypoint(
        "Location",
        &Waypoint {
            name: None,
            latitude: params.lat,
            longitude: params.lng,
        },
    )?;

    state
        .geocoder
        .reverse_geocode(params.lat, params.lng)
        .await
        .map(Json)
        .ok_or_else(|| AppError::NotFound("No place found at this location".to_string()))
}
