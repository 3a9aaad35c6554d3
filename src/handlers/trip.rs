use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::utils::fare::TripEstimate;
use crate::utils::geo::GeoPoint;
use crate::utils::route::{leg_distances_km, optimize_route, RouteResult, Stop};
use crate::AppState;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Waypoint {
    #[serde(default)]
    pub name: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
}

impl Waypoint {
    pub fn point(&self) -> GeoPoint {
        GeoPoint::new(self.latitude, self.longitude)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StopInput {
    /// Opaque client token, echoed back unchanged
    pub id: serde_json::Value,
    #[serde(flatten)]
    pub waypoint: Waypoint,
}

#[derive(Debug, Deserialize)]
pub struct TripRequest {
    pub pickup: Waypoint,
    pub drop: Waypoint,
    #[serde(default)]
    pub stops: Vec<StopInput>,
}

/// A route through the stops plus the fare for flying it
#[derive(Debug, Serialize)]
pub struct TripPlan {
    pub order: Vec<usize>,
    /// Stops in flying order
    pub stops: Vec<StopInput>,
    pub legs_km: Vec<f64>,
    #[serde(flatten)]
    pub estimate: TripEstimate,
}

/// Reject coordinates outside the valid latitude/longitude ranges
pub fn validate_waypoint(label: &str, waypoint: &Waypoint) -> AppResult<()> {
    if !(-90.0..=90.0).contains(&waypoint.latitude) {
        return Err(AppError::BadRequest(format!(
            "{} latitude must be between -90 and 90",
            label
        )));
    }
    if !(-180.0..=180.0).contains(&waypoint.longitude) {
        return Err(AppError::BadRequest(format!(
            "{} longitude must be between -180 and 180",
            label
        )));
    }
    Ok(())
}

fn validate_trip(pickup: &Waypoint, drop: &Waypoint, stops: &[StopInput]) -> AppResult<()> {
    validate_waypoint("Pickup", pickup)?;
    validate_waypoint("Drop", drop)?;
    for stop in stops {
        validate_waypoint("Stop", &stop.waypoint)?;
    }
    Ok(())
}

pub fn check_stop_limit(stops: &[StopInput], max_stops: usize) -> AppResult<()> {
    if stops.len() > max_stops {
        return Err(AppError::BadRequest(format!(
            "At most {} intermediate stops are allowed",
            max_stops
        )));
    }
    Ok(())
}

/// Order the stops, then price the whole route by its air distance
pub fn plan_trip(pickup: &Waypoint, drop: &Waypoint, stops: Vec<StopInput>) -> TripPlan {
    let candidates: Vec<Stop<usize>> = stops
        .iter()
        .enumerate()
        .map(|(i, s)| Stop {
            point: s.waypoint.point(),
            id: i,
        })
        .collect();

    let route = optimize_route(pickup.point(), &candidates, drop.point());

    let mut slots: Vec<Option<StopInput>> = stops.into_iter().map(Some).collect();
    let ordered: Vec<StopInput> = route
        .order
        .iter()
        .filter_map(|&i| slots[i].take())
        .collect();

    let waypoints: Vec<GeoPoint> = ordered.iter().map(|s| s.waypoint.point()).collect();
    let legs_km = leg_distances_km(pickup.point(), &waypoints, drop.point());

    TripPlan {
        order: route.order,
        stops: ordered,
        legs_km,
        estimate: TripEstimate::from_distance(route.total_distance_km),
    }
}

/// Estimate distance, flight time and fare for a trip
pub async fn estimate_trip(
    State(state): State<AppState>,
    Json(payload): Json<TripRequest>,
) -> AppResult<Json<TripPlan>> {
    validate_trip(&payload.pickup, &payload.drop, &payload.stops)?;
    check_stop_limit(&payload.stops, state.config.max_intermediate_stops)?;

    let plan = plan_trip(&payload.pickup, &payload.drop, payload.stops);

    tracing::debug!(
        stops = plan.stops.len(),
        distance_km = plan.estimate.distance_km,
        fare = plan.estimate.fare,
        "Trip estimated"
    );

    Ok(Json(plan))
}

/// Visiting order for a set of stops, without pricing
pub async fn optimize(Json(payload): Json<TripRequest>) -> AppResult<Json<RouteResult>> {
    validate_trip(&payload.pickup, &payload.drop, &payload.stops)?;

    let stops: Vec<Stop<usize>> = payload
        .stops
        .iter()
        .enumerate()
        .map(|(i, s)| Stop {
            point: s.waypoint.point(),
            id: i,
        })
        .collect();

    Ok(Json(optimize_route(
        payload.pickup.point(),
        &stops,
        payload.drop.point(),
    )))
}
