use axum::{
    extract::{Query, State},
    Json,
};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::bird::{self, BirdStatus};
use crate::entities::vertiport;
use crate::error::{AppError, AppResult};
use crate::handlers::trip::{validate_waypoint, Waypoint};
use crate::utils::geo::{great_circle_distance_km, is_within_radius, GeoPoint};
use crate::AppState;

const DEFAULT_BIRD_SEARCH_RADIUS_KM: f64 = 50.0;

#[derive(Debug, Deserialize)]
pub struct LocationQuery {
    pub lat: f64,
    pub lng: f64,
}

impl LocationQuery {
    fn validated_point(&self) -> AppResult<GeoPoint> {
        let waypoint = Waypoint {
            name: None,
            latitude: self.lat,
            longitude: self.lng,
        };
        validate_waypoint("Location", &waypoint)?;
        Ok(waypoint.point())
    }
}

#[derive(Debug, Deserialize)]
pub struct NearbyQuery {
    pub lat: f64,
    pub lng: f64,
    pub radius_km: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct NearestVertiportResponse {
    #[serde(flatten)]
    pub vertiport: vertiport::Model,
    pub distance_km: f64,
    pub within_service_radius: bool,
}

#[derive(Debug, Serialize)]
pub struct NearbyBird {
    pub id: Uuid,
    pub registration: String,
    pub aircraft_type: String,
    pub seats: i32,
    pub latitude: f64,
    pub longitude: f64,
    pub vertiport_id: Option<i32>,
    pub distance_km: f64,
}

// ============ Vertiports ============

/// List all vertiports
pub async fn list_vertiports(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<vertiport::Model>>> {
    let vertiports = vertiport::Entity::find()
        .order_by_asc(vertiport::Column::Name)
        .all(&*state.db)
        .await?;

    Ok(Json(vertiports))
}

/// Find the vertiport closest to a location
pub async fn nearest_vertiport(
    State(state): State<AppState>,
    Query(params): Query<LocationQuery>,
) -> AppResult<Json<NearestVertiportResponse>> {
    let location = params.validated_point()?;
    let vertiports = vertiport::Entity::find().all(&*state.db).await?;

    let (vertiport, distance_km) = vertiports
        .into_iter()
        .map(|v| {
            let distance = great_circle_distance_km(location, v.location());
            (v, distance)
        })
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .ok_or_else(|| AppError::NotFound("No vertiports found".to_string()))?;

    Ok(Json(NearestVertiportResponse {
        within_service_radius: is_within_radius(
            location,
            vertiport.location(),
            vertiport.service_radius_km,
        ),
        vertiport,
        distance_km,
    }))
}

// ============ Birds ============

/// List the whole fleet
pub async fn list_birds(State(state): State<AppState>) -> AppResult<Json<Vec<bird::Model>>> {
    let birds = bird::Entity::find()
        .order_by_asc(bird::Column::Registration)
        .all(&*state.db)
        .await?;

    Ok(Json(birds))
}

/// Available birds within a radius of a location, nearest first
pub async fn nearby_birds(
    State(state): State<AppState>,
    Query(params): Query<NearbyQuery>,
) -> AppResult<Json<Vec<NearbyBird>>> {
    let location = LocationQuery {
        lat: params.lat,
        lng: params.lng,
    }
    .validated_point()?;

    let radius_km = params.radius_km.unwrap_or(DEFAULT_BIRD_SEARCH_RADIUS_KM);
    if radius_km <= 0.0 {
        return Err(AppError::BadRequest("Radius must be positive".to_string()));
    }

    let birds = bird::Entity::find()
        .filter(bird::Column::Status.eq(BirdStatus::Available))
        .all(&*state.db)
        .await?;

    let mut nearby: Vec<NearbyBird> = birds
        .into_iter()
        .filter(|b| is_within_radius(b.location(), location, radius_km))
        .map(|b| NearbyBird {
            distance_km: great_circle_distance_km(location, b.location()),
            id: b.id,
            registration: b.registration,
            aircraft_type: b.aircraft_type,
            seats: b.seats,
            latitude: b.latitude,
            longitude: b.longitude,
            vertiport_id: b.vertiport_id,
        })
        .collect();

    nearby.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));

    Ok(Json(nearby))
}
