use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::{DateTime, Utc};
use rand::{distributions::Alphanumeric, Rng};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::bird::{self, BirdStatus};
use crate::entities::booking::{self, BookingStatus};
use crate::error::{AppError, AppResult};
use crate::handlers::trip::{
    check_stop_limit, plan_trip, validate_waypoint, StopInput, Waypoint,
};
use crate::policy::CANCELLATION_POLICY;
use crate::AppState;

const REFERENCE_PREFIX: &str = "SF-";
const REFERENCE_LEN: usize = 6;

#[derive(Debug, Deserialize)]
pub struct CreateBookingRequest {
    pub passenger_name: String,
    pub passenger_phone: String,
    pub bird_id: Option<Uuid>,
    pub pickup: Waypoint,
    pub drop: Waypoint,
    #[serde(default)]
    pub stops: Vec<StopInput>,
    pub departure_time: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct PassengerQuery {
    pub phone: String,
}

#[derive(Debug, Serialize)]
pub struct BookingResponse {
    pub id: Uuid,
    pub reference: String,
    pub passenger_name: String,
    pub passenger_phone: String,
    pub bird_id: Option<Uuid>,
    pub pickup: Waypoint,
    pub drop: Waypoint,
    pub stops: serde_json::Value,
    pub distance_km: f64,
    pub duration_minutes: i32,
    pub fare: i32,
    pub departure_time: DateTime<Utc>,
    pub status: BookingStatus,
    pub refund_amount: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub cancelled_at: Option<DateTime<Utc>>,
}

impl From<booking::Model> for BookingResponse {
    fn from(b: booking::Model) -> Self {
        Self {
            id: b.id,
            reference: b.reference,
            passenger_name: b.passenger_name,
            passenger_phone: b.passenger_phone,
            bird_id: b.bird_id,
            pickup: Waypoint {
                name: Some(b.pickup_name),
                latitude: b.pickup_lat,
                longitude: b.pickup_lng,
            },
            drop: Waypoint {
                name: Some(b.drop_name),
                latitude: b.drop_lat,
                longitude: b.drop_lng,
            },
            stops: b.stops,
            distance_km: b.distance_km,
            duration_minutes: b.duration_minutes,
            fare: b.fare,
            departure_time: b.departure_time.with_timezone(&Utc),
            status: b.status,
            refund_amount: b.refund_amount,
            created_at: b.created_at.with_timezone(&Utc),
            cancelled_at: b.cancelled_at.map(|t| t.with_timezone(&Utc)),
        }
    }
}

/// Short human-readable code passengers quote to support, e.g. `SF-7K2Q9X`
pub fn generate_reference() -> String {
    let code: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(REFERENCE_LEN)
        .map(|c| char::from(c).to_ascii_uppercase())
        .collect();

    format!("{}{}", REFERENCE_PREFIX, code)
}

fn validate_passenger(name: &str, phone: &str) -> AppResult<()> {
    if name.trim().is_empty() {
        return Err(AppError::BadRequest("Passenger name is required".to_string()));
    }

    let digits = phone.strip_prefix('+').unwrap_or(phone);
    if !(10..=15).contains(&digits.len()) || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(AppError::BadRequest(
            "Passenger phone must be 10 to 15 digits".to_string(),
        ));
    }

    Ok(())
}

// ============ Booking Management ============

/// Create a booking, priced server-side from the planned route
pub async fn create_booking(
    State(state): State<AppState>,
    Json(payload): Json<CreateBookingRequest>,
) -> AppResult<Json<BookingResponse>> {
    validate_passenger(&payload.passenger_name, &payload.passenger_phone)?;
    validate_waypoint("Pickup", &payload.pickup)?;
    validate_waypoint("Drop", &payload.drop)?;
    for stop in &payload.stops {
        validate_waypoint("Stop", &stop.waypoint)?;
    }
    check_stop_limit(&payload.stops, state.config.max_intermediate_stops)?;

    if payload.departure_time < Utc::now() {
        return Err(AppError::BadRequest(
            "Departure time must be in the future".to_string(),
        ));
    }

    // Validate bird, if the passenger picked one
    if let Some(bird_id) = payload.bird_id {
        let bird = bird::Entity::find_by_id(bird_id)
            .one(&*state.db)
            .await?
            .ok_or_else(|| AppError::NotFound("Bird not found".to_string()))?;

        if bird.status != BirdStatus::Available {
            return Err(AppError::Conflict(format!(
                "Bird {} is not available",
                bird.registration
            )));
        }
    }

    let plan = plan_trip(&payload.pickup, &payload.drop, payload.stops);
    let stops = serde_json::to_value(&plan.stops)
        .map_err(|e| AppError::Internal(format!("Failed to encode stops: {}", e)))?;

    let new_booking = booking::ActiveModel {
        id: Set(Uuid::new_v4()),
        reference: Set(generate_reference()),
        passenger_name: Set(payload.passenger_name.trim().to_string()),
        passenger_phone: Set(payload.passenger_phone.clone()),
        bird_id: Set(payload.bird_id),
        pickup_name: Set(payload.pickup.name.clone().unwrap_or_default()),
        pickup_lat: Set(payload.pickup.latitude),
        pickup_lng: Set(payload.pickup.longitude),
        drop_name: Set(payload.drop.name.clone().unwrap_or_default()),
        drop_lat: Set(payload.drop.latitude),
        drop_lng: Set(payload.drop.longitude),
        stops: Set(stops),
        distance_km: Set(plan.estimate.distance_km),
        duration_minutes: Set(plan.estimate.duration_minutes as i32),
        fare: Set(plan.estimate.fare as i32),
        departure_time: Set(payload.departure_time.into()),
        status: Set(BookingStatus::Confirmed),
        refund_amount: Set(None),
        cancelled_at: Set(None),
        ..Default::default()
    };

    let booking = new_booking.insert(&*state.db).await?;

    tracing::info!(
        booking_id = %booking.id,
        reference = %booking.reference,
        fare = booking.fare,
        "Booking created"
    );

    Ok(Json(booking.into()))
}

/// List a passenger's bookings, newest first
pub async fn list_bookings(
    State(state): State<AppState>,
    Query(params): Query<PassengerQuery>,
) -> AppResult<Json<Vec<BookingResponse>>> {
    let bookings = booking::Entity::find()
        .filter(booking::Column::PassengerPhone.eq(params.phone))
        .order_by_desc(booking::Column::CreatedAt)
        .all(&*state.db)
        .await?;

    Ok(Json(bookings.into_iter().map(Into::into).collect()))
}

/// Get booking details
pub async fn get_booking(
    State(state): State<AppState>,
    Path(booking_id): Path<Uuid>,
) -> AppResult<Json<BookingResponse>> {
    let booking = booking::Entity::find_by_id(booking_id)
        .one(&*state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Booking not found".to_string()))?;

    Ok(Json(booking.into()))
}

/// Cancel a booking, refunding according to the cancellation policy
pub async fn cancel_booking(
    State(state): State<AppState>,
    Path(booking_id): Path<Uuid>,
) -> AppResult<Json<BookingResponse>> {
    let booking = booking::Entity::find_by_id(booking_id)
        .one(&*state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Booking not found".to_string()))?;

    if booking.status == BookingStatus::Cancelled {
        return Err(AppError::Conflict("Booking is already cancelled".to_string()));
    }

    let now = Utc::now();
    let departure = booking.departure_time.with_timezone(&Utc);
    if departure < now {
        return Err(AppError::BadRequest(
            "Cannot cancel bookings after departure".to_string(),
        ));
    }

    let hours_before = (departure - now).num_hours();
    let refund = CANCELLATION_POLICY.refund_for(booking.fare.max(0) as u32, hours_before);
    let cancelled_at = now.fixed_offset();

    // Matches only a still-confirmed row; a concurrent cancel that got there first leaves 0 rows
    let result = booking::Entity::update_many()
        .set(booking::ActiveModel {
            status: Set(BookingStatus::Cancelled),
            refund_amount: Set(Some(refund as i32)),
            cancelled_at: Set(Some(cancelled_at)),
            ..Default::default()
        })
        .filter(booking::Column::Id.eq(booking_id))
        .filter(booking::Column::Status.eq(BookingStatus::Confirmed))
        .exec(&*state.db)
        .await?;

    if result.rows_affected == 0 {
        return Err(AppError::Conflict("Booking is already cancelled".to_string()));
    }

    tracing::info!(
        booking_id = %booking_id,
        hours_before,
        refund,
        "Booking cancelled"
    );

    let cancelled = booking::Model {
        status: BookingStatus::Cancelled,
        refund_amount: Some(refund as i32),
        cancelled_at: Some(cancelled_at),
        ..booking
    };

    Ok(Json(cancelled.into()))
}
