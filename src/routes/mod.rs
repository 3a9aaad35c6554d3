use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers::{booking, fleet, geocode, policy, trip};
use crate::AppState;

pub fn create_router(state: AppState) -> Router {
    // Trip planning (pure computation, no database access)
    let trip_routes = Router::new()
        .route("/trips/estimate", post(trip::estimate_trip))
        .route("/routes/optimize", post(trip::optimize));

    let geocode_routes = Router::new()
        .route("/search", get(geocode::search))
        .route("/reverse", get(geocode::reverse));

    // Fleet and vertiport listings
    let fleet_routes = Router::new()
        .route("/vertiports", get(fleet::list_vertiports))
        .route("/vertiports/nearest", get(fleet::nearest_vertiport))
        .route("/birds", get(fleet::list_birds))
        .route("/birds/nearby", get(fleet::nearby_birds));

    let booking_routes = Router::new()
        .route("/", post(booking::create_booking))
        .route("/", get(booking::list_bookings))
        .route("/{id}", get(booking::get_booking))
        .route("/{id}/cancel", post(booking::cancel_booking));

    // Combine all routes
    Router::new()
        .nest("/api", trip_routes.merge(fleet_routes))
        .nest("/api/geocode", geocode_routes)
        .nest("/api/bookings", booking_routes)
        .route("/api/cancellation-policy", get(policy::cancellation_policy))
        .with_state(state)
}
