use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use chrono::Utc;
use sea_orm::{
    DatabaseBackend, DatabaseConnection, MockDatabase, MockExecResult, Statement,
    Value as DbValue,
};
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use shipra_fly_backend::{
    entities::{
        bird::{self, BirdStatus},
        booking::{self, BookingStatus},
        vertiport,
    },
    routes,
    utils::{
        fare::TripEstimate,
        geo::GeoPoint,
        route::{optimize_route, Stop},
    },
    AppState, Config, Geocoder,
};

fn test_config() -> Config {
    Config {
        database_url: "postgres://unused".to_string(),
        db_max_connections: 1,
        server_host: "127.0.0.1".to_string(),
        server_port: 0,
        geocoder_url: "http://127.0.0.1:9".to_string(),
        geocoder_user_agent: "shipra-fly-tests".to_string(),
        geocoder_timeout_secs: 1,
        max_intermediate_stops: 3,
    }
}

fn app_with_db(db: Arc<DatabaseConnection>) -> Router {
    let config = test_config();
    let geocoder = Geocoder::new(
        &config.geocoder_url,
        &config.geocoder_user_agent,
        Duration::from_secs(config.geocoder_timeout_secs),
    )
    .expect("geocoder client");

    routes::create_router(AppState {
        db,
        config,
        geocoder,
    })
}

fn app() -> Router {
    app_with_db(Arc::new(
        MockDatabase::new(DatabaseBackend::Postgres).into_connection(),
    ))
}

/// Statements the handlers sent, once the router has released the connection
fn executed_statements(db: Arc<DatabaseConnection>) -> Vec<Statement> {
    Arc::try_unwrap(db)
        .unwrap_or_else(|_| panic!("router still holds the connection"))
        .into_transaction_log()
        .iter()
        .flat_map(|t| t.statements().to_vec())
        .collect()
}

fn bound_values(statement: &Statement) -> Vec<DbValue> {
    statement
        .values
        .as_ref()
        .map(|values| values.0.clone())
        .unwrap_or_default()
}

fn text(value: &str) -> DbValue {
    DbValue::String(Some(Box::new(value.to_string())))
}

fn vertiports() -> Vec<vertiport::Model> {
    vec![
        vertiport::Model {
            id: 1,
            name: "Raja Bhoj Airport".to_string(),
            city: "Bhopal".to_string(),
            latitude: 23.2875,
            longitude: 77.3374,
            service_radius_km: 15.0,
        },
        vertiport::Model {
            id: 3,
            name: "Devi Ahilya Bai Holkar Airport".to_string(),
            city: "Indore".to_string(),
            latitude: 22.7218,
            longitude: 75.8011,
            service_radius_km: 15.0,
        },
    ]
}

fn confirmed_booking(hours_until_departure: i64) -> booking::Model {
    let now = Utc::now();
    booking::Model {
        id: Uuid::new_v4(),
        reference: "SF-7K2Q9X".to_string(),
        passenger_name: "Asha".to_string(),
        passenger_phone: "9876543210".to_string(),
        bird_id: None,
        pickup_name: "Bhopal".to_string(),
        pickup_lat: 23.2599,
        pickup_lng: 77.4126,
        drop_name: "Indore".to_string(),
        drop_lat: 22.7196,
        drop_lng: 75.8577,
        stops: json!([]),
        distance_km: 170.124,
        duration_minutes: 107,
        fare: 16000,
        departure_time: (now + chrono::Duration::hours(hours_until_departure)).into(),
        status: BookingStatus::Confirmed,
        refund_amount: None,
        created_at: now.into(),
        cancelled_at: None,
    }
}

fn parked_bird(
    registration: &str,
    status: BirdStatus,
    latitude: f64,
    longitude: f64,
) -> bird::Model {
    bird::Model {
        id: Uuid::new_v4(),
        registration: registration.to_string(),
        aircraft_type: "Shipra S4".to_string(),
        seats: 4,
        status,
        latitude,
        longitude,
        vertiport_id: None,
    }
}

fn cancelled_booking() -> booking::Model {
    let now = Utc::now();
    booking::Model {
        id: Uuid::new_v4(),
        reference: "SF-ABC123".to_string(),
        passenger_name: "Asha".to_string(),
        passenger_phone: "9876543210".to_string(),
        bird_id: None,
        pickup_name: "MP Nagar".to_string(),
        pickup_lat: 23.2332,
        pickup_lng: 77.4343,
        drop_name: "Indore".to_string(),
        drop_lat: 22.7196,
        drop_lng: 75.8577,
        stops: json!([]),
        distance_km: 180.0,
        duration_minutes: 112,
        fare: 16000,
        departure_time: (now + chrono::Duration::hours(48)).into(),
        status: BookingStatus::Cancelled,
        refund_amount: Some(16000),
        created_at: now.into(),
        cancelled_at: Some(now.into()),
    }
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.expect("router is infallible");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn estimate_direct_trip() {
    let body = json!({
        "pickup": { "name": "Bhopal", "latitude": 23.2599, "longitude": 77.4126 },
        "drop": { "name": "Indore", "latitude": 22.7196, "longitude": 75.8577 }
    });

    let (status, body) = send(app(), post_json("/api/trips/estimate", body)).await;

    assert_eq!(status, StatusCode::OK);
    let distance = body["distance_km"].as_f64().unwrap();
    assert!((distance - 170.124).abs() < 0.01, "got {distance}");
    assert_eq!(body["duration_minutes"], 107);
    assert_eq!(body["fare"], 16000);
    assert_eq!(body["order"], json!([]));
    assert_eq!(body["legs_km"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn estimate_orders_stops_nearest_first() {
    let body = json!({
        "pickup": { "latitude": 23.2599, "longitude": 77.4126 },
        "drop": { "latitude": 22.7196, "longitude": 75.8577 },
        "stops": [
            { "id": "dewas", "latitude": 22.9676, "longitude": 76.0534 },
            { "id": 7, "latitude": 23.2032, "longitude": 77.0844, "name": "Sehore" }
        ]
    });

    let (status, body) = send(app(), post_json("/api/trips/estimate", body)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["order"], json!([1, 0]));
    assert_eq!(body["stops"][0]["id"], 7);
    assert_eq!(body["stops"][0]["name"], "Sehore");
    assert_eq!(body["stops"][1]["id"], "dewas");
    assert_eq!(body["legs_km"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn estimate_rejects_too_many_stops() {
    let stop = json!({ "id": 1, "latitude": 23.0, "longitude": 77.0 });
    let body = json!({
        "pickup": { "latitude": 23.2599, "longitude": 77.4126 },
        "drop": { "latitude": 22.7196, "longitude": 75.8577 },
        "stops": [stop, stop, stop, stop]
    });

    let (status, body) = send(app(), post_json("/api/trips/estimate", body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("3"));
}

#[tokio::test]
async fn optimize_has_no_stop_cap() {
    let stops: Vec<Value> = (0..5)
        .map(|i| json!({ "id": i, "latitude": 23.0 + i as f64 * 0.1, "longitude": 77.0 }))
        .collect();
    let body = json!({
        "pickup": { "latitude": 23.5, "longitude": 77.0 },
        "drop": { "latitude": 22.0, "longitude": 77.0 },
        "stops": stops
    });

    let (status, body) = send(app(), post_json("/api/routes/optimize", body)).await;

    assert_eq!(status, StatusCode::OK);
    // Walking south from the pickup visits the northernmost stop first
    assert_eq!(body["order"], json!([4, 3, 2, 1, 0]));
    assert!(body["total_distance_km"].as_f64().unwrap() > 0.0);
}

#[tokio::test]
async fn cancellation_policy_document() {
    let (status, body) = send(app(), get("/api/cancellation-policy")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["tiers"].as_array().unwrap().len(), 3);
    assert_eq!(body["tiers"][0]["refund_percent"], 100);
}

#[tokio::test]
async fn list_vertiports_from_db() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vertiports()])
        .into_connection();

    let (status, body) = send(app_with_db(Arc::new(db)), get("/api/vertiports")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);
    assert_eq!(body[0]["city"], "Bhopal");
}

#[tokio::test]
async fn nearest_vertiport_to_indore() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vertiports()])
        .into_connection();

    let (status, body) = send(
        app_with_db(Arc::new(db)),
        get("/api/vertiports/nearest?lat=22.7196&lng=75.8577"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], 3);
    assert_eq!(body["within_service_radius"], true);
    assert!(body["distance_km"].as_f64().unwrap() < 10.0);
}

#[tokio::test]
async fn nearest_vertiport_rejects_bad_latitude() {
    let (status, _) = send(app(), get("/api/vertiports/nearest?lat=95&lng=75.8")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn missing_booking_is_not_found() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<booking::Model>::new()])
        .into_connection();

    let uri = format!("/api/bookings/{}", Uuid::new_v4());
    let (status, body) = send(app_with_db(Arc::new(db)), get(&uri)).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Booking not found");
}

#[tokio::test]
async fn cancelling_twice_conflicts() {
    let booking = cancelled_booking();
    let uri = format!("/api/bookings/{}/cancel", booking.id);
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![booking]])
        .into_connection();

    let (status, _) = send(app_with_db(Arc::new(db)), post_json(&uri, json!({}))).await;

    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn booking_in_the_past_is_rejected() {
    let body = json!({
        "passenger_name": "Asha",
        "passenger_phone": "9876543210",
        "pickup": { "name": "MP Nagar", "latitude": 23.2332, "longitude": 77.4343 },
        "drop": { "name": "Indore", "latitude": 22.7196, "longitude": 75.8577 },
        "departure_time": "2020-01-01T10:00:00Z"
    });

    let (status, body) = send(app(), post_json("/api/bookings", body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("future"));
}

#[tokio::test]
async fn geocode_search_degrades_to_empty() {
    let (status, body) = send(app(), get("/api/geocode/search?q=Bhopal")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn reverse_geocode_without_provider_is_not_found() {
    let (status, _) = send(app(), get("/api/geocode/reverse?lat=23.2599&lng=77.4126")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn booking_persists_server_side_price_and_stop_order() {
    let pickup = GeoPoint::new(23.2599, 77.4126);
    let drop = GeoPoint::new(22.7196, 75.8577);
    let dewas = GeoPoint::new(22.9676, 76.0534);
    let sehore = GeoPoint::new(23.2032, 77.0844);
    let route = optimize_route(
        pickup,
        &[
            Stop { point: dewas, id: "dewas" },
            Stop { point: sehore, id: "sehore" },
        ],
        drop,
    );
    let expected = TripEstimate::from_distance(route.total_distance_km);

    let db = Arc::new(
        MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![confirmed_booking(24)]])
            .into_connection(),
    );
    let departure = (Utc::now() + chrono::Duration::hours(24)).to_rfc3339();
    let body = json!({
        "passenger_name": "Asha",
        "passenger_phone": "+919876543210",
        "pickup": { "name": "Bhopal", "latitude": 23.2599, "longitude": 77.4126 },
        "drop": { "name": "Indore", "latitude": 22.7196, "longitude": 75.8577 },
        "stops": [
            { "id": "dewas", "latitude": 22.9676, "longitude": 76.0534 },
            { "id": "sehore", "latitude": 23.2032, "longitude": 77.0844 }
        ],
        "departure_time": departure
    });

    let (status, _) = send(app_with_db(db.clone()), post_json("/api/bookings", body)).await;
    assert_eq!(status, StatusCode::OK);

    let statements = executed_statements(db);
    assert_eq!(statements.len(), 1);
    assert!(statements[0].sql.starts_with(r#"INSERT INTO "booking""#));

    let values = bound_values(&statements[0]);
    assert!(values.contains(&DbValue::Int(Some(expected.fare as i32))));
    assert!(values.contains(&DbValue::Int(Some(expected.duration_minutes as i32))));
    assert!(values.contains(&DbValue::Double(Some(expected.distance_km))));
    assert!(values.contains(&text("+919876543210")));

    let stops = values
        .iter()
        .find_map(|v| match v {
            DbValue::Json(Some(json)) => Some((**json).clone()),
            _ => None,
        })
        .expect("stops are stored as json");
    assert_eq!(route.order, vec![1, 0]);
    assert_eq!(stops[0]["id"], "sehore");
    assert_eq!(stops[1]["id"], "dewas");
}

#[tokio::test]
async fn cancelling_five_hours_out_refunds_half() {
    let booking = confirmed_booking(5);
    let uri = format!("/api/bookings/{}/cancel", booking.id);
    let db = Arc::new(
        MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![booking]])
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .into_connection(),
    );

    let (status, body) = send(app_with_db(db.clone()), post_json(&uri, json!({}))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "cancelled");
    assert_eq!(body["refund_amount"], 8000);
    assert!(body["cancelled_at"].is_string());

    let statements = executed_statements(db);
    assert_eq!(statements.len(), 2);
    let update = &statements[1];
    assert!(update.sql.starts_with(r#"UPDATE "booking""#));
    assert!(bound_values(update).contains(&DbValue::Int(Some(8000))));
    // The update only matches a booking that is still confirmed
    assert!(bound_values(update).contains(&text("confirmed")));
}

#[tokio::test]
async fn cancel_losing_a_concurrent_race_conflicts() {
    let booking = confirmed_booking(48);
    let uri = format!("/api/bookings/{}/cancel", booking.id);
    // The row was confirmed when read but another cancel got there first
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![booking]])
        .append_exec_results([MockExecResult {
            last_insert_id: 0,
            rows_affected: 0,
        }])
        .into_connection();

    let (status, body) = send(app_with_db(Arc::new(db)), post_json(&uri, json!({}))).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Booking is already cancelled");
}

#[tokio::test]
async fn list_bookings_by_phone() {
    let db = Arc::new(
        MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![confirmed_booking(24), cancelled_booking()]])
            .into_connection(),
    );

    let (status, body) = send(
        app_with_db(db.clone()),
        get("/api/bookings?phone=9876543210"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);
    assert_eq!(body[0]["status"], "confirmed");
    assert_eq!(body[0]["pickup"]["name"], "Bhopal");
    assert_eq!(body[1]["refund_amount"], 16000);

    let statements = executed_statements(db);
    assert!(statements[0].sql.contains("passenger_phone"));
    assert!(bound_values(&statements[0]).contains(&text("9876543210")));
}

#[tokio::test]
async fn list_birds_from_db() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![
            parked_bird("VT-SFA", BirdStatus::Available, 23.2875, 77.3374),
            parked_bird("VT-SFD", BirdStatus::Maintenance, 22.7218, 75.8011),
        ]])
        .into_connection();

    let (status, body) = send(app_with_db(Arc::new(db)), get("/api/birds")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);
    assert_eq!(body[0]["registration"], "VT-SFA");
    assert_eq!(body[1]["status"], "maintenance");
}

#[tokio::test]
async fn nearby_birds_are_available_and_nearest_first() {
    let db = Arc::new(
        MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![
                parked_bird("VT-SFC", BirdStatus::Available, 22.7218, 75.8011),
                parked_bird("VT-SFA", BirdStatus::Available, 23.2875, 77.3374),
                parked_bird("VT-SFB", BirdStatus::Available, 23.2332, 77.4343),
            ]])
            .into_connection(),
    );

    let (status, body) = send(
        app_with_db(db.clone()),
        get("/api/birds/nearby?lat=23.2599&lng=77.4126"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    // The Indore bird is well outside the default 50 km radius
    let registrations: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["registration"].as_str().unwrap())
        .collect();
    assert_eq!(registrations, vec!["VT-SFB", "VT-SFA"]);
    assert!(body[0]["distance_km"].as_f64().unwrap() < body[1]["distance_km"].as_f64().unwrap());

    let statements = executed_statements(db);
    assert!(statements[0].sql.contains(r#""status""#));
    assert!(bound_values(&statements[0]).contains(&text("available")));
}

#[tokio::test]
async fn nearby_birds_rejects_non_positive_radius() {
    let uri = "/api/birds/nearby?lat=23.2599&lng=77.4126&radius_km=0";
    let (status, _) = send(app(), get(uri)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
