use axum::Json;

use crate::policy::{CancellationPolicy, CANCELLATION_POLICY};

/// The cancellation policy document
pub async fn cancellation_policy() -> Json<CancellationPolicy> {
    Json(CANCELLATION_POLICY)
}
