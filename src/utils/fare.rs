//! Travel time and fare estimates for a given air distance.
//!
//! Fares are billed in fixed 15-minute blocks, so the fare is a staircase of
//! the distance rather than a continuous function.

use serde::Serialize;

/// Assumed cruise speed of a bird
pub const AVG_SPEED_KMH: f64 = 100.0;

/// Fixed takeoff and landing overhead added to every trip
pub const BUFFER_MINUTES: f64 = 4.0;

/// Length of one billing block; a started block is billed in full
pub const BLOCK_MINUTES: u32 = 15;

/// Flat price of one billing block, in rupees
pub const RATE_PER_BLOCK: u32 = 2000;

/// Fares are rounded up to a multiple of this amount
pub const FARE_ROUNDING: u32 = 10;

/// Estimated flight time in whole minutes, rounded up.
///
/// Negative distances are treated as zero.
pub fn estimate_duration_minutes(distance_km: f64) -> u32 {
    let distance_km = distance_km.max(0.0);
    (distance_km / AVG_SPEED_KMH * 60.0 + BUFFER_MINUTES).ceil() as u32
}

/// Fare in rupees: whole 15-minute blocks at the flat block rate
pub fn estimate_fare(distance_km: f64) -> u32 {
    let duration = estimate_duration_minutes(distance_km);
    let blocks = duration.div_ceil(BLOCK_MINUTES);
    (blocks * RATE_PER_BLOCK).div_ceil(FARE_ROUNDING) * FARE_ROUNDING
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TripEstimate {
    pub distance_km: f64,
    pub duration_minutes: u32,
    pub fare: u32,
}

impl TripEstimate {
    pub fn from_distance(distance_km: f64) -> Self {
        Self {
            distance_km,
            duration_minutes: estimate_duration_minutes(distance_km),
            fare: estimate_fare(distance_km),
        }
    }
}
