//! Ordering of intermediate stops for multi-stop trips.
//!
//! [`optimize_route`] is a greedy nearest-neighbour pass, not an exact
//! travelling-salesman solver. Booked fares depend on the order it produces,
//! so the heuristic and its tie-breaking must stay as they are.

use serde::{Deserialize, Serialize};

use super::geo::{great_circle_distance_km, GeoPoint};

/// An intermediate waypoint. The id only correlates input and output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stop<T> {
    pub point: GeoPoint,
    pub id: T,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteResult {
    /// Indices into the input stops, in visiting order
    pub order: Vec<usize>,
    pub total_distance_km: f64,
}

/// Orders `stops` between `start` and `end` by repeatedly flying to the
/// nearest unvisited stop.
///
/// Ties go to the stop that comes first in `stops`. Runs in O(n²), which is
/// fine for the handful of stops a trip allows.
pub fn optimize_route<T>(start: GeoPoint, stops: &[Stop<T>], end: GeoPoint) -> RouteResult {
    if stops.is_empty() {
        return RouteResult {
            order: Vec::new(),
            total_distance_km: great_circle_distance_km(start, end),
        };
    }

    let mut unvisited: Vec<usize> = (0..stops.len()).collect();
    let mut order = Vec::with_capacity(stops.len());
    let mut current = start;
    let mut total_distance_km = 0.0;

    while !unvisited.is_empty() {
        let mut best_slot = 0;
        let mut best_distance = f64::INFINITY;

        for (slot, &index) in unvisited.iter().enumerate() {
            let distance = great_circle_distance_km(current, stops[index].point);
            if distance < best_distance {
                best_slot = slot;
                best_distance = distance;
            }
        }

        // Vec::remove keeps the remaining stops in input order for tie-breaks
        let index = unvisited.remove(best_slot);
        order.push(index);
        total_distance_km += best_distance;
        current = stops[index].point;
    }

    total_distance_km += great_circle_distance_km(current, end);

    RouteResult {
        order,
        total_distance_km,
    }
}

/// Distance of every leg from `start` through `waypoints` to `end`
pub fn leg_distances_km(start: GeoPoint, waypoints: &[GeoPoint], end: GeoPoint) -> Vec<f64> {
    std::iter::once(start)
        .chain(waypoints.iter().copied())
        .chain(std::iter::once(end))
        .collect::<Vec<_>>()
        .windows(2)
        .map(|leg| great_circle_distance_km(leg[0], leg[1]))
        .collect()
}
