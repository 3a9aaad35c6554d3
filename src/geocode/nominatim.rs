use std::collections::HashMap;

use serde::Deserialize;

use super::{GeocodeError, Place};

/// One result as returned by Nominatim's `jsonv2` format
#[derive(Debug, Deserialize)]
pub struct NominatimPlace {
    pub lat: String,
    pub lon: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub address: HashMap<String, String>,
}

impl NominatimPlace {
    /// `None` when the coordinates don't parse or no name can be derived
    pub fn into_place(self) -> Option<Place> {
        let latitude = self.lat.trim().parse().ok()?;
        let longitude = self.lon.trim().parse().ok()?;

        let short_name = self
            .name
            .filter(|n| !n.trim().is_empty())
            .or_else(|| {
                self.display_name
                    .as_deref()
                    .and_then(|d| d.split(',').next())
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
            })?;

        let mut address = self.address;
        let city = ["city", "town", "village"]
            .iter()
            .find_map(|key| address.remove(*key));

        Some(Place {
            latitude,
            longitude,
            short_name,
            city,
            state: address.remove("state"),
            country: address.remove("country"),
        })
    }
}

pub(super) fn parse_reverse(body: serde_json::Value) -> Result<Option<Place>, GeocodeError> {
    // Nominatim answers 200 with {"error": "..."} when nothing is there
    if let Some(message) = body.get("error") {
        tracing::debug!(error = %message, "No place at coordinate");
        return Ok(None);
    }

    let place: NominatimPlace =
        serde_json::from_value(body).map_err(|e| GeocodeError::Provider(e.to_string()))?;
    Ok(place.into_place())
}

pub(super) fn parse_search(body: serde_json::Value) -> Result<Vec<Place>, GeocodeError> {
    let results: Vec<NominatimPlace> =
        serde_json::from_value(body).map_err(|e| GeocodeError::Provider(e.to_string()))?;

    Ok(results
        .into_iter()
        .filter_map(NominatimPlace::into_place)
        .collect())
}
