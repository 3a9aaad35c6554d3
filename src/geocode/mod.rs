//! Forward and reverse geocoding against a Nominatim-compatible service.
//!
//! Lookups never fail loudly: transport errors, bad statuses and malformed
//! payloads are logged and come back as `None` or an empty list.

mod nominatim;

use std::time::Duration;

use serde::Serialize;
use thiserror::Error;

use crate::config::Config;

pub const DEFAULT_SEARCH_LIMIT: usize = 5;

#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Provider error: {0}")]
    Provider(String),
}

/// A resolved place
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Place {
    pub latitude: f64,
    pub longitude: f64,
    pub short_name: String,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
}

#[derive(Clone)]
pub struct Geocoder {
    client: reqwest::Client,
    base_url: String,
}

impl Geocoder {
    pub fn new(base_url: &str, user_agent: &str, timeout: Duration) -> Result<Self, GeocodeError> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, GeocodeError> {
        Self::new(
            &config.geocoder_url,
            &config.geocoder_user_agent,
            Duration::from_secs(config.geocoder_timeout_secs),
        )
    }

    /// Resolve a coordinate to the place that contains it
    pub async fn reverse_geocode(&self, latitude: f64, longitude: f64) -> Option<Place> {
        match self.fetch_reverse(latitude, longitude).await {
            Ok(place) => place,
            Err(e) => {
                tracing::warn!(latitude, longitude, error = %e, "Reverse geocoding failed");
                None
            }
        }
    }

    /// Free-text place search, at most `limit` results
    pub async fn search_places(&self, query: &str, limit: usize) -> Vec<Place> {
        let query = query.trim();
        if query.is_empty() {
            return Vec::new();
        }

        match self.fetch_search(query, limit).await {
            Ok(places) => places,
            Err(e) => {
                tracing::warn!(query, error = %e, "Place search failed");
                Vec::new()
            }
        }
    }

    async fn fetch_reverse(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<Option<Place>, GeocodeError> {
        let response = self
            .client
            .get(format!("{}/reverse", self.base_url))
            .query(&[
                ("format", "jsonv2".to_string()),
                ("addressdetails", "1".to_string()),
                ("lat", latitude.to_string()),
                ("lon", longitude.to_string()),
            ])
            .send()
            .await?
            .error_for_status()?;

        let body: serde_json::Value = response.json().await?;
        nominatim::parse_reverse(body)
    }

    async fn fetch_search(&self, query: &str, limit: usize) -> Result<Vec<Place>, GeocodeError> {
        let response = self
            .client
            .get(format!("{}/search", self.base_url))
            .query(&[
                ("format", "jsonv2".to_string()),
                ("addressdetails", "1".to_string()),
                ("limit", limit.to_string()),
                ("q", query.to_string()),
            ])
            .send()
            .await?
            .error_for_status()?;

        let body: serde_json::Value = response.json().await?;
        let mut places = nominatim::parse_search(body)?;
        places.truncate(limit);

        tracing::debug!(query, results = places.len(), "Place search complete");
        Ok(places)
    }
}
