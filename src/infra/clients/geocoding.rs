//! Forward geocoding with Nominatim (OpenStreetMap).

use async_trait::async_trait;
use reqwest::header::USER_AGENT;
use serde::Deserialize;

use super::ensure_success;
use crate::domain::Coordinates;
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Best match for a free-form address; no match is NotFound.
    async fn geocode(&self, query: &str) -> AppResult<Coordinates>;
}

#[derive(Clone)]
pub struct NominatimClient {
    http: reqwest::Client,
    base_url: String,
    user_agent: String,
}

impl NominatimClient {
    pub fn new(
        http: reqwest::Client,
        base_url: impl Into<String>,
        user_agent: impl Into<String>,
    ) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            user_agent: user_agent.into(),
        }
    }
}

/// Nominatim returns coordinates as strings
#[derive(Debug, Deserialize)]
struct Place {
    lat: String,
    lon: String,
}

fn first_coordinates(places: Vec<Place>) -> AppResult<Coordinates> {
    let place = places
        .into_iter()
        .next()
        .ok_or_else(|| AppError::not_found("Address location"))?;

    let parse = |value: &str| {
        value
            .trim()
            .parse::<f64>()
            .map_err(|_| AppError::external(format!("Geocoder returned invalid coordinate '{}'", value)))
    };

    Ok(Coordinates::new(parse(&place.lat)?, parse(&place.lon)?))
}

#[async_trait]
impl Geocoder for NominatimClient {
    async fn geocode(&self, query: &str) -> AppResult<Coordinates> {
        if query.trim().is_empty() {
            return Err(AppError::validation("Address query cannot be empty"));
        }
        tracing::info!(query, "Requesting coordinates");

        let response = self
            .http
            .get(format!("{}/search", self.base_url))
            .header(USER_AGENT, &self.user_agent)
            .query(&[("q", query), ("format", "json"), ("limit", "1")])
            .send()
            .await?;
        let places: Vec<Place> = ensure_success(response, "Geocoding").await?.json().await?;

        let coordinates = first_coordinates(places)?;
        tracing::debug!(
            latitude = coordinates.latitude,
            longitude = coordinates.longitude,
            "Coordinates resolved"
        );
        Ok(coordinates)
    }
}
