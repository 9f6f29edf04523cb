//! City → coordinates → current weather.

use std::fmt::Debug;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::adapter::normalize_body;
use crate::model::{GeoPoint, WeatherView};

/// What a geocoding call returned.
#[derive(Debug, Clone, PartialEq)]
pub struct GeocodeReply {
    pub status: u16,
    /// Ordered by the upstream's relevance; the first one is used.
    pub matches: Vec<GeoPoint>,
}

/// What a weather call returned. `body` is `Null` when the status was not a
/// success and the body was not JSON.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherReply {
    pub status: u16,
    pub body: serde_json::Value,
}

fn is_success(status: u16) -> bool {
    (200..300).contains(&status)
}

#[async_trait]
pub trait GeocodingService: Send + Sync + Debug {
    /// Resolve a place name. Transport faults and unreadable bodies are `Err`.
    async fn resolve(&self, city: &str) -> anyhow::Result<GeocodeReply>;
}

#[async_trait]
pub trait WeatherService: Send + Sync + Debug {
    async fn fetch_current(&self, point: GeoPoint) -> anyhow::Result<WeatherReply>;
}

/// Why a lookup failed. `Display` is the message shown to the user.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("Please enter a city name.")]
    Validation,

    #[error("City not found. Please check the city name.")]
    CityNotFound,

    #[error("API key is invalid or unauthorized. Please check your API key.")]
    InvalidCredentials,

    #[error("Unable to fetch weather data. Please try again later.")]
    UpstreamUnavailable { status: u16 },

    #[error("An unexpected error occurred. Please try again.")]
    UnexpectedFailure {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl LookupError {
    fn unexpected(err: anyhow::Error) -> Self {
        LookupError::UnexpectedFailure { source: err.into() }
    }
}

/// Runs a single lookup: geocode, then fetch, then normalize. No retries.
#[derive(Debug)]
pub struct WeatherLookup {
    geocoder: Box<dyn GeocodingService>,
    weather: Box<dyn WeatherService>,
}

impl WeatherLookup {
    pub fn new(geocoder: Box<dyn GeocodingService>, weather: Box<dyn WeatherService>) -> Self {
        Self { geocoder, weather }
    }

    pub async fn lookup(&self, city: &str) -> Result<WeatherView, LookupError> {
        let city = city.trim();
        if city.is_empty() {
            return Err(LookupError::Validation);
        }

        debug!(city = %city, "geocoding");
        let geo = self.geocoder.resolve(city).await.map_err(|e| {
            warn!("geocoding '{city}' failed: {e:#}");
            LookupError::unexpected(e)
        })?;

        if !is_success(geo.status) {
            debug!(status = geo.status, "geocoding returned a failure status");
            return Err(LookupError::CityNotFound);
        }

        let point = *geo.matches.first().ok_or(LookupError::CityNotFound)?;
        if geo.matches.len() > 1 {
            debug!(count = geo.matches.len(), "several geocoding matches, using the first");
        }

        debug!(lat = point.latitude, lon = point.longitude, "fetching current weather");
        let reply = self.weather.fetch_current(point).await.map_err(|e| {
            warn!("weather fetch for '{city}' failed: {e:#}");
            LookupError::unexpected(e)
        })?;

        match reply.status {
            s if is_success(s) => {}
            401 => return Err(LookupError::InvalidCredentials),
            status => {
                warn!(status, "weather service returned a failure status");
                return Err(LookupError::UpstreamUnavailable { status });
            }
        }

        let view = normalize_body(reply.body);
        if view.is_no_data() {
            info!("weather body for '{city}' was not in a known format");
        }
        Ok(view)
    }
}
