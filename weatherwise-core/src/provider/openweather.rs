use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::{
    lookup::{GeocodeReply, GeocodingService, WeatherReply, WeatherService},
    model::GeoPoint,
    provider::{send_for_weather, truncate_body},
};

const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org";

/// OpenWeather direct geocoding plus current weather (station format).
#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    api_key: String,
    http: Client,
    base_url: String,
}

impl OpenWeatherClient {
    pub fn new(api_key: String) -> Self {
        Self::with_http(api_key, Client::new())
    }

    pub fn with_http(api_key: String, http: Client) -> Self {
        Self { api_key, http, base_url: DEFAULT_BASE_URL.to_string() }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[derive(Debug, Deserialize)]
struct OwGeoMatch {
    lat: f64,
    lon: f64,
}

#[async_trait]
impl GeocodingService for OpenWeatherClient {
    async fn resolve(&self, city: &str) -> Result<GeocodeReply> {
        let url = format!("{}/geo/1.0/direct", self.base_url);

        let res = self
            .http
            .get(&url)
            .query(&[("q", city), ("limit", "1"), ("appid", self.api_key.as_str())])
            .send()
            .await
            .context("Failed to send request to OpenWeather (geocoding)")?;

        let status = res.status();
        let body = res
            .text()
            .await
            .context("Failed to read OpenWeather geocoding response body")?;

        if !status.is_success() {
            tracing::debug!(
                "OpenWeather geocoding failed with status {}: {}",
                status,
                truncate_body(&body)
            );
            return Ok(GeocodeReply { status: status.as_u16(), matches: Vec::new() });
        }

        let parsed: Vec<OwGeoMatch> =
            serde_json::from_str(&body).context("Failed to parse OpenWeather geocoding JSON")?;

        Ok(GeocodeReply {
            status: status.as_u16(),
            matches: parsed
                .into_iter()
                .map(|m| GeoPoint { latitude: m.lat, longitude: m.lon })
                .collect(),
        })
    }
}

#[async_trait]
impl WeatherService for OpenWeatherClient {
    async fn fetch_current(&self, point: GeoPoint) -> Result<WeatherReply> {
        let url = format!("{}/data/2.5/weather", self.base_url);
        let lat = point.latitude.to_string();
        let lon = point.longitude.to_string();

        let request = self.http.get(&url).query(&[
            ("lat", lat.as_str()),
            ("lon", lon.as_str()),
            ("appid", self.api_key.as_str()),
            ("units", "metric"),
        ]);

        send_for_weather(request, "OpenWeather (current weather)").await
    }
}
