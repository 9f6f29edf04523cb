use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;

use crate::{
    lookup::{WeatherReply, WeatherService},
    model::GeoPoint,
    provider::send_for_weather,
};

const DEFAULT_BASE_URL: &str = "https://api.weatherapi.com";

/// WeatherAPI.com current conditions (location/current format).
#[derive(Debug, Clone)]
pub struct WeatherApiClient {
    api_key: String,
    http: Client,
    base_url: String,
}

impl WeatherApiClient {
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

#[async_trait]
impl WeatherService for WeatherApiClient {
    async fn fetch_current(&self, point: GeoPoint) -> Result<WeatherReply> {
        let url = format!("{}/v1/current.json", self.base_url);
        let q = format!("{},{}", point.latitude, point.longitude);

        let request = self
            .http
            .get(&url)
            .query(&[("key", self.api_key.as_str()), ("q", q.as_str())]);

        send_for_weather(request, "WeatherAPI.com (current)").await
    }
}
