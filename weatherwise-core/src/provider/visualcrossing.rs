use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;

use crate::{
    lookup::{WeatherReply, WeatherService},
    model::GeoPoint,
    provider::send_for_weather,
};

const DEFAULT_BASE_URL: &str =
    "https://weather.visualcrossing.com/VisualCrossingWebServices/rest/services";

/// Visual Crossing timeline API, current conditions only.
#[derive(Debug, Clone)]
pub struct VisualCrossingClient {
    api_key: String,
    http: Client,
    base_url: String,
}

impl VisualCrossingClient {
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
impl WeatherService for VisualCrossingClient {
    async fn fetch_current(&self, point: GeoPoint) -> Result<WeatherReply> {
        let url = format!("{}/timeline/{},{}", self.base_url, point.latitude, point.longitude);

        let request = self.http.get(&url).query(&[
            ("unitGroup", "metric"),
            ("include", "current"),
            ("contentType", "json"),
            ("key", self.api_key.as_str()),
        ]);

        send_for_weather(request, "Visual Crossing (timeline)").await
    }
}
