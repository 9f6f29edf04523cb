use crate::{
    Config,
    lookup::{GeocodingService, WeatherReply, WeatherService},
    provider::{
        openweather::OpenWeatherClient, visualcrossing::VisualCrossingClient,
        weatherapi::WeatherApiClient,
    },
};
use anyhow::Context;
use reqwest::{Client, RequestBuilder};
use std::{convert::TryFrom, time::Duration};

pub mod openweather;
pub mod visualcrossing;
pub mod weatherapi;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderId {
    OpenWeather,
    WeatherApi,
    VisualCrossing,
}

impl ProviderId {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderId::OpenWeather => "openweather",
            ProviderId::WeatherApi => "weatherapi",
            ProviderId::VisualCrossing => "visualcrossing",
        }
    }

    pub const fn all() -> &'static [ProviderId] {
        &[ProviderId::OpenWeather, ProviderId::WeatherApi, ProviderId::VisualCrossing]
    }
}

impl std::fmt::Display for ProviderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ProviderId {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let lower = value.to_lowercase();

        match lower.as_str() {
            "openweather" => Ok(ProviderId::OpenWeather),
            "weatherapi" => Ok(ProviderId::WeatherApi),
            "visualcrossing" => Ok(ProviderId::VisualCrossing),
            _ => Err(anyhow::anyhow!(
                "Unknown provider '{value}'. Supported providers: openweather, weatherapi, visualcrossing."
            )),
        }
    }
}

fn http_client(config: &Config) -> anyhow::Result<Client> {
    Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()
        .context("Failed to build HTTP client")
}

fn require_api_key(id: ProviderId, config: &Config) -> anyhow::Result<String> {
    config.provider_api_key(id).map(str::to_owned).ok_or_else(|| {
        anyhow::anyhow!(
            "No API key configured for provider '{id}'.\n\
                 Hint: run `weatherwise configure {id}` and enter your API key."
        )
    })
}

/// City names are always resolved through OpenWeather, whatever serves the weather.
pub fn geocoder_from_config(config: &Config) -> anyhow::Result<Box<dyn GeocodingService>> {
    let api_key = require_api_key(ProviderId::OpenWeather, config)?;
    Ok(Box::new(OpenWeatherClient::with_http(api_key, http_client(config)?)))
}

/// Construct a weather service from config and explicit ProviderId.
pub fn weather_service_from_config(
    id: ProviderId,
    config: &Config,
) -> anyhow::Result<Box<dyn WeatherService>> {
    let api_key = require_api_key(id, config)?;
    let http = http_client(config)?;

    let boxed: Box<dyn WeatherService> = match id {
        ProviderId::OpenWeather => Box::new(OpenWeatherClient::with_http(api_key, http)),
        ProviderId::WeatherApi => Box::new(WeatherApiClient::with_http(api_key, http)),
        ProviderId::VisualCrossing => Box::new(VisualCrossingClient::with_http(api_key, http)),
    };

    Ok(boxed)
}

/// Construct the default weather service from config, using `default_provider` field.
pub fn default_weather_service_from_config(
    config: &Config,
) -> anyhow::Result<Box<dyn WeatherService>> {
    let id = config.default_provider_id()?;
    weather_service_from_config(id, config)
}

/// Send a weather request and hand back status plus JSON body.
///
/// A success status with a body that is not JSON is an error; failure bodies
/// are only kept when they happen to be JSON.
pub(crate) async fn send_for_weather(
    request: RequestBuilder,
    what: &str,
) -> anyhow::Result<WeatherReply> {
    let res = request
        .send()
        .await
        .with_context(|| format!("Failed to send request to {what}"))?;

    let status = res.status();
    let body = res
        .text()
        .await
        .with_context(|| format!("Failed to read {what} response body"))?;

    if !status.is_success() {
        tracing::debug!("{what} request failed with status {status}: {}", truncate_body(&body));
        return Ok(WeatherReply {
            status: status.as_u16(),
            body: serde_json::from_str(&body).unwrap_or(serde_json::Value::Null),
        });
    }

    let body = serde_json::from_str(&body).with_context(|| format!("Failed to parse {what} JSON"))?;

    Ok(WeatherReply { status: status.as_u16(), body })
}

pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &body[..end])
    } else {
        body.to_string()
    }
}
