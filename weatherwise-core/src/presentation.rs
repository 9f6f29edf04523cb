use std::collections::HashMap;
use std::fmt::Display;

use chrono::{DateTime, Local, TimeZone};
use serde::Serialize;

use crate::model::{NormalizedWeather, Timestamp};
use crate::scene::{SceneCategory, classify};

/// Fields shown on the weather card, ready for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayFields {
    pub title: String,
    pub icon_url: String,
    pub description: String,
    pub temperature_c: i64,
    pub feels_like_c: Option<i64>,
    pub temp_min_c: Option<i64>,
    pub temp_max_c: Option<i64>,
    pub humidity_pct: u8,
    pub wind: String,
    pub pressure_hpa: Option<f64>,
    pub cloud_cover_pct: Option<f64>,
    pub observed_at: String,
    pub sunrise: Option<String>,
    pub sunset: Option<String>,
}

pub fn select_scene(weather: &NormalizedWeather) -> SceneCategory {
    classify(&weather.condition_text, weather.is_day)
}

/// Project card fields, formatting epoch timestamps in the local time zone.
pub fn select_card_fields(weather: &NormalizedWeather) -> DisplayFields {
    select_card_fields_in(weather, &Local)
}

/// Project card fields, formatting epoch timestamps in `tz`.
pub fn select_card_fields_in<Tz>(weather: &NormalizedWeather, tz: &Tz) -> DisplayFields
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let title = if weather.country_code.is_empty() {
        weather.location_name.clone()
    } else {
        format!("{}, {}", weather.location_name, weather.country_code)
    };

    DisplayFields {
        title,
        icon_url: weather.icon_ref.clone(),
        description: weather.condition_text.clone(),
        temperature_c: round_celsius(weather.temperature_c),
        feels_like_c: weather.feels_like_c.map(round_celsius),
        temp_min_c: weather.temp_min_c.map(round_celsius),
        temp_max_c: weather.temp_max_c.map(round_celsius),
        humidity_pct: weather.humidity_pct,
        wind: format!("{} {}", weather.wind_speed, weather.wind_unit.symbol()),
        pressure_hpa: weather.pressure,
        cloud_cover_pct: weather.cloud_cover_pct,
        observed_at: format_timestamp(&weather.observed_at, tz),
        sunrise: weather.sunrise.as_ref().map(|t| format_timestamp(t, tz)),
        sunset: weather.sunset.as_ref().map(|t| format_timestamp(t, tz)),
    }
}

/// Nearest whole degree, halves rounded up (-2.5 becomes -2).
fn round_celsius(v: f64) -> i64 {
    (v + 0.5).floor() as i64
}

fn format_timestamp<Tz>(ts: &Timestamp, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    match ts {
        Timestamp::Epoch(secs) => DateTime::from_timestamp(*secs, 0)
            .map(|dt| dt.with_timezone(tz).format("%H:%M").to_string())
            .unwrap_or_else(|| secs.to_string()),
        Timestamp::Text(s) => s.clone(),
    }
}

/// Maps a scene to the background asset shown behind the card.
pub trait BackgroundAssetResolver {
    fn asset_for(&self, category: SceneCategory) -> &str;
}

/// Looping background clips, one per scene.
#[derive(Debug, Clone)]
pub struct VideoAssets {
    clips: HashMap<SceneCategory, String>,
    fallback: String,
}

impl VideoAssets {
    pub fn new(clips: HashMap<SceneCategory, String>, fallback: impl Into<String>) -> Self {
        Self { clips, fallback: fallback.into() }
    }
}

impl Default for VideoAssets {
    fn default() -> Self {
        let clips = [
            (SceneCategory::Thunderstorm, "Thunderstorm.mp4"),
            (SceneCategory::Drizzle, "Rain.mp4"),
            (SceneCategory::Rain, "Rain.mp4"),
            (SceneCategory::Snow, "Snow.mp4"),
            (SceneCategory::ClearDay, "ClearDay.mp4"),
            (SceneCategory::ClearNight, "ClearNight.mp4"),
            (SceneCategory::CloudsDay, "CloudsDay.mp4"),
            (SceneCategory::CloudsNight, "CloudsNight.mp4"),
            (SceneCategory::Haze, "Haze.mp4"),
            (SceneCategory::Default, "Default.mp4"),
        ]
        .into_iter()
        .map(|(cat, clip)| (cat, clip.to_string()))
        .collect();

        Self::new(clips, "Default.mp4")
    }
}

impl BackgroundAssetResolver for VideoAssets {
    fn asset_for(&self, category: SceneCategory) -> &str {
        self.clips.get(&category).unwrap_or(&self.fallback)
    }
}
