//! Normalization of upstream weather bodies.
//!
//! Three upstream formats are understood. The format is detected once, at the
//! boundary, into [`RawWeather`]; everything after that is an exhaustive match.

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

use crate::model::{NormalizedWeather, Timestamp, WeatherView, WindUnit};

/// Placeholder for a missing condition description.
pub const NOT_AVAILABLE: &str = "N/A";

/// Icon code assumed when a station report carries no condition entry.
pub const DEFAULT_STATION_ICON: &str = "01d";

const STATION_ICON_BASE: &str = "https://openweathermap.org/img/wn/";
const CONDITIONS_ICON_BASE: &str =
    "https://raw.githubusercontent.com/visualcrossing/WeatherIcons/main/PNG/2nd%20Set%20-%20Color/";

/// A weather body in one of the known upstream formats.
#[derive(Debug, Clone)]
pub enum RawWeather {
    /// `main` / `weather[]` / `wind` / `sys` (OpenWeather current weather).
    Station(StationReport),
    /// `location` / `current` (WeatherAPI.com current).
    LocationCurrent(LocationReport),
    /// `currentConditions` with `address` or `resolvedAddress` (Visual Crossing timeline).
    CurrentConditions(ConditionsReport),
}

impl RawWeather {
    /// Inspect a JSON body and parse it into the matching format.
    ///
    /// Precedence: location/current, then currentConditions, then the station
    /// format as fallback. Returns `None` when nothing matches or the matched
    /// format fails to parse.
    pub fn detect(body: Value) -> Option<Self> {
        let obj = body.as_object()?;

        let parsed = if truthy(obj, "location") && truthy(obj, "current") {
            serde_json::from_value(body).map(RawWeather::LocationCurrent)
        } else if truthy(obj, "currentConditions")
            && (truthy(obj, "address") || truthy(obj, "resolvedAddress"))
        {
            serde_json::from_value(body).map(RawWeather::CurrentConditions)
        } else if truthy(obj, "main") {
            serde_json::from_value(body).map(RawWeather::Station)
        } else {
            tracing::debug!("weather body matches no known format");
            return None;
        };

        parsed
            .map_err(|e| tracing::debug!("weather body failed to parse: {e}"))
            .ok()
    }
}

/// Same notion of "present" the upstream JSON producers rely on: null, false,
/// zero and the empty string count as absent.
fn truthy(obj: &Map<String, Value>, key: &str) -> bool {
    match obj.get(key) {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|v| v != 0.0),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    }
}

/// Normalize a body, turning an unrecognized one into [`WeatherView::NoData`].
pub fn normalize_body(body: Value) -> WeatherView {
    match RawWeather::detect(body) {
        Some(raw) => WeatherView::Weather(normalize(raw)),
        None => WeatherView::NoData,
    }
}

pub fn normalize(raw: RawWeather) -> NormalizedWeather {
    match raw {
        RawWeather::Station(r) => normalize_station(r),
        RawWeather::LocationCurrent(r) => normalize_location(r),
        RawWeather::CurrentConditions(r) => normalize_conditions(r),
    }
}

// --- Station format -------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct StationReport {
    #[serde(default, deserialize_with = "null_as_default")]
    name: String,
    dt: Option<i64>,
    main: StationMain,
    #[serde(default, deserialize_with = "null_as_default")]
    weather: Vec<StationCondition>,
    #[serde(default, deserialize_with = "null_as_default")]
    wind: StationWind,
    clouds: Option<StationClouds>,
    #[serde(default, deserialize_with = "null_as_default")]
    sys: StationSys,
}

#[derive(Debug, Clone, Deserialize)]
struct StationMain {
    temp: f64,
    feels_like: Option<f64>,
    temp_min: Option<f64>,
    temp_max: Option<f64>,
    pressure: Option<f64>,
    #[serde(default, deserialize_with = "null_as_default")]
    humidity: f64,
}

#[derive(Debug, Clone, Deserialize)]
struct StationCondition {
    description: Option<String>,
    icon: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct StationWind {
    #[serde(default, deserialize_with = "null_as_default")]
    speed: f64,
}

#[derive(Debug, Clone, Deserialize)]
struct StationClouds {
    all: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct StationSys {
    #[serde(default, deserialize_with = "null_as_default")]
    country: String,
    sunrise: Option<i64>,
    sunset: Option<i64>,
}

fn normalize_station(r: StationReport) -> NormalizedWeather {
    let first = r.weather.into_iter().next();

    let (description, icon) = match first {
        Some(c) => (non_empty(c.description), non_empty(c.icon)),
        None => (None, None),
    };
    let condition_text = description.unwrap_or_else(|| NOT_AVAILABLE.to_string());
    let icon = icon.unwrap_or_else(|| DEFAULT_STATION_ICON.to_string());

    // Station icon codes end in 'd' or 'n'.
    let is_day = !icon.ends_with('n');

    NormalizedWeather {
        location_name: r.name,
        country_code: r.sys.country,
        temperature_c: r.main.temp,
        feels_like_c: r.main.feels_like,
        temp_min_c: r.main.temp_min,
        temp_max_c: r.main.temp_max,
        humidity_pct: percent(r.main.humidity),
        wind_speed: r.wind.speed,
        wind_unit: WindUnit::MetersPerSecond,
        pressure: r.main.pressure,
        cloud_cover_pct: r.clouds.and_then(|c| c.all),
        condition_text,
        is_day,
        observed_at: r
            .dt
            .map(Timestamp::Epoch)
            .unwrap_or_else(|| Timestamp::Text(NOT_AVAILABLE.to_string())),
        sunrise: r.sys.sunrise.map(Timestamp::Epoch),
        sunset: r.sys.sunset.map(Timestamp::Epoch),
        icon_ref: format!("{STATION_ICON_BASE}{icon}@2x.png"),
    }
}

// --- Location/current format ----------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct LocationReport {
    location: LocLocation,
    current: LocCurrent,
}

#[derive(Debug, Clone, Deserialize)]
struct LocLocation {
    #[serde(default, deserialize_with = "null_as_default")]
    name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    country: String,
}

#[derive(Debug, Clone, Deserialize)]
struct LocCurrent {
    temp_c: f64,
    feelslike_c: Option<f64>,
    #[serde(default, deserialize_with = "null_as_default")]
    humidity: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    wind_kph: f64,
    pressure_mb: Option<f64>,
    cloud: Option<f64>,
    #[serde(default, deserialize_with = "null_as_default")]
    is_day: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    condition: LocCondition,
    last_updated: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct LocCondition {
    text: Option<String>,
    icon: Option<String>,
}

fn normalize_location(r: LocationReport) -> NormalizedWeather {
    let c = r.current;

    // Icons come protocol-relative ("//cdn.weatherapi.com/...").
    let icon_ref = match non_empty(c.condition.icon) {
        Some(icon) if icon.starts_with("//") => format!("https:{icon}"),
        Some(icon) => icon,
        None => String::new(),
    };

    NormalizedWeather {
        location_name: r.location.name,
        country_code: r.location.country,
        temperature_c: c.temp_c,
        feels_like_c: c.feelslike_c,
        temp_min_c: None,
        temp_max_c: None,
        humidity_pct: percent(c.humidity),
        wind_speed: c.wind_kph,
        wind_unit: WindUnit::KilometersPerHour,
        pressure: c.pressure_mb,
        cloud_cover_pct: c.cloud,
        condition_text: non_empty(c.condition.text).unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        is_day: c.is_day == 1,
        observed_at: Timestamp::Text(c.last_updated.unwrap_or_else(|| NOT_AVAILABLE.to_string())),
        sunrise: None,
        sunset: None,
        icon_ref,
    }
}

// --- Current-conditions format --------------------------------------------

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConditionsReport {
    address: Option<String>,
    resolved_address: Option<String>,
    current_conditions: CcCurrent,
}

#[derive(Debug, Clone, Deserialize)]
struct CcCurrent {
    datetime: Option<String>,
    temp: f64,
    feelslike: Option<f64>,
    #[serde(default, deserialize_with = "null_as_default")]
    humidity: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    windspeed: f64,
    pressure: Option<f64>,
    cloudcover: Option<f64>,
    conditions: Option<String>,
    icon: Option<String>,
    sunrise: Option<String>,
    sunset: Option<String>,
}

fn normalize_conditions(r: ConditionsReport) -> NormalizedWeather {
    let c = r.current_conditions;
    let icon = non_empty(c.icon);

    // No explicit flag in this format: the icon code names the night variants
    // ("clear-night", "partly-cloudy-night"), so anything else is taken as day.
    let is_day = !icon.as_deref().is_some_and(|i| i.contains("night"));

    NormalizedWeather {
        location_name: non_empty(r.resolved_address)
            .or_else(|| non_empty(r.address))
            .unwrap_or_default(),
        country_code: String::new(),
        temperature_c: c.temp,
        feels_like_c: c.feelslike,
        temp_min_c: None,
        temp_max_c: None,
        humidity_pct: percent(c.humidity),
        wind_speed: c.windspeed,
        wind_unit: WindUnit::KilometersPerHour,
        pressure: c.pressure,
        cloud_cover_pct: c.cloudcover,
        condition_text: non_empty(c.conditions).unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        is_day,
        observed_at: Timestamp::Text(c.datetime.unwrap_or_else(|| NOT_AVAILABLE.to_string())),
        sunrise: c.sunrise.map(Timestamp::Text),
        sunset: c.sunset.map(Timestamp::Text),
        icon_ref: icon
            .map(|i| format!("{CONDITIONS_ICON_BASE}{i}.png"))
            .unwrap_or_default(),
    }
}

/// Treats an explicit `null` like a missing key. Upstreams send nulls for
/// readings a station did not report.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn non_empty(s: Option<String>) -> Option<String> {
    s.filter(|s| !s.trim().is_empty())
}

fn percent(v: f64) -> u8 {
    v.round().clamp(0.0, 100.0) as u8
}
