use serde::Serialize;

/// Coordinates of a geocoding match.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

/// A point in time as the upstream reported it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Timestamp {
    /// Unix seconds, formatted for display by the presentation layer.
    Epoch(i64),
    /// Already human-readable; shown as-is.
    Text(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WindUnit {
    MetersPerSecond,
    KilometersPerHour,
}

impl WindUnit {
    pub fn symbol(&self) -> &'static str {
        match self {
            WindUnit::MetersPerSecond => "m/s",
            WindUnit::KilometersPerHour => "kph",
        }
    }
}

/// Current conditions, independent of which upstream format produced them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedWeather {
    pub location_name: String,
    pub country_code: String,
    pub temperature_c: f64,
    pub feels_like_c: Option<f64>,
    pub temp_min_c: Option<f64>,
    pub temp_max_c: Option<f64>,
    pub humidity_pct: u8,
    pub wind_speed: f64,
    pub wind_unit: WindUnit,
    pub pressure: Option<f64>,
    pub cloud_cover_pct: Option<f64>,
    pub condition_text: String,
    pub is_day: bool,
    pub observed_at: Timestamp,
    pub sunrise: Option<Timestamp>,
    pub sunset: Option<Timestamp>,
    /// Displayable icon URL.
    pub icon_ref: String,
}

/// Outcome of normalizing a weather body.
///
/// `NoData` is a soft failure: the body was reachable but matched no known
/// format, and callers render it as an explicit empty state.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WeatherView {
    Weather(NormalizedWeather),
    NoData,
}

impl WeatherView {
    pub fn weather(&self) -> Option<&NormalizedWeather> {
        match self {
            WeatherView::Weather(w) => Some(w),
            WeatherView::NoData => None,
        }
    }

    pub fn is_no_data(&self) -> bool {
        matches!(self, WeatherView::NoData)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn view_serializes_with_kind_tag() {
        assert_eq!(
            serde_json::to_value(WeatherView::NoData).unwrap(),
            json!({ "kind": "no_data" })
        );

        let point = GeoPoint { latitude: 51.5, longitude: -0.12 };
        assert_eq!(
            serde_json::to_value(point).unwrap(),
            json!({ "latitude": 51.5, "longitude": -0.12 })
        );
        assert_eq!(serde_json::to_value(Timestamp::Epoch(5)).unwrap(), json!({ "epoch": 5 }));
    }
}
