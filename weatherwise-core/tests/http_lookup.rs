//! Lookups through the real HTTP clients, against a mock server.

use chrono::Utc;
use serde_json::json;
use weatherwise_core::{
    LookupError, SceneCategory, WeatherLookup, WeatherView,
    provider::{
        openweather::OpenWeatherClient, visualcrossing::VisualCrossingClient,
        weatherapi::WeatherApiClient,
    },
    select_card_fields_in, select_scene,
};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path, query_param},
};

const KEY: &str = "TEST_KEY";

fn london_geocode() -> serde_json::Value {
    json!([{ "name": "London", "lat": 51.5, "lon": -0.12, "country": "GB", "state": "England" }])
}

fn station_body() -> serde_json::Value {
    json!({
        "coord": { "lon": -0.12, "lat": 51.5 },
        "weather": [{ "id": 803, "main": "Clouds", "description": "broken clouds", "icon": "04d" }],
        "main": { "temp": 15.3, "feels_like": 14.8, "temp_min": 14.1, "temp_max": 16.2, "pressure": 1015, "humidity": 77 },
        "wind": { "speed": 5.66, "deg": 240 },
        "clouds": { "all": 75 },
        "dt": 1_700_000_000,
        "sys": { "country": "GB", "sunrise": 1_699_945_200, "sunset": 1_699_978_000 },
        "timezone": 0,
        "name": "London"
    })
}

async fn mount_geocode(server: &MockServer, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path("/geo/1.0/direct"))
        .and(query_param("appid", KEY))
        .and(query_param("limit", "1"))
        .respond_with(response)
        .expect(1)
        .mount(server)
        .await;
}

fn openweather_lookup(server: &MockServer) -> WeatherLookup {
    let client = OpenWeatherClient::new(KEY.to_string()).with_base_url(server.uri());
    WeatherLookup::new(Box::new(client.clone()), Box::new(client))
}

fn expect_weather(view: WeatherView) -> weatherwise_core::NormalizedWeather {
    match view {
        WeatherView::Weather(w) => w,
        WeatherView::NoData => panic!("expected weather, got no data"),
    }
}

#[tokio::test]
async fn openweather_end_to_end() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/geo/1.0/direct"))
        .and(query_param("q", "London"))
        .and(query_param("appid", KEY))
        .respond_with(ResponseTemplate::new(200).set_body_json(london_geocode()))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .and(query_param("lat", "51.5"))
        .and(query_param("lon", "-0.12"))
        .and(query_param("units", "metric"))
        .and(query_param("appid", KEY))
        .respond_with(ResponseTemplate::new(200).set_body_json(station_body()))
        .expect(1)
        .mount(&server)
        .await;

    let view = openweather_lookup(&server).lookup(" London ").await.expect("lookup should succeed");
    let weather = expect_weather(view);

    let fields = select_card_fields_in(&weather, &Utc);
    assert_eq!(fields.temperature_c, 15);
    assert_eq!(fields.title, "London, GB");
    assert_eq!(fields.description, "broken clouds");
    assert_eq!(fields.sunrise.as_deref(), Some("07:00"));
    assert_eq!(select_scene(&weather), SceneCategory::CloudsDay);
}

#[tokio::test]
async fn unknown_city_skips_weather_call() {
    let server = MockServer::start().await;
    mount_geocode(&server, ResponseTemplate::new(200).set_body_json(json!([]))).await;

    Mock::given(path("/data/2.5/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_json(station_body()))
        .expect(0)
        .mount(&server)
        .await;

    let err = openweather_lookup(&server).lookup("Nowhereville").await.unwrap_err();
    assert!(matches!(err, LookupError::CityNotFound));
}

#[tokio::test]
async fn geocoding_error_status_is_city_not_found() {
    let server = MockServer::start().await;
    mount_geocode(
        &server,
        ResponseTemplate::new(400).set_body_json(json!({ "cod": "400", "message": "Nothing to geocode" })),
    )
    .await;

    let err = openweather_lookup(&server).lookup("???").await.unwrap_err();
    assert!(matches!(err, LookupError::CityNotFound));
}

#[tokio::test]
async fn rejected_key_is_invalid_credentials() {
    let server = MockServer::start().await;
    mount_geocode(&server, ResponseTemplate::new(200).set_body_json(london_geocode())).await;

    Mock::given(path("/data/2.5/weather"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "cod": 401,
            "message": "Invalid API key. Please see https://openweathermap.org/faq#error401 for more info."
        })))
        .mount(&server)
        .await;

    let err = openweather_lookup(&server).lookup("London").await.unwrap_err();
    assert!(matches!(err, LookupError::InvalidCredentials));
}

#[tokio::test]
async fn server_error_is_upstream_unavailable() {
    let server = MockServer::start().await;
    mount_geocode(&server, ResponseTemplate::new(200).set_body_json(london_geocode())).await;

    Mock::given(path("/data/2.5/weather"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .mount(&server)
        .await;

    let err = openweather_lookup(&server).lookup("London").await.unwrap_err();
    assert!(matches!(err, LookupError::UpstreamUnavailable { status: 500 }));
}

#[tokio::test]
async fn garbled_success_body_is_unexpected_failure() {
    let server = MockServer::start().await;
    mount_geocode(&server, ResponseTemplate::new(200).set_body_json(london_geocode())).await;

    Mock::given(path("/data/2.5/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway</html>"))
        .mount(&server)
        .await;

    let err = openweather_lookup(&server).lookup("London").await.unwrap_err();
    assert!(matches!(err, LookupError::UnexpectedFailure { .. }));
}

#[tokio::test]
async fn garbled_geocoding_body_is_unexpected_failure() {
    let server = MockServer::start().await;
    mount_geocode(&server, ResponseTemplate::new(200).set_body_string("not json")).await;

    let err = openweather_lookup(&server).lookup("London").await.unwrap_err();
    assert!(matches!(err, LookupError::UnexpectedFailure { .. }));
}

#[tokio::test]
async fn weatherapi_backend_night_report() {
    let server = MockServer::start().await;
    mount_geocode(&server, ResponseTemplate::new(200).set_body_json(london_geocode())).await;

    Mock::given(method("GET"))
        .and(path("/v1/current.json"))
        .and(query_param("key", KEY))
        .and(query_param("q", "51.5,-0.12"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "location": { "name": "London", "region": "City of London, Greater London", "country": "United Kingdom" },
            "current": {
                "last_updated": "2024-01-15 22:45",
                "temp_c": 6.0, "is_day": 0, "wind_kph": 15.1, "pressure_mb": 1019.0,
                "humidity": 87, "cloud": 100, "feelslike_c": 2.9,
                "condition": { "text": "Light rain", "icon": "//cdn.weatherapi.com/weather/64x64/night/296.png" }
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let geocoder = OpenWeatherClient::new(KEY.to_string()).with_base_url(server.uri());
    let weather = WeatherApiClient::new(KEY.to_string()).with_base_url(server.uri());
    let lookup = WeatherLookup::new(Box::new(geocoder), Box::new(weather));

    let w = expect_weather(lookup.lookup("London").await.expect("lookup should succeed"));
    assert!(!w.is_day);
    assert_eq!(select_scene(&w), SceneCategory::Rain);

    let fields = select_card_fields_in(&w, &Utc);
    assert_eq!(fields.observed_at, "2024-01-15 22:45");
    assert_eq!(fields.wind, "15.1 kph");
}

#[tokio::test]
async fn visualcrossing_backend_uses_icon_heuristic() {
    let server = MockServer::start().await;
    mount_geocode(&server, ResponseTemplate::new(200).set_body_json(london_geocode())).await;

    Mock::given(method("GET"))
        .and(path("/timeline/51.5,-0.12"))
        .and(query_param("unitGroup", "metric"))
        .and(query_param("key", KEY))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "address": "51.5,-0.12",
            "resolvedAddress": "London, England, United Kingdom",
            "currentConditions": {
                "datetime": "23:10:00", "temp": 3.6, "feelslike": 1.1, "humidity": 92.0,
                "windspeed": 9.4, "pressure": 1021.0, "cloudcover": 0.0,
                "conditions": "Clear", "icon": "clear-night"
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let geocoder = OpenWeatherClient::new(KEY.to_string()).with_base_url(server.uri());
    let weather = VisualCrossingClient::new(KEY.to_string()).with_base_url(server.uri());
    let lookup = WeatherLookup::new(Box::new(geocoder), Box::new(weather));

    let w = expect_weather(lookup.lookup("London").await.expect("lookup should succeed"));
    assert!(!w.is_day);
    assert_eq!(select_scene(&w), SceneCategory::ClearNight);
    assert_eq!(select_card_fields_in(&w, &Utc).temperature_c, 4);
}

#[tokio::test]
async fn unrecognized_weather_body_is_no_data() {
    let server = MockServer::start().await;
    mount_geocode(&server, ResponseTemplate::new(200).set_body_json(london_geocode())).await;

    Mock::given(path("/data/2.5/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "ok" })))
        .mount(&server)
        .await;

    let view = openweather_lookup(&server).lookup("London").await.expect("no data is not an error");
    assert!(view.is_no_data());
}
