//! Core library for the `weatherwise` lookup tool.
//!
//! This crate defines:
//! - Condition classification into background scenes
//! - Normalization of the supported upstream weather formats
//! - Lookup orchestration (geocode, then fetch) and its error taxonomy
//! - Card field selection for display
//! - Configuration, credentials and the remembered last city
//!
//! It is used by `weatherwise-cli`, but can also be reused by other front ends.

pub mod adapter;
pub mod config;
pub mod lookup;
pub mod model;
pub mod presentation;
pub mod provider;
pub mod scene;
pub mod session;
pub mod store;

pub use adapter::{RawWeather, normalize, normalize_body};
pub use config::{Config, ProviderConfig};
pub use lookup::{
    GeocodeReply, GeocodingService, LookupError, WeatherLookup, WeatherReply, WeatherService,
};
pub use model::{GeoPoint, NormalizedWeather, Timestamp, WeatherView, WindUnit};
pub use presentation::{
    BackgroundAssetResolver, DisplayFields, VideoAssets, select_card_fields,
    select_card_fields_in, select_scene,
};
pub use provider::{
    ProviderId, default_weather_service_from_config, geocoder_from_config,
    weather_service_from_config,
};
pub use scene::{SceneCategory, classify};
pub use session::{WeatherSession, remember_city};
pub use store::{FileStore, KeyValueStore, LAST_CITY_KEY, MemoryStore};
