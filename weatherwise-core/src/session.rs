use tracing::{debug, warn};

use crate::lookup::{LookupError, WeatherLookup};
use crate::model::WeatherView;
use crate::store::{KeyValueStore, LAST_CITY_KEY};

/// Drives lookups on behalf of a user and remembers the last submitted city.
///
/// Lookups take `&mut self`, so a session never has two in flight; a newer
/// result simply replaces whatever the caller showed before.
#[derive(Debug)]
pub struct WeatherSession {
    lookup: WeatherLookup,
    store: Box<dyn KeyValueStore>,
}

impl WeatherSession {
    pub fn new(lookup: WeatherLookup, store: Box<dyn KeyValueStore>) -> Self {
        Self { lookup, store }
    }

    /// The remembered city, if any. An unreadable store counts as empty.
    pub fn last_city(&self) -> Option<String> {
        match self.store.get(LAST_CITY_KEY) {
            Ok(city) => city.filter(|c| !c.trim().is_empty()),
            Err(e) => {
                warn!("could not read last city: {e:#}");
                None
            }
        }
    }

    /// Re-run the lookup for the remembered city without writing it back.
    pub async fn startup(&mut self) -> Option<(String, Result<WeatherView, LookupError>)> {
        let city = self.last_city()?;
        debug!(city = %city, "auto lookup of last city");
        let result = self.lookup.lookup(&city).await;
        Some((city, result))
    }

    /// A user-initiated lookup. The city is remembered before the lookup
    /// runs, whether or not it then succeeds.
    pub async fn submit(&mut self, city: &str) -> Result<WeatherView, LookupError> {
        let city = remember_city(self.store.as_mut(), city)?;
        self.lookup.lookup(city).await
    }
}

/// Store the trimmed `city` as the last searched one and hand it back.
///
/// Blank input is rejected and nothing is written. A failing store is logged
/// and otherwise ignored.
pub fn remember_city<'a>(
    store: &mut dyn KeyValueStore,
    city: &'a str,
) -> Result<&'a str, LookupError> {
    let city = city.trim();
    if city.is_empty() {
        return Err(LookupError::Validation);
    }

    if let Err(e) = store.set(LAST_CITY_KEY, city) {
        warn!("could not remember '{city}': {e:#}");
    }
    Ok(city)
}
