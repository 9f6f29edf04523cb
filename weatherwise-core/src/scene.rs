use serde::{Deserialize, Serialize};

/// Scene used to pick a background matching the conditions and time of day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SceneCategory {
    Thunderstorm,
    Drizzle,
    Rain,
    Snow,
    ClearDay,
    ClearNight,
    CloudsDay,
    CloudsNight,
    Haze,
    #[default]
    Default,
}

impl SceneCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            SceneCategory::Thunderstorm => "thunderstorm",
            SceneCategory::Drizzle => "drizzle",
            SceneCategory::Rain => "rain",
            SceneCategory::Snow => "snow",
            SceneCategory::ClearDay => "clear_day",
            SceneCategory::ClearNight => "clear_night",
            SceneCategory::CloudsDay => "clouds_day",
            SceneCategory::CloudsNight => "clouds_night",
            SceneCategory::Haze => "haze",
            SceneCategory::Default => "default",
        }
    }

    pub const fn all() -> &'static [SceneCategory] {
        &[
            SceneCategory::Thunderstorm,
            SceneCategory::Drizzle,
            SceneCategory::Rain,
            SceneCategory::Snow,
            SceneCategory::ClearDay,
            SceneCategory::ClearNight,
            SceneCategory::CloudsDay,
            SceneCategory::CloudsNight,
            SceneCategory::Haze,
            SceneCategory::Default,
        ]
    }
}

impl std::fmt::Display for SceneCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

const HAZE_WORDS: &[&str] = &["mist", "haze", "fog", "smoke"];

/// Map a free-text condition to a scene.
///
/// Patterns are tested in priority order (thunder, drizzle, rain, snow,
/// clear, cloud, then mist/haze/fog/smoke) and the first hit wins, so
/// "light rain, overcast clouds" is rain. Lower-casing is ASCII only.
pub fn classify(condition_text: &str, is_day: bool) -> SceneCategory {
    let cond = condition_text.to_ascii_lowercase();

    if cond.contains("thunder") {
        SceneCategory::Thunderstorm
    } else if cond.contains("drizzle") {
        SceneCategory::Drizzle
    } else if cond.contains("rain") {
        SceneCategory::Rain
    } else if cond.contains("snow") {
        SceneCategory::Snow
    } else if cond.contains("clear") {
        if is_day {
            SceneCategory::ClearDay
        } else {
            SceneCategory::ClearNight
        }
    } else if cond.contains("cloud") {
        if is_day {
            SceneCategory::CloudsDay
        } else {
            SceneCategory::CloudsNight
        }
    } else if HAZE_WORDS.iter().any(|w| cond.contains(w)) {
        SceneCategory::Haze
    } else {
        SceneCategory::Default
    }
}
