//! Display icon for a provider condition group.
//!
//! Kept out of presentation code so the mapping stays a pure, testable
//! function over a closed enumeration.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum WeatherIcon {
    #[default]
    Sunny,
    Cloudy,
    Rainy,
    Snowy,
    Thunderstorm,
    PartlySunny,
}

impl WeatherIcon {
    /// Map a condition group string ("Clear", "Rain", ...) to an icon.
    /// Comparison is case-insensitive; unknown groups default to `Sunny`.
    pub fn from_condition(main: &str) -> Self {
        match main.to_ascii_lowercase().as_str() {
            "clear" => Self::Sunny,
            "clouds" => Self::Cloudy,
            "rain" | "drizzle" => Self::Rainy,
            "snow" => Self::Snowy,
            "thunderstorm" => Self::Thunderstorm,
            "mist" | "fog" | "haze" => Self::PartlySunny,
            _ => Self::Sunny,
        }
    }

    /// Terminal glyph for this icon.
    pub fn glyph(&self) -> &'static str {
        match self {
            Self::Sunny => "☀",
            Self::Cloudy => "☁",
            Self::Rainy => "🌧",
            Self::Snowy => "❄",
            Self::Thunderstorm => "⛈",
            Self::PartlySunny => "⛅",
        }
    }

    /// Stable icon name for front-ends that map names to assets.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Sunny => "sunny",
            Self::Cloudy => "cloudy",
            Self::Rainy => "rainy",
            Self::Snowy => "snow",
            Self::Thunderstorm => "thunderstorm",
            Self::PartlySunny => "partly_sunny",
        }
    }
}
