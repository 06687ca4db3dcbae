//! Application error taxonomy.
//!
//! Wraps the typed failures of the lower layers and maps every kind to a
//! user-friendly message suitable for display. No failure here is fatal:
//! the view always returns to an interactive state.

use thiserror::Error;

use crate::location::LocationError;
use clima_weather::{AggregateError, WeatherError};

#[derive(Debug, Error)]
pub enum AppError {
    /// Rejected before any network call
    #[error("validation error: {0}")]
    Validation(String),

    #[error("weather service error: {0}")]
    Weather(#[from] WeatherError),

    #[error("location error: {0}")]
    Location(#[from] LocationError),

    #[error("forecast aggregation error: {0}")]
    Aggregate(#[from] AggregateError),
}

impl AppError {
    /// User-facing text for this failure. When the provider sent a
    /// human-readable message it is appended to the friendly text, so the
    /// server's own wording ("ciudad no encontrada") reaches the display.
    pub fn display_message(&self) -> String {
        match self {
            AppError::Weather(WeatherError::NotFound(message))
            | AppError::Weather(WeatherError::Http { message, .. })
                if !message.is_empty() =>
            {
                format!("{} ({})", self.user_message(), message)
            }
            _ => self.user_message().to_string(),
        }
    }

    /// Friendly per-variant message, without any provider text.
    pub fn user_message(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "Please enter a city name.",
            AppError::Weather(e) => match e {
                WeatherError::NotFound(_) => "City not found. Check the spelling and try again.",
                WeatherError::Http { status, .. } if *status >= 500 => {
                    "The weather service is having issues. Please try again later."
                }
                WeatherError::Http { .. } => "The weather request failed. Please try again.",
                WeatherError::Network(_) => "Unable to connect. Check your internet connection.",
                WeatherError::Parse(_) => "Received an unexpected response. Please try again.",
                WeatherError::InvalidCoordinates(_) => "Invalid coordinates for this location.",
            },
            AppError::Location(e) => match e {
                LocationError::PermissionDenied => {
                    "Location permission is required for this feature."
                }
                LocationError::PositionUnavailable => {
                    "Could not determine your location. Check that GPS is enabled."
                }
                LocationError::Timeout => "Locating timed out. Please try again.",
                LocationError::Unavailable => "Location services are unavailable on this device.",
            },
            AppError::Aggregate(AggregateError::EmptyInput) => {
                "No forecast data available for this location."
            }
        }
    }
}
