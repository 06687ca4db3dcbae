//! Weather provider HTTP client.
//!
//! Single-attempt requests: no retries and no caching at this layer. A failed
//! call surfaces immediately so the orchestrator can decide what to do.

use serde::Deserialize;
use std::time::Duration;
use tracing::instrument;

use crate::types::{CurrentWeather, ForecastResponse, WeatherError};

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";
const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Where to look up weather: free-text city name or device coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum Place {
    City(String),
    Coords { lat: f64, lon: f64 },
}

impl Place {
    /// Query-string fragment selecting this place.
    fn query(&self) -> Result<String, WeatherError> {
        match self {
            Place::City(name) => Ok(format!("q={}", urlencoding::encode(name))),
            Place::Coords { lat, lon } => {
                if !lat.is_finite() || !lon.is_finite() {
                    return Err(WeatherError::InvalidCoordinates(format!(
                        "lat={lat}, lon={lon}"
                    )));
                }
                Ok(format!("lat={lat}&lon={lon}"))
            }
        }
    }
}

/// Error body the provider returns on non-2xx responses.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: Option<String>,
}

#[derive(Debug, Clone)]
pub struct WeatherClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    lang: String,
}

impl WeatherClient {
    pub fn new(base_url: &str, api_key: &str, lang: &str) -> Result<Self, WeatherError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| WeatherError::Network(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            lang: lang.to_string(),
        })
    }

    /// Fetch current conditions for a city or coordinate pair.
    #[instrument(skip(self), level = "info")]
    pub async fn fetch_current(&self, place: &Place) -> Result<CurrentWeather, WeatherError> {
        self.get("weather", place).await
    }

    /// Fetch the 5-day/3-hour forecast feed for a city or coordinate pair.
    #[instrument(skip(self), level = "info")]
    pub async fn fetch_forecast(&self, place: &Place) -> Result<ForecastResponse, WeatherError> {
        self.get("forecast", place).await
    }

    async fn get<T: serde::de::DeserializeOwned>(
        &self,
        endpoint: &str,
        place: &Place,
    ) -> Result<T, WeatherError> {
        let url = format!(
            "{}/{}?{}&appid={}&units=metric&lang={}",
            self.base_url,
            endpoint,
            place.query()?,
            self.api_key,
            self.lang,
        );

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| WeatherError::Network(e.to_string()))?;

        Self::handle_response(response).await
    }

    /// Map the provider's responses onto the client error taxonomy.
    async fn handle_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, WeatherError> {
        let status = response.status();

        if status.is_success() {
            return response
                .json()
                .await
                .map_err(|e| WeatherError::Parse(e.to_string()));
        }

        // Non-2xx bodies carry a human-readable message field
        let message = response
            .json::<ApiErrorBody>()
            .await
            .ok()
            .and_then(|body| body.message)
            .unwrap_or_else(|| status.to_string());

        if status == reqwest::StatusCode::NOT_FOUND {
            Err(WeatherError::NotFound(message))
        } else {
            Err(WeatherError::Http {
                status: status.as_u16(),
                message,
            })
        }
    }
}
