//! Geolocation provider abstraction.
//!
//! The orchestrator only sees the [`LocationProvider`] trait; which variant
//! backs it is decided once at startup by [`select_provider`], never by
//! branching inside business logic.

use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Free IP-geolocation lookup, no API key required.
const DEFAULT_IP_LOOKUP_URL: &str = "http://ip-api.com";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    Granted,
    Denied,
}

/// Options for a position request.
#[derive(Debug, Clone)]
pub struct PositionOptions {
    pub high_accuracy: bool,
    pub timeout: Duration,
}

impl Default for PositionOptions {
    fn default() -> Self {
        Self {
            high_accuracy: true,
            timeout: Duration::from_secs(10),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LocationError {
    #[error("location permission denied")]
    PermissionDenied,
    #[error("position unavailable")]
    PositionUnavailable,
    #[error("location request timed out")]
    Timeout,
    #[error("location service unavailable")]
    Unavailable,
}

/// Platform-appropriate source of device coordinates.
#[async_trait]
pub trait LocationProvider: Send + Sync {
    async fn check_permission(&self) -> Permission;
    async fn request_permission(&self) -> Permission;
    async fn current_position(
        &self,
        options: &PositionOptions,
    ) -> Result<Coordinates, LocationError>;
}

/// Pick the provider for this process: pinned config coordinates when
/// available, otherwise the IP lookup.
pub fn select_provider(config: &clima_core::Config) -> Arc<dyn LocationProvider> {
    match config.location.pinned() {
        Some((latitude, longitude)) => {
            tracing::info!("Using pinned location {}, {}", latitude, longitude);
            Arc::new(FixedLocator::new(Coordinates {
                latitude,
                longitude,
            }))
        }
        None => Arc::new(IpLocator::new()),
    }
}

#[derive(Debug, Deserialize)]
struct IpLookupResponse {
    status: String,
    lat: Option<f64>,
    lon: Option<f64>,
}

/// Resolves coordinates from the machine's public IP address.
#[derive(Debug, Clone)]
pub struct IpLocator {
    base_url: String,
}

impl IpLocator {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_IP_LOOKUP_URL)
    }

    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

impl Default for IpLocator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LocationProvider for IpLocator {
    async fn check_permission(&self) -> Permission {
        // A network lookup needs no OS permission
        Permission::Granted
    }

    async fn request_permission(&self) -> Permission {
        Permission::Granted
    }

    async fn current_position(
        &self,
        options: &PositionOptions,
    ) -> Result<Coordinates, LocationError> {
        let client = reqwest::Client::builder()
            .timeout(options.timeout)
            .build()
            .map_err(|_| LocationError::Unavailable)?;

        let url = format!("{}/json", self.base_url);
        let response = client.get(&url).send().await.map_err(|e| {
            if e.is_timeout() {
                LocationError::Timeout
            } else {
                LocationError::PositionUnavailable
            }
        })?;

        if !response.status().is_success() {
            tracing::debug!("IP lookup returned status {}", response.status());
            return Err(LocationError::PositionUnavailable);
        }

        let body: IpLookupResponse = response
            .json()
            .await
            .map_err(|_| LocationError::PositionUnavailable)?;

        match (body.status.as_str(), body.lat, body.lon) {
            ("success", Some(latitude), Some(longitude)) => {
                tracing::info!("IP lookup resolved {}, {}", latitude, longitude);
                Ok(Coordinates {
                    latitude,
                    longitude,
                })
            }
            _ => Err(LocationError::PositionUnavailable),
        }
    }
}

/// Fixed coordinates pinned in config; for machines where no lookup applies.
#[derive(Debug, Clone)]
pub struct FixedLocator {
    coordinates: Coordinates,
}

impl FixedLocator {
    pub fn new(coordinates: Coordinates) -> Self {
        Self { coordinates }
    }
}

#[async_trait]
impl LocationProvider for FixedLocator {
    async fn check_permission(&self) -> Permission {
        Permission::Granted
    }

    async fn request_permission(&self) -> Permission {
        Permission::Granted
    }

    async fn current_position(
        &self,
        _options: &PositionOptions,
    ) -> Result<Coordinates, LocationError> {
        Ok(self.coordinates)
    }
}
