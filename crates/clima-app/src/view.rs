//! View orchestrator: coordinates fetches, geolocation, and display state.
//!
//! One search is an all-or-nothing unit: current weather and both forecast
//! views either all arrive or all stay empty. The secondary forecast fetch
//! after geolocation is the single best-effort exception.

use std::sync::Arc;

use chrono::Local;

use clima_weather::{
    daily_buckets, hourly_selections, CurrentWeather, DailyBucket, ForecastSample,
    HourlySelection, Place, WeatherClient, DEFAULT_TARGET_HOURS,
};

use crate::error::AppError;
use crate::history::SearchHistory;
use crate::location::{LocationProvider, Permission, PositionOptions};

/// Which operation holds the busy flag. The two are mutually exclusive so a
/// front-end can differentiate its messaging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusyKind {
    Search,
    Locate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewState {
    #[default]
    Idle,
    Loading(BusyKind),
    Success,
    Failed,
}

impl ViewState {
    /// True while an operation is in flight; blocks starting another.
    pub fn is_busy(self) -> bool {
        matches!(self, ViewState::Loading(_))
    }
}

/// Display state plus the collaborators needed to refresh it.
pub struct WeatherView {
    client: WeatherClient,
    locator: Arc<dyn LocationProvider>,
    history: SearchHistory,
    state: ViewState,
    current: Option<CurrentWeather>,
    daily: Vec<DailyBucket>,
    hourly: Vec<HourlySelection>,
    last_error: Option<String>,
}

impl WeatherView {
    pub fn new(
        client: WeatherClient,
        locator: Arc<dyn LocationProvider>,
        history: SearchHistory,
    ) -> Self {
        Self {
            client,
            locator,
            history,
            state: ViewState::Idle,
            current: None,
            daily: Vec::new(),
            hourly: Vec::new(),
            last_error: None,
        }
    }

    /// Search by city name.
    ///
    /// Empty input fails validation before any network call and leaves the
    /// prior terminal state in place. Any fetch or aggregation failure
    /// clears all three result slots and lands in `Failed`.
    pub async fn search(&mut self, text: &str) -> Result<(), AppError> {
        if self.state.is_busy() {
            tracing::debug!("Ignoring search while an operation is in flight");
            return Ok(());
        }

        let city = text.trim();
        if city.is_empty() {
            let err = AppError::Validation("empty city name".to_string());
            self.last_error = Some(err.display_message());
            return Err(err);
        }

        self.state = ViewState::Loading(BusyKind::Search);
        self.last_error = None;
        self.clear_results();

        let place = Place::City(city.to_string());
        match self.fetch_all(&place).await {
            Ok((current, daily, hourly)) => {
                self.current = Some(current);
                self.daily = daily;
                self.hourly = hourly;
                self.state = ViewState::Success;
                self.history.record(city);
                Ok(())
            }
            Err(err) => Err(self.fail(err)),
        }
    }

    /// Acquire coordinates and show the weather there.
    ///
    /// The forecast for the resolved city is best-effort: its failure is
    /// logged and swallowed, leaving the current conditions on display.
    pub async fn locate(&mut self) -> Result<(), AppError> {
        if self.state.is_busy() {
            tracing::debug!("Ignoring locate while an operation is in flight");
            return Ok(());
        }

        self.state = ViewState::Loading(BusyKind::Locate);
        self.last_error = None;
        self.current = None;

        match self.acquire_and_fetch().await {
            Ok(()) => Ok(()),
            Err(err) => Err(self.fail(err)),
        }
    }

    async fn acquire_and_fetch(&mut self) -> Result<(), AppError> {
        if self.locator.check_permission().await != Permission::Granted
            && self.locator.request_permission().await != Permission::Granted
        {
            return Err(crate::location::LocationError::PermissionDenied.into());
        }

        let coords = self
            .locator
            .current_position(&PositionOptions::default())
            .await?;

        let current = self
            .client
            .fetch_current(&Place::Coords {
                lat: coords.latitude,
                lon: coords.longitude,
            })
            .await?;

        let city = current.name.clone();
        self.current = Some(current);
        self.history.record(&city);
        self.state = ViewState::Success;

        match self.fetch_forecast_views(&Place::City(city.clone())).await {
            Ok((daily, hourly)) => {
                self.daily = daily;
                self.hourly = hourly;
            }
            Err(err) => {
                tracing::warn!("Could not get forecast for {}: {}", city, err);
                self.daily.clear();
                self.hourly.clear();
            }
        }

        Ok(())
    }

    /// Fan-out the current + forecast fetches; one forecast payload feeds
    /// both the daily and the hourly aggregation.
    async fn fetch_all(
        &self,
        place: &Place,
    ) -> Result<(CurrentWeather, Vec<DailyBucket>, Vec<HourlySelection>), AppError> {
        let (current, forecast) = tokio::try_join!(
            self.client.fetch_current(place),
            self.client.fetch_forecast(place),
        )?;
        let (daily, hourly) = Self::aggregate(&forecast.list)?;
        Ok((current, daily, hourly))
    }

    async fn fetch_forecast_views(
        &self,
        place: &Place,
    ) -> Result<(Vec<DailyBucket>, Vec<HourlySelection>), AppError> {
        let forecast = self.client.fetch_forecast(place).await?;
        Ok(Self::aggregate(&forecast.list)?)
    }

    fn aggregate(
        samples: &[ForecastSample],
    ) -> Result<(Vec<DailyBucket>, Vec<HourlySelection>), AppError> {
        let daily = daily_buckets(samples, &Local)?;
        let hourly = hourly_selections(samples, &DEFAULT_TARGET_HOURS, Local::now())?;
        Ok((daily, hourly))
    }

    /// All-or-nothing failure path: clear every slot, surface the message.
    fn fail(&mut self, err: AppError) -> AppError {
        self.clear_results();
        self.last_error = Some(err.display_message());
        self.state = ViewState::Failed;
        err
    }

    fn clear_results(&mut self) {
        self.current = None;
        self.daily.clear();
        self.hourly.clear();
    }

    pub fn state(&self) -> ViewState {
        self.state
    }

    pub fn current(&self) -> Option<&CurrentWeather> {
        self.current.as_ref()
    }

    pub fn daily(&self) -> &[DailyBucket] {
        &self.daily
    }

    pub fn hourly(&self) -> &[HourlySelection] {
        &self.hourly
    }

    /// User-facing message of the most recent failure, if any.
    pub fn error_message(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn recent_searches(&self) -> &[String] {
        self.history.entries()
    }

    /// Remove one recent search (exact match).
    pub fn remove_recent(&mut self, city: &str) {
        self.history.remove(city);
    }
}
