//! Weather provider client for Clima
//!
//! Typed access to the provider's current-weather and 5-day/3-hour forecast
//! feeds, plus the aggregation that collapses forecast samples into daily
//! buckets and targeted-hour selections.

pub mod client;
pub mod forecast;
pub mod icons;
pub mod types;

pub use client::{Place, WeatherClient, DEFAULT_BASE_URL};
pub use forecast::{
    daily_buckets, hourly_selections, AggregateError, DailyBucket, HourlySelection,
    DEFAULT_TARGET_HOURS, MAX_DAILY_BUCKETS,
};
pub use icons::WeatherIcon;
pub use types::*;
