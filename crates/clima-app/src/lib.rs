//! Application layer for Clima
//!
//! Orchestrates searches and geolocation over the weather client, and owns
//! the small persisted state (recent searches, theme preference).

pub mod error;
pub mod history;
pub mod location;
pub mod theme;
pub mod view;

pub use error::AppError;
pub use history::{SearchHistory, MAX_RECENT_SEARCHES, RECENT_SEARCHES_KEY};
pub use location::{
    select_provider, Coordinates, FixedLocator, IpLocator, LocationError, LocationProvider,
    Permission, PositionOptions,
};
pub use theme::{load_theme, save_theme, Theme, THEME_KEY};
pub use view::{BusyKind, ViewState, WeatherView};
