//! Persisted light/dark theme preference.

use clima_core::KeyValueStore;

/// Storage key for the theme flag.
pub const THEME_KEY: &str = "weather-app-theme";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }
}

/// Load the persisted theme; `default_dark` applies when nothing is stored
/// (the config-level system preference).
pub fn load_theme(store: &dyn KeyValueStore, default_dark: bool) -> Theme {
    let fallback = if default_dark { Theme::Dark } else { Theme::Light };
    match store.get(THEME_KEY) {
        Ok(Some(value)) => match value.as_str() {
            "dark" => Theme::Dark,
            "light" => Theme::Light,
            other => {
                tracing::warn!("Unknown theme value {:?}, using default", other);
                fallback
            }
        },
        Ok(None) => fallback,
        Err(e) => {
            tracing::warn!("Could not read theme preference: {:#}", e);
            fallback
        }
    }
}

/// Persist the theme; fire-and-forget like the rest of the small app state.
pub fn save_theme(store: &dyn KeyValueStore, theme: Theme) {
    if let Err(e) = store.set(THEME_KEY, theme.as_str()) {
        tracing::warn!("Could not persist theme preference: {:#}", e);
    }
}
