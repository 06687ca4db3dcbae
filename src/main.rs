//! Terminal front-end for Clima.
//!
//! All business logic lives in the library crates; this binary only wires
//! the collaborators together and renders text.

use anyhow::Result;
use std::io::{self, BufRead, Write};
use std::sync::Arc;

use clima_app::{
    load_theme, save_theme, select_provider, SearchHistory, Theme, ViewState, WeatherView,
};
use clima_core::{Config, FileStore};
use clima_weather::{WeatherClient, WeatherIcon, DEFAULT_BASE_URL};

#[tokio::main]
async fn main() -> Result<()> {
    clima_core::init()?;

    let (config, _validation) = Config::load_validated()?;
    let store = Arc::new(FileStore::new(config.config_dir.join("state")));
    let mut theme = load_theme(store.as_ref(), config.ui.dark_mode);

    let client = WeatherClient::new(DEFAULT_BASE_URL, &config.api.api_key, &config.api.lang)?;
    let locator = select_provider(&config);
    let history = SearchHistory::load(store.clone());
    let mut view = WeatherView::new(client, locator, history);

    tracing::info!("Clima started");
    println!("Clima - Consulta del Clima");
    print_help();

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("> ");
        io::stdout().flush()?;
        let Some(line) = lines.next() else { break };
        let input = line?;
        let input = input.trim();

        match input {
            "" => continue,
            ":q" | ":quit" => break,
            ":help" => {
                print_help();
                continue;
            }
            ":theme" => {
                theme = theme.toggled();
                save_theme(store.as_ref(), theme);
                println!(
                    "Theme: {}",
                    if theme == Theme::Dark { "dark" } else { "light" }
                );
                continue;
            }
            ":recent" => {
                if view.recent_searches().is_empty() {
                    println!("No recent searches.");
                } else {
                    for city in view.recent_searches() {
                        println!("  {}", city);
                    }
                }
                continue;
            }
            ":loc" => {
                let _ = view.locate().await;
            }
            other if other.starts_with(":rm ") => {
                view.remove_recent(other.trim_start_matches(":rm ").trim());
                continue;
            }
            city => {
                let _ = view.search(city).await;
            }
        }

        render(&view);
    }

    Ok(())
}

fn print_help() {
    println!("Type a city name to search, or:");
    println!("  :loc        weather at your location");
    println!("  :recent     recent searches");
    println!("  :rm <city>  remove a recent search");
    println!("  :theme      toggle light/dark");
    println!("  :q          quit");
}

fn render(view: &WeatherView) {
    if let Some(message) = view.error_message() {
        println!("! {}", message);
    }
    if view.state() != ViewState::Success {
        return;
    }

    if let Some(current) = view.current() {
        let condition = current.condition();
        let icon = WeatherIcon::from_condition(&condition.main);
        let country = current.sys.country.as_deref().unwrap_or("");
        println!();
        println!("{} {}, {}", icon.glyph(), current.name, country);
        println!(
            "  {:.0}°C (feels like {:.0}°C)  {}",
            current.main.temp, current.main.feels_like, condition.description
        );
        println!(
            "  humidity {}%  pressure {} hPa",
            current.main.humidity, current.main.pressure
        );
        if let Some(wind) = &current.wind {
            match wind.deg {
                Some(deg) => println!("  wind {:.1} m/s @ {:.0}°", wind.speed, deg),
                None => println!("  wind {:.1} m/s", wind.speed),
            }
        }
    }

    if !view.daily().is_empty() {
        println!();
        println!("5-day forecast:");
        for bucket in view.daily() {
            let icon = WeatherIcon::from_condition(&bucket.condition.main);
            println!(
                "  {} {} {:>3.0}° / {:<3.0}° {}",
                bucket.date.format("%a %d"),
                icon.glyph(),
                bucket.max_temp,
                bucket.min_temp,
                bucket.condition.description
            );
        }
    }

    if !view.hourly().is_empty() {
        println!();
        println!("By hour:");
        let line: Vec<String> = view
            .hourly()
            .iter()
            .map(|sel| {
                format!(
                    "{:02}:00 {:.0}°",
                    sel.target_hour % 24,
                    sel.sample.main.temp
                )
            })
            .collect();
        println!("  {}", line.join("  "));
    }
    println!();
}
