use std::sync::Arc;

use anyhow::{Context, anyhow};
use chrono::{Datelike, Local, Utc};
use clap::{Args, Parser, Subcommand};
use weather_core::{
    Config, ConfiguredLocation, Coordinates, FileStore, Geolocator, KeyValueStore, LocationQuery,
    OpenWeatherProvider, ProviderError, RecencyList, UnitPreference, Units, WeatherProvider,
    build_month_grid, fetch_current_for_cities,
    storage::{FAVORITES_KEY, HISTORY_KEY},
    to_daily_series, to_hourly_series, to_monthly_series,
};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Weather CLI")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Where to look up the weather. Without a city or coordinates the configured
/// home location is used.
#[derive(Debug, Args)]
pub struct Place {
    /// City name, e.g. "Lviv" or "Paris,FR".
    pub city: Option<String>,

    #[arg(long, requires = "lon", allow_hyphen_values = true)]
    pub lat: Option<f64>,

    #[arg(long, requires = "lat", allow_hyphen_values = true)]
    pub lon: Option<f64>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key.
    Configure {
        /// Skip the prompt and use this key.
        #[arg(long)]
        api_key: Option<String>,
    },

    /// Current conditions.
    Now(Place),

    /// Five-day and next-24-hours forecast.
    Forecast(Place),

    /// Month calendar from the 30-day climate forecast.
    Month {
        #[command(flatten)]
        place: Place,

        #[arg(long)]
        year: Option<i32>,

        /// 1-12; defaults to the current month.
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=12))]
        month: Option<u32>,
    },

    /// City name suggestions for partial input.
    Suggest { text: String },

    /// Recent searches.
    History {
        #[command(subcommand)]
        action: Option<HistoryAction>,
    },

    /// Favorite cities.
    Favorites {
        #[command(subcommand)]
        action: Option<FavoritesAction>,
    },

    /// Show or set the display units.
    Units { units: Option<String> },
}

#[derive(Debug, Subcommand)]
pub enum HistoryAction {
    List,
    Clear,
}

#[derive(Debug, Subcommand)]
pub enum FavoritesAction {
    List,
    Add { city: String },
    Remove { city: String },
    Toggle { city: String },
    Clear,
    /// Current conditions for every favorite.
    Weather,
}

/// Config plus the persisted lists, loaded once per invocation.
struct App {
    config: Config,
    store: Arc<dyn KeyValueStore>,
    history: RecencyList,
    favorites: RecencyList,
}

impl App {
    fn load() -> anyhow::Result<Self> {
        let config = Config::load()?;
        let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::new(Config::data_dir()?));
        let limit = config.recency.limit;

        Ok(Self {
            history: RecencyList::new(store.clone(), HISTORY_KEY, limit),
            favorites: RecencyList::new(store.clone(), FAVORITES_KEY, limit),
            store,
            config,
        })
    }

    fn provider(&self) -> anyhow::Result<OpenWeatherProvider> {
        let settings = self.config.provider_settings()?;
        OpenWeatherProvider::new(settings).map_err(surface)
    }

    async fn units(&self) -> Units {
        UnitPreference::load(self.store.as_ref()).await
    }

    async fn resolve(&self, place: Place) -> anyhow::Result<LocationQuery> {
        if let Some(city) = place.city {
            return Ok(LocationQuery::City(city));
        }
        if let (Some(lat), Some(lon)) = (place.lat, place.lon) {
            return Ok(LocationQuery::Coords(Coordinates { lat, lon }));
        }

        let coords = ConfiguredLocation::new(self.config.home).locate().await.map_err(|e| {
            anyhow!("{e}.\nHint: pass a city name, or set [home] lat/lon in the config file.")
        })?;
        Ok(LocationQuery::Coords(coords))
    }

    /// Searches by name end up in the history once they succeed.
    async fn record_search(&self, query: &LocationQuery) {
        if let LocationQuery::City(city) = query {
            self.history.add(city).await;
        }
    }
}

/// Turns a provider failure into the one-line message shown to the user.
fn surface(e: ProviderError) -> anyhow::Error {
    tracing::debug!("Provider error: {e}");
    anyhow!(e.user_message())
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let app = App::load()?;

        match self.command {
            Command::Configure { api_key } => configure(app.config, api_key)?,
            Command::Now(place) => {
                let query = app.resolve(place).await?;
                let current = app.provider()?.current(&query).await.map_err(surface)?;
                app.record_search(&query).await;
                print!("{}", render::current(&current, app.units().await));
            }
            Command::Forecast(place) => {
                let query = app.resolve(place).await?;
                let forecast = app.provider()?.forecast(&query).await.map_err(surface)?;
                app.record_search(&query).await;

                let units = app.units().await;
                let tz = forecast.location.utc_offset();
                let daily = to_daily_series(&forecast.samples, &tz);
                let hourly = to_hourly_series(&forecast.samples, Utc::now().timestamp());

                println!("{}", forecast.location.display_name());
                println!("\nNext 5 days");
                print!("{}", render::daily(&daily, &tz, units));
                println!("\nNext 24 hours");
                print!("{}", render::hourly(&hourly, &tz, units));
            }
            Command::Month { place, year, month } => {
                let query = app.resolve(place).await?;
                let climate = app.provider()?.climate(&query).await.map_err(surface)?;
                app.record_search(&query).await;

                let today = Local::now().date_naive();
                let year = year.unwrap_or(today.year());
                let month0 = month.map(|m| m - 1).unwrap_or(today.month0());

                let tz = climate.location.utc_offset();
                let monthly = to_monthly_series(climate.list.as_deref());
                let cells = build_month_grid(year, month0, &monthly, &tz);
                let title =
                    format!("{} {}-{:02}", climate.location.display_name(), year, month0 + 1);
                print!("{}", render::month_grid(&title, &cells, app.units().await));
            }
            Command::Suggest { text } => {
                let items = app.provider()?.suggest(&text).await.map_err(surface)?;
                if items.is_empty() {
                    println!("No matches for '{text}'.");
                } else {
                    print!("{}", render::suggestions(&items));
                }
            }
            Command::History { action } => match action.unwrap_or(HistoryAction::List) {
                HistoryAction::List => {
                    print!("{}", render::list("Recent searches", &app.history.get_all().await));
                }
                HistoryAction::Clear => {
                    app.history.clear().await;
                    println!("Search history cleared.");
                }
            },
            Command::Favorites { action } => {
                favorites(&app, action.unwrap_or(FavoritesAction::List)).await?;
            }
            Command::Units { units } => match units {
                Some(value) => {
                    let units = Units::try_from(value.as_str())?;
                    UnitPreference::save(app.store.as_ref(), units).await;
                    println!("Units set to {units}.");
                }
                None => println!("{}", app.units().await),
            },
        }

        Ok(())
    }
}

fn configure(mut config: Config, api_key: Option<String>) -> anyhow::Result<()> {
    let api_key = match api_key {
        Some(key) => key,
        None => inquire::Password::new("OpenWeather API key:")
            .without_confirmation()
            .with_display_mode(inquire::PasswordDisplayMode::Masked)
            .prompt()
            .context("Failed to read API key")?,
    };

    config.set_api_key(api_key);
    if !config.is_configured() {
        return Err(anyhow!("API key must not be empty."));
    }
    config.save()?;

    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}

/// Trimmed city name, or an error when nothing would be stored.
fn favorite_name(input: &str) -> anyhow::Result<&str> {
    let city = input.trim();
    if city.is_empty() {
        return Err(anyhow!("City name must not be empty."));
    }
    Ok(city)
}

async fn favorites(app: &App, action: FavoritesAction) -> anyhow::Result<()> {
    match action {
        FavoritesAction::List => {
            print!("{}", render::list("Favorites", &app.favorites.get_all().await));
        }
        FavoritesAction::Add { city } => {
            let city = favorite_name(&city)?;
            app.favorites.add(city).await;
            println!("Added '{city}' to favorites.");
        }
        FavoritesAction::Remove { city } => {
            app.favorites.remove(&city).await;
            println!("Removed '{city}' from favorites.");
        }
        FavoritesAction::Toggle { city } => {
            let city = favorite_name(&city)?;
            if app.favorites.toggle(city).await {
                println!("Added '{city}' to favorites.");
            } else {
                println!("Removed '{city}' from favorites.");
            }
        }
        FavoritesAction::Clear => {
            app.favorites.clear().await;
            println!("Favorites cleared.");
        }
        FavoritesAction::Weather => {
            let cities = app.favorites.get_all().await;
            if cities.is_empty() {
                println!("No favorites yet. Add one with `weather favorites add <city>`.");
                return Ok(());
            }

            let provider = app.provider()?;
            let units = app.units().await;
            let results =
                fetch_current_for_cities(&provider, &cities, app.config.favorites_delay()).await;

            for (city, result) in results {
                match result {
                    Ok(current) => print!("{}", render::current(&current, units)),
                    Err(e) => println!("{city}\n  {}", e.user_message()),
                }
            }
        }
    }

    Ok(())
}
