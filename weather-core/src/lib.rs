//! Core library for the `weather` CLI.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The OpenWeather client behind the [`WeatherProvider`] trait
//! - Forecast normalization (daily, hourly, monthly series) and the month grid
//! - Persisted search history, favorites and unit preference
//!
//! It is used by `weather-cli`, but can also be reused by other binaries or services.

pub mod calendar;
pub mod config;
pub mod error;
pub mod location;
pub mod model;
pub mod normalize;
pub mod preferences;
pub mod provider;
pub mod recency;
pub mod storage;

pub use calendar::build_month_grid;
pub use config::{Config, Endpoints, ProviderSettings};
pub use error::{LocationError, ProviderError};
pub use location::{ConfiguredLocation, Geolocator};
pub use model::{
    CitySuggestion, ClimateForecast, Condition, Coordinates, CurrentWeather, DayCell, Forecast,
    LocationInfo, LocationQuery, Phenomenon, RawClimateSample, Units, WeatherSample,
};
pub use normalize::{to_daily_series, to_hourly_series, to_monthly_series};
pub use preferences::UnitPreference;
pub use provider::{OpenWeatherProvider, WeatherProvider, fetch_current_for_cities};
pub use recency::RecencyList;
pub use storage::{FileStore, KeyValueStore, MemoryStore};
