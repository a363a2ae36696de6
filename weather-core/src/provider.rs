use async_trait::async_trait;
use std::{fmt::Debug, time::Duration};

use crate::{
    error::ProviderError,
    model::{CitySuggestion, ClimateForecast, CurrentWeather, Forecast, LocationQuery},
};

pub mod openweather;

pub use openweather::OpenWeatherProvider;

/// Maximum number of city suggestions returned for partial input.
pub const SUGGESTION_LIMIT: usize = 5;

/// Remote source of weather data. Failures are returned once; nothing is retried.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn current(&self, query: &LocationQuery) -> Result<CurrentWeather, ProviderError>;

    /// Raw 3-hour forecast feed, up to five days.
    async fn forecast(&self, query: &LocationQuery) -> Result<Forecast, ProviderError>;

    /// City suggestions for partial input, at most [`SUGGESTION_LIMIT`].
    async fn suggest(&self, text: &str) -> Result<Vec<CitySuggestion>, ProviderError>;

    /// Raw 30-day climate feed.
    async fn climate(&self, query: &LocationQuery) -> Result<ClimateForecast, ProviderError>;
}

/// Rejects blank city names before any request is made.
pub fn validate_query(query: &LocationQuery) -> Result<(), ProviderError> {
    match query {
        LocationQuery::City(name) if name.trim().is_empty() => {
            Err(ProviderError::InvalidQuery("city name is empty".to_string()))
        }
        _ => Ok(()),
    }
}

/// Fetches current conditions for each city in turn, pausing `delay` between
/// requests to stay under the provider's rate limit.
pub async fn fetch_current_for_cities(
    provider: &dyn WeatherProvider,
    cities: &[String],
    delay: Duration,
) -> Vec<(String, Result<CurrentWeather, ProviderError>)> {
    let mut results = Vec::with_capacity(cities.len());

    for (i, city) in cities.iter().enumerate() {
        if i > 0 && !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        let result = provider.current(&LocationQuery::City(city.clone())).await;
        if let Err(e) = &result {
            tracing::warn!(city = %city, "Failed to fetch current weather: {e}");
        }
        results.push((city.clone(), result));
    }

    results
}
