use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, de::DeserializeOwned};

use crate::{
    config::ProviderSettings,
    error::ProviderError,
    model::{
        CitySuggestion, ClimateForecast, Condition, Coordinates, CurrentWeather, Forecast,
        LocationInfo, LocationQuery, RawClimateSample, WeatherSample,
    },
    provider::{SUGGESTION_LIMIT, WeatherProvider, validate_query},
};

/// Days requested from the climate endpoint.
const CLIMATE_DAYS: &str = "30";

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    settings: ProviderSettings,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(settings: ProviderSettings) -> Result<Self, ProviderError> {
        let http = Client::builder().timeout(settings.timeout).build()?;
        Ok(Self { settings, http })
    }

    /// GET `url` with the API key and metric units appended, decoding the body as `T`.
    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        params: &[(&str, String)],
        what: &str,
    ) -> Result<T, ProviderError> {
        tracing::debug!(url, what, "Requesting OpenWeather");

        let res = self
            .http
            .get(url)
            .query(params)
            .query(&[("appid", self.settings.api_key.as_str()), ("units", "metric")])
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            tracing::debug!(what, %status, "OpenWeather request failed");
            return Err(ProviderError::from_status(status, &body));
        }

        Ok(serde_json::from_str(&body)?)
    }

    fn base_url(&self) -> &str {
        self.settings.endpoints.base_url.trim_end_matches('/')
    }

    fn climate_url(&self) -> &str {
        self.settings.endpoints.climate_url.trim_end_matches('/')
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn current(&self, query: &LocationQuery) -> Result<CurrentWeather, ProviderError> {
        validate_query(query)?;
        let url = format!("{}/data/2.5/weather", self.base_url());

        let parsed: OwCurrentResponse =
            self.get_json(&url, &query.query_params(), "current").await?;

        Ok(parsed.into())
    }

    async fn forecast(&self, query: &LocationQuery) -> Result<Forecast, ProviderError> {
        validate_query(query)?;
        let url = format!("{}/data/2.5/forecast", self.base_url());

        let parsed: OwForecastResponse =
            self.get_json(&url, &query.query_params(), "forecast").await?;

        Ok(Forecast {
            location: parsed.city.into(),
            samples: parsed.list.into_iter().map(WeatherSample::from).collect(),
        })
    }

    async fn suggest(&self, text: &str) -> Result<Vec<CitySuggestion>, ProviderError> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(Vec::new());
        }
        let url = format!("{}/geo/1.0/direct", self.base_url());
        let params = [("q", text.to_string()), ("limit", SUGGESTION_LIMIT.to_string())];

        let parsed: Vec<OwGeoEntry> = self.get_json(&url, &params, "geocoding").await?;

        Ok(parsed.into_iter().take(SUGGESTION_LIMIT).map(CitySuggestion::from).collect())
    }

    async fn climate(&self, query: &LocationQuery) -> Result<ClimateForecast, ProviderError> {
        validate_query(query)?;
        let url = format!("{}/data/2.5/forecast/climate", self.climate_url());
        let mut params = query.query_params();
        params.push(("cnt", CLIMATE_DAYS.to_string()));

        let parsed: OwClimateResponse = self.get_json(&url, &params, "climate").await?;

        let list = match parsed.list {
            serde_json::Value::Array(items) => Some(
                items
                    .into_iter()
                    .enumerate()
                    .filter_map(|(i, item)| {
                        serde_json::from_value::<RawClimateSample>(item)
                            .map_err(|e| tracing::warn!(index = i, "Skipping climate entry: {e}"))
                            .ok()
                    })
                    .collect(),
            ),
            _ => None,
        };

        Ok(ClimateForecast { location: parsed.city.into(), list })
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    feels_like: Option<f64>,
    temp_min: Option<f64>,
    temp_max: Option<f64>,
    humidity: Option<u8>,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    id: u16,
    #[serde(default)]
    description: String,
    icon: Option<String>,
}

impl From<&OwWeather> for Condition {
    fn from(w: &OwWeather) -> Self {
        Condition { code: w.id, description: w.description.clone(), icon: w.icon.clone() }
    }
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwSys {
    country: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OwRain {
    #[serde(rename = "1h")]
    one_hour: Option<f64>,
    #[serde(rename = "3h")]
    three_hours: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    dt: i64,
    main: OwMain,
    #[serde(default)]
    weather: Vec<OwWeather>,
    wind: Option<OwWind>,
    sys: Option<OwSys>,
    rain: Option<OwRain>,
    #[serde(default)]
    timezone: i32,
}

impl From<OwCurrentResponse> for CurrentWeather {
    fn from(parsed: OwCurrentResponse) -> Self {
        let sample = WeatherSample {
            timestamp: parsed.dt,
            temperature: parsed.main.temp,
            temperature_min: parsed.main.temp_min,
            temperature_max: parsed.main.temp_max,
            condition: parsed.weather.first().map(Condition::from),
            precipitation_probability: 0.0,
            precipitation_mm: parsed.rain.and_then(|r| r.one_hour),
            humidity: parsed.main.humidity,
        };

        CurrentWeather {
            location: LocationInfo {
                name: parsed.name,
                country: parsed.sys.and_then(|s| s.country),
                utc_offset_secs: parsed.timezone,
            },
            feels_like: parsed.main.feels_like.unwrap_or(parsed.main.temp),
            wind_speed_mps: parsed.wind.map(|w| w.speed).unwrap_or_default(),
            sample,
        }
    }
}

#[derive(Debug, Deserialize)]
struct OwCity {
    name: String,
    country: Option<String>,
    #[serde(default)]
    timezone: i32,
}

impl From<OwCity> for LocationInfo {
    fn from(city: OwCity) -> Self {
        LocationInfo { name: city.name, country: city.country, utc_offset_secs: city.timezone }
    }
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt: i64,
    main: OwMain,
    #[serde(default)]
    weather: Vec<OwWeather>,
    pop: Option<f64>,
    rain: Option<OwRain>,
}

impl From<OwForecastEntry> for WeatherSample {
    fn from(entry: OwForecastEntry) -> Self {
        WeatherSample {
            timestamp: entry.dt,
            temperature: entry.main.temp,
            temperature_min: entry.main.temp_min,
            temperature_max: entry.main.temp_max,
            condition: entry.weather.first().map(Condition::from),
            precipitation_probability: entry.pop.unwrap_or_default(),
            precipitation_mm: entry.rain.and_then(|r| r.three_hours),
            humidity: entry.main.humidity,
        }
    }
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    city: OwCity,
    #[serde(default)]
    list: Vec<OwForecastEntry>,
}

#[derive(Debug, Deserialize)]
struct OwClimateResponse {
    city: OwCity,
    #[serde(default)]
    list: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct OwGeoEntry {
    name: String,
    #[serde(default)]
    country: String,
    state: Option<String>,
    lat: f64,
    lon: f64,
}

impl From<OwGeoEntry> for CitySuggestion {
    fn from(e: OwGeoEntry) -> Self {
        CitySuggestion {
            name: e.name,
            country: e.country,
            state: e.state,
            coordinates: Coordinates { lat: e.lat, lon: e.lon },
        }
    }
}
