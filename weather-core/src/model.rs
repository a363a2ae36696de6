use chrono::{FixedOffset, Offset, Utc};
use serde::{Deserialize, Serialize};

/// One point-in-time observation or forecast entry.
///
/// Temperatures are always degrees Celsius; conversion for display happens in the
/// front end via [`Units`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSample {
    /// Seconds since the Unix epoch, UTC.
    pub timestamp: i64,
    pub temperature: f64,
    pub temperature_min: Option<f64>,
    pub temperature_max: Option<f64>,
    /// `None` means the provider supplied no condition data for this sample.
    pub condition: Option<Condition>,
    /// Fraction in `[0, 1]`.
    pub precipitation_probability: f64,
    pub precipitation_mm: Option<f64>,
    pub humidity: Option<u8>,
}

impl WeatherSample {
    /// Minimal sample with no optional data, handy for building series by hand.
    pub fn new(timestamp: i64, temperature: f64) -> Self {
        Self {
            timestamp,
            temperature,
            temperature_min: None,
            temperature_max: None,
            condition: None,
            precipitation_probability: 0.0,
            precipitation_mm: None,
            humidity: None,
        }
    }

    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.condition = Some(condition);
        self
    }

    pub fn with_precipitation_probability(mut self, pop: f64) -> Self {
        self.precipitation_probability = pop;
        self
    }

    pub fn phenomenon(&self) -> Option<Phenomenon> {
        self.condition.as_ref().map(Condition::phenomenon)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Condition {
    pub code: u16,
    pub description: String,
    pub icon: Option<String>,
}

impl Condition {
    pub fn new(code: u16, description: impl Into<String>) -> Self {
        Self { code, description: description.into(), icon: None }
    }

    pub fn phenomenon(&self) -> Phenomenon {
        Phenomenon::from_code(self.code)
    }
}

/// Weather phenomenon classified from a provider condition code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phenomenon {
    Thunderstorm,
    Drizzle,
    Rain,
    Snow,
    Atmosphere,
    Clear,
    PartlyCloudy,
    Overcast,
    Unknown,
}

impl Phenomenon {
    /// See: https://openweathermap.org/weather-conditions
    pub fn from_code(code: u16) -> Self {
        match code {
            200..=299 => Self::Thunderstorm,
            300..=399 => Self::Drizzle,
            500..=599 => Self::Rain,
            600..=699 => Self::Snow,
            700..=799 => Self::Atmosphere,
            800 => Self::Clear,
            801..=802 => Self::PartlyCloudy,
            803..=804 => Self::Overcast,
            _ => Self::Unknown,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Thunderstorm => "Thunderstorm",
            Self::Drizzle => "Drizzle",
            Self::Rain => "Rain",
            Self::Snow => "Snow",
            Self::Atmosphere => "Fog",
            Self::Clear => "Clear",
            Self::PartlyCloudy => "Partly cloudy",
            Self::Overcast => "Overcast",
            Self::Unknown => "Unknown",
        }
    }
}

/// Temperature block of a climate-feed entry. Every field is optional upstream.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawClimateTemp {
    pub average: Option<f64>,
    pub day: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawCondition {
    pub id: u16,
    #[serde(default)]
    pub description: String,
    pub icon: Option<String>,
}

impl From<&RawCondition> for Condition {
    fn from(raw: &RawCondition) -> Self {
        Self { code: raw.id, description: raw.description.clone(), icon: raw.icon.clone() }
    }
}

/// One day of the 30-day climate feed, as received.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawClimateSample {
    pub dt: i64,
    #[serde(default)]
    pub temp: Option<RawClimateTemp>,
    #[serde(default)]
    pub humidity: Option<u8>,
    #[serde(default, alias = "rain")]
    pub precipitation: Option<f64>,
    #[serde(default)]
    pub weather: Option<Vec<RawCondition>>,
}

/// A cell of the month-view calendar grid.
#[derive(Debug, Clone, PartialEq)]
pub enum DayCell {
    /// Leading padding before day 1.
    Empty,
    Day {
        day: u32,
        /// Local midnight of this date.
        timestamp: i64,
        forecast: Option<WeatherSample>,
    },
}

impl DayCell {
    pub fn is_empty(&self) -> bool {
        matches!(self, DayCell::Empty)
    }

    pub fn day(&self) -> Option<u32> {
        match self {
            DayCell::Empty => None,
            DayCell::Day { day, .. } => Some(*day),
        }
    }

    pub fn forecast(&self) -> Option<&WeatherSample> {
        match self {
            DayCell::Empty => None,
            DayCell::Day { forecast, .. } => forecast.as_ref(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LocationQuery {
    City(String),
    Coords(Coordinates),
}

impl LocationQuery {
    /// Query parameters understood by the provider.
    pub fn query_params(&self) -> Vec<(&'static str, String)> {
        match self {
            LocationQuery::City(name) => vec![("q", name.trim().to_string())],
            LocationQuery::Coords(c) => vec![("lat", c.lat.to_string()), ("lon", c.lon.to_string())],
        }
    }
}

impl std::fmt::Display for LocationQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LocationQuery::City(name) => f.write_str(name),
            LocationQuery::Coords(c) => write!(f, "{:.4}, {:.4}", c.lat, c.lon),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationInfo {
    pub name: String,
    pub country: Option<String>,
    /// Shift in seconds from UTC for the location.
    pub utc_offset_secs: i32,
}

impl LocationInfo {
    pub fn display_name(&self) -> String {
        match &self.country {
            Some(country) if !country.is_empty() => format!("{}, {}", self.name, country),
            _ => self.name.clone(),
        }
    }

    /// Falls back to UTC when the provider sent an out-of-range offset.
    pub fn utc_offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.utc_offset_secs).unwrap_or_else(|| Utc.fix())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentWeather {
    pub location: LocationInfo,
    pub sample: WeatherSample,
    pub feels_like: f64,
    pub wind_speed_mps: f64,
}

/// Location plus the raw 3-hour forecast feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    pub location: LocationInfo,
    pub samples: Vec<WeatherSample>,
}

/// Location plus the raw 30-day climate feed. `list` is `None` when the provider
/// sent no usable list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClimateForecast {
    pub location: LocationInfo,
    pub list: Option<Vec<RawClimateSample>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CitySuggestion {
    pub name: String,
    pub country: String,
    pub state: Option<String>,
    pub coordinates: Coordinates,
}

impl CitySuggestion {
    pub fn label(&self) -> String {
        match &self.state {
            Some(state) => format!("{}, {}, {}", self.name, state, self.country),
            None => format!("{}, {}", self.name, self.country),
        }
    }
}

/// Display unit system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    #[default]
    Metric,
    Imperial,
}

impl Units {
    pub fn as_str(&self) -> &'static str {
        match self {
            Units::Metric => "metric",
            Units::Imperial => "imperial",
        }
    }

    pub fn temperature(&self, celsius: f64) -> f64 {
        match self {
            Units::Metric => celsius,
            Units::Imperial => celsius * 9.0 / 5.0 + 32.0,
        }
    }

    pub fn temperature_symbol(&self) -> &'static str {
        match self {
            Units::Metric => "°C",
            Units::Imperial => "°F",
        }
    }

    pub fn speed(&self, mps: f64) -> f64 {
        match self {
            Units::Metric => mps,
            Units::Imperial => mps * 2.236_936,
        }
    }

    pub fn speed_symbol(&self) -> &'static str {
        match self {
            Units::Metric => "m/s",
            Units::Imperial => "mph",
        }
    }
}

impl std::fmt::Display for Units {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Units {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_lowercase().as_str() {
            "metric" | "c" | "celsius" => Ok(Units::Metric),
            "imperial" | "f" | "fahrenheit" => Ok(Units::Imperial),
            _ => Err(anyhow::anyhow!(
                "Unknown unit system '{value}'. Supported: metric, imperial."
            )),
        }
    }
}
