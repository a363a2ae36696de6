//! Plain-text rendering of weather data.

use chrono::{DateTime, FixedOffset, Utc};
use std::fmt::Write;
use weather_core::{CitySuggestion, CurrentWeather, DayCell, Units, WeatherSample};

/// Shown wherever a sample carries no condition data.
const NO_CONDITION: &str = "—";

fn local(ts: i64, tz: &FixedOffset) -> Option<DateTime<FixedOffset>> {
    DateTime::<Utc>::from_timestamp(ts, 0).map(|dt| dt.with_timezone(tz))
}

fn format_time(ts: i64, tz: &FixedOffset, fmt: &str) -> String {
    local(ts, tz).map(|dt| dt.format(fmt).to_string()).unwrap_or_else(|| "?".to_string())
}

fn temp(units: Units, celsius: f64) -> String {
    format!("{:.0}{}", units.temperature(celsius), units.temperature_symbol())
}

fn condition(sample: &WeatherSample) -> &str {
    sample.condition.as_ref().map(|c| c.description.as_str()).unwrap_or(NO_CONDITION)
}

fn percent(fraction: f64) -> String {
    format!("{:.0}%", (fraction * 100.0).clamp(0.0, 100.0))
}

pub fn current(weather: &CurrentWeather, units: Units) -> String {
    let tz = weather.location.utc_offset();
    let s = &weather.sample;
    let mut out = String::new();

    let _ = writeln!(out, "{}", weather.location.display_name());
    let headline = match s.phenomenon() {
        Some(p) => format!("{} ({})", p.label(), condition(s)),
        None => NO_CONDITION.to_string(),
    };
    let _ = writeln!(out, "  {}  {headline}", temp(units, s.temperature));
    let _ = writeln!(out, "  Feels like {}", temp(units, weather.feels_like));
    if let Some(h) = s.humidity {
        let _ = writeln!(out, "  Humidity   {h}%");
    }
    let _ = writeln!(
        out,
        "  Wind       {:.1} {}",
        units.speed(weather.wind_speed_mps),
        units.speed_symbol()
    );
    let _ = writeln!(out, "  Updated    {}", format_time(s.timestamp, &tz, "%H:%M"));
    out
}

pub fn daily(series: &[WeatherSample], tz: &FixedOffset, units: Units) -> String {
    let mut out = String::new();
    for s in series {
        let range = match (s.temperature_min, s.temperature_max) {
            (Some(lo), Some(hi)) => format!("{} / {}", temp(units, lo), temp(units, hi)),
            _ => temp(units, s.temperature),
        };
        let _ = writeln!(
            out,
            "  {:<10} {:<14} {:>4}  {}",
            format_time(s.timestamp, tz, "%a %d %b"),
            range,
            percent(s.precipitation_probability),
            condition(s)
        );
    }
    out
}

pub fn hourly(series: &[WeatherSample], tz: &FixedOffset, units: Units) -> String {
    let mut out = String::new();
    for s in series {
        let _ = writeln!(
            out,
            "  {}  {:>6}  {:>4}  {}",
            format_time(s.timestamp, tz, "%H:%M"),
            temp(units, s.temperature),
            percent(s.precipitation_probability),
            condition(s)
        );
    }
    out
}

/// Seven columns, Sunday first; each day shows its temperature or a placeholder.
pub fn month_grid(title: &str, cells: &[DayCell], units: Units) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{title}");
    let _ = writeln!(out, "  Sun     Mon     Tue     Wed     Thu     Fri     Sat");

    for week in cells.chunks(7) {
        let line: Vec<String> = week
            .iter()
            .map(|cell| match cell {
                DayCell::Empty => " ".repeat(7),
                DayCell::Day { day, forecast, .. } => {
                    let t = forecast
                        .as_ref()
                        .map(|s| format!("{:.0}", units.temperature(s.temperature)))
                        .unwrap_or_else(|| "·".to_string());
                    format!("{day:>2} {t:>4}")
                }
            })
            .collect();
        let _ = writeln!(out, "  {}", line.join(" "));
    }
    out
}

pub fn suggestions(items: &[CitySuggestion]) -> String {
    let mut out = String::new();
    for item in items {
        let _ = writeln!(
            out,
            "  {}  ({:.2}, {:.2})",
            item.label(),
            item.coordinates.lat,
            item.coordinates.lon
        );
    }
    out
}

pub fn list(title: &str, entries: &[String]) -> String {
    if entries.is_empty() {
        return format!("{title}: (empty)\n");
    }
    let mut out = format!("{title}:\n");
    for (i, entry) in entries.iter().enumerate() {
        let _ = writeln!(out, "  {}. {entry}", i + 1);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use weather_core::{Condition, build_month_grid};

    fn utc() -> FixedOffset {
        FixedOffset::east_opt(0).unwrap()
    }

    #[test]
    fn missing_condition_uses_placeholder() {
        let out = hourly(&[WeatherSample::new(0, 20.0)], &utc(), Units::Metric);
        assert!(out.contains("00:00"));
        assert!(out.contains("20°C"));
        assert!(out.contains(NO_CONDITION));
    }

    #[test]
    fn daily_shows_range_and_precipitation() {
        let mut s = WeatherSample::new(0, 20.0)
            .with_condition(Condition::new(500, "light rain"))
            .with_precipitation_probability(0.4);
        s.temperature_min = Some(15.0);
        s.temperature_max = Some(25.0);

        let out = daily(&[s], &utc(), Units::Imperial);
        assert!(out.contains("59°F / 77°F"));
        assert!(out.contains("40%"));
        assert!(out.contains("light rain"));
    }

    #[test]
    fn month_grid_has_a_row_per_week() {
        let cells = build_month_grid(2024, 1, &[], &utc());
        let out = month_grid("February 2024", &cells, Units::Metric);

        // Title, header and five weeks.
        assert_eq!(out.lines().count(), 7);
        assert!(out.contains("29    ·"));
    }

    #[test]
    fn current_shows_phenomenon_and_units() {
        let weather = CurrentWeather {
            location: weather_core::LocationInfo {
                name: "Oslo".into(),
                country: Some("NO".into()),
                utc_offset_secs: 3600,
            },
            sample: WeatherSample::new(0, -2.0).with_condition(Condition::new(601, "snow")),
            feels_like: -6.0,
            wind_speed_mps: 10.0,
        };
        let out = current(&weather, Units::Metric);

        assert!(out.starts_with("Oslo, NO\n"));
        assert!(out.contains("-2°C  Snow (snow)"));
        assert!(out.contains("10.0 m/s"));
        assert!(out.contains("Updated    01:00"));
    }

    #[test]
    fn empty_list_says_so() {
        assert_eq!(list("History", &[]), "History: (empty)\n");
        assert!(list("History", &["Paris".to_string()]).contains("1. Paris"));
    }
}
