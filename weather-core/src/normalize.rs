//! Derives display series from the raw provider feeds.
//!
//! The 3-hour forecast feed becomes a per-day series (one sample nearest local
//! noon) and a pseudo-hourly series (linear interpolation), and the climate feed
//! becomes a 30-day series with defaults applied once here.
//!
//! Everything in this module is pure: no I/O, no panics on empty or sparse input.

use chrono::{DateTime, NaiveDate, TimeZone, Timelike, Utc};

use crate::model::{Condition, RawClimateSample, WeatherSample};

pub const DAILY_LIMIT: usize = 5;
pub const HOURLY_LIMIT: usize = 24;
pub const MONTHLY_LIMIT: usize = 30;

/// Raw entries consumed by the hourly series; 8 x 3h covers a day.
const HOURLY_SOURCE_ENTRIES: usize = 8;
const SECONDS_PER_HOUR: i64 = 3600;
const NOON: i64 = 12;

/// Local date and hour of a timestamp in `tz`.
pub(crate) fn local_date_hour<Tz: TimeZone>(timestamp: i64, tz: &Tz) -> Option<(NaiveDate, u32)> {
    let utc = DateTime::<Utc>::from_timestamp(timestamp, 0)?;
    let local = utc.with_timezone(tz).naive_local();
    Some((local.date(), local.hour()))
}

/// One sample per local calendar day, nearest to noon, first five days.
///
/// Ties between two samples equally far from noon keep the earlier one. The
/// precipitation probability of each picked sample is then replaced by that of
/// the first raw sample sharing its date.
pub fn to_daily_series<Tz: TimeZone>(raw: &[WeatherSample], tz: &Tz) -> Vec<WeatherSample> {
    // (date, distance from noon, sample)
    let mut days: Vec<(NaiveDate, i64, &WeatherSample)> = Vec::new();

    for sample in raw {
        let Some((date, hour)) = local_date_hour(sample.timestamp, tz) else {
            continue;
        };
        let distance = (i64::from(hour) - NOON).abs();

        match days.iter_mut().find(|(d, _, _)| *d == date) {
            Some(entry) if distance < entry.1 => {
                entry.1 = distance;
                entry.2 = sample;
            }
            Some(_) => {}
            None => days.push((date, distance, sample)),
        }
    }

    days.into_iter()
        .take(DAILY_LIMIT)
        .map(|(date, _, picked)| {
            let mut out = picked.clone();
            let first_of_day = raw
                .iter()
                .find(|s| local_date_hour(s.timestamp, tz).map(|(d, _)| d) == Some(date));
            if let Some(first) = first_of_day {
                out.precipitation_probability = first.precipitation_probability;
            }
            out
        })
        .collect()
}

/// Hourly points for the next 24 hours, interpolated from the 3-hour feed.
///
/// Only entries at or after `now` are used, at most eight of them. Between two
/// consecutive entries the temperature is linear; condition, precipitation and
/// humidity switch from the earlier to the later entry at the midpoint. Output
/// timestamps are strictly increasing; entries that would break that are dropped.
pub fn to_hourly_series(raw: &[WeatherSample], now: i64) -> Vec<WeatherSample> {
    let upcoming: Vec<&WeatherSample> = raw
        .iter()
        .filter(|s| s.timestamp >= now)
        .take(HOURLY_SOURCE_ENTRIES)
        .collect();

    let mut out: Vec<WeatherSample> = Vec::with_capacity(HOURLY_LIMIT);

    for (i, current) in upcoming.iter().enumerate() {
        push_monotonic(&mut out, (*current).clone());

        let Some(next) = upcoming.get(i + 1) else {
            break;
        };
        // Overflowing gaps are treated like out-of-order ones.
        let hours_between = next
            .timestamp
            .checked_sub(current.timestamp)
            .map_or(0, |gap| gap / SECONDS_PER_HOUR);
        if hours_between <= 0 {
            continue;
        }

        let room = HOURLY_LIMIT.saturating_sub(out.len());
        for h in (1..hours_between).take(room) {
            let ratio = h as f64 / hours_between as f64;
            let nearest = if ratio >= 0.5 { *next } else { *current };

            let mut point = WeatherSample::new(
                current.timestamp + h * SECONDS_PER_HOUR,
                current.temperature + ratio * (next.temperature - current.temperature),
            );
            point.condition = nearest.condition.clone();
            point.precipitation_probability = nearest.precipitation_probability;
            point.humidity = nearest.humidity;
            push_monotonic(&mut out, point);
        }

        if out.len() >= HOURLY_LIMIT {
            break;
        }
    }

    out.truncate(HOURLY_LIMIT);
    out
}

fn push_monotonic(out: &mut Vec<WeatherSample>, sample: WeatherSample) {
    if out.last().is_none_or(|last| sample.timestamp > last.timestamp) {
        out.push(sample);
    }
}

/// Normalizes the 30-day climate feed. `None` (absent or non-list upstream)
/// yields an empty series.
pub fn to_monthly_series(raw: Option<&[RawClimateSample]>) -> Vec<WeatherSample> {
    let Some(raw) = raw else {
        return Vec::new();
    };

    raw.iter().take(MONTHLY_LIMIT).map(climate_sample).collect()
}

fn climate_sample(raw: &RawClimateSample) -> WeatherSample {
    let temp = raw.temp.clone().unwrap_or_default();
    let condition = raw
        .weather
        .as_deref()
        .and_then(<[_]>::first)
        .map(Condition::from);

    WeatherSample {
        timestamp: raw.dt,
        temperature: temp.average.or(temp.day).unwrap_or_default(),
        temperature_min: temp.min,
        temperature_max: temp.max,
        condition,
        precipitation_probability: 0.0,
        precipitation_mm: Some(raw.precipitation.unwrap_or_default()),
        humidity: Some(raw.humidity.unwrap_or_default()),
    }
}
