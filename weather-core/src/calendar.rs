//! Month-view grid assembly.

use chrono::{Datelike, NaiveDate, TimeZone};

use crate::model::{DayCell, WeatherSample};
use crate::normalize::local_date_hour;

/// Builds the cells for one month: leading blanks up to the weekday of the 1st
/// (Sunday first), then one cell per day carrying the matching `monthly` entry.
///
/// `month0` is zero-based (January = 0). An invalid year/month yields no cells.
pub fn build_month_grid<Tz: TimeZone>(
    year: i32,
    month0: u32,
    monthly: &[WeatherSample],
    tz: &Tz,
) -> Vec<DayCell> {
    let Some(first) = month0.checked_add(1).and_then(|m| NaiveDate::from_ymd_opt(year, m, 1)) else {
        return Vec::new();
    };
    let Some(days_in_month) = days_in_month(first) else {
        return Vec::new();
    };

    let leading = first.weekday().num_days_from_sunday() as usize;
    let mut cells = Vec::with_capacity(leading + days_in_month as usize);
    cells.extend(std::iter::repeat_n(DayCell::Empty, leading));

    for date in first.iter_days().take(days_in_month as usize) {
        let forecast = monthly
            .iter()
            .find(|s| local_date_hour(s.timestamp, tz).map(|(d, _)| d) == Some(date))
            .cloned();

        cells.push(DayCell::Day { day: date.day(), timestamp: local_midnight(date, tz), forecast });
    }

    cells
}

/// Day 0 of the following month, i.e. the last day of this one.
fn days_in_month(first: NaiveDate) -> Option<u32> {
    let next = first.checked_add_months(chrono::Months::new(1))?;
    next.pred_opt().map(|last| last.day())
}

fn local_midnight<Tz: TimeZone>(date: NaiveDate, tz: &Tz) -> i64 {
    let midnight = date.and_time(chrono::NaiveTime::MIN);
    tz.from_local_datetime(&midnight)
        .earliest()
        .map(|dt| dt.timestamp())
        // Midnight skipped by a DST change: fall back to the UTC reading.
        .unwrap_or_else(|| midnight.and_utc().timestamp())
}
