use serde::{Deserialize, Serialize};

use crate::parser::{Forecast, ForecastDay};

/// Daytime window considered for comfort metrics, inclusive on both ends.
pub const DAY_HOURS_START: i64 = 9;
pub const DAY_HOURS_END: i64 = 19;

/// Conditions counted as precipitation-free. Drizzle, rain, snow, hail and
/// thunderstorm variants are deliberately absent.
pub const SUITABLE_CONDITIONS: &[&str] = &["clear", "partly-cloudy", "cloudy", "overcast"];

/// Comfort metrics for one calendar day of one city's forecast.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DayStats {
    pub date: Option<String>,
    pub hours_start: Option<i64>,
    pub hours_end: Option<i64>,
    pub hours_count: u32,
    pub temp_avg: Option<f64>,
    pub relevant_cond_hours: u32,
}

impl DayStats {
    /// Reduces one raw forecast day to its comfort metrics.
    ///
    /// An hour contributes only when its `hour` value falls inside the
    /// daytime window and its temperature is readable; anything else is
    /// skipped without failing the day. `hours_start` keeps the first
    /// contributing hour in document order, `hours_end` the last.
    pub fn from_day(day: &ForecastDay) -> Self {
        let mut s = DayStats {
            date: day.date.clone(),
            hours_start: None,
            hours_end: None,
            hours_count: 0,
            temp_avg: None,
            relevant_cond_hours: 0,
        };

        let mut temp_sum = 0i64;

        for hour in &day.hours {
            let Some(h) = hour.hour else {
                continue;
            };
            if !(DAY_HOURS_START..=DAY_HOURS_END).contains(&h) {
                continue;
            }
            let Some(temp) = hour.temp else {
                continue;
            };

            s.hours_start = s.hours_start.or(Some(h));
            s.hours_end = Some(h);

            temp_sum += temp;
            s.hours_count += 1;

            if hour
                .condition
                .as_deref()
                .is_some_and(is_condition_suitable)
            {
                s.relevant_cond_hours += 1;
            }
        }

        if s.hours_count > 0 {
            s.temp_avg = Some(round3(temp_sum as f64 / f64::from(s.hours_count)));
        }

        s
    }
}

/// Returns `true` when `condition` counts as precipitation-free.
pub fn is_condition_suitable(condition: &str) -> bool {
    SUITABLE_CONDITIONS.contains(&condition)
}

/// Reduces a raw forecast document to per-day metrics, preserving the
/// document's day order.
pub fn normalize_forecast(forecast: &Forecast) -> Vec<DayStats> {
    forecast.forecasts.iter().map(DayStats::from_day).collect()
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}
