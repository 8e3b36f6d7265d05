use tracing::warn;

use crate::analyzers::types::CityStats;
use crate::analyzers::utility::mean;
use crate::parser::Forecast;
use crate::stats::normalize_forecast;

/// Reduces one city's raw forecast to its [`CityStats`] summary.
///
/// `avg_temperature` averages the day temperatures over the days that have
/// one; a day with no qualifying hours carries no temperature and drops out
/// of both sides of that division. `avg_hours_without_precipitation`
/// averages over all days, so an hourless day pulls it toward zero. The two
/// denominators differ on purpose: a missing temperature is absence of
/// data, zero good hours is data.
///
/// Returns `None` for a forecast with no days at all; such a city carries
/// nothing to summarize and is excluded from aggregation.
pub fn calculate_city(city_name: &str, forecast: &Forecast) -> Option<CityStats> {
    let days = normalize_forecast(forecast);

    if days.is_empty() {
        warn!(city = city_name, "Forecast has no days, excluding city");
        return None;
    }

    let day_temps: Vec<f64> = days.iter().filter_map(|d| d.temp_avg).collect();
    let avg_temperature = if day_temps.is_empty() {
        None
    } else {
        Some(mean(&day_temps))
    };

    let good_hours: Vec<f64> = days
        .iter()
        .map(|d| f64::from(d.relevant_cond_hours))
        .collect();
    let avg_hours_without_precipitation = mean(&good_hours);

    Some(CityStats {
        city_name: city_name.to_string(),
        days,
        avg_temperature,
        avg_hours_without_precipitation,
        rating: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{ForecastDay, ForecastHour};

    fn hour(h: i64, temp: i64, condition: &str) -> ForecastHour {
        ForecastHour {
            hour: Some(h),
            temp: Some(temp),
            condition: Some(condition.to_string()),
        }
    }

    fn day(date: &str, hours: Vec<ForecastHour>) -> ForecastDay {
        ForecastDay {
            date: Some(date.to_string()),
            hours,
        }
    }

    #[test]
    fn test_empty_forecast_is_excluded() {
        let forecast = Forecast { forecasts: vec![] };
        assert!(calculate_city("MOSCOW", &forecast).is_none());
    }

    #[test]
    fn test_city_averages() {
        let forecast = Forecast {
            forecasts: vec![
                day("2022-05-26", vec![hour(10, 10, "clear"), hour(11, 20, "rain")]),
                day("2022-05-27", vec![hour(10, 20, "clear"), hour(11, 30, "overcast")]),
            ],
        };
        let stats = calculate_city("MOSCOW", &forecast).unwrap();

        assert_eq!(stats.avg_temperature, Some(20.0));
        assert_eq!(stats.avg_hours_without_precipitation, 1.5);
        assert_eq!(stats.rating, None);
        assert_eq!(stats.days.len(), 2);
    }

    #[test]
    fn test_hourless_day_skews_only_good_hours() {
        // Temperature averages over the one day that has data; good hours
        // average over both days.
        let forecast = Forecast {
            forecasts: vec![
                day("2022-05-26", vec![hour(10, 12, "clear"), hour(11, 14, "clear")]),
                day("2022-05-27", vec![]),
            ],
        };
        let stats = calculate_city("PARIS", &forecast).unwrap();

        assert_eq!(stats.avg_temperature, Some(13.0));
        assert_eq!(stats.avg_hours_without_precipitation, 1.0);
    }

    #[test]
    fn test_no_usable_temperature_yields_null_average() {
        let forecast = Forecast {
            forecasts: vec![day("2022-05-26", vec![]), day("2022-05-27", vec![])],
        };
        let stats = calculate_city("LONDON", &forecast).unwrap();

        assert_eq!(stats.avg_temperature, None);
        assert_eq!(stats.avg_hours_without_precipitation, 0.0);
    }
}
