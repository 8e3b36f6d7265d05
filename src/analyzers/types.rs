//! Data types shared by the calculation, aggregation and ranking stages.

use serde::{Deserialize, Serialize};

use crate::stats::DayStats;

/// Weather summary for one city, a single entry of the persisted result
/// artifact.
///
/// `avg_temperature` is `None` when no day of the forecast had a usable
/// temperature. `rating` stays `None` until the ranking stage assigns
/// positions `1..=N` across all aggregated cities.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CityStats {
    pub city_name: String,
    pub days: Vec<DayStats>,
    pub avg_temperature: Option<f64>,
    pub avg_hours_without_precipitation: f64,
    pub rating: Option<u32>,
}
