use std::cmp::Ordering;
use std::path::Path;

use anyhow::Result;
use tracing::info;

use crate::analyzers::types::CityStats;
use crate::output::{read_results, write_results};

/// Assigns a 1-based desirability rating to every city.
///
/// Cities are ordered by `(avg_temperature, avg_hours_without_precipitation)`,
/// both descending, through a sorted index view; the slice itself is never
/// reordered, only the `rating` fields are written. The sort is stable, so
/// cities with an identical key keep their aggregation order relative to
/// each other. A missing temperature ranks below every present one.
pub fn assign_ratings(cities: &mut [CityStats]) {
    let mut order: Vec<usize> = (0..cities.len()).collect();

    order.sort_by(|&a, &b| {
        let key = |c: &CityStats| {
            (
                c.avg_temperature.unwrap_or(f64::NEG_INFINITY),
                c.avg_hours_without_precipitation,
            )
        };
        let (temp_a, hours_a) = key(&cities[a]);
        let (temp_b, hours_b) = key(&cities[b]);

        temp_b
            .partial_cmp(&temp_a)
            .unwrap_or(Ordering::Equal)
            .then(hours_b.partial_cmp(&hours_a).unwrap_or(Ordering::Equal))
    });

    for (position, &index) in order.iter().enumerate() {
        cities[index].rating = Some(position as u32 + 1);
    }
}

/// Re-reads the persisted result artifact, rates every city, and rewrites
/// the artifact in place.
///
/// # Errors
///
/// Fails when the artifact cannot be read or written; rating itself cannot
/// fail.
#[tracing::instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn rank_file(path: impl AsRef<Path>) -> Result<Vec<CityStats>> {
    let mut cities = read_results(&path)?;

    assign_ratings(&mut cities);
    write_results(&path, &cities)?;

    info!(city_count = cities.len(), "Rating assignment complete");
    Ok(cities)
}
