//! Persistence of the aggregated result artifact.
//!
//! One pretty-printed JSON array of city summaries is the sole hand-off
//! between aggregation and ranking, and the final output of a run. Failing
//! to read or write it is fatal to the pipeline.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;

use crate::analyzers::types::CityStats;

/// Writes the result artifact, replacing any previous content.
pub fn write_results(path: impl AsRef<Path>, cities: &[CityStats]) -> Result<()> {
    let path = path.as_ref();
    debug!(path = %path.display(), city_count = cities.len(), "Writing result artifact");

    let formatted = serde_json::to_string_pretty(cities)?;
    fs::write(path, formatted)
        .with_context(|| format!("failed to write results to '{}'", path.display()))?;

    Ok(())
}

/// Reads the result artifact back.
pub fn read_results(path: impl AsRef<Path>) -> Result<Vec<CityStats>> {
    let path = path.as_ref();

    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read results from '{}'", path.display()))?;
    let cities = serde_json::from_str(&content)
        .with_context(|| format!("malformed results in '{}'", path.display()))?;

    Ok(cities)
}
