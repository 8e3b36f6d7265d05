//! The forecast analysis pipeline.
//!
//! Four stages run in order: bounded-concurrency fetch of every configured
//! city, CPU-parallel per-city calculation, single-consumer aggregation of
//! the worker output, and ranking over the persisted result. A city that
//! fails at any point is logged and dropped; only persistence failures
//! abort the run.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tokio::sync::{Semaphore, mpsc};
use tracing::{Instrument, debug, error, info};

use crate::analyzers::calculate::calculate_city;
use crate::analyzers::rank::rank_file;
use crate::analyzers::types::CityStats;
use crate::cities::CityDirectory;
use crate::fetch::{HttpClient, fetch_bytes};
use crate::output::write_results;
use crate::parser::{Forecast, parse_forecast};

/// Settings for one pipeline run.
pub struct PipelineConfig {
    /// Path of the JSON result artifact.
    pub output_path: PathBuf,
    /// Upper bound on concurrent forecast downloads.
    pub fetch_concurrency: usize,
    /// Enforced per-city fetch deadline; expiry counts as a failed fetch.
    pub fetch_timeout: Duration,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            output_path: PathBuf::from("output.json"),
            fetch_concurrency: 5,
            fetch_timeout: Duration::from_secs(30),
        }
    }
}

/// A fetched forecast tagged with its city. `forecast` is `None` when the
/// fetch failed and the city carries no data downstream.
struct CityForecast {
    city_name: String,
    forecast: Option<Forecast>,
}

/// Runs the full pipeline over every city in `directory` and returns the
/// ranked summaries, which are also persisted at the configured path.
///
/// # Errors
///
/// Fails only on structural problems: the result artifact cannot be
/// written, read back, or rewritten. Per-city fetch, parse and calculation
/// failures are logged and excluded instead.
#[tracing::instrument(skip_all, fields(city_count = directory.len()))]
pub async fn run<C>(
    client: Arc<C>,
    directory: &CityDirectory,
    config: &PipelineConfig,
) -> Result<Vec<CityStats>>
where
    C: HttpClient + 'static,
{
    let fetched = fetch_stage(client, directory, config).await;
    let aggregated = calculate_and_aggregate(fetched).await?;

    write_results(&config.output_path, &aggregated)?;
    info!(
        city_count = aggregated.len(),
        path = %config.output_path.display(),
        "Aggregation persisted"
    );

    rank_file(&config.output_path)
}

/// Downloads every city's forecast with at most `fetch_concurrency`
/// requests in flight. Always yields one entry per configured city;
/// failures come back as empty markers.
async fn fetch_stage<C>(
    client: Arc<C>,
    directory: &CityDirectory,
    config: &PipelineConfig,
) -> Vec<CityForecast>
where
    C: HttpClient + 'static,
{
    let semaphore = Arc::new(Semaphore::new(config.fetch_concurrency));
    let mut tasks = Vec::new();

    for (city_name, url) in directory.iter() {
        let sem = semaphore.clone();
        let client = client.clone();
        let city_name = city_name.to_string();
        let url = url.to_string();
        let timeout = config.fetch_timeout;

        let span = tracing::info_span!("fetch_city", city = %city_name);

        tasks.push(tokio::spawn(
            async move {
                let _permit = sem.acquire().await.unwrap();

                let forecast =
                    match tokio::time::timeout(timeout, fetch_bytes(client.as_ref(), &url)).await {
                        Ok(Ok(bytes)) => {
                            debug!(bytes = bytes.len(), "Forecast bytes received, parsing");
                            match parse_forecast(&bytes) {
                                Ok(forecast) => Some(forecast),
                                Err(e) => {
                                    error!(error = %e, "Forecast parse failed");
                                    None
                                }
                            }
                        }
                        Ok(Err(e)) => {
                            error!(error = %e, "Forecast HTTP fetch failed");
                            None
                        }
                        Err(_) => {
                            error!(timeout_secs = timeout.as_secs(), "Forecast fetch timed out");
                            None
                        }
                    };

                CityForecast {
                    city_name,
                    forecast,
                }
            }
            .instrument(span),
        ));
    }

    let mut fetched = Vec::with_capacity(tasks.len());
    for task in tasks {
        match task.await {
            Ok(city_forecast) => fetched.push(city_forecast),
            Err(e) => error!(error = %e, "Fetch task failed to join"),
        }
    }

    fetched
}

/// Fans the fetched forecasts out to blocking calculation workers and
/// drains their summaries into one collection in arrival order.
///
/// The single collector task owns the output; workers only ever push. The
/// channel closing after the last worker drops its sender is the
/// completion signal, so a slow worker can never race the drain.
async fn calculate_and_aggregate(fetched: Vec<CityForecast>) -> Result<Vec<CityStats>> {
    let (tx, mut rx) = mpsc::unbounded_channel::<CityStats>();

    let collector = tokio::spawn(async move {
        let mut result: Vec<CityStats> = Vec::new();
        while let Some(stats) = rx.recv().await {
            info!(city = %stats.city_name, "Aggregated city summary");
            result.push(stats);
        }
        result
    });

    let mut workers = Vec::new();
    for city_forecast in fetched {
        let tx = tx.clone();
        workers.push(tokio::task::spawn_blocking(move || {
            let CityForecast {
                city_name,
                forecast,
            } = city_forecast;

            let Some(forecast) = forecast else {
                error!(city = %city_name, "No forecast data, excluding city");
                return;
            };

            if let Some(stats) = calculate_city(&city_name, &forecast) {
                // The collector outlives every worker, so the send cannot fail.
                let _ = tx.send(stats);
            }
        }));
    }
    drop(tx);

    for worker in workers {
        if let Err(e) = worker.await {
            error!(error = %e, "Calculation worker failed to join");
        }
    }

    Ok(collector.await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{ForecastDay, ForecastHour};

    fn forecast_with_one_day(temp: i64) -> Forecast {
        Forecast {
            forecasts: vec![ForecastDay {
                date: Some("2022-05-26".to_string()),
                hours: vec![ForecastHour {
                    hour: Some(12),
                    temp: Some(temp),
                    condition: Some("clear".to_string()),
                }],
            }],
        }
    }

    #[tokio::test]
    async fn test_aggregation_excludes_failed_cities() {
        let fetched = vec![
            CityForecast {
                city_name: "MOSCOW".to_string(),
                forecast: Some(forecast_with_one_day(15)),
            },
            CityForecast {
                city_name: "PARIS".to_string(),
                forecast: None,
            },
            CityForecast {
                city_name: "CAIRO".to_string(),
                forecast: Some(forecast_with_one_day(30)),
            },
        ];

        let aggregated = calculate_and_aggregate(fetched).await.unwrap();

        assert_eq!(aggregated.len(), 2);
        assert!(aggregated.iter().all(|c| c.city_name != "PARIS"));
        assert!(aggregated.iter().all(|c| c.rating.is_none()));
    }

    #[tokio::test]
    async fn test_aggregation_of_nothing_is_empty() {
        let aggregated = calculate_and_aggregate(vec![]).await.unwrap();
        assert!(aggregated.is_empty());
    }

    #[tokio::test]
    async fn test_dayless_forecast_is_excluded() {
        let fetched = vec![CityForecast {
            city_name: "LONDON".to_string(),
            forecast: Some(Forecast { forecasts: vec![] }),
        }];

        let aggregated = calculate_and_aggregate(fetched).await.unwrap();
        assert!(aggregated.is_empty());
    }
}
