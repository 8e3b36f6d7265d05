//! Parser for raw forecast documents.
//!
//! The provider serves one JSON document per city with a `forecasts` array
//! of days, each carrying an `hours` array. Field quality varies between
//! endpoints (`hour` arrives as a string on some, a number on others), so
//! every leaf is optional and integers accept both encodings. A missing or
//! unreadable field surfaces as `None` and is dealt with during
//! normalization rather than failing the whole document.

use anyhow::Result;
use serde::{Deserialize, Deserializer};

/// A raw multi-day forecast document for one city.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Forecast {
    #[serde(default)]
    pub forecasts: Vec<ForecastDay>,
}

/// One calendar day of a raw forecast.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ForecastDay {
    pub date: Option<String>,
    #[serde(default)]
    pub hours: Vec<ForecastHour>,
}

/// One hourly record of a raw forecast day.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ForecastHour {
    #[serde(default, deserialize_with = "int_or_string")]
    pub hour: Option<i64>,
    #[serde(default, deserialize_with = "int_or_string")]
    pub temp: Option<i64>,
    pub condition: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawInt {
    Int(i64),
    Str(String),
}

/// Accepts `7`, `"7"`, or `null`; anything unparseable becomes `None`.
fn int_or_string<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<RawInt>::deserialize(deserializer)? {
        Some(RawInt::Int(v)) => Some(v),
        Some(RawInt::Str(s)) => s.trim().parse().ok(),
        None => None,
    })
}

/// Decodes a raw forecast document from JSON bytes.
///
/// # Errors
///
/// Returns an error if the bytes are not a valid JSON document.
pub fn parse_forecast(bytes: &[u8]) -> Result<Forecast> {
    Ok(serde_json::from_slice(bytes)?)
}
