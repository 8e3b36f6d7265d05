//! Static directory of cities and their forecast-source URLs.
//!
//! A bundled table covers the default city set; an operator can swap it for
//! a JSON file of `"CITY": "url"` pairs loaded once at startup.

use std::collections::HashMap;

use anyhow::{Context, Result};

/// Bundled forecast sources, one sample endpoint per city.
static CITIES: &[(&str, &str)] = &[
    ("MOSCOW", "https://code.s3.yandex.net/async-module/moscow-response.json"),
    ("PARIS", "https://code.s3.yandex.net/async-module/paris-response.json"),
    ("LONDON", "https://code.s3.yandex.net/async-module/london-response.json"),
    ("BERLIN", "https://code.s3.yandex.net/async-module/berlin-response.json"),
    ("BEIJING", "https://code.s3.yandex.net/async-module/beijing-response.json"),
    ("KAZAN", "https://code.s3.yandex.net/async-module/kazan-response.json"),
    ("SPETERSBURG", "https://code.s3.yandex.net/async-module/spetersburg-response.json"),
    ("VOLGOGRAD", "https://code.s3.yandex.net/async-module/volgograd-response.json"),
    ("NOVOSIBIRSK", "https://code.s3.yandex.net/async-module/novosibirsk-response.json"),
    ("KALININGRAD", "https://code.s3.yandex.net/async-module/kaliningrad-response.json"),
    ("ABUDHABI", "https://code.s3.yandex.net/async-module/abudhabi-response.json"),
    ("WARSZAWA", "https://code.s3.yandex.net/async-module/warszawa-response.json"),
    ("BUCHAREST", "https://code.s3.yandex.net/async-module/bucharest-response.json"),
    ("ROMA", "https://code.s3.yandex.net/async-module/roma-response.json"),
    ("CAIRO", "https://code.s3.yandex.net/async-module/cairo-response.json"),
];

/// Maps city names to their forecast-source URLs.
///
/// Read-only after construction; one instance is shared by a whole
/// pipeline run.
pub struct CityDirectory {
    entries: HashMap<String, String>,
}

impl CityDirectory {
    /// Returns the directory of bundled cities.
    pub fn bundled() -> Self {
        let entries = CITIES
            .iter()
            .map(|(city, url)| (city.to_string(), url.to_string()))
            .collect();
        Self { entries }
    }

    /// Loads a directory from a JSON file at `path`.
    ///
    /// Expected shape, mirroring the bundled table:
    /// ```json
    /// {
    ///   "MOSCOW": "https://example.com/moscow.json",
    ///   "PARIS": "https://example.com/paris.json"
    /// }
    /// ```
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read city directory '{path}'"))?;
        let entries: HashMap<String, String> = serde_json::from_str(&content)
            .with_context(|| format!("malformed city directory '{path}'"))?;
        Ok(Self { entries })
    }

    /// Returns the forecast URL for `city_name`, if it is configured.
    pub fn url_for(&self, city_name: &str) -> Option<&str> {
        self.entries.get(city_name).map(String::as_str)
    }

    /// Iterates over all `(city_name, url)` pairs. No ordering guarantee;
    /// downstream stages key everything by city name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
