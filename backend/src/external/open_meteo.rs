//! Open-Meteo archive client for historical daily weather
//!
//! Looks up one day at a time. A missing day is "no data", never an error.

use std::time::Duration;

use chrono::{Datelike, NaiveDate};
use reqwest::Client;
use serde::Deserialize;
use shared::{validate_weather_sample, WeatherSample};

use crate::cache::TtlCache;
use crate::config::WeatherConfig;

const DAILY_FIELDS: &str = "temperature_2m_max,temperature_2m_min,precipitation_sum";

/// Historical weather client with a per-day lookup cache
#[derive(Clone)]
pub struct ArchiveClient {
    client: Client,
    base_url: String,
    timezone: String,
    timeout: Duration,
    cache: TtlCache<String, Option<WeatherSample>>,
}

#[derive(Debug, Deserialize)]
struct ArchiveResponse {
    daily: Option<ArchiveDaily>,
}

#[derive(Debug, Deserialize)]
struct ArchiveDaily {
    #[serde(default)]
    temperature_2m_max: Vec<Option<f64>>,
    #[serde(default)]
    temperature_2m_min: Vec<Option<f64>>,
    #[serde(default)]
    precipitation_sum: Vec<Option<f64>>,
}

impl ArchiveClient {
    pub fn new(config: &WeatherConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.archive_url.trim_end_matches('/').to_string(),
            timezone: config.timezone.clone(),
            timeout: config.timeout(),
            cache: TtlCache::new(config.cache_ttl(), config.cache_max_entries),
        }
    }

    /// Weather for one exact date, or `None` when the archive has nothing usable
    pub async fn fetch_day(&self, latitude: f64, longitude: f64, date: NaiveDate) -> Option<WeatherSample> {
        let key = format!("{}:{}:{}", latitude, longitude, date);
        if let Some(cached) = self.cache.get(&key).await {
            tracing::debug!(%date, "Weather cache hit");
            return cached;
        }

        let iso_date = date.format("%Y-%m-%d").to_string();
        let url = format!("{}/v1/archive", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("latitude", latitude.to_string()),
                ("longitude", longitude.to_string()),
                ("start_date", iso_date.clone()),
                ("end_date", iso_date),
                ("daily", DAILY_FIELDS.to_string()),
                ("timezone", self.timezone.clone()),
            ])
            .timeout(self.timeout)
            .send()
            .await;

        let response = match response {
            Ok(response) => response,
            Err(e) => {
                // Not cached, so the next search tries again
                tracing::warn!(%date, error = %e, "Weather archive request failed");
                return None;
            }
        };

        let sample = if response.status().is_success() {
            match response.json::<ArchiveResponse>().await {
                Ok(data) => convert_archive_response(data, date.year()),
                Err(e) => {
                    tracing::warn!(%date, error = %e, "Failed to parse weather archive response");
                    None
                }
            }
        } else {
            tracing::warn!(%date, status = %response.status(), "Weather archive returned an error");
            None
        };

        self.cache.insert(key, sample).await;
        sample
    }

    pub async fn purge_expired(&self) -> usize {
        let removed = self.cache.purge_expired().await;
        let remaining = self.cache.len().await;
        tracing::debug!(removed, remaining, "Weather cache purged");
        removed
    }
}

/// First day of the daily arrays as a sample
fn convert_archive_response(data: ArchiveResponse, year: i32) -> Option<WeatherSample> {
    let daily = data.daily?;
    let sample = WeatherSample {
        year,
        max_temp_celsius: (*daily.temperature_2m_max.first()?)?,
        min_temp_celsius: (*daily.temperature_2m_min.first()?)?,
        precipitation_mm: (*daily.precipitation_sum.first()?)?.max(0.0),
    };

    match validate_weather_sample(&sample) {
        Ok(()) => Some(sample),
        Err(reason) => {
            tracing::warn!(year, reason, "Discarding invalid weather sample");
            None
        }
    }
}
