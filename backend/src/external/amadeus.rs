//! Amadeus Self-Service API client
//!
//! Covers the three endpoints the explorer needs: OAuth client-credentials
//! token, city search (typeahead) and activities around a coordinate.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::Deserialize;
use shared::{ActivityRecord, CitySuggestion};

use crate::cache::TtlCache;
use crate::config::AmadeusConfig;
use crate::error::{AppError, AppResult};

/// Amadeus API client with a cached bearer token
#[derive(Clone)]
pub struct AmadeusClient {
    client: Client,
    base_url: String,
    client_id: String,
    client_secret: String,
    city_max_results: u32,
    timeout: Duration,
    activities_timeout: Duration,
    token_cache: TtlCache<(), String>,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    /// Seconds the token stays valid
    expires_in: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct CitySearchResponse {
    #[serde(default)]
    data: Vec<CityData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CityData {
    name: Option<String>,
    iata_code: Option<String>,
    geo_code: Option<GeoCode>,
}

#[derive(Debug, Deserialize)]
struct GeoCode {
    latitude: Option<f64>,
    longitude: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct ActivitiesResponse {
    #[serde(default)]
    data: Vec<ActivityRecord>,
}

impl AmadeusClient {
    /// Create a new AmadeusClient from configuration
    pub fn new(config: &AmadeusConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            city_max_results: config.city_max_results,
            timeout: config.timeout(),
            activities_timeout: config.activities_timeout(),
            token_cache: TtlCache::new(config.token_ttl(), 1),
        }
    }

    /// Bearer token, reused until its TTL runs out
    pub async fn access_token(&self) -> AppResult<String> {
        if let Some(token) = self.token_cache.get(&()).await {
            tracing::debug!("Using cached Amadeus access token");
            return Ok(token);
        }

        let url = format!("{}/v1/security/oauth2/token", self.base_url);
        let response = self
            .client
            .post(&url)
            .form(&[
                ("grant_type", "client_credentials"),
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
            ])
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| AppError::TokenAcquisition(format!("request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::TokenAcquisition(format!("{} - {}", status, body)));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| AppError::TokenAcquisition(format!("invalid token response: {}", e)))?;

        let ttl = token
            .expires_in
            .map(Duration::from_secs)
            .map_or(self.token_cache.ttl(), |valid| valid.min(self.token_cache.ttl()));
        tracing::debug!(ttl_secs = ttl.as_secs(), "Fetched new Amadeus access token");

        self.token_cache
            .insert_with_ttl((), token.access_token.clone(), ttl)
            .await;
        Ok(token.access_token)
    }

    /// City suggestions for a typeahead query.
    ///
    /// Never fails: any error means "no suggestions".
    pub async fn search_cities(&self, keyword: &str) -> Vec<CitySuggestion> {
        let keyword = keyword.trim();
        if keyword.is_empty() {
            return Vec::new();
        }

        match self.try_search_cities(keyword).await {
            Ok(cities) => cities,
            Err(e) => {
                tracing::warn!(keyword, error = %e, "City search failed, returning no suggestions");
                Vec::new()
            }
        }
    }

    async fn try_search_cities(&self, keyword: &str) -> AppResult<Vec<CitySuggestion>> {
        let token = self.access_token().await?;
        let url = format!("{}/v1/reference-data/locations/cities", self.base_url);
        let max = self.city_max_results.to_string();

        let response = self
            .client
            .get(&url)
            .bearer_auth(&token)
            .query(&[("keyword", keyword), ("max", max.as_str())])
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| AppError::ExternalService(format!("City search request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(AppError::ExternalService(format!(
                "City search error: {}",
                response.status()
            )));
        }

        let data: CitySearchResponse = response
            .json()
            .await
            .map_err(|e| AppError::ExternalService(format!("Failed to parse city search: {}", e)))?;

        Ok(convert_cities(data))
    }

    /// Activities within `radius_km` of a coordinate. Any failure aborts the search.
    pub async fn search_activities(
        &self,
        latitude: f64,
        longitude: f64,
        radius_km: u32,
    ) -> AppResult<Vec<ActivityRecord>> {
        let token = self.access_token().await?;
        let url = format!("{}/v1/shopping/activities", self.base_url);

        let response = self
            .client
            .get(&url)
            .bearer_auth(&token)
            .query(&[
                ("latitude", latitude.to_string()),
                ("longitude", longitude.to_string()),
                ("radius", radius_km.to_string()),
            ])
            .timeout(self.activities_timeout)
            .send()
            .await
            .map_err(|e| AppError::ActivitySearch(format!("request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            if status == StatusCode::UNAUTHORIZED {
                // Next attempt authenticates again
                self.token_cache.invalidate(&()).await;
            }
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ActivitySearch(format!("{} - {}", status, body)));
        }

        let data: ActivitiesResponse = response
            .json()
            .await
            .map_err(|e| AppError::ActivitySearch(format!("invalid response: {}", e)))?;

        tracing::debug!(count = data.data.len(), radius_km, "Fetched activities");
        Ok(data.data)
    }
}

/// Keep only rows that carry both coordinates
fn convert_cities(data: CitySearchResponse) -> Vec<CitySuggestion> {
    data.data
        .into_iter()
        .filter_map(|item| {
            let geo = item.geo_code?;
            Some(CitySuggestion {
                name: item.name.unwrap_or_else(|| "Unknown".to_string()),
                iata_code: item.iata_code.unwrap_or_default(),
                latitude: geo.latitude?,
                longitude: geo.longitude?,
            })
        })
        .collect()
}
