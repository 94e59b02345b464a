//! Session orchestration: turns a user command into a new state and a view

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use shared::{
    apply, lookback_dates, run_pipeline, validate_coordinates, ActivityCard, CitySuggestion,
    ExplorerView, SessionCommand, SessionState, WeatherReport, WeatherSample, LOOKBACK_YEARS,
    NO_MATCHES_MESSAGE,
};
use tokio::task::JoinSet;

use crate::error::{AppError, AppResult};
use crate::external::{AmadeusClient, ArchiveClient};

/// Glue between the data sources and the pure explorer core
#[derive(Clone)]
pub struct ExplorerService {
    amadeus: AmadeusClient,
    archive: ArchiveClient,
}

/// Result of handling one command
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionResponse {
    pub state: SessionState,
    /// Present once a search has been submitted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub view: Option<ExplorerView>,
}

impl ExplorerService {
    pub fn new(amadeus: AmadeusClient, archive: ArchiveClient) -> Self {
        Self { amadeus, archive }
    }

    /// Typeahead suggestions; empty on any failure
    pub async fn suggest_cities(&self, query: &str) -> Vec<CitySuggestion> {
        self.amadeus.search_cities(query).await
    }

    /// Weather for the same day in each lookback year, newest first.
    /// Years without data are left out.
    pub async fn lookback_weather(
        &self,
        latitude: f64,
        longitude: f64,
        travel_date: NaiveDate,
    ) -> Vec<WeatherSample> {
        let mut lookups = JoinSet::new();
        for date in lookback_dates(travel_date, LOOKBACK_YEARS) {
            let archive = self.archive.clone();
            lookups.spawn(async move { archive.fetch_day(latitude, longitude, date).await });
        }

        let mut samples = Vec::new();
        while let Some(result) = lookups.join_next().await {
            match result {
                Ok(Some(sample)) => samples.push(sample),
                Ok(None) => {}
                Err(e) => tracing::warn!(error = %e, "Weather lookup task failed"),
            }
        }

        samples.sort_by(|a, b| b.year.cmp(&a.year));
        if samples.len() < LOOKBACK_YEARS as usize {
            tracing::warn!(
                available = samples.len(),
                "Weather data missing for some lookback years"
            );
        }
        samples
    }

    /// Apply a command and, once a search is active, render the results.
    ///
    /// On error the caller keeps its previous state.
    pub async fn handle(
        &self,
        state: SessionState,
        command: SessionCommand,
    ) -> AppResult<SessionResponse> {
        let session_id = state.id;
        let mut state = apply(state, command)?;

        if !state.have_results {
            return Ok(SessionResponse { state, view: None });
        }

        let city = state
            .city
            .clone()
            .ok_or_else(|| AppError::validation("city", "Select a city before searching"))?;
        validate_coordinates(city.latitude, city.longitude)
            .map_err(|msg| AppError::validation("city", msg))?;

        let (activities, samples) = tokio::join!(
            self.amadeus
                .search_activities(city.latitude, city.longitude, state.radius_km),
            self.lookback_weather(city.latitude, city.longitude, state.travel_date),
        );

        let activities = activities.map_err(|e| {
            if e.is_fatal_to_search() {
                tracing::error!(%session_id, error = %e, "Search aborted");
            }
            e
        })?;

        let weather = WeatherReport::from_samples(samples);
        if state.use_preset {
            tracing::info!(%session_id, outlook = ?weather.outlook, "Applying weather preset");
            state.apply_preset(weather.preset.clone());
        }

        let page = run_pipeline(activities, &state.categories, &state.page);
        state.page.settle(page.pagination.total_pages);

        let cards: Vec<ActivityCard> = page.items.iter().map(ActivityCard::from).collect();
        let pagination = page.pagination;
        let view = ExplorerView {
            city_label: city.label(),
            coordinates: city.coordinates(),
            weather,
            headline: ExplorerView::headline_for(&pagination, cards.len()),
            can_go_back: pagination.page > 1,
            can_go_forward: pagination.page < pagination.total_pages,
            info: cards.is_empty().then(|| NO_MATCHES_MESSAGE.to_string()),
            activities: cards,
            pagination,
        };

        tracing::debug!(
            %session_id,
            page = pagination.page,
            total_pages = pagination.total_pages,
            total_items = pagination.total_items,
            "Rendered session view"
        );

        Ok(SessionResponse {
            state,
            view: Some(view),
        })
    }

    /// Drop expired weather lookups
    pub async fn purge_expired(&self) -> usize {
        self.archive.purge_expired().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AmadeusConfig, WeatherConfig};
    use serde_json::{json, Value};
    use shared::{Category, CategorySelection, PageSize, WeatherOutlook};
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn service(base_url: &str) -> ExplorerService {
        let amadeus = AmadeusClient::new(&AmadeusConfig {
            base_url: base_url.to_string(),
            client_id: "id".to_string(),
            client_secret: "secret".to_string(),
            token_ttl_secs: 1800,
            city_max_results: 8,
            timeout_secs: 5,
            activities_timeout_secs: 5,
        });
        let archive = ArchiveClient::new(&WeatherConfig {
            archive_url: base_url.to_string(),
            timezone: "Europe/Berlin".to_string(),
            cache_ttl_secs: 6000,
            cache_max_entries: 1000,
            timeout_secs: 5,
        });
        ExplorerService::new(amadeus, archive)
    }

    fn vienna() -> CitySuggestion {
        CitySuggestion {
            name: "Vienna".to_string(),
            iata_code: "VIE".to_string(),
            latitude: 48.2,
            longitude: 16.37,
        }
    }

    fn session() -> SessionState {
        let mut state = SessionState::new(NaiveDate::from_ymd_opt(2025, 7, 14).unwrap());
        state.city = Some(vienna());
        state
    }

    async fn mount_token(server: &MockServer) {
        Mock::given(method("POST"))
            .and(path("/v1/security/oauth2/token"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"access_token": "tok", "expires_in": 1799})),
            )
            .mount(server)
            .await;
    }

    async fn mount_activities(server: &MockServer, activities: Value) {
        Mock::given(method("GET"))
            .and(path("/v1/shopping/activities"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": activities })))
            .mount(server)
            .await;
    }

    async fn mount_day(server: &MockServer, date: &str, max: f64, min: f64, precip: f64) {
        Mock::given(method("GET"))
            .and(path("/v1/archive"))
            .and(query_param("start_date", date))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "daily": {
                    "temperature_2m_max": [max],
                    "temperature_2m_min": [min],
                    "precipitation_sum": [precip]
                }
            })))
            .mount(server)
            .await;
    }

    fn twelve_activities() -> Value {
        let items: Vec<Value> = (1..=12)
            .map(|i| {
                let name = if i % 2 == 0 {
                    format!("Museum visit {i}")
                } else {
                    format!("Wine tasting {i}")
                };
                json!({"id": i.to_string(), "name": name, "rating": format!("{}", i % 5)})
            })
            .collect();
        Value::Array(items)
    }

    #[tokio::test]
    async fn test_commands_before_search_do_not_fetch() {
        let server = MockServer::start().await;
        let service = service(&server.uri());

        let response = service
            .handle(session(), SessionCommand::SetRadius { km: 12 })
            .await
            .unwrap();
        assert!(response.view.is_none());
        assert_eq!(response.state.radius_km, 12);
        assert!(server.received_requests().await.unwrap_or_default().is_empty());
    }

    #[tokio::test]
    async fn test_search_paginates_twelve_activities() {
        let server = MockServer::start().await;
        mount_token(&server).await;
        mount_activities(&server, twelve_activities()).await;
        mount_day(&server, "2024-07-14", 28.0, 18.0, 0.0).await;
        mount_day(&server, "2023-07-14", 30.0, 20.0, 0.0).await;
        mount_day(&server, "2022-07-14", 26.0, 16.0, 3.0).await;

        let service = service(&server.uri());
        let response = service
            .handle(session(), SessionCommand::SetPageSize { size: PageSize::Five })
            .await
            .unwrap();
        let response = service
            .handle(response.state, SessionCommand::Search)
            .await
            .unwrap();

        let view = response.view.unwrap();
        assert_eq!(view.pagination.total_pages, 3);
        assert_eq!(view.activities.len(), 5);
        assert_eq!(view.headline, "Page 1/3 — 5 of 12");
        assert!(!view.can_go_back);
        assert!(view.can_go_forward);

        assert_eq!(view.weather.samples.len(), 3);
        assert_eq!(view.weather.samples[0].year, 2024);
        assert!(!view.weather.verdict.rain_flag);
        assert_eq!(view.weather.outlook, WeatherOutlook::WarmDry);

        let mut state = response.state;
        for _ in 0..5 {
            state = service
                .handle(state, SessionCommand::NextPage)
                .await
                .unwrap()
                .state;
        }
        let last = service
            .handle(state, SessionCommand::Refresh)
            .await
            .unwrap();
        assert_eq!(last.state.page.current_page, 3);
        assert_eq!(last.view.unwrap().activities.len(), 2);
    }

    #[tokio::test]
    async fn test_rain_preset_is_applied_once() {
        let server = MockServer::start().await;
        mount_token(&server).await;
        mount_activities(&server, twelve_activities()).await;
        mount_day(&server, "2024-07-14", 20.0, 10.0, 0.0).await;
        mount_day(&server, "2023-07-14", 20.0, 10.0, 2.1).await;
        mount_day(&server, "2022-07-14", 20.0, 10.0, 0.5).await;

        let service = service(&server.uri());
        let response = service.handle(session(), SessionCommand::Search).await.unwrap();
        let response = service
            .handle(response.state, SessionCommand::RequestPreset)
            .await
            .unwrap();

        let state = response.state;
        assert!(!state.use_preset);
        assert_eq!(
            state.categories.as_slice(),
            &[
                Category::Museums,
                Category::Restaurants,
                Category::Historical,
                Category::Sightseeing
            ]
        );

        let view = response.view.unwrap();
        assert!(view.weather.verdict.rain_flag);
        assert_eq!(view.pagination.total_items, 6);
        assert!(view.activities.iter().all(|a| a.name.starts_with("Museum")));
    }

    #[tokio::test]
    async fn test_missing_weather_degrades_to_no_data() {
        let server = MockServer::start().await;
        mount_token(&server).await;
        mount_activities(&server, json!([])).await;
        Mock::given(method("GET"))
            .and(path("/v1/archive"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let service = service(&server.uri());
        let mut state = session();
        state.use_preset = true;
        let response = service.handle(state, SessionCommand::Search).await.unwrap();

        let view = response.view.unwrap();
        assert!(view.weather.samples.is_empty());
        assert!(!view.weather.verdict.has_data());
        assert_eq!(view.weather.summary_en, "No weather data available.");
        assert_eq!(
            response.state.categories,
            CategorySelection::from([Category::Wine, Category::Historical])
        );
        assert_eq!(view.info.as_deref(), Some(NO_MATCHES_MESSAGE));
        assert_eq!(view.pagination.total_pages, 1);
    }

    #[tokio::test]
    async fn test_activity_failure_aborts() {
        let server = MockServer::start().await;
        mount_token(&server).await;
        Mock::given(method("GET"))
            .and(path("/v1/shopping/activities"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let service = service(&server.uri());
        let err = service
            .handle(session(), SessionCommand::Search)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ActivitySearch(_)));
    }

    #[tokio::test]
    async fn test_search_without_city_is_rejected() {
        let server = MockServer::start().await;
        let service = service(&server.uri());
        let state = SessionState::new(NaiveDate::from_ymd_opt(2025, 7, 14).unwrap());

        let err = service.handle(state, SessionCommand::Search).await.unwrap_err();
        assert!(matches!(err, AppError::Validation { .. }));
    }
}
