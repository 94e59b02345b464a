//! HTTP handlers for the explorer endpoints

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use shared::{
    category_catalog, validate_city_query, weather_rules, CategoryInfo, CitySuggestion,
    SessionCommand, SessionState, WeatherRules,
};

use crate::error::AppResult;
use crate::services::SessionResponse;
use crate::AppState;

/// Query parameters for the city typeahead
#[derive(Debug, Deserialize)]
pub struct CityQuery {
    #[serde(default)]
    pub q: String,
}

/// City suggestions; an unusable query simply has no suggestions
pub async fn search_cities(
    State(state): State<AppState>,
    Query(query): Query<CityQuery>,
) -> Json<Vec<CitySuggestion>> {
    if let Err(reason) = validate_city_query(&query.q) {
        tracing::debug!(reason, "Ignoring city query");
        return Json(Vec::new());
    }
    Json(state.explorer.suggest_cities(&query.q).await)
}

/// Available categories and the keywords behind them
pub async fn list_categories() -> Json<Vec<CategoryInfo>> {
    Json(category_catalog())
}

/// How the weather preset is derived
pub async fn get_weather_rules() -> Json<WeatherRules> {
    Json(weather_rules())
}

/// Start a new session with today as the travel date
pub async fn create_session() -> Json<SessionState> {
    let today = chrono::Local::now().date_naive();
    let state = SessionState::new(today);
    tracing::info!(session_id = %state.id, "Created session");
    Json(state)
}

/// A command together with the state it applies to
#[derive(Debug, Deserialize)]
pub struct CommandRequest {
    pub state: SessionState,
    pub command: SessionCommand,
}

/// Apply a command and return the next state and view
pub async fn handle_command(
    State(state): State<AppState>,
    Json(request): Json<CommandRequest>,
) -> AppResult<Json<SessionResponse>> {
    tracing::debug!(session_id = %request.state.id, command = ?request.command, "Handling command");
    let response = state
        .explorer
        .handle(request.state, request.command)
        .await?;
    Ok(Json(response))
}
