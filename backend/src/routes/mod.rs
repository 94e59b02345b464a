//! Route definitions for the activity explorer

use axum::{
    routing::{get, post},
    Router,
};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health_check))
        // City typeahead
        .route("/cities", get(handlers::search_cities))
        // Static reference data
        .route("/categories", get(handlers::list_categories))
        .route("/weather/rules", get(handlers::get_weather_rules))
        // Session lifecycle
        .nest("/sessions", session_routes())
}

/// Session routes
fn session_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(handlers::create_session))
        .route("/commands", post(handlers::handle_command))
}
