//! WebAssembly module for the Activity Explorer
//!
//! Provides client-side computation for:
//! - Weather classification and category presets
//! - Filtering, sorting and paging of already-fetched activities
//! - Session state transitions, so the browser can navigate without a round trip

use chrono::NaiveDate;
use wasm_bindgen::prelude::*;

// Re-export shared types for use in JavaScript
pub use shared::models::*;
pub use shared::pipeline::*;
pub use shared::types::*;
pub use shared::validation::*;

fn js_error(context: &str, err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&format!("{}: {}", context, err))
}

/// Build a weather report (verdict, preset, summaries) from a JSON array of samples
#[wasm_bindgen]
pub fn classify_weather_json(samples_json: &str) -> Result<String, JsValue> {
    let samples: Vec<WeatherSample> =
        serde_json::from_str(samples_json).map_err(|e| js_error("Invalid samples JSON", e))?;

    let report = WeatherReport::from_samples(samples);
    serde_json::to_string(&report).map_err(|e| js_error("Serialization failed", e))
}

/// Preset category names for a verdict. A NaN temperature means no data.
#[wasm_bindgen]
pub fn preset_category_names(rain_flag: bool, avg_temp_celsius: f64) -> Vec<String> {
    let avg = (!avg_temp_celsius.is_nan()).then_some(avg_temp_celsius);
    preset_categories(rain_flag, avg)
        .iter()
        .map(|c| c.name().to_string())
        .collect()
}

/// Filter, sort and page activities for the given categories and page state
#[wasm_bindgen]
pub fn run_pipeline_json(
    activities_json: &str,
    categories_json: &str,
    page_state_json: &str,
) -> Result<String, JsValue> {
    let activities: Vec<ActivityRecord> = serde_json::from_str(activities_json)
        .map_err(|e| js_error("Invalid activities JSON", e))?;
    let categories: CategorySelection = serde_json::from_str(categories_json)
        .map_err(|e| js_error("Invalid categories JSON", e))?;
    let page_state: PageState = serde_json::from_str(page_state_json)
        .map_err(|e| js_error("Invalid page state JSON", e))?;

    let page = run_pipeline(activities, &categories, &page_state);
    serde_json::to_string(&page).map_err(|e| js_error("Serialization failed", e))
}

/// Fresh session for a travel date in `YYYY-MM-DD` form
#[wasm_bindgen]
pub fn new_session_json(today: &str) -> Result<String, JsValue> {
    let today = NaiveDate::parse_from_str(today, "%Y-%m-%d")
        .map_err(|e| js_error("Invalid date", e))?;
    serde_json::to_string(&SessionState::new(today))
        .map_err(|e| js_error("Serialization failed", e))
}

/// Apply one command to a serialized session state
#[wasm_bindgen]
pub fn apply_command_json(state_json: &str, command_json: &str) -> Result<String, JsValue> {
    let state: SessionState =
        serde_json::from_str(state_json).map_err(|e| js_error("Invalid state JSON", e))?;
    let command: SessionCommand =
        serde_json::from_str(command_json).map_err(|e| js_error("Invalid command JSON", e))?;

    let next = apply(state, command).map_err(|e| JsValue::from_str(&e.to_string()))?;
    serde_json::to_string(&next).map_err(|e| js_error("Serialization failed", e))
}

/// Validate a search radius in kilometres
#[wasm_bindgen]
pub fn is_valid_radius(km: u32) -> bool {
    validate_radius_km(km).is_ok()
}
