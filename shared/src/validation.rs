//! Validation utilities for explorer inputs

use crate::models::WeatherSample;

pub const MIN_RADIUS_KM: u32 = 1;
pub const MAX_RADIUS_KM: u32 = 20;

/// Longest city query forwarded to the provider
pub const MAX_CITY_QUERY_LEN: usize = 64;

// ============================================================================
// Search Inputs
// ============================================================================

/// Validate the activity search radius (1-20 km)
pub fn validate_radius_km(radius_km: u32) -> Result<(), &'static str> {
    if !(MIN_RADIUS_KM..=MAX_RADIUS_KM).contains(&radius_km) {
        return Err("Search radius must be between 1 and 20 km");
    }
    Ok(())
}

/// Validate latitude/longitude are finite and inside their ranges
pub fn validate_coordinates(latitude: f64, longitude: f64) -> Result<(), &'static str> {
    if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
        return Err("Latitude must be between -90 and 90");
    }
    if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
        return Err("Longitude must be between -180 and 180");
    }
    Ok(())
}

/// Validate a city typeahead query
pub fn validate_city_query(query: &str) -> Result<(), &'static str> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        return Err("City query cannot be empty");
    }
    if trimmed.chars().count() > MAX_CITY_QUERY_LEN {
        return Err("City query is too long");
    }
    Ok(())
}

// ============================================================================
// Provider Data
// ============================================================================

/// Validate a weather sample coming back from the archive
pub fn validate_weather_sample(sample: &WeatherSample) -> Result<(), &'static str> {
    if !sample.max_temp_celsius.is_finite() || !sample.min_temp_celsius.is_finite() {
        return Err("Temperatures must be finite");
    }
    if !sample.precipitation_mm.is_finite() || sample.precipitation_mm < 0.0 {
        return Err("Precipitation cannot be negative");
    }
    Ok(())
}
