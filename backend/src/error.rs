//! Error handling for the activity explorer
//!
//! Provides consistent error responses in English and German

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use shared::SessionError;
use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Validation errors
    #[error("Validation error: {message}")]
    Validation {
        field: String,
        message: String,
        message_de: String,
    },

    // External service errors
    #[error("Access token request failed: {0}")]
    TokenAcquisition(String),

    #[error("Activity search failed: {0}")]
    ActivitySearch(String),

    #[error("External service error: {0}")]
    ExternalService(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    // Internal errors
    #[error("Internal server error")]
    InternalError(#[from] anyhow::Error),
}

impl AppError {
    pub fn validation(field: &str, message: &str) -> Self {
        AppError::Validation {
            field: field.to_string(),
            message: message.to_string(),
            message_de: format!("Ungültige Eingabe: {}", message),
        }
    }

    /// Whether the failure aborts a search (as opposed to a bad request)
    pub fn is_fatal_to_search(&self) -> bool {
        matches!(
            self,
            AppError::TokenAcquisition(_) | AppError::ActivitySearch(_)
        )
    }
}

impl From<SessionError> for AppError {
    fn from(err: SessionError) -> Self {
        let field = match err {
            SessionError::InvalidRadius(_) => "radius_km",
            SessionError::InvalidPageSize(_) => "page_size",
            SessionError::NoCitySelected => "city",
        };
        AppError::validation(field, &err.to_string())
    }
}

/// Error response structure
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message_en: String,
    pub message_de: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_detail) = match &self {
            AppError::Validation {
                field,
                message,
                message_de,
            } => (
                StatusCode::BAD_REQUEST,
                ErrorDetail {
                    code: "VALIDATION_ERROR".to_string(),
                    message_en: message.clone(),
                    message_de: message_de.clone(),
                    field: Some(field.clone()),
                },
            ),
            AppError::TokenAcquisition(msg) => (
                StatusCode::BAD_GATEWAY,
                ErrorDetail {
                    code: "TOKEN_ACQUISITION_FAILED".to_string(),
                    message_en: format!("API error: could not authenticate ({})", msg),
                    message_de: format!("API-Fehler: Anmeldung fehlgeschlagen ({})", msg),
                    field: None,
                },
            ),
            AppError::ActivitySearch(msg) => (
                StatusCode::BAD_GATEWAY,
                ErrorDetail {
                    code: "ACTIVITY_SEARCH_FAILED".to_string(),
                    message_en: format!("API error: {}", msg),
                    message_de: format!("API-Fehler: {}", msg),
                    field: None,
                },
            ),
            AppError::ExternalService(msg) => (
                StatusCode::BAD_GATEWAY,
                ErrorDetail {
                    code: "EXTERNAL_SERVICE_ERROR".to_string(),
                    message_en: format!("External service error: {}", msg),
                    message_de: format!("Fehler beim externen Dienst: {}", msg),
                    field: None,
                },
            ),
            AppError::Configuration(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail {
                    code: "CONFIGURATION_ERROR".to_string(),
                    message_en: format!("Configuration error: {}", msg),
                    message_de: format!("Konfigurationsfehler: {}", msg),
                    field: None,
                },
            ),
            AppError::InternalError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail {
                    code: "INTERNAL_ERROR".to_string(),
                    message_en: "An internal server error occurred".to_string(),
                    message_de: "Ein interner Serverfehler ist aufgetreten".to_string(),
                    field: None,
                },
            ),
        };

        // Log the error for debugging
        tracing::error!("Error: {:?}", self);

        (status, Json(ErrorResponse { error: error_detail })).into_response()
    }
}

/// Result type alias for handlers
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_error_maps_to_field() {
        let err: AppError = SessionError::InvalidRadius(42).into();
        match err {
            AppError::Validation { field, message, .. } => {
                assert_eq!(field, "radius_km");
                assert!(message.contains("42"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_status_codes() {
        let response = AppError::ActivitySearch("HTTP 500".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

        let response = AppError::validation("q", "City query cannot be empty").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_fatal_classification() {
        assert!(AppError::TokenAcquisition("401".into()).is_fatal_to_search());
        assert!(!AppError::ExternalService("timeout".into()).is_fatal_to_search());
    }
}
