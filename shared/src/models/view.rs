//! Render-ready view of a session

use serde::{Deserialize, Serialize};

use super::activity::ActivityRecord;
use super::weather::WeatherReport;
use crate::types::{GpsCoordinates, PaginationMeta};

pub const NO_MATCHES_MESSAGE: &str = "No activities match current filters.";

/// One activity as displayed in the list
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ActivityCard {
    pub id: String,
    pub name: String,
    pub rating: String,
    pub description: String,
    pub price: String,
    pub duration: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub picture: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub booking_link: Option<String>,
}

impl From<&ActivityRecord> for ActivityCard {
    fn from(activity: &ActivityRecord) -> Self {
        Self {
            id: activity.id.clone(),
            name: non_empty_or(&activity.name, "No Name"),
            rating: activity.rating_label(),
            description: non_empty_or(&activity.short_description, "No description available."),
            price: activity.price_label(),
            duration: activity
                .minimum_duration
                .clone()
                .unwrap_or_else(|| "N/A".to_string()),
            picture: activity.pictures.first().cloned(),
            booking_link: activity.booking_link.clone(),
        }
    }
}

fn non_empty_or(value: &str, fallback: &str) -> String {
    if value.trim().is_empty() {
        fallback.to_string()
    } else {
        value.to_string()
    }
}

/// Everything needed to draw the results screen
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExplorerView {
    pub city_label: String,
    pub coordinates: GpsCoordinates,
    pub weather: WeatherReport,
    pub activities: Vec<ActivityCard>,
    pub pagination: PaginationMeta,
    /// e.g. "Page 1/3 — 5 of 12"
    pub headline: String,
    pub can_go_back: bool,
    pub can_go_forward: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub info: Option<String>,
}

impl ExplorerView {
    pub fn headline_for(pagination: &PaginationMeta, shown: usize) -> String {
        format!(
            "Page {}/{} — {} of {}",
            pagination.page, pagination.total_pages, shown, pagination.total_items
        )
    }
}
