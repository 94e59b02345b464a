//! City typeahead suggestions

use serde::{Deserialize, Serialize};

use crate::types::GpsCoordinates;

/// A city the user can pick as the search centre
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CitySuggestion {
    pub name: String,
    /// IATA city code, empty when the provider has none
    #[serde(default)]
    pub iata_code: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl CitySuggestion {
    /// "Paris (PAR)", or just the name without an IATA code
    pub fn label(&self) -> String {
        if self.iata_code.is_empty() {
            self.name.clone()
        } else {
            format!("{} ({})", self.name, self.iata_code)
        }
    }

    pub fn coordinates(&self) -> GpsCoordinates {
        GpsCoordinates::new(self.latitude, self.longitude)
    }
}
