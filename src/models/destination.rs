//! Destination model for catalog entries

use serde::{Deserialize, Serialize};

const MAP_SEARCH_URL: &str = "https://www.google.com/maps/search/";

/// A single catalog entry. Row position in the catalog matches the neighbor index.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Destination {
    /// Attraction name
    pub name: String,
    pub city: String,
    pub state: String,
    /// Kind of place (Fort, Temple, Beach, ...)
    #[serde(rename = "type")]
    pub place_type: String,
    pub significance: String,
    /// Entrance fee in INR
    pub entrance_fee: u32,
    /// Google review rating out of 5
    pub rating: f64,
    pub zone: String,
    pub airport_within_50km: bool,
}

impl Destination {
    /// "City, State" label
    #[must_use]
    pub fn location_label(&self) -> String {
        format!("{}, {}", self.city, self.state)
    }

    /// Map search link for this destination
    #[must_use]
    pub fn map_url(&self) -> String {
        let place = format!("{}, {}, {}", self.name, self.city, self.state);
        format!("{MAP_SEARCH_URL}{}", place.replace(' ', "+"))
    }
}
