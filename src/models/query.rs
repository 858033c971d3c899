//! Recommendation query and the selection vocabularies offered to users

use serde::{Deserialize, Deserializer, Serialize};

use crate::{RecommenderError, Result};

/// Placeholder shown before the user picks a value
pub const UNSELECTED: &str = "-- Select --";

/// Zones offered for selection
pub const ZONES: [&str; 6] = [
    "Northern",
    "Central",
    "Southern",
    "Western",
    "Eastern",
    "North-East",
];

/// Significance categories offered for selection
pub const SIGNIFICANCES: [&str; 25] = [
    "Historical",
    "Religious",
    "Environmental",
    "Scientific",
    "Market",
    "Botanical",
    "Artistic",
    "Scenic",
    "Wildlife",
    "Recreational",
    "Nature",
    "Architectural",
    "Entertainment",
    "Sports",
    "Educational",
    "Cultural",
    "Food",
    "Spiritual",
    "Archaeological",
    "Adventure",
    "Agricultural",
    "Engineering Marvel",
    "Natural Wonder",
    "Trekking",
    "Shopping",
];

/// A user's categorical selection for one recommendation request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Query {
    pub zone: String,
    pub significance: String,
    /// Accepts `true`/`false`, the encoded `1.0`/`0.0`, or a yes/no string
    #[serde(default, deserialize_with = "deserialize_airport_flag")]
    pub airport_within_50km: bool,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum AirportFlag {
    Bool(bool),
    Number(f64),
    Text(String),
}

fn deserialize_airport_flag<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    match AirportFlag::deserialize(deserializer)? {
        AirportFlag::Bool(flag) => Ok(flag),
        AirportFlag::Number(value) if value == 1.0 => Ok(true),
        AirportFlag::Number(value) if value == 0.0 => Ok(false),
        AirportFlag::Number(value) => Err(serde::de::Error::custom(format!(
            "airport flag must be 1.0 or 0.0, got {value}"
        ))),
        AirportFlag::Text(text) => parse_airport_flag(&text).map_err(serde::de::Error::custom),
    }
}

impl Query {
    #[must_use]
    pub fn new(
        zone: impl Into<String>,
        significance: impl Into<String>,
        airport_within_50km: bool,
    ) -> Self {
        Self {
            zone: zone.into(),
            significance: significance.into(),
            airport_within_50km,
        }
    }

    /// Airport flag in the numeric form used by the encoding
    #[must_use]
    pub fn airport_value(&self) -> f64 {
        if self.airport_within_50km { 1.0 } else { 0.0 }
    }
}

/// True when a selection was left at the placeholder or blank
#[must_use]
pub fn is_unselected(value: &str) -> bool {
    let value = value.trim();
    value.is_empty() || value == UNSELECTED
}

/// Parse a yes/no style airport answer
pub fn parse_airport_flag(input: &str) -> Result<bool> {
    match input.trim().to_ascii_lowercase().as_str() {
        "yes" | "y" | "true" | "1" | "1.0" => Ok(true),
        "no" | "n" | "false" | "0" | "0.0" => Ok(false),
        other => Err(RecommenderError::validation(format!(
            "Airport within 50 km must be 'yes' or 'no', got '{other}'"
        ))),
    }
}
