//! Catalog Loading Module
//!
//! Reads the fixed destination table into memory once at startup. Row order is
//! significant: the neighbor index refers to destinations by row position.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Deserializer};
use tracing::{debug, info};

use crate::models::Destination;
use crate::{RecommenderError, Result};

/// One CSV row as it appears in the catalog file
#[derive(Debug, Deserialize)]
struct CatalogRecord {
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "City")]
    city: String,
    #[serde(rename = "State")]
    state: String,
    #[serde(rename = "Type")]
    place_type: String,
    #[serde(rename = "Significance")]
    significance: String,
    #[serde(rename = "Entrance Fee in INR")]
    entrance_fee: u32,
    #[serde(rename = "Google review rating")]
    rating: f64,
    #[serde(rename = "Zone")]
    zone: String,
    #[serde(
        rename = "Airport with 50km Radius",
        deserialize_with = "deserialize_airport_flag"
    )]
    airport_within_50km: bool,
}

impl From<CatalogRecord> for Destination {
    fn from(record: CatalogRecord) -> Self {
        Destination {
            name: record.name,
            city: record.city,
            state: record.state,
            place_type: record.place_type,
            significance: record.significance,
            entrance_fee: record.entrance_fee,
            rating: record.rating,
            zone: record.zone,
            airport_within_50km: record.airport_within_50km,
        }
    }
}

fn deserialize_airport_flag<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "1.0" | "yes" | "true" => Ok(true),
        "0" | "0.0" | "no" | "false" => Ok(false),
        other => Err(serde::de::Error::custom(format!(
            "invalid airport flag '{other}'"
        ))),
    }
}

/// Immutable, in-memory destination catalog
#[derive(Debug, Clone)]
pub struct Catalog {
    destinations: Vec<Destination>,
}

impl Catalog {
    /// Load the catalog from a CSV file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading destination catalog from {}", path.display());

        let file = File::open(path).map_err(|e| {
            RecommenderError::config(format!(
                "Cannot open catalog {}: {e}",
                path.display()
            ))
        })?;

        let catalog = Self::from_reader(file, &path.display().to_string())?;
        info!("Loaded {} destinations", catalog.len());
        Ok(catalog)
    }

    /// Parse a catalog from any CSV source; `source` names it in error messages
    pub fn from_reader<R: Read>(reader: R, source: &str) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut destinations = Vec::new();
        for (row, record) in reader.deserialize::<CatalogRecord>().enumerate() {
            // header is line 1
            let record = record.map_err(|e| {
                RecommenderError::config(format!(
                    "Malformed catalog row {} in {source}: {e}",
                    row + 2
                ))
            })?;
            destinations.push(Destination::from(record));
        }

        debug!("Parsed {} catalog rows from {source}", destinations.len());
        Self::from_destinations(destinations)
    }

    /// Build a catalog from already-parsed destinations
    pub fn from_destinations(destinations: Vec<Destination>) -> Result<Self> {
        if destinations.is_empty() {
            return Err(RecommenderError::config("Destination catalog is empty"));
        }
        Ok(Self { destinations })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.destinations.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.destinations.is_empty()
    }

    /// Destination at a row position
    #[must_use]
    pub fn get(&self, row: usize) -> Option<&Destination> {
        self.destinations.get(row)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Destination> {
        self.destinations.iter()
    }
}
