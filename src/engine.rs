//! Initialised, read-only application handle shared by every request handler

use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use crate::config::RecommenderConfig;
use crate::geocode::{GeocodeResolver, Geocoder, NominatimGeocoder};
use crate::models::Query;
use crate::recommend::{Recommendation, Recommender};
use crate::trip::{TripEstimate, TripPlanner};
use crate::Result;

/// Vocabularies accepted by the recommender
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectionOptions {
    pub zones: Vec<String>,
    pub significances: Vec<String>,
}

/// Catalog, index and trip planner, built once at startup
#[derive(Clone)]
pub struct TravelEngine {
    recommender: Arc<Recommender>,
    planner: TripPlanner,
}

impl TravelEngine {
    #[must_use]
    pub fn new(recommender: Recommender, planner: TripPlanner) -> Self {
        Self {
            recommender: Arc::new(recommender),
            planner,
        }
    }

    /// Load every artifact and wire the production geocoder.
    /// Any failure here is fatal: the process must not serve requests.
    pub fn from_config(config: &RecommenderConfig) -> Result<Self> {
        let geocoder: Arc<dyn Geocoder> = Arc::new(NominatimGeocoder::new(&config.geocoding)?);
        Self::with_geocoder(config, geocoder)
    }

    /// Load artifacts from the configuration with a caller-supplied geocoder
    pub fn with_geocoder(config: &RecommenderConfig, geocoder: Arc<dyn Geocoder>) -> Result<Self> {
        let recommender = Recommender::load(&config.data)?;
        let planner = TripPlanner::new(GeocodeResolver::new(geocoder, &config.geocoding));
        info!("Travel engine initialised");
        Ok(Self::new(recommender, planner))
    }

    /// Top destinations for a selection
    pub fn recommend(&self, query: &Query) -> Result<Vec<Recommendation>> {
        self.recommender.recommend(query)
    }

    /// Distance and cost between two free-text places
    pub async fn estimate(&self, source: &str, destination: &str) -> Result<TripEstimate> {
        self.planner.estimate(source, destination).await
    }

    #[must_use]
    pub fn planner(&self) -> &TripPlanner {
        &self.planner
    }

    #[must_use]
    pub fn options(&self) -> SelectionOptions {
        let encoder = self.recommender.encoder();
        SelectionOptions {
            zones: encoder.zones().to_vec(),
            significances: encoder.significances().to_vec(),
        }
    }
}
