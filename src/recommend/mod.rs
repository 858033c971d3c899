//! Destination recommendation
//!
//! This module provides the recommendation pipeline:
//! - Feature encoding of a user's selection
//! - Exact nearest-neighbor lookup over the prebuilt index
//! - Mapping neighbor rows back to catalog destinations

pub mod encoder;
pub mod index;
pub mod schema;

pub use encoder::FeatureEncoder;
pub use index::{Neighbor, NeighborIndex};
pub use schema::{DistanceMetric, FeatureSchema, IndexArtifact, SUPPORTED_SCHEMA_VERSION};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::catalog::Catalog;
use crate::config::DataConfig;
use crate::models::{Destination, Query};
use crate::{RecommenderError, Result};

/// One ranked destination
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    /// 1-based position in the result list
    pub rank: usize,
    /// Distance from the query in the encoded feature space
    pub distance: f64,
    pub destination: Destination,
}

/// Catalog, encoder and index bound together. Read-only after construction.
#[derive(Debug, Clone)]
pub struct Recommender {
    catalog: Catalog,
    encoder: FeatureEncoder,
    index: NeighborIndex,
}

impl Recommender {
    /// Load catalog and index artifacts named by the configuration
    pub fn load(data: &DataConfig) -> Result<Self> {
        let catalog = Catalog::load(&data.catalog_path)?;
        let (encoder, index) = IndexArtifact::load(&data.index_path)?.into_parts()?;
        Self::new(catalog, encoder, index)
    }

    pub fn new(catalog: Catalog, encoder: FeatureEncoder, index: NeighborIndex) -> Result<Self> {
        if catalog.len() != index.len() {
            return Err(RecommenderError::config(format!(
                "Catalog has {} destinations but the neighbor index has {} points",
                catalog.len(),
                index.len()
            )));
        }

        info!(
            "Recommender ready: {} destinations, k = {}, metric = {:?}",
            catalog.len(),
            index.k(),
            index.metric()
        );

        Ok(Self {
            catalog,
            encoder,
            index,
        })
    }

    #[must_use]
    pub fn encoder(&self) -> &FeatureEncoder {
        &self.encoder
    }

    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Nearest destinations for a query, closest first
    #[instrument(skip(self), fields(zone = %query.zone, significance = %query.significance))]
    pub fn recommend(&self, query: &Query) -> Result<Vec<Recommendation>> {
        let encoded = self.encoder.encode(query)?;
        let neighbors = self.index.kneighbors(&encoded)?;

        let recommendations = neighbors
            .into_iter()
            .enumerate()
            .map(|(position, neighbor)| {
                let destination = self.catalog.get(neighbor.row).ok_or_else(|| {
                    RecommenderError::config(format!(
                        "Neighbor index refers to missing catalog row {}",
                        neighbor.row
                    ))
                })?;
                Ok(Recommendation {
                    rank: position + 1,
                    distance: neighbor.distance,
                    destination: destination.clone(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        debug!(
            "Recommendations: {:?}",
            recommendations
                .iter()
                .map(|r| format!("{} ({:.3})", r.destination.name, r.distance))
                .collect::<Vec<_>>()
        );

        Ok(recommendations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UNSELECTED;

    fn destination(name: &str, zone: &str, significance: &str, airport: bool) -> Destination {
        Destination {
            name: name.to_string(),
            city: "City".to_string(),
            state: "State".to_string(),
            place_type: "Fort".to_string(),
            significance: significance.to_string(),
            entrance_fee: 0,
            rating: 4.0,
            zone: zone.to_string(),
            airport_within_50km: airport,
        }
    }

    fn recommender(k: usize) -> Recommender {
        let encoder = FeatureEncoder::from_schema(FeatureSchema {
            zone: vec!["Northern".into(), "Southern".into()],
            significance: vec!["Historical".into(), "Religious".into()],
            airport_column: String::new(),
        })
        .unwrap();

        let destinations = vec![
            destination("Golden Temple", "Northern", "Religious", true),
            destination("Mysore Palace", "Southern", "Historical", false),
            destination("Taj Mahal", "Northern", "Historical", true),
            destination("Qutub Minar", "Northern", "Historical", true),
            destination("Meenakshi Temple", "Southern", "Religious", true),
            destination("Chittorgarh Fort", "Northern", "Historical", false),
        ];

        let points = destinations
            .iter()
            .map(|d| {
                encoder
                    .encode(&Query::new(&d.zone, &d.significance, d.airport_within_50km))
                    .unwrap()
            })
            .collect();

        let index =
            NeighborIndex::new(k, DistanceMetric::Euclidean, encoder.dimension(), points).unwrap();
        Recommender::new(Catalog::from_destinations(destinations).unwrap(), encoder, index)
            .unwrap()
    }

    #[test]
    fn test_recommend_ranks_exact_matches_first() {
        let results = recommender(3)
            .recommend(&Query::new("Northern", "Historical", true))
            .unwrap();

        let names: Vec<&str> = results.iter().map(|r| r.destination.name.as_str()).collect();
        assert_eq!(names, vec!["Taj Mahal", "Qutub Minar", "Chittorgarh Fort"]);
        assert_eq!(results[0].rank, 1);
        assert_eq!(results[2].rank, 3);
        assert_eq!(results[0].distance, 0.0);
        assert_eq!(results[2].distance, 1.0);
    }

    #[test]
    fn test_recommend_is_deterministic() {
        let recommender = recommender(5);
        let query = Query::new("Southern", "Religious", false);
        let first = recommender.recommend(&query).unwrap();
        let second = recommender.recommend(&query).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.len(), 5);
    }

    #[test]
    fn test_recommend_rejects_unselected() {
        let err = recommender(3)
            .recommend(&Query::new(UNSELECTED, "Historical", true))
            .unwrap_err();
        assert!(matches!(err, RecommenderError::Validation { .. }));
    }

    #[test]
    fn test_catalog_index_size_mismatch_is_fatal() {
        let encoder = FeatureEncoder::from_schema(FeatureSchema {
            zone: vec!["Northern".into()],
            significance: vec!["Historical".into()],
            airport_column: String::new(),
        })
        .unwrap();
        let index = NeighborIndex::new(
            1,
            DistanceMetric::Euclidean,
            3,
            vec![vec![1.0, 1.0, 1.0], vec![1.0, 1.0, 0.0]],
        )
        .unwrap();
        let catalog =
            Catalog::from_destinations(vec![destination("Taj Mahal", "Northern", "Historical", true)])
                .unwrap();

        let err = Recommender::new(catalog, encoder, index).unwrap_err();
        assert!(matches!(err, RecommenderError::Config { .. }));
    }
}
