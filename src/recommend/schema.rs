//! On-disk format of the prebuilt neighbor index
//!
//! The index is produced out-of-band together with the transform that encoded
//! the catalog. Both travel in one JSON document so the online encoder is always
//! built from the same vocabulary as the stored points.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use super::encoder::FeatureEncoder;
use super::index::NeighborIndex;
use crate::{RecommenderError, Result};

/// The only artifact layout this build understands
pub const SUPPORTED_SCHEMA_VERSION: u32 = 1;

/// Distance metric fixed when the index was built
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceMetric {
    Euclidean,
    Manhattan,
}

impl DistanceMetric {
    #[must_use]
    pub fn distance(self, a: &[f64], b: &[f64]) -> f64 {
        match self {
            DistanceMetric::Euclidean => a
                .iter()
                .zip(b)
                .map(|(x, y)| (x - y).powi(2))
                .sum::<f64>()
                .sqrt(),
            DistanceMetric::Manhattan => a.iter().zip(b).map(|(x, y)| (x - y).abs()).sum(),
        }
    }
}

/// Category vocabularies of the transform, in column order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureSchema {
    pub zone: Vec<String>,
    pub significance: Vec<String>,
    #[serde(default = "default_airport_column")]
    pub airport_column: String,
}

fn default_airport_column() -> String {
    "Airport with 50km Radius".to_string()
}

/// Serialized transform plus neighbor index
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexArtifact {
    pub schema_version: u32,
    pub k: usize,
    pub metric: DistanceMetric,
    pub features: FeatureSchema,
    /// Encoded catalog rows, one per destination in catalog order
    pub points: Vec<Vec<f64>>,
}

impl IndexArtifact {
    /// Read an artifact from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading neighbor index from {}", path.display());

        let raw = fs::read_to_string(path).map_err(|e| {
            RecommenderError::config(format!(
                "Cannot read neighbor index {}: {e}",
                path.display()
            ))
        })?;

        serde_json::from_str(&raw).map_err(|e| {
            RecommenderError::config(format!(
                "Corrupt neighbor index {}: {e}",
                path.display()
            ))
        })
    }

    /// Validate the artifact and split it into the encoder and the index
    pub fn into_parts(self) -> Result<(FeatureEncoder, NeighborIndex)> {
        if self.schema_version != SUPPORTED_SCHEMA_VERSION {
            return Err(RecommenderError::config(format!(
                "Unsupported index schema version {} (expected {SUPPORTED_SCHEMA_VERSION})",
                self.schema_version
            )));
        }

        let encoder = FeatureEncoder::from_schema(self.features)?;
        let index = NeighborIndex::new(self.k, self.metric, encoder.dimension(), self.points)?;
        Ok((encoder, index))
    }
}
