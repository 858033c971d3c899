//! Exact k-nearest-neighbor lookup over the encoded catalog

use super::schema::DistanceMetric;
use crate::{RecommenderError, Result};

/// A catalog row and its distance from the query
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    pub row: usize,
    pub distance: f64,
}

/// Prebuilt neighbor index. `k` and the metric are fixed at build time.
#[derive(Debug, Clone)]
pub struct NeighborIndex {
    k: usize,
    metric: DistanceMetric,
    dimension: usize,
    points: Vec<Vec<f64>>,
}

impl NeighborIndex {
    pub fn new(
        k: usize,
        metric: DistanceMetric,
        dimension: usize,
        points: Vec<Vec<f64>>,
    ) -> Result<Self> {
        if k == 0 {
            return Err(RecommenderError::config("Neighbor index declares k = 0"));
        }
        if points.is_empty() {
            return Err(RecommenderError::config("Neighbor index is empty"));
        }
        if points.len() < k {
            return Err(RecommenderError::config(format!(
                "Neighbor index holds {} points but must return {k} neighbors",
                points.len()
            )));
        }

        for (row, point) in points.iter().enumerate() {
            if point.len() != dimension {
                return Err(RecommenderError::config(format!(
                    "Index point {row} has {} features, encoder produces {dimension}",
                    point.len()
                )));
            }
            if point.iter().any(|v| !v.is_finite()) {
                return Err(RecommenderError::config(format!(
                    "Index point {row} contains a non-finite value"
                )));
            }
        }

        Ok(Self {
            k,
            metric,
            dimension,
            points,
        })
    }

    #[must_use]
    pub fn k(&self) -> usize {
        self.k
    }

    #[must_use]
    pub fn metric(&self) -> DistanceMetric {
        self.metric
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The `k` closest rows, nearest first. Equal distances keep row order.
    pub fn kneighbors(&self, query: &[f64]) -> Result<Vec<Neighbor>> {
        if query.len() != self.dimension {
            return Err(RecommenderError::config(format!(
                "Query vector has {} features, index expects {}",
                query.len(),
                self.dimension
            )));
        }

        let mut neighbors: Vec<Neighbor> = self
            .points
            .iter()
            .enumerate()
            .map(|(row, point)| Neighbor {
                row,
                distance: self.metric.distance(query, point),
            })
            .collect();

        // stable sort
        neighbors.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        neighbors.truncate(self.k);
        Ok(neighbors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index(k: usize) -> NeighborIndex {
        NeighborIndex::new(
            k,
            DistanceMetric::Euclidean,
            2,
            vec![
                vec![5.0, 5.0],
                vec![1.0, 0.0],
                vec![0.0, 1.0],
                vec![0.0, 0.0],
                vec![3.0, 0.0],
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_kneighbors_sorted_ascending() {
        let neighbors = index(3).kneighbors(&[0.0, 0.0]).unwrap();
        let rows: Vec<usize> = neighbors.iter().map(|n| n.row).collect();
        assert_eq!(rows, vec![3, 1, 2]);
        assert_eq!(neighbors[0].distance, 0.0);
        assert!(neighbors.windows(2).all(|w| w[0].distance <= w[1].distance));
    }

    #[test]
    fn test_ties_keep_row_order() {
        // rows 1, 2 and 3 are equidistant from the centre of the unit square
        let neighbors = index(2).kneighbors(&[0.5, 0.5]).unwrap();
        let rows: Vec<usize> = neighbors.iter().map(|n| n.row).collect();
        assert_eq!(rows, vec![1, 2]);

        // rows 1 and 2 are both at distance 1.0
        let neighbors = index(4).kneighbors(&[0.0, 0.0]).unwrap();
        assert_eq!(neighbors[1].row, 1);
        assert_eq!(neighbors[2].row, 2);
    }

    #[test]
    fn test_returns_exactly_k() {
        assert_eq!(index(5).kneighbors(&[9.0, 9.0]).unwrap().len(), 5);
        assert_eq!(index(1).kneighbors(&[9.0, 9.0]).unwrap().len(), 1);
    }

    #[test]
    fn test_dimension_mismatch_is_rejected() {
        assert!(index(1).kneighbors(&[0.0, 0.0, 0.0]).is_err());
    }

    #[test]
    fn test_invalid_indexes_are_fatal() {
        let err = NeighborIndex::new(5, DistanceMetric::Euclidean, 2, vec![]).unwrap_err();
        assert!(err.to_string().contains("empty"));

        let err = NeighborIndex::new(3, DistanceMetric::Euclidean, 1, vec![vec![0.0]; 2])
            .unwrap_err();
        assert!(err.to_string().contains("must return 3"));

        let err = NeighborIndex::new(1, DistanceMetric::Euclidean, 2, vec![vec![0.0]])
            .unwrap_err();
        assert!(err.to_string().contains("has 1 features"));

        let err = NeighborIndex::new(1, DistanceMetric::Euclidean, 1, vec![vec![f64::NAN]])
            .unwrap_err();
        assert!(matches!(err, RecommenderError::Config { .. }));
    }
}
