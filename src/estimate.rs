//! Distance and travel cost estimation
//!
//! Pure functions of two coordinates: geodesic distance on the WGS-84
//! ellipsoid in kilometers and linear per-kilometer cost projections for each
//! transport mode.

use geo::{GeodesicDistance, Point};
use serde::{Deserialize, Serialize};

use crate::models::Place;

/// Ground transport options with a fixed price per kilometer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportMode {
    Car,
    Bus,
    Train,
}

impl TransportMode {
    pub const ALL: [TransportMode; 3] = [TransportMode::Car, TransportMode::Bus, TransportMode::Train];

    /// Price in INR per kilometer
    #[must_use]
    pub fn rate_per_km(self) -> f64 {
        match self {
            TransportMode::Car => 12.0,
            TransportMode::Bus => 5.0,
            TransportMode::Train => 2.0,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            TransportMode::Car => "Car",
            TransportMode::Bus => "Bus",
            TransportMode::Train => "Train",
        }
    }
}

/// Distance and projected cost per mode, all rounded to 2 decimals
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostEstimate {
    pub distance_km: f64,
    pub car_cost: f64,
    pub bus_cost: f64,
    pub train_cost: f64,
}

impl CostEstimate {
    /// Project costs for a distance. Rates apply to the rounded distance.
    #[must_use]
    pub fn from_distance(distance_km: f64) -> Self {
        let distance_km = round2(distance_km);
        let cost = |mode: TransportMode| round2(distance_km * mode.rate_per_km());
        Self {
            distance_km,
            car_cost: cost(TransportMode::Car),
            bus_cost: cost(TransportMode::Bus),
            train_cost: cost(TransportMode::Train),
        }
    }

    /// Estimate for the geodesic distance between two places
    #[must_use]
    pub fn between(from: &Place, to: &Place) -> Self {
        Self::from_distance(geodesic_km(from, to))
    }

    #[must_use]
    pub fn cost_for(&self, mode: TransportMode) -> f64 {
        match mode {
            TransportMode::Car => self.car_cost,
            TransportMode::Bus => self.bus_cost,
            TransportMode::Train => self.train_cost,
        }
    }

    /// (mode, cost) pairs in display order
    #[must_use]
    pub fn breakdown(&self) -> Vec<(TransportMode, f64)> {
        TransportMode::ALL
            .iter()
            .map(|&mode| (mode, self.cost_for(mode)))
            .collect()
    }
}

/// Geodesic distance between two places in kilometers (Karney, WGS-84)
#[must_use]
pub fn geodesic_km(from: &Place, to: &Place) -> f64 {
    let from = Point::new(from.longitude, from.latitude);
    let to = Point::new(to.longitude, to.latitude);
    from.geodesic_distance(&to) / 1000.0
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
