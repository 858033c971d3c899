//! Travel destination recommendations and trip cost estimates for India
//!
//! This library loads a destination catalog with a prebuilt nearest-neighbour
//! index, recommends destinations for a zone and significance selection, and
//! estimates travel distance and cost between two geocoded places.

pub mod api;
pub mod catalog;
pub mod config;
pub mod engine;
pub mod error;
pub mod estimate;
pub mod geocode;
pub mod logging;
pub mod models;
pub mod recommend;
pub mod trip;
pub mod web;

// Re-export core types for public API
pub use catalog::Catalog;
pub use config::RecommenderConfig;
pub use engine::{SelectionOptions, TravelEngine};
pub use error::RecommenderError;
pub use estimate::{CostEstimate, TransportMode};
pub use geocode::{GeocodeError, GeocodeOutcome, GeocodeResolver, Geocoder, NominatimGeocoder};
pub use models::{Destination, Place, Query};
pub use recommend::{Recommendation, Recommender};
pub use trip::{DistanceFlow, FlowState, TripEstimate, TripPlanner};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, RecommenderError>;
