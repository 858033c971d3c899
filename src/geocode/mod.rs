//! Geocoding
//!
//! Free-text place names are resolved by an external service behind the
//! [`Geocoder`] trait. [`GeocodeResolver`] adds the per-attempt timeout and the
//! bounded retry loop on top of any implementation.

pub mod nominatim;
pub mod resolver;

pub use nominatim::NominatimGeocoder;
pub use resolver::{GeocodeOutcome, GeocodeResolver};

use async_trait::async_trait;
use thiserror::Error;

use crate::models::Place;

/// Failure reported by a geocoding collaborator
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeocodeError {
    /// Network trouble, timeouts, throttling or 5xx answers. Worth retrying.
    #[error("transient geocoding failure: {0}")]
    Transient(String),
    /// The service rejected the request or answered with garbage. Retrying will not help.
    #[error("geocoding request failed: {0}")]
    Fatal(String),
}

impl GeocodeError {
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, GeocodeError::Transient(_))
    }
}

/// External geocoding service
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Resolve a place name. `Ok(None)` means the service answered without a match.
    async fn geocode(&self, query: &str) -> Result<Option<Place>, GeocodeError>;
}
