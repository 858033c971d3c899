//! Data models for the travel recommender
//!
//! This module contains the core domain models organized by concern:
//! - Destination: catalog entries returned by recommendations
//! - Place: geocoded locations used for distance estimates
//! - Query: a user's categorical selection

pub mod destination;
pub mod place;
pub mod query;

// Re-export all public types for convenient access
pub use destination::Destination;
pub use place::Place;
pub use query::{Query, UNSELECTED};
