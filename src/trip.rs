//! Trip planning: resolve two place names and estimate the journey
//!
//! The interactive flow moves through
//! `AwaitingInput -> Resolving -> {Resolved, NotFound, Failed}`.
//! Terminal states end the request, never the process: a new submission starts
//! the flow again.

use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::estimate::CostEstimate;
use crate::geocode::{GeocodeOutcome, GeocodeResolver};
use crate::models::Place;
use crate::{RecommenderError, Result};

/// Resolved endpoints and the cost projection between them
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TripEstimate {
    pub source: Place,
    pub destination: Place,
    pub cost: CostEstimate,
}

impl TripEstimate {
    #[must_use]
    pub fn new(source: Place, destination: Place) -> Self {
        let cost = CostEstimate::between(&source, &destination);
        Self {
            source,
            destination,
            cost,
        }
    }
}

/// Resolves trip endpoints through the geocoder and prices the distance
#[derive(Clone)]
pub struct TripPlanner {
    resolver: GeocodeResolver,
}

impl TripPlanner {
    #[must_use]
    pub fn new(resolver: GeocodeResolver) -> Self {
        Self { resolver }
    }

    /// Resolve both places, then estimate distance and cost
    #[instrument(skip(self))]
    pub async fn estimate(&self, source: &str, destination: &str) -> Result<TripEstimate> {
        let source = source.trim();
        let destination = destination.trim();
        if source.is_empty() || destination.is_empty() {
            return Err(RecommenderError::validation(
                "Please fill in both Start Location and Destination",
            ));
        }

        let from = self.resolver.resolve(source).await?;
        let to = self.resolver.resolve(destination).await?;

        match (from, to) {
            (GeocodeOutcome::Resolved(from), GeocodeOutcome::Resolved(to)) => {
                let trip = TripEstimate::new(from, to);
                info!(
                    "Estimated {} -> {}: {:.2} km",
                    source, destination, trip.cost.distance_km
                );
                Ok(trip)
            }
            (from, to) => {
                let unresolved: Vec<&str> = [(from, source), (to, destination)]
                    .into_iter()
                    .filter(|(outcome, _)| *outcome == GeocodeOutcome::NotFound)
                    .map(|(_, name)| name)
                    .collect();
                Err(RecommenderError::not_found(unresolved.join(", ")))
            }
        }
    }
}

/// State of one distance request
#[derive(Debug)]
pub enum FlowState {
    AwaitingInput,
    Resolving,
    Resolved(TripEstimate),
    /// One or both places could not be located
    NotFound(String),
    Failed(RecommenderError),
}

impl FlowState {
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            FlowState::AwaitingInput => "AwaitingInput",
            FlowState::Resolving => "Resolving",
            FlowState::Resolved(_) => "Resolved",
            FlowState::NotFound(_) => "NotFound",
            FlowState::Failed(_) => "Failed",
        }
    }

    /// Whether the request has finished
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            FlowState::Resolved(_) | FlowState::NotFound(_) | FlowState::Failed(_)
        )
    }
}

/// Per-request driver of the distance flow
#[derive(Debug)]
pub struct DistanceFlow {
    state: FlowState,
}

impl Default for DistanceFlow {
    fn default() -> Self {
        Self::new()
    }
}

impl DistanceFlow {
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: FlowState::AwaitingInput,
        }
    }

    #[must_use]
    pub fn state(&self) -> &FlowState {
        &self.state
    }

    /// Consume the flow, yielding its final state
    #[must_use]
    pub fn into_state(self) -> FlowState {
        self.state
    }

    /// Submit a pair of place names. Blank input keeps the flow awaiting input.
    pub async fn submit(
        &mut self,
        planner: &TripPlanner,
        source: &str,
        destination: &str,
    ) -> &FlowState {
        if source.trim().is_empty() || destination.trim().is_empty() {
            debug!("Distance flow waiting for both places");
            self.transition(FlowState::AwaitingInput);
            return &self.state;
        }

        self.transition(FlowState::Resolving);
        let next = match planner.estimate(source, destination).await {
            Ok(trip) => FlowState::Resolved(trip),
            Err(RecommenderError::NotFound { query }) => FlowState::NotFound(query),
            Err(e) => FlowState::Failed(e),
        };
        self.transition(next);
        &self.state
    }

    fn transition(&mut self, next: FlowState) {
        debug!("Distance flow: {} -> {}", self.state.name(), next.name());
        self.state = next;
    }
}
