//! JSON API over the travel engine

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::engine::{SelectionOptions, TravelEngine};
use crate::models::{Destination, Query};
use crate::recommend::Recommendation;
use crate::trip::TripEstimate;
use crate::RecommenderError;

#[derive(Serialize, Deserialize)]
pub struct ApiRecommendation {
    pub rank: usize,
    pub distance: f64,
    pub location: String,
    pub map_url: String,
    pub destination: Destination,
}

impl From<Recommendation> for ApiRecommendation {
    fn from(recommendation: Recommendation) -> Self {
        Self {
            rank: recommendation.rank,
            distance: recommendation.distance,
            location: recommendation.destination.location_label(),
            map_url: recommendation.destination.map_url(),
            destination: recommendation.destination,
        }
    }
}

#[derive(Serialize, Deserialize)]
pub struct EstimateRequest {
    pub source: String,
    pub destination: String,
}

#[derive(Serialize, Deserialize)]
pub struct ApiErrorBody {
    pub error: String,
    pub message: String,
}

/// Error wrapper that renders as a JSON body with a matching status
pub struct ApiError(RecommenderError);

impl From<RecommenderError> for ApiError {
    fn from(err: RecommenderError) -> Self {
        Self(err)
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self.0 {
            RecommenderError::Validation { .. } => StatusCode::BAD_REQUEST,
            RecommenderError::NotFound { .. } => StatusCode::NOT_FOUND,
            RecommenderError::TransientService { .. }
            | RecommenderError::ServiceRejected { .. } => StatusCode::SERVICE_UNAVAILABLE,
            RecommenderError::Config { .. } | RecommenderError::Io { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        warn!("Request failed with {}: {}", status, self.0);
        let body = ApiErrorBody {
            error: self.0.code().to_string(),
            message: self.0.user_message(),
        };
        (status, Json(body)).into_response()
    }
}

pub fn router(engine: TravelEngine) -> Router {
    Router::new()
        .route("/options", get(get_options))
        .route("/recommendations", post(recommend))
        .route("/estimates", post(estimate))
        .with_state(engine)
}

async fn get_options(State(engine): State<TravelEngine>) -> Json<SelectionOptions> {
    Json(engine.options())
}

async fn recommend(
    State(engine): State<TravelEngine>,
    Json(query): Json<Query>,
) -> Result<Json<Vec<ApiRecommendation>>, ApiError> {
    let recommendations = engine.recommend(&query)?;
    Ok(Json(
        recommendations
            .into_iter()
            .map(ApiRecommendation::from)
            .collect(),
    ))
}

async fn estimate(
    State(engine): State<TravelEngine>,
    Json(request): Json<EstimateRequest>,
) -> Result<Json<TripEstimate>, ApiError> {
    let trip = engine
        .estimate(&request.source, &request.destination)
        .await?;
    Ok(Json(trip))
}
