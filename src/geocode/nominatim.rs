//! OpenStreetMap Nominatim client

use async_trait::async_trait;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{Retryable, default_on_request_failure, default_on_request_success};
use serde::Deserialize;
use tracing::{debug, warn};

use super::{GeocodeError, Geocoder};
use crate::config::GeocodingConfig;
use crate::models::Place;
use crate::{RecommenderError, Result};

/// Search result as returned by Nominatim (coordinates arrive as strings)
#[derive(Debug, Deserialize)]
pub struct NominatimResult {
    pub lat: String,
    pub lon: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

/// Nominatim search API client
pub struct NominatimGeocoder {
    client: ClientWithMiddleware,
    base_url: String,
}

impl NominatimGeocoder {
    pub fn new(config: &GeocodingConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.attempt_timeout())
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| RecommenderError::config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client: ClientBuilder::new(client).build(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn search_url(&self, query: &str) -> String {
        format!(
            "{}/search?q={}&format=json&limit=1",
            self.base_url,
            urlencoding::encode(query)
        )
    }
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    async fn geocode(&self, query: &str) -> std::result::Result<Option<Place>, GeocodeError> {
        let url = self.search_url(query);
        debug!("Nominatim request URL: {}", url);

        let outcome = self.client.get(&url).send().await;
        let response = match outcome {
            Ok(response) => response,
            Err(e) => {
                warn!("Nominatim request for '{}' failed: {}", query, e);
                return Err(match default_on_request_failure(&e) {
                    Some(Retryable::Transient) => GeocodeError::Transient(e.to_string()),
                    _ => GeocodeError::Fatal(e.to_string()),
                });
            }
        };

        classify_status(&response)?;

        let results: Vec<NominatimResult> = response.json().await.map_err(|e| {
            if e.is_timeout() {
                GeocodeError::Transient(format!("timed out reading Nominatim response: {e}"))
            } else {
                GeocodeError::Fatal(format!("invalid Nominatim response: {e}"))
            }
        })?;

        first_place(query, results)
    }
}

/// Map a non-success HTTP status onto the retry taxonomy
fn classify_status(response: &reqwest::Response) -> std::result::Result<(), GeocodeError> {
    let status = response.status();
    match default_on_request_success(response) {
        None => Ok(()),
        Some(Retryable::Transient) => Err(GeocodeError::Transient(format!(
            "Nominatim answered {status}"
        ))),
        Some(Retryable::Fatal) => Err(GeocodeError::Fatal(format!(
            "Nominatim answered {status}"
        ))),
    }
}

/// Convert the best search result into a place; empty results mean "not found"
fn first_place(
    query: &str,
    results: Vec<NominatimResult>,
) -> std::result::Result<Option<Place>, GeocodeError> {
    let Some(best) = results.into_iter().next() else {
        debug!("No Nominatim match for '{}'", query);
        return Ok(None);
    };

    let latitude: f64 = best
        .lat
        .trim()
        .parse()
        .map_err(|_| GeocodeError::Fatal(format!("invalid latitude '{}'", best.lat)))?;
    let longitude: f64 = best
        .lon
        .trim()
        .parse()
        .map_err(|_| GeocodeError::Fatal(format!("invalid longitude '{}'", best.lon)))?;

    let mut place = Place::new(query, latitude, longitude);
    if !place.has_valid_coordinates() {
        return Err(GeocodeError::Fatal(format!(
            "coordinates out of range: {}",
            place.format_coordinates()
        )));
    }
    if let Some(display_name) = best.display_name {
        place = place.with_display_name(display_name);
    }
    Ok(Some(place))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn parse(body: &str) -> Vec<NominatimResult> {
        serde_json::from_str(body).unwrap()
    }

    #[test]
    fn test_search_url_encodes_query() {
        let config = GeocodingConfig {
            base_url: "https://nominatim.example.org/".to_string(),
            ..GeocodingConfig::default()
        };
        let geocoder = NominatimGeocoder::new(&config).unwrap();
        assert_eq!(
            geocoder.search_url("New Delhi, India"),
            "https://nominatim.example.org/search?q=New%20Delhi%2C%20India&format=json&limit=1"
        );
    }

    #[test]
    fn test_first_place_parses_string_coordinates() {
        let results = parse(
            r#"[{"lat":"26.9154576","lon":"75.8189817","display_name":"Jaipur, Rajasthan, India","importance":0.7}]"#,
        );
        let place = first_place("Jaipur", results).unwrap().unwrap();
        assert_eq!(place.name, "Jaipur");
        assert!((place.latitude - 26.915_457_6).abs() < 1e-9);
        assert!((place.longitude - 75.818_981_7).abs() < 1e-9);
        assert_eq!(place.display_name.as_deref(), Some("Jaipur, Rajasthan, India"));
    }

    #[test]
    fn test_empty_results_mean_not_found() {
        assert_eq!(first_place("Atlantis", parse("[]")).unwrap(), None);
    }

    #[test]
    fn test_bad_coordinates_are_fatal() {
        let err = first_place("x", parse(r#"[{"lat":"north","lon":"1.0"}]"#)).unwrap_err();
        assert!(!err.is_transient());

        let err = first_place("x", parse(r#"[{"lat":"95.0","lon":"1.0"}]"#)).unwrap_err();
        assert!(!err.is_transient());
    }

    #[rstest]
    #[case(200, None)]
    #[case(408, Some(true))]
    #[case(429, Some(true))]
    #[case(500, Some(true))]
    #[case(503, Some(true))]
    #[case(400, Some(false))]
    #[case(403, Some(false))]
    fn test_classify_status(#[case] status: u16, #[case] transient: Option<bool>) {
        let response = reqwest::Response::from(
            axum::http::Response::builder()
                .status(status)
                .body("")
                .unwrap(),
        );
        let result = classify_status(&response);
        assert_eq!(result.err().map(|e| e.is_transient()), transient);
    }
}
