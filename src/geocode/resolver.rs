//! Bounded-retry wrapper around a geocoding collaborator

use std::sync::Arc;
use std::time::Duration;

use tokio::time::{Instant, sleep, timeout};
use tracing::{debug, error, info, instrument, warn};

use super::{GeocodeError, Geocoder};
use crate::config::GeocodingConfig;
use crate::models::Place;
use crate::{RecommenderError, Result};

/// Definitive answer for one place name
#[derive(Debug, Clone, PartialEq)]
pub enum GeocodeOutcome {
    Resolved(Place),
    /// The service answered but knows no such place
    NotFound,
}

/// Resolves place names with a per-attempt timeout and a fixed retry budget
#[derive(Clone)]
pub struct GeocodeResolver {
    geocoder: Arc<dyn Geocoder>,
    max_attempts: u32,
    retry_delay: Duration,
    attempt_timeout: Duration,
}

impl GeocodeResolver {
    pub fn new(geocoder: Arc<dyn Geocoder>, config: &GeocodingConfig) -> Self {
        Self::with_policy(
            geocoder,
            config.max_attempts,
            config.retry_delay(),
            config.attempt_timeout(),
        )
    }

    pub fn with_policy(
        geocoder: Arc<dyn Geocoder>,
        max_attempts: u32,
        retry_delay: Duration,
        attempt_timeout: Duration,
    ) -> Self {
        Self {
            geocoder,
            max_attempts: max_attempts.max(1),
            retry_delay,
            attempt_timeout,
        }
    }

    #[must_use]
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Resolve a place name. Only transient failures are retried.
    #[instrument(skip(self))]
    pub async fn resolve(&self, query: &str) -> Result<GeocodeOutcome> {
        let query = query.trim();
        if query.is_empty() {
            return Err(RecommenderError::validation("Place name cannot be empty"));
        }

        let started = Instant::now();
        let mut last_error = String::new();

        for attempt in 1..=self.max_attempts {
            debug!(
                "Geocoding '{}' (attempt {}/{})",
                query, attempt, self.max_attempts
            );

            let result = match timeout(self.attempt_timeout, self.geocoder.geocode(query)).await {
                Ok(result) => result,
                Err(_) => Err(GeocodeError::Transient(format!(
                    "no answer within {:.1}s",
                    self.attempt_timeout.as_secs_f64()
                ))),
            };

            match result {
                Ok(Some(place)) => {
                    info!(
                        "Resolved '{}' to ({}) in {:.3}s (attempt {})",
                        query,
                        place.format_coordinates(),
                        started.elapsed().as_secs_f64(),
                        attempt
                    );
                    return Ok(GeocodeOutcome::Resolved(place));
                }
                Ok(None) => {
                    warn!("No results found for place '{}'", query);
                    return Ok(GeocodeOutcome::NotFound);
                }
                Err(GeocodeError::Fatal(message)) => {
                    error!("Geocoding '{}' failed permanently: {}", query, message);
                    return Err(RecommenderError::service_rejected(message));
                }
                Err(GeocodeError::Transient(message)) => {
                    warn!(
                        "Transient geocoding failure on attempt {}: {}",
                        attempt, message
                    );
                    last_error = message;
                    if attempt < self.max_attempts {
                        sleep(self.retry_delay).await;
                    }
                }
            }
        }

        error!(
            "Geocoding '{}' failed after {} attempts: {}",
            query, self.max_attempts, last_error
        );
        Err(RecommenderError::transient(last_error, self.max_attempts))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicU32, Ordering};

    type Scripted = std::result::Result<Option<Place>, GeocodeError>;

    /// Replays canned answers and counts calls
    pub(crate) struct ScriptedGeocoder {
        answers: Mutex<VecDeque<Scripted>>,
        calls: AtomicU32,
        stall: Option<Duration>,
    }

    impl ScriptedGeocoder {
        pub(crate) fn new(answers: Vec<Scripted>) -> Self {
            Self {
                answers: Mutex::new(answers.into()),
                calls: AtomicU32::new(0),
                stall: None,
            }
        }

        fn stalling(stall: Duration) -> Self {
            Self {
                stall: Some(stall),
                ..Self::new(vec![])
            }
        }

        pub(crate) fn calls(&self) -> u32 {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Geocoder for ScriptedGeocoder {
        async fn geocode(&self, _query: &str) -> Scripted {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(stall) = self.stall {
                sleep(stall).await;
            }
            self.answers
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(GeocodeError::Transient("script exhausted".into())))
        }
    }

    fn resolver(geocoder: Arc<ScriptedGeocoder>) -> GeocodeResolver {
        GeocodeResolver::with_policy(
            geocoder,
            3,
            Duration::from_secs(1),
            Duration::from_secs(10),
        )
    }

    fn jaipur() -> Place {
        Place::new("Jaipur", 26.9124, 75.7873)
    }

    #[tokio::test(start_paused = true)]
    async fn test_resolves_on_first_attempt() {
        let geocoder = Arc::new(ScriptedGeocoder::new(vec![Ok(Some(jaipur()))]));
        let outcome = resolver(geocoder.clone()).resolve("Jaipur").await.unwrap();
        assert_eq!(outcome, GeocodeOutcome::Resolved(jaipur()));
        assert_eq!(geocoder.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_not_found_is_not_retried() {
        let geocoder = Arc::new(ScriptedGeocoder::new(vec![Ok(None), Ok(Some(jaipur()))]));
        let outcome = resolver(geocoder.clone()).resolve("Atlantis").await.unwrap();
        assert_eq!(outcome, GeocodeOutcome::NotFound);
        assert_eq!(geocoder.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_transient_failures_are_retried_with_fixed_delay() {
        let geocoder = Arc::new(ScriptedGeocoder::new(vec![
            Err(GeocodeError::Transient("connection reset".into())),
            Err(GeocodeError::Transient("HTTP 503".into())),
            Ok(Some(jaipur())),
        ]));

        let started = Instant::now();
        let outcome = resolver(geocoder.clone()).resolve("Jaipur").await.unwrap();
        assert_eq!(outcome, GeocodeOutcome::Resolved(jaipur()));
        assert_eq!(geocoder.calls(), 3);
        // two inter-attempt delays
        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_secs(2));
        assert!(elapsed < Duration::from_secs(3));
    }

    #[tokio::test(start_paused = true)]
    async fn test_gives_up_after_three_attempts() {
        let geocoder = Arc::new(ScriptedGeocoder::new(vec![
            Err(GeocodeError::Transient("first".into())),
            Err(GeocodeError::Transient("second".into())),
            Err(GeocodeError::Transient("third".into())),
            Ok(Some(jaipur())),
        ]));

        let err = resolver(geocoder.clone()).resolve("Jaipur").await.unwrap_err();
        assert_eq!(geocoder.calls(), 3);
        match err {
            RecommenderError::TransientService { message, attempts } => {
                assert_eq!(attempts, 3);
                assert_eq!(message, "third");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_fatal_failure_stops_immediately() {
        let geocoder = Arc::new(ScriptedGeocoder::new(vec![
            Err(GeocodeError::Fatal("HTTP 403".into())),
            Ok(Some(jaipur())),
        ]));

        let err = resolver(geocoder.clone()).resolve("Jaipur").await.unwrap_err();
        match &err {
            RecommenderError::ServiceRejected { message } => assert_eq!(message, "HTTP 403"),
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(!err.user_message().contains("did not respond"));
        assert_eq!(geocoder.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_attempts_time_out_and_count() {
        let geocoder = Arc::new(ScriptedGeocoder::stalling(Duration::from_secs(60)));
        let err = resolver(geocoder.clone()).resolve("Jaipur").await.unwrap_err();
        assert_eq!(geocoder.calls(), 3);
        assert!(err.to_string().contains("no answer within 10.0s"));
    }

    #[tokio::test]
    async fn test_blank_query_issues_no_request() {
        let geocoder = Arc::new(ScriptedGeocoder::new(vec![Ok(Some(jaipur()))]));
        let err = resolver(geocoder.clone()).resolve("   ").await.unwrap_err();
        assert!(matches!(err, RecommenderError::Validation { .. }));
        assert_eq!(geocoder.calls(), 0);
    }
}
