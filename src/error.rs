//! Error types and handling for the travel recommender

use thiserror::Error;

/// Main error type for the travel recommender
#[derive(Error, Debug)]
pub enum RecommenderError {
    /// A required selection or input is missing or outside the accepted vocabulary
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// The geocoding service answered but could not locate the place
    #[error("Place not found: {query}")]
    NotFound { query: String },

    /// Network or service failure that persisted through every retry attempt
    #[error("Geocoding service unavailable after {attempts} attempt(s): {message}")]
    TransientService { message: String, attempts: u32 },

    /// The geocoding service answered with something retrying cannot fix (4xx, garbage body)
    #[error("Geocoding service rejected the request: {message}")]
    ServiceRejected { message: String },

    /// Missing or corrupt catalog, index or configuration. The process must not serve requests.
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl RecommenderError {
    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a new not-found error for a place query
    pub fn not_found<S: Into<String>>(query: S) -> Self {
        Self::NotFound {
            query: query.into(),
        }
    }

    /// Create a new transient service error
    pub fn transient<S: Into<String>>(message: S, attempts: u32) -> Self {
        Self::TransientService {
            message: message.into(),
            attempts,
        }
    }

    /// Create a new error for a definitive service rejection
    pub fn service_rejected<S: Into<String>>(message: S) -> Self {
        Self::ServiceRejected {
            message: message.into(),
        }
    }

    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Whether the user can fix the problem by changing the request
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::Config { .. } | Self::Io { .. })
    }

    /// Short machine-readable error code used by the HTTP API
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "validation_error",
            Self::NotFound { .. } => "not_found",
            Self::TransientService { .. } => "service_unavailable",
            Self::ServiceRejected { .. } => "service_rejected",
            Self::Config { .. } => "configuration_error",
            Self::Io { .. } => "io_error",
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation { message } => {
                format!("Invalid input: {message}")
            }
            Self::NotFound { query } => format!(
                "Unable to locate '{query}'. Try using full city names or check spelling."
            ),
            Self::TransientService { attempts, .. } => format!(
                "The geocoding service did not respond after {attempts} attempt(s). Please try again shortly."
            ),
            Self::ServiceRejected { .. } => {
                "The geocoding service could not handle this request. Please try again later."
                    .to_string()
            }
            Self::Config { .. } => {
                "Configuration error. Please check the catalog, index and config files.".to_string()
            }
            Self::Io { .. } => {
                "File operation failed. Please check file permissions.".to_string()
            }
        }
    }
}
