//! Error handling and custom error types
//!
//! Provides unified error handling across the application using thiserror.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("AI provider error: {0}")]
    AiProvider(String),

    #[error("Geocoding timed out: {0}")]
    GeocodeTimeout(String),

    #[error("Geocoding service error: {0}")]
    Geocoder(String),

    #[error("EXIF read error: {0}")]
    Exif(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Only timeouts are worth another geocoding attempt.
    pub fn is_retryable_geocode(&self) -> bool {
        matches!(self, Error::GeocodeTimeout(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_timeouts_are_retryable() {
        assert!(Error::GeocodeTimeout("slow".to_string()).is_retryable_geocode());
        assert!(!Error::Geocoder("503".to_string()).is_retryable_geocode());
        assert!(!Error::AiProvider("boom".to_string()).is_retryable_geocode());
    }

    #[test]
    fn test_display_includes_context() {
        let err = Error::Config("GEOCODE_MAX_ATTEMPTS must be a number".to_string());
        assert_eq!(
            err.to_string(),
            "Configuration error: GEOCODE_MAX_ATTEMPTS must be a number"
        );
    }
}
