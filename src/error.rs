//! Error types for the MOT history client
//!
//! Every failure surfaces directly to the caller; nothing is retried or
//! logged away internally.

use thiserror::Error;

/// MOT history client errors
#[derive(Debug, Error)]
pub enum Error {
    /// Token endpoint unreachable, returned a non-2xx status, or the token
    /// response was missing expected fields
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Network failure while talking to the history API
    #[error("Network error: {0}")]
    Transport(reqwest::Error),

    /// History response body was not valid JSON
    #[error("Failed to decode response body: {0}")]
    Decode(reqwest::Error),

    /// Operation is not available on this client
    #[error("Operation not supported: {0}")]
    Unsupported(&'static str),

    /// Client was misconfigured (e.g. builder used without credentials)
    #[error("Configuration error: {0}")]
    Config(String),
}

#[cfg(test)]
mod tests {
    //! Unit tests for error display formatting.
    use super::*;

    /// Validates the error display messages scenario.
    ///
    /// Assertions:
    /// - Confirms each variant renders its prefix and payload.
    #[test]
    fn test_error_display_messages() {
        let error = Error::Authentication("token endpoint returned status 400".to_string());
        assert_eq!(error.to_string(), "Authentication failed: token endpoint returned status 400");

        let error = Error::Unsupported("bulk download");
        assert_eq!(error.to_string(), "Operation not supported: bulk download");

        let error = Error::Config("credentials not set".to_string());
        assert_eq!(error.to_string(), "Configuration error: credentials not set");
    }
}
