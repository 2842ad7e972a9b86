//! Credential and token types
//!
//! Defines the data model for the MOT history integration: the credential
//! bundle supplied at construction, the token-endpoint response shape, and
//! the cached bearer token with its absolute expiry checkpoint.

use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;

/// Tokens are treated as expired this many seconds before the
/// server-declared expiry, so a request never goes out with a token that
/// dies in flight.
pub const REFRESH_SAFETY_MARGIN_SECS: i64 = 60;

/// Credentials for the MOT history API
///
/// All four values come from the DVSA trade API registration. They are
/// immutable for the lifetime of the client; no format validation is
/// performed beyond what the API itself enforces.
#[derive(Debug, Clone)]
pub struct Credentials {
    /// OAuth client ID issued for the trade API
    pub client_id: String,

    /// OAuth client secret
    pub client_secret: String,

    /// API key sent as `X-API-Key` on history lookups
    pub api_key: String,

    /// Azure AD tenant ID used to build the token endpoint URL
    pub tenant_id: String,
}

impl Credentials {
    /// Create a new credential bundle
    #[must_use]
    pub fn new(client_id: String, client_secret: String, api_key: String, tenant_id: String) -> Self {
        Self { client_id, client_secret, api_key, tenant_id }
    }
}

/// Token response from the authorization server
///
/// Standard OAuth 2.0 client-credentials response (RFC 6749). Only
/// `access_token` and `expires_in` are required; all other fields are
/// ignored.
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub expires_in: i64,
}

/// A held bearer token with its expiry checkpoint
///
/// The checkpoint is absolute (UTC) and already includes the safety margin:
/// `expires_at = acquired_at + expires_in - 60s`. A token is valid only
/// while the current time is strictly before the checkpoint.
#[derive(Debug, Clone)]
pub(crate) struct CachedToken {
    /// Opaque bearer string sent as `Authorization: Bearer <token>`
    pub bearer: String,

    /// Absolute time after which the token must be refreshed
    pub expires_at: DateTime<Utc>,
}

impl CachedToken {
    /// Create a cached token, stamping the expiry checkpoint from `expires_in`
    pub(crate) fn new(bearer: String, expires_in: i64) -> Self {
        let expires_at = Utc::now() + Duration::seconds(expires_in - REFRESH_SAFETY_MARGIN_SECS);
        Self { bearer, expires_at }
    }

    /// Check whether the token must be refreshed at the given instant
    pub(crate) fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

impl From<TokenResponse> for CachedToken {
    fn from(response: TokenResponse) -> Self {
        Self::new(response.access_token, response.expires_in)
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for types.
    use super::*;

    /// Validates `CachedToken::new` behavior for the expiry checkpoint
    /// scenario.
    ///
    /// Assertions:
    /// - Ensures the checkpoint lands at `now + expires_in - 60s` (within a
    ///   couple of seconds of test execution slack).
    #[test]
    fn test_expiry_checkpoint_includes_safety_margin() {
        let before = Utc::now();
        let token = CachedToken::new("T1".to_string(), 3599);
        let after = Utc::now();

        let lower = before + Duration::seconds(3599 - REFRESH_SAFETY_MARGIN_SECS);
        let upper = after + Duration::seconds(3599 - REFRESH_SAFETY_MARGIN_SECS);
        assert!(token.expires_at >= lower);
        assert!(token.expires_at <= upper);
    }

    /// Validates `CachedToken::is_expired` behavior around the checkpoint.
    ///
    /// Assertions:
    /// - Ensures a token is fresh strictly before the checkpoint.
    /// - Ensures a token is expired exactly at and after the checkpoint.
    #[test]
    fn test_is_expired_boundary() {
        let token = CachedToken::new("T1".to_string(), 3599);

        assert!(!token.is_expired(token.expires_at - Duration::seconds(1)));
        assert!(token.is_expired(token.expires_at));
        assert!(token.is_expired(token.expires_at + Duration::seconds(1)));
    }

    /// Validates `CachedToken::new` behavior when `expires_in` is at or
    /// below the safety margin.
    ///
    /// Assertions:
    /// - Ensures the token is already expired at creation time.
    #[test]
    fn test_short_lived_token_expires_immediately() {
        let token = CachedToken::new("T1".to_string(), REFRESH_SAFETY_MARGIN_SECS);
        assert!(token.is_expired(Utc::now()));
    }

    /// Validates `TokenResponse` deserialization.
    ///
    /// Assertions:
    /// - Confirms the required fields are read and extra fields are ignored.
    /// - Ensures a body missing `access_token` fails to deserialize.
    #[test]
    fn test_token_response_deserialization() {
        let body = r#"{
            "token_type": "Bearer",
            "access_token": "abc123",
            "expires_in": 3599,
            "ext_expires_in": 3599
        }"#;
        let response: TokenResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.access_token, "abc123");
        assert_eq!(response.expires_in, 3599);

        let missing = r#"{"expires_in": 3599}"#;
        assert!(serde_json::from_str::<TokenResponse>(missing).is_err());
    }

    /// Validates the token response conversion scenario.
    ///
    /// Assertions:
    /// - Confirms the bearer string carries over unchanged.
    /// - Ensures the expiry checkpoint is set.
    #[test]
    fn test_token_response_conversion() {
        let response = TokenResponse { access_token: "abc123".to_string(), expires_in: 3599 };
        let token: CachedToken = response.into();

        assert_eq!(token.bearer, "abc123");
        assert!(token.expires_at > Utc::now());
    }
}
