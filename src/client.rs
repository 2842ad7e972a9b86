//! MOT history API client with managed token lifecycle
//!
//! Handles the full request flow against the DVSA trade API:
//! - OAuth2 client-credentials token acquisition from Azure AD
//! - Token caching with refresh-on-demand before expiry
//! - Authenticated history lookups by registration and by VIN
//!
//! Lookups return the decoded JSON body verbatim. Status codes on lookups
//! are deliberately not inspected: whatever the API returns (error body or
//! real data) passes through unchanged.

use std::time::Duration;

use chrono::Utc;
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::error::Error;
use crate::types::{CachedToken, Credentials, TokenResponse};

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Base URL for trade history lookups; `/registration/{reg}` or
/// `/vin/{vin}` is appended per call.
const DEFAULT_HISTORY_BASE_URL: &str = "https://history.mot.api.gov.uk/v1/trade/vehicles";

/// OAuth scope for the DVSA trade API audience
const TOKEN_SCOPE: &str = "https://tapi.dvsa.gov.uk/.default";

fn default_token_url(tenant_id: &str) -> String {
    format!("https://login.microsoftonline.com/{tenant_id}/oauth2/v2.0/token")
}

/// Client for the DVSA MOT vehicle-history API
///
/// Owns the credentials, one reusable HTTP session, and the cached bearer
/// token. Each public call first ensures a valid token (refreshing if
/// absent or past its checkpoint), then issues an authenticated GET.
///
/// The token slot is guarded by a mutex held across the whole
/// check-and-refresh sequence, so concurrent calls on one instance cannot
/// issue duplicate token requests.
///
/// # Examples
/// ```no_run
/// use mot_history_client::{Credentials, MotHistoryClient};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = MotHistoryClient::builder()
///     .credentials(Credentials::new(
///         "client-id".to_string(),
///         "client-secret".to_string(),
///         "api-key".to_string(),
///         "tenant-id".to_string(),
///     ))
///     .connect()
///     .await?;
///
/// let history = client.history_by_registration("AB12CDE").await?;
/// println!("{history}");
/// # Ok(())
/// # }
/// ```
pub struct MotHistoryClient {
    credentials: Credentials,
    token_url: String,
    history_base_url: String,
    http: reqwest::Client,
    token: Mutex<Option<CachedToken>>,
}

impl MotHistoryClient {
    /// Create a builder for fluent configuration
    #[must_use]
    pub fn builder() -> MotHistoryClientBuilder {
        MotHistoryClientBuilder::default()
    }

    /// Look up MOT history by vehicle registration mark
    ///
    /// The registration is passed through to the URL path verbatim; callers
    /// are responsible for encoding if needed.
    ///
    /// # Errors
    /// Returns [`Error::Authentication`] if a token refresh fails,
    /// [`Error::Transport`] on network failure, or [`Error::Decode`] if the
    /// response body is not valid JSON. Error-status responses are not
    /// detected: their JSON body is returned as-is.
    pub async fn history_by_registration(&self, registration: &str) -> Result<Value, Error> {
        self.lookup("registration", registration).await
    }

    /// Look up MOT history by vehicle identification number
    ///
    /// Identical contract to [`history_by_registration`](Self::history_by_registration),
    /// substituting the VIN path segment.
    ///
    /// # Errors
    /// Same as [`history_by_registration`](Self::history_by_registration).
    pub async fn history_by_vin(&self, vin: &str) -> Result<Value, Error> {
        self.lookup("vin", vin).await
    }

    /// Download the full MOT history dataset
    ///
    /// Not yet available on this client.
    ///
    /// # Errors
    /// Always returns [`Error::Unsupported`]; no network call is made.
    pub async fn bulk_download(&self) -> Result<Value, Error> {
        Err(Error::Unsupported("bulk download"))
    }

    /// Issue an authenticated GET against the history API
    async fn lookup(&self, segment: &str, key: &str) -> Result<Value, Error> {
        let token = self.ensure_token().await?;
        let url = format!("{}/{}/{}", self.history_base_url, segment, key);

        debug!(url = %url, "vehicle history lookup");

        let response = self
            .http
            .get(&url)
            .header("accept", "application/json")
            .header("Authorization", format!("Bearer {token}"))
            .header("X-API-Key", &self.credentials.api_key)
            .send()
            .await
            .map_err(Error::Transport)?;

        // Status codes are not inspected: error bodies pass through verbatim.
        response.json().await.map_err(|e| {
            if e.is_decode() {
                Error::Decode(e)
            } else {
                Error::Transport(e)
            }
        })
    }

    /// Return a valid bearer token, refreshing it first if needed
    ///
    /// The lock is held across the check and the refresh so only one caller
    /// at a time can decide to refresh. A failed refresh leaves the previous
    /// token state in place; the expiry check will trigger again on the
    /// next call.
    async fn ensure_token(&self) -> Result<String, Error> {
        let mut slot = self.token.lock().await;

        if let Some(token) = slot.as_ref() {
            if !token.is_expired(Utc::now()) {
                return Ok(token.bearer.clone());
            }
            debug!("access token past its expiry checkpoint, refreshing");
        }

        let token = self.request_token().await?;
        let bearer = token.bearer.clone();
        *slot = Some(token);

        Ok(bearer)
    }

    /// Request a new token from the authorization server
    async fn request_token(&self) -> Result<CachedToken, Error> {
        let params = [
            ("grant_type", "client_credentials"),
            ("client_id", self.credentials.client_id.as_str()),
            ("client_secret", self.credentials.client_secret.as_str()),
            ("scope", TOKEN_SCOPE),
        ];

        let response = self
            .http
            .post(&self.token_url)
            .form(&params)
            .send()
            .await
            .map_err(|e| Error::Authentication(format!("token endpoint unreachable: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Authentication(format!(
                "token endpoint returned status {status}: {body}"
            )));
        }

        let token_response: TokenResponse = response
            .json()
            .await
            .map_err(|e| Error::Authentication(format!("malformed token response: {e}")))?;

        info!(expires_in = token_response.expires_in, "acquired new access token");

        Ok(token_response.into())
    }
}

/// Builder for [`MotHistoryClient`]
///
/// Credentials are required; the endpoint URLs default to the production
/// Azure AD and DVSA hosts and only need overriding in tests.
#[derive(Default)]
pub struct MotHistoryClientBuilder {
    credentials: Option<Credentials>,
    token_url: Option<String>,
    history_base_url: Option<String>,
}

impl MotHistoryClientBuilder {
    /// Set the API credentials
    pub fn credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Override the token endpoint URL
    ///
    /// Defaults to `https://login.microsoftonline.com/{tenant_id}/oauth2/v2.0/token`.
    pub fn token_url(mut self, token_url: impl Into<String>) -> Self {
        self.token_url = Some(token_url.into());
        self
    }

    /// Override the history API base URL
    ///
    /// Defaults to `https://history.mot.api.gov.uk/v1/trade/vehicles`.
    pub fn history_base_url(mut self, history_base_url: impl Into<String>) -> Self {
        self.history_base_url = Some(history_base_url.into());
        self
    }

    /// Build the client and eagerly acquire the first token
    ///
    /// # Errors
    /// Returns [`Error::Config`] if credentials were not provided or the
    /// HTTP client cannot be built, and [`Error::Authentication`] if the
    /// initial token acquisition fails — a client is never returned without
    /// a token.
    pub async fn connect(self) -> Result<MotHistoryClient, Error> {
        let credentials =
            self.credentials.ok_or_else(|| Error::Config("credentials not set".to_string()))?;

        let token_url =
            self.token_url.unwrap_or_else(|| default_token_url(&credentials.tenant_id));
        let history_base_url =
            self.history_base_url.unwrap_or_else(|| DEFAULT_HISTORY_BASE_URL.to_string());

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .map_err(|e| Error::Config(format!("failed to build HTTP client: {e}")))?;

        let client =
            MotHistoryClient { credentials, token_url, history_base_url, http, token: Mutex::new(None) };

        client.ensure_token().await?;

        Ok(client)
    }
}
