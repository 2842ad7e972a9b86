//! Async client for the DVSA MOT vehicle-history API
//!
//! Acquires an OAuth2 client-credentials token from Azure AD, caches it,
//! refreshes it transparently before expiry, and exposes authenticated
//! history lookups by registration and by VIN.
//!
//! # Features
//!
//! - **Token lifecycle**: lazy-once acquisition at construction, cached
//!   bearer token with a 60-second refresh safety margin, refresh-on-demand
//! - **Verbatim responses**: lookups return exactly the JSON the API
//!   produced; status codes are not inspected
//! - **One session**: a single connection-reusing HTTP client per instance
//!
//! # Usage Example
//!
//! ```no_run
//! use mot_history_client::{Credentials, MotHistoryClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = MotHistoryClient::builder()
//!         .credentials(Credentials::new(
//!             "client-id".to_string(),
//!             "client-secret".to_string(),
//!             "api-key".to_string(),
//!             "tenant-id".to_string(),
//!         ))
//!         .connect()
//!         .await?;
//!
//!     let history = client.history_by_registration("AB12CDE").await?;
//!     println!("{history}");
//!
//!     Ok(())
//! }
//! ```
//!
//! # Module Organization
//!
//! - **[`types`]**: credentials and token data model
//! - **[`error`]**: error taxonomy
//! - **[`client`]**: the client itself

pub mod client;
pub mod error;
pub mod types;

pub use client::{MotHistoryClient, MotHistoryClientBuilder};
pub use error::Error;
pub use types::{Credentials, TokenResponse};
