//! # ODP Client
//!
//! Programmatic access to the SAEON Open Data Platform (ODP) API, authorized
//! by an OAuth2 client-credentials grant.
//!
//! - **[`OdpConfig`]** - immutable configuration, explicit or read from the
//!   environment
//! - **[`OdpClient`]** - authenticated request dispatcher plus one method per
//!   API endpoint
//! - **[`OdpError`]** - every failure, classified as generic, client, server
//!   or authorization error
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use odp_client::{OdpClient, OdpConfig, OdpError, Pagination};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // ODP_PUBLIC_API, OAUTH2_SERVER, OAUTH2_CLIENT_ID,
//! // OAUTH2_CLIENT_SECRET and OAUTH2_SCOPE must be set
//! let client = OdpClient::new(OdpConfig::from_env()?)?;
//!
//! match client.list_metadata_records("saeon", Pagination::default()).await {
//!     Ok(records) => println!("{records:#}"),
//!     Err(error @ OdpError::Client { .. }) => {
//!         eprintln!("{error}: {}", error.error_detail());
//!     }
//!     Err(error) => return Err(error.into()),
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Configuration
//!
//! | Variable               | Description                                   |
//! |------------------------|-----------------------------------------------|
//! | `ODP_PUBLIC_API`       | URL of the ODP public API                     |
//! | `ODP_ADMIN_API`        | URL of the ODP admin API (optional)           |
//! | `OAUTH2_SERVER`        | URL of the Hydra OAuth2 server                |
//! | `OAUTH2_CLIENT_ID`     | registered client id                          |
//! | `OAUTH2_CLIENT_SECRET` | registered client secret                      |
//! | `OAUTH2_SCOPE`         | whitespace-delimited list of scopes           |
//!
//! TLS verification and the timeout (5 seconds by default) are only
//! configurable in code; disabling verification is meant for local
//! development servers.
//!
//! ## Errors
//!
//! | Condition                                   | Variant             | Status    |
//! |---------------------------------------------|---------------------|-----------|
//! | 403 response, rejected token grant          | [`OdpError::Auth`]   | 403       |
//! | other 4xx response                          | [`OdpError::Client`] | 4xx       |
//! | 5xx response                                | [`OdpError::Server`] | 5xx       |
//! | no response (refused, timed out, ...)       | [`OdpError::Server`] | 503       |
//! | admin call without admin API, anything else | [`OdpError::Generic`]| optional  |
//!
//! The error detail is the decoded JSON body of the response when it is
//! valid JSON, its raw text otherwise. Nothing is retried.

mod client;

pub use self::client::oauth2::{OAuth2Token, TokenProvider};
pub use self::client::{
    ApiBase, ConfigError, DEFAULT_TIMEOUT, ENV_ADMIN_API, ENV_OAUTH2_CLIENT_ID,
    ENV_OAUTH2_CLIENT_SECRET, ENV_OAUTH2_SCOPE, ENV_OAUTH2_SERVER, ENV_PUBLIC_API, ErrorDetail,
    ErrorKind, MetadataRecordInput, OdpClient, OdpConfig, OdpConfigBuilder, OdpError, Pagination,
    QueryParams, SecureString, TRANSPORT_FAILURE_STATUS,
};
