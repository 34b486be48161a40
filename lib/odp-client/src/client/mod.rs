use std::fmt;
use std::sync::Arc;

use reqwest::redirect::Policy;
use url::Url;

mod auth;
pub use self::auth::SecureString;

mod config;
pub use self::config::{
    ConfigError, DEFAULT_TIMEOUT, ENV_ADMIN_API, ENV_OAUTH2_CLIENT_ID, ENV_OAUTH2_CLIENT_SECRET,
    ENV_OAUTH2_SCOPE, ENV_OAUTH2_SERVER, ENV_PUBLIC_API, OdpConfig, OdpConfigBuilder,
};

mod error;
pub use self::error::{ErrorDetail, ErrorKind, OdpError, TRANSPORT_FAILURE_STATUS};

pub mod oauth2;
use self::oauth2::TokenProvider;

mod endpoints;
pub use self::endpoints::{MetadataRecordInput, Pagination};

mod request;
pub use self::request::QueryParams;

/// Which configured API an endpoint belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiBase {
    /// The public API (`ODP_PUBLIC_API`).
    Public,
    /// The admin API (`ODP_ADMIN_API`), reachable from the internal network only.
    Admin,
}

impl fmt::Display for ApiBase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Public => f.write_str("public"),
            Self::Admin => f.write_str("admin"),
        }
    }
}

/// Client of the SAEON Open Data Platform API, authorized by a
/// client-credentials grant.
///
/// The access token is requested on the first call and reused afterwards.
/// Share one client (e.g. behind an [`Arc`]) to share its token.
///
/// # Example
///
/// ```rust,no_run
/// use odp_client::{OdpClient, OdpConfig, Pagination};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let client = OdpClient::new(OdpConfig::from_env()?)?;
///
/// let records = client
///     .list_metadata_records("saeon", Pagination::default())
///     .await?;
/// println!("{records:#}");
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct OdpClient {
    config: Arc<OdpConfig>,
    http: reqwest::Client,
    tokens: TokenProvider,
}

impl OdpClient {
    /// Creates a client. No network call is made until the first request.
    ///
    /// # Errors
    ///
    /// Returns [`OdpError::Generic`] if the HTTP client cannot be initialized
    /// (e.g. the TLS backend fails to load).
    pub fn new(config: OdpConfig) -> Result<Self, OdpError> {
        let config = Arc::new(config);
        let http = http_client(&config, Policy::default())?;
        // the token endpoint must not redirect the client secret elsewhere
        let token_http = http_client(&config, Policy::none())?;
        let tokens = TokenProvider::new(Arc::clone(&config), token_http);

        Ok(Self {
            config,
            http,
            tokens,
        })
    }

    /// Returns the configuration of this client.
    pub fn config(&self) -> &OdpConfig {
        &self.config
    }

    /// Returns the token provider of this client.
    pub fn token_provider(&self) -> &TokenProvider {
        &self.tokens
    }

    fn base_url(&self, base: ApiBase) -> Result<&Url, OdpError> {
        match base {
            ApiBase::Public => Ok(self.config.public_api()),
            ApiBase::Admin => self.config.admin_api().ok_or_else(|| {
                OdpError::generic(format!(
                    "The ODP admin API is not configured (set {ENV_ADMIN_API})"
                ))
            }),
        }
    }
}

fn http_client(config: &OdpConfig, redirect: Policy) -> Result<reqwest::Client, OdpError> {
    let mut builder = reqwest::Client::builder()
        .danger_accept_invalid_certs(!config.verify_tls())
        .redirect(redirect);
    if let Some(timeout) = config.timeout() {
        builder = builder.timeout(timeout);
    }

    builder
        .build()
        .map_err(|err| OdpError::generic(format!("Cannot create the HTTP client: {err}")))
}
