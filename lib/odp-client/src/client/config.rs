//! Client configuration and builder.

use std::fmt;
use std::time::Duration;

use url::Url;

use super::auth::SecureString;

/// Default timeout applied to the token grant and to every API call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Environment variable holding the public API URL.
pub const ENV_PUBLIC_API: &str = "ODP_PUBLIC_API";
/// Environment variable holding the admin API URL (optional).
pub const ENV_ADMIN_API: &str = "ODP_ADMIN_API";
/// Environment variable holding the OAuth2 server URL.
pub const ENV_OAUTH2_SERVER: &str = "OAUTH2_SERVER";
/// Environment variable holding the registered client id.
pub const ENV_OAUTH2_CLIENT_ID: &str = "OAUTH2_CLIENT_ID";
/// Environment variable holding the registered client secret.
pub const ENV_OAUTH2_CLIENT_SECRET: &str = "OAUTH2_CLIENT_SECRET";
/// Environment variable holding the whitespace-delimited scopes.
pub const ENV_OAUTH2_SCOPE: &str = "OAUTH2_SCOPE";

/// Errors raised while assembling an [`OdpConfig`].
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Error, derive_more::Display)]
pub enum ConfigError {
    /// A required environment variable is not set.
    #[display("Missing environment variable '{name}'")]
    MissingVariable {
        /// Name of the variable.
        name: &'static str,
    },

    /// A URL could not be parsed or cannot be used as a base URL.
    #[display("Invalid {name} URL '{url}': {reason}")]
    InvalidUrl {
        /// Which URL was invalid.
        name: &'static str,
        /// The rejected value.
        url: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The configuration is incomplete.
    #[display("Invalid configuration: {reason}")]
    Invalid {
        /// Description of the problem.
        reason: String,
    },
}

/// Immutable configuration of an [`OdpClient`](crate::OdpClient).
///
/// Build it explicitly with [`OdpConfig::builder`], or read it once from the
/// process environment with [`OdpConfig::from_env`].
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use odp_client::OdpConfig;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = OdpConfig::builder(
///     "https://odp.example.com/api",
///     "https://hydra.example.com",
///     "my-client",
///     "my-secret",
/// )?
/// .with_admin_api("https://odp.example.com/admin")?
/// .with_scope_str("ODP.Metadata ODP.Project")
/// .with_timeout(Some(Duration::from_secs(10)))
/// .build()?;
///
/// assert_eq!(config.scopes(), ["ODP.Metadata", "ODP.Project"]);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct OdpConfig {
    public_api: Url,
    admin_api: Option<Url>,
    auth_server: Url,
    client_id: String,
    client_secret: SecureString,
    scopes: Vec<String>,
    verify_tls: bool,
    timeout: Option<Duration>,
}

impl OdpConfig {
    /// Creates a builder with the required settings.
    ///
    /// # Errors
    ///
    /// Fails if one of the URLs is invalid.
    pub fn builder(
        public_api: impl AsRef<str>,
        auth_server: impl AsRef<str>,
        client_id: impl Into<String>,
        client_secret: impl Into<SecureString>,
    ) -> Result<OdpConfigBuilder, ConfigError> {
        OdpConfigBuilder::new(public_api, auth_server, client_id, client_secret)
    }

    /// Reads the configuration from the process environment.
    ///
    /// See [`OdpConfig::from_lookup`] for the variables involved.
    ///
    /// # Errors
    ///
    /// Fails if a required variable is missing or a URL is invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads the configuration through a variable lookup function.
    ///
    /// | Variable               | Required |
    /// |------------------------|----------|
    /// | `ODP_PUBLIC_API`       | yes      |
    /// | `ODP_ADMIN_API`        | no       |
    /// | `OAUTH2_SERVER`        | yes      |
    /// | `OAUTH2_CLIENT_ID`     | yes      |
    /// | `OAUTH2_CLIENT_SECRET` | yes      |
    /// | `OAUTH2_SCOPE`         | yes      |
    ///
    /// TLS verification and timeout keep their defaults; override them on
    /// the returned value with [`OdpConfig::with_verify_tls`] and
    /// [`OdpConfig::with_timeout`].
    ///
    /// # Errors
    ///
    /// Fails if a required variable is missing or a URL is invalid.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let required = |name: &'static str| lookup(name).ok_or(ConfigError::MissingVariable { name });

        let mut builder = OdpConfigBuilder::new(
            required(ENV_PUBLIC_API)?,
            required(ENV_OAUTH2_SERVER)?,
            required(ENV_OAUTH2_CLIENT_ID)?,
            required(ENV_OAUTH2_CLIENT_SECRET)?,
        )?
        .with_scope_str(&required(ENV_OAUTH2_SCOPE)?);

        if let Some(admin_api) = lookup(ENV_ADMIN_API).filter(|it| !it.trim().is_empty()) {
            builder = builder.with_admin_api(admin_api)?;
        }

        builder.build()
    }

    /// Returns a copy with TLS certificate verification switched on or off.
    #[must_use]
    pub fn with_verify_tls(mut self, verify_tls: bool) -> Self {
        self.verify_tls = verify_tls;
        self
    }

    /// Returns a copy with another timeout; `None` disables it.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Public API base URL.
    pub fn public_api(&self) -> &Url {
        &self.public_api
    }

    /// Admin API base URL, if configured.
    pub fn admin_api(&self) -> Option<&Url> {
        self.admin_api.as_ref()
    }

    /// OAuth2 server base URL.
    pub fn auth_server(&self) -> &Url {
        &self.auth_server
    }

    /// Token endpoint, `{auth_server}/oauth2/token`.
    pub fn token_url(&self) -> String {
        join_url(&self.auth_server, "/oauth2/token")
    }

    /// Registered client id.
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// Registered client secret.
    pub fn client_secret(&self) -> &SecureString {
        &self.client_secret
    }

    /// Requested scopes.
    pub fn scopes(&self) -> &[String] {
        &self.scopes
    }

    /// Whether TLS certificates are verified.
    pub fn verify_tls(&self) -> bool {
        self.verify_tls
    }

    /// Timeout of every remote call, if any.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
}

impl fmt::Debug for OdpConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OdpConfig")
            .field("public_api", &self.public_api.as_str())
            .field("admin_api", &self.admin_api.as_ref().map(Url::as_str))
            .field("auth_server", &self.auth_server.as_str())
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("scopes", &self.scopes)
            .field("verify_tls", &self.verify_tls)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Builder for [`OdpConfig`].
#[derive(Clone)]
pub struct OdpConfigBuilder {
    public_api: Url,
    admin_api: Option<Url>,
    auth_server: Url,
    client_id: String,
    client_secret: SecureString,
    scopes: Vec<String>,
    verify_tls: bool,
    timeout: Option<Duration>,
}

impl OdpConfigBuilder {
    /// Creates a new builder with required parameters.
    ///
    /// # Errors
    ///
    /// Fails if one of the URLs is invalid.
    pub fn new(
        public_api: impl AsRef<str>,
        auth_server: impl AsRef<str>,
        client_id: impl Into<String>,
        client_secret: impl Into<SecureString>,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            public_api: parse_base_url("public API", public_api.as_ref())?,
            admin_api: None,
            auth_server: parse_base_url("OAuth2 server", auth_server.as_ref())?,
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            scopes: Vec::new(),
            verify_tls: true,
            timeout: Some(DEFAULT_TIMEOUT),
        })
    }

    /// Sets the admin API URL, enabling admin-only operations.
    ///
    /// # Errors
    ///
    /// Fails if the URL is invalid.
    pub fn with_admin_api(mut self, admin_api: impl AsRef<str>) -> Result<Self, ConfigError> {
        self.admin_api = Some(parse_base_url("admin API", admin_api.as_ref())?);
        Ok(self)
    }

    /// Adds a scope.
    #[must_use]
    pub fn add_scope(mut self, scope: impl Into<String>) -> Self {
        self.scopes.push(scope.into());
        self
    }

    /// Adds multiple scopes.
    #[must_use]
    pub fn add_scopes(mut self, scopes: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.scopes.extend(scopes.into_iter().map(Into::into));
        self
    }

    /// Adds the scopes of a whitespace-delimited list.
    #[must_use]
    pub fn with_scope_str(self, scopes: &str) -> Self {
        self.add_scopes(scopes.split_whitespace())
    }

    /// Switches TLS certificate verification on or off (default: on).
    ///
    /// Only meant for local development servers.
    #[must_use]
    pub fn with_verify_tls(mut self, verify_tls: bool) -> Self {
        self.verify_tls = verify_tls;
        self
    }

    /// Sets the timeout (default: 5 seconds); `None` disables it.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Builds the configuration.
    ///
    /// # Errors
    ///
    /// Fails if the client id or the client secret is empty.
    pub fn build(self) -> Result<OdpConfig, ConfigError> {
        if self.client_id.trim().is_empty() {
            return Err(ConfigError::Invalid {
                reason: "client id must not be empty".to_string(),
            });
        }
        if self.client_secret.is_empty() {
            return Err(ConfigError::Invalid {
                reason: "client secret must not be empty".to_string(),
            });
        }

        Ok(OdpConfig {
            public_api: self.public_api,
            admin_api: self.admin_api,
            auth_server: self.auth_server,
            client_id: self.client_id,
            client_secret: self.client_secret,
            scopes: self.scopes,
            verify_tls: self.verify_tls,
            timeout: self.timeout,
        })
    }
}

impl fmt::Debug for OdpConfigBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OdpConfigBuilder")
            .field("public_api", &self.public_api.as_str())
            .field("admin_api", &self.admin_api.as_ref().map(Url::as_str))
            .field("auth_server", &self.auth_server.as_str())
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("scopes", &self.scopes)
            .finish_non_exhaustive()
    }
}

fn parse_base_url(name: &'static str, url: &str) -> Result<Url, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidUrl {
        name,
        url: url.to_string(),
        reason,
    };
    let parsed = Url::parse(url.trim()).map_err(|err| invalid(err.to_string()))?;
    if parsed.cannot_be_a_base() {
        return Err(invalid("cannot be used as a base URL".to_string()));
    }
    Ok(parsed)
}

/// Appends an endpoint path to a base URL, the way the API expects it.
pub(crate) fn join_url(base: &Url, endpoint: &str) -> String {
    format!("{}{endpoint}", base.as_str().trim_end_matches('/'))
}
