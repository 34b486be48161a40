//! OAuth2 access token.

use std::fmt;
use std::time::{Duration, Instant};

use oauth2::TokenResponse;
use oauth2::basic::BasicTokenResponse;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// An OAuth2 access token with its metadata.
///
/// The expiry is informative only: the client keeps using a token until the
/// API rejects it.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct OAuth2Token {
    access_token: String,
    #[zeroize(skip)]
    expires_at: Option<Instant>,
    #[zeroize(skip)]
    scopes: Vec<String>,
}

impl OAuth2Token {
    /// Creates a token without expiry.
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            expires_at: None,
            scopes: Vec::new(),
        }
    }

    /// Creates a token expiring after the given duration.
    ///
    /// A duration too large to be represented leaves the expiry unknown.
    pub fn with_expiry(access_token: impl Into<String>, expires_in: Duration) -> Self {
        Self {
            access_token: access_token.into(),
            expires_at: Instant::now().checked_add(expires_in),
            scopes: Vec::new(),
        }
    }

    /// Sets the scopes granted by the server.
    #[must_use]
    pub fn with_scopes(mut self, scopes: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.scopes = scopes.into_iter().map(Into::into).collect();
        self
    }

    pub(crate) fn from_response(response: &BasicTokenResponse) -> Self {
        let access_token = response.access_token().secret().clone();
        let token = match response.expires_in() {
            Some(expires_in) => Self::with_expiry(access_token, expires_in),
            None => Self::new(access_token),
        };
        match response.scopes() {
            Some(scopes) => token.with_scopes(scopes.iter().map(|scope| scope.as_str())),
            None => token,
        }
    }

    /// Returns the access token value.
    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    /// Returns the scopes granted by the server, when it reported them.
    pub fn scopes(&self) -> &[String] {
        &self.scopes
    }

    /// Checks if the token is expired.
    ///
    /// Returns `false` if the token has no expiration time.
    pub fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|exp| Instant::now() >= exp)
    }

    /// Returns the time until expiration, if known.
    pub fn time_until_expiry(&self) -> Option<Duration> {
        self.expires_at
            .and_then(|exp| exp.checked_duration_since(Instant::now()))
    }
}

impl fmt::Debug for OAuth2Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OAuth2Token")
            .field("access_token", &"[REDACTED]")
            .field("expires_at", &self.expires_at)
            .field("scopes", &self.scopes)
            .finish()
    }
}
