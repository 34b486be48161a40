//! OAuth2 client-credentials authentication.
//!
//! The ODP API authorizes requests with bearer tokens issued by a Hydra
//! OAuth2 server. [`TokenProvider`] performs the client-credentials grant
//! with the configured client id, secret and scopes, and caches the
//! resulting [`OAuth2Token`] for every subsequent call.

mod provider;
mod token;

pub use self::provider::TokenProvider;
pub use self::token::OAuth2Token;
