//! Client-credentials token provider.

use std::sync::Arc;

use http::StatusCode;
use oauth2::basic::{BasicClient, BasicErrorResponse};
use oauth2::{
    ClientId, ClientSecret, HttpRequest, HttpResponse, RequestTokenError, Scope, TokenUrl,
};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::token::OAuth2Token;
use crate::client::config::OdpConfig;
use crate::client::error::{ErrorDetail, OdpError, TRANSPORT_FAILURE_STATUS};

/// Status reported when the authorization server rejects the grant.
const GRANT_REJECTED_STATUS: u16 = 403;

/// Failure of the HTTP exchange with the authorization server.
///
/// A 5xx answer is reported here, before oauth2 tries to read it as a grant
/// response.
#[derive(Debug, derive_more::Error, derive_more::Display)]
enum GrantHttpError {
    /// No response was received.
    #[display("token request failed")]
    Transport(#[error(source)] reqwest::Error),

    /// The authorization server itself failed.
    #[display("authorization server answered {status}")]
    Unavailable {
        status: StatusCode,
        #[error(not(source))]
        body: String,
    },
}

/// Cache state of the provider.
#[derive(Debug, Default)]
enum TokenState {
    #[default]
    Unfetched,
    Fetched(OAuth2Token),
}

/// Supplies the bearer token of every API call.
///
/// The token is acquired with a client-credentials grant against
/// `{auth_server}/oauth2/token` on first use, then reused for the lifetime of
/// the provider. It is never refreshed, even past its expiry.
///
/// The cache is guarded by an async mutex: concurrent first calls wait for a
/// single grant request instead of each performing their own.
#[derive(Debug)]
pub struct TokenProvider {
    config: Arc<OdpConfig>,
    http: reqwest::Client,
    state: Mutex<TokenState>,
}

impl TokenProvider {
    pub(crate) fn new(config: Arc<OdpConfig>, http: reqwest::Client) -> Self {
        Self {
            config,
            http,
            state: Mutex::default(),
        }
    }

    /// Returns the cached token, acquiring it first if needed.
    ///
    /// # Errors
    ///
    /// - [`OdpError::Auth`] (status 403) if the authorization server rejects
    ///   the grant
    /// - [`OdpError::Server`] (status 503) if the authorization server cannot
    ///   be reached
    pub async fn get_token(&self) -> Result<OAuth2Token, OdpError> {
        let mut state = self.state.lock().await;
        if let TokenState::Fetched(token) = &*state {
            return Ok(token.clone());
        }

        let token = self.fetch_token().await?;
        *state = TokenState::Fetched(token.clone());
        Ok(token)
    }

    /// Returns `true` once a token has been acquired.
    pub async fn has_token(&self) -> bool {
        matches!(*self.state.lock().await, TokenState::Fetched(_))
    }

    async fn fetch_token(&self) -> Result<OAuth2Token, OdpError> {
        let token_url = self.config.token_url();
        let client = BasicClient::new(ClientId::new(self.config.client_id().to_string()))
            .set_client_secret(ClientSecret::new(
                self.config.client_secret().as_str().to_string(),
            ))
            .set_token_uri(TokenUrl::new(token_url.clone()).map_err(|err| {
                OdpError::generic(format!("Invalid token URL '{token_url}': {err}"))
            })?);

        debug!(%token_url, client_id = self.config.client_id(), "requesting access token");
        let response = client
            .exchange_client_credentials()
            .add_scopes(self.config.scopes().iter().cloned().map(Scope::new))
            .request_async(&|request: HttpRequest| send_grant(&self.http, request))
            .await
            .map_err(|err| {
                let error = grant_error(err);
                warn!(%token_url, %error, "access token request failed");
                error
            })?;

        let token = OAuth2Token::from_response(&response);
        info!(
            scopes = ?token.scopes(),
            expires_in = ?token.time_until_expiry(),
            "access token acquired"
        );
        Ok(token)
    }
}

async fn send_grant(
    http: &reqwest::Client,
    request: HttpRequest,
) -> Result<HttpResponse, GrantHttpError> {
    let request = reqwest::Request::try_from(request).map_err(GrantHttpError::Transport)?;
    let response = http
        .execute(request)
        .await
        .map_err(GrantHttpError::Transport)?;

    let status = response.status();
    let headers = response.headers().clone();
    let body = response
        .bytes()
        .await
        .map_err(GrantHttpError::Transport)?
        .to_vec();

    if status.is_server_error() {
        return Err(GrantHttpError::Unavailable {
            status,
            body: String::from_utf8_lossy(&body).into_owned(),
        });
    }

    let mut grant_response = HttpResponse::new(body);
    *grant_response.status_mut() = status;
    *grant_response.headers_mut() = headers;
    Ok(grant_response)
}

fn grant_error(error: RequestTokenError<GrantHttpError, BasicErrorResponse>) -> OdpError {
    let rejected = |message: String, error_detail: ErrorDetail| OdpError::Auth {
        message,
        status_code: Some(GRANT_REJECTED_STATUS),
        error_detail,
    };

    match error {
        RequestTokenError::Request(GrantHttpError::Unavailable { status, body }) => {
            OdpError::Server {
                message: format!("Authorization server unavailable: {status}"),
                status_code: Some(TRANSPORT_FAILURE_STATUS),
                error_detail: ErrorDetail::from_body(&body),
            }
        }
        RequestTokenError::Request(err) => OdpError::transport(&err),
        RequestTokenError::ServerResponse(response) => {
            let error_detail = serde_json::to_value(&response)
                .map_or_else(|_| ErrorDetail::Text(response.to_string()), ErrorDetail::Json);
            rejected(format!("Token request rejected: {response}"), error_detail)
        }
        RequestTokenError::Parse(err, body) => rejected(
            format!("Invalid token response: {err}"),
            ErrorDetail::from_body(&String::from_utf8_lossy(&body)),
        ),
        RequestTokenError::Other(reason) => rejected(
            format!("Token request failed: {reason}"),
            ErrorDetail::Text(reason),
        ),
    }
}
