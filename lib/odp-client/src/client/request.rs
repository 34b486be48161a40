use headers::authorization::Bearer;
use headers::{Authorization, ContentType, HeaderMapExt};
use http::header::ACCEPT;
use http::{HeaderMap, HeaderValue, Method, StatusCode};
use serde_json::Value;
use tracing::{debug, warn};

use super::config::join_url;
use super::error::{ErrorDetail, ErrorKind, OdpError};
use super::oauth2::OAuth2Token;
use super::{ApiBase, OdpClient};

/// Query parameters appended to an endpoint.
pub type QueryParams<'a> = [(&'a str, String)];

impl OdpClient {
    /// Performs one authenticated call and returns the decoded JSON body.
    ///
    /// The `endpoint` path is appended to the base URL selected by `base`.
    /// Every request carries `Accept: application/json` and the bearer token;
    /// POST and PUT requests, and any request with a body, also declare a
    /// JSON content type.
    ///
    /// An empty success body is returned as [`Value::Null`].
    ///
    /// # Errors
    ///
    /// - [`OdpError::Generic`] if `base` is [`ApiBase::Admin`] and no admin API
    ///   is configured; nothing is sent in that case
    /// - any error of [`TokenProvider::get_token`](super::oauth2::TokenProvider::get_token)
    /// - [`OdpError::Auth`] for a 403 response
    /// - [`OdpError::Client`] for other 4xx responses
    /// - [`OdpError::Server`] for 5xx responses and, with status 503, when no
    ///   response was received (connection refused, timeout, ...)
    /// - [`OdpError::Generic`] for any other non-2xx status or a success body
    ///   that is not JSON
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use http::Method;
    /// use odp_client::{ApiBase, OdpClient};
    /// use serde_json::json;
    ///
    /// # async fn example(client: OdpClient) -> Result<(), odp_client::OdpError> {
    /// let project = client
    ///     .request(
    ///         Method::POST,
    ///         "/project/",
    ///         ApiBase::Public,
    ///         None,
    ///         Some(&json!({"key": "sadco", "name": "SADCO", "description": null})),
    ///     )
    ///     .await?;
    /// println!("created {}", project["key"]);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn request(
        &self,
        method: Method,
        endpoint: &str,
        base: ApiBase,
        query: Option<&QueryParams<'_>>,
        body: Option<&Value>,
    ) -> Result<Value, OdpError> {
        let url = join_url(self.base_url(base)?, endpoint);
        let token = self.tokens.get_token().await?;
        let headers = build_headers(&method, &token, body.is_some())?;

        let mut request = self.http.request(method.clone(), &url).headers(headers);
        if let Some(query) = query {
            request = request.query(query);
        }
        if let Some(body) = body {
            let data = serde_json::to_vec(body).map_err(|err| {
                OdpError::generic(format!("Cannot serialize the request body: {err}"))
            })?;
            request = request.body(data);
        }

        debug!(%method, %url, %base, "sending request");
        let response = request
            .send()
            .await
            .map_err(|err| send_error(&method, &url, &err))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|err| send_error(&method, &url, &err))?;

        if !status.is_success() {
            let error = OdpError::from_response(status, &url, &text);
            warn!(%method, %url, status = status.as_u16(), kind = ?error.kind(), "request failed");
            return Err(error);
        }

        debug!(%method, %url, status = status.as_u16(), "request succeeded");
        decode_body(status, &url, &text)
    }
}

fn build_headers(
    method: &Method,
    token: &OAuth2Token,
    has_body: bool,
) -> Result<HeaderMap, OdpError> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

    let authorization = Authorization::<Bearer>::bearer(token.access_token())
        .map_err(|err| OdpError::generic(format!("Invalid access token: {err}")))?;
    headers.typed_insert(authorization);

    if has_body || *method == Method::POST || *method == Method::PUT {
        headers.typed_insert(ContentType::json());
    }

    Ok(headers)
}

fn send_error(method: &Method, url: &str, error: &reqwest::Error) -> OdpError {
    // an unusable URL or header never left the process
    let error = if error.is_builder() {
        OdpError::generic(format!("Cannot build the request: {error}"))
    } else {
        OdpError::transport(error)
    };
    warn!(%method, %url, %error, "no response received");
    error
}

fn decode_body(status: StatusCode, url: &str, text: &str) -> Result<Value, OdpError> {
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }

    serde_json::from_str(text).map_err(|err| {
        OdpError::new(
            ErrorKind::Generic,
            format!("Invalid JSON response from {url}: {err}"),
            Some(status.as_u16()),
            ErrorDetail::Text(text.to_string()),
        )
    })
}
