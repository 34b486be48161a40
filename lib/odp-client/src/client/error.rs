use std::fmt;

use http::StatusCode;
use serde_json::Value;

/// Status code reported when no HTTP response was received at all.
pub const TRANSPORT_FAILURE_STATUS: u16 = 503;

/// Diagnostic payload attached to every [`OdpError`].
///
/// Server responses are decoded as JSON when possible, otherwise the raw
/// response text is kept.
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorDetail {
    /// JSON error body.
    Json(Value),
    /// Raw text, either a non-JSON body or a locally produced message.
    Text(String),
}

impl ErrorDetail {
    /// Decodes a response body, falling back to the raw text.
    pub fn from_body(body: &str) -> Self {
        serde_json::from_str(body).map_or_else(|_| Self::Text(body.to_string()), Self::Json)
    }

    /// Returns the JSON payload, if any.
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Self::Json(value) => Some(value),
            Self::Text(_) => None,
        }
    }

    /// Returns the text payload, if any.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Json(_) => None,
            Self::Text(text) => Some(text),
        }
    }
}

impl fmt::Display for ErrorDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json(value) if f.alternate() => write!(f, "{value:#}"),
            Self::Json(value) => write!(f, "{value}"),
            Self::Text(text) => f.write_str(text),
        }
    }
}

impl From<Value> for ErrorDetail {
    fn from(value: Value) -> Self {
        Self::Json(value)
    }
}

impl From<String> for ErrorDetail {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// The four failure categories of the ODP client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Anything that is neither a client, server nor authorization failure.
    Generic,
    /// 4xx responses other than 403.
    Client,
    /// 5xx responses and transport failures.
    Server,
    /// 403 responses and rejected token grants.
    Auth,
}

impl ErrorKind {
    /// Classifies a failed HTTP status.
    ///
    /// ```rust
    /// use http::StatusCode;
    /// use odp_client::ErrorKind;
    ///
    /// assert_eq!(ErrorKind::from_status(StatusCode::FORBIDDEN), ErrorKind::Auth);
    /// assert_eq!(ErrorKind::from_status(StatusCode::NOT_FOUND), ErrorKind::Client);
    /// assert_eq!(ErrorKind::from_status(StatusCode::BAD_GATEWAY), ErrorKind::Server);
    /// ```
    pub fn from_status(status: StatusCode) -> Self {
        match status.as_u16() {
            403 => Self::Auth,
            400..=499 => Self::Client,
            500..=599 => Self::Server,
            _ => Self::Generic,
        }
    }
}

/// Errors returned by [`OdpClient`](crate::OdpClient) operations.
///
/// Every variant carries a message, the HTTP status code when one applies
/// and an [`ErrorDetail`]. Nothing is retried: callers decide what to do
/// with the failure.
///
/// # Example
///
/// ```rust,no_run
/// use odp_client::{OdpClient, OdpConfig, OdpError};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = OdpClient::new(OdpConfig::from_env()?)?;
/// match client.get_metadata_record("saeon", "unknown-id").await {
///     Ok(record) => println!("{record}"),
///     Err(OdpError::Client { status_code: Some(404), .. }) => println!("no such record"),
///     Err(error) => return Err(error.into()),
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, derive_more::Error, derive_more::Display)]
pub enum OdpError {
    /// Unclassified failure, e.g. an admin call without an admin API.
    #[display("{message}")]
    Generic {
        /// Human-readable description.
        message: String,
        /// HTTP status code, if a response was received.
        status_code: Option<u16>,
        /// Diagnostic payload.
        error_detail: ErrorDetail,
    },

    /// The request was rejected by the API (4xx except 403).
    #[display("Client error: {message}")]
    Client {
        /// Human-readable description.
        message: String,
        /// HTTP status code.
        status_code: Option<u16>,
        /// Diagnostic payload.
        error_detail: ErrorDetail,
    },

    /// The API failed (5xx) or could not be reached (503).
    #[display("Server error: {message}")]
    Server {
        /// Human-readable description.
        message: String,
        /// HTTP status code, 503 for transport failures.
        status_code: Option<u16>,
        /// Diagnostic payload.
        error_detail: ErrorDetail,
    },

    /// Access was denied (403) or the token grant was rejected.
    #[display("Authorization error: {message}")]
    Auth {
        /// Human-readable description.
        message: String,
        /// HTTP status code.
        status_code: Option<u16>,
        /// Diagnostic payload.
        error_detail: ErrorDetail,
    },
}

impl OdpError {
    /// Creates an error of the given kind.
    pub fn new(
        kind: ErrorKind,
        message: impl Into<String>,
        status_code: Option<u16>,
        error_detail: ErrorDetail,
    ) -> Self {
        let message = message.into();
        match kind {
            ErrorKind::Generic => Self::Generic {
                message,
                status_code,
                error_detail,
            },
            ErrorKind::Client => Self::Client {
                message,
                status_code,
                error_detail,
            },
            ErrorKind::Server => Self::Server {
                message,
                status_code,
                error_detail,
            },
            ErrorKind::Auth => Self::Auth {
                message,
                status_code,
                error_detail,
            },
        }
    }

    /// Creates an unclassified error whose detail is its own message.
    pub fn generic(message: impl Into<String>) -> Self {
        let message = message.into();
        let error_detail = ErrorDetail::Text(message.clone());
        Self::Generic {
            message,
            status_code: None,
            error_detail,
        }
    }

    /// Creates the error for a failed HTTP response.
    pub fn from_response(status: StatusCode, url: &str, body: &str) -> Self {
        let kind = if status.as_u16() >= 400 {
            ErrorKind::from_status(status)
        } else {
            ErrorKind::Generic
        };
        let reason = status.canonical_reason().unwrap_or("Unknown Status");
        let message = format!("{} {reason} for url: {url}", status.as_u16());
        Self::new(
            kind,
            message,
            Some(status.as_u16()),
            ErrorDetail::from_body(body),
        )
    }

    /// Creates the error for a request that got no HTTP response.
    pub fn transport(error: &dyn std::error::Error) -> Self {
        let message = transport_message(error);
        Self::Server {
            error_detail: ErrorDetail::Text(message.clone()),
            message,
            status_code: Some(TRANSPORT_FAILURE_STATUS),
        }
    }

    /// Returns the failure category.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Generic { .. } => ErrorKind::Generic,
            Self::Client { .. } => ErrorKind::Client,
            Self::Server { .. } => ErrorKind::Server,
            Self::Auth { .. } => ErrorKind::Auth,
        }
    }

    /// Returns the human-readable description.
    pub fn message(&self) -> &str {
        match self {
            Self::Generic { message, .. }
            | Self::Client { message, .. }
            | Self::Server { message, .. }
            | Self::Auth { message, .. } => message,
        }
    }

    /// Returns the HTTP status code, if any.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Generic { status_code, .. }
            | Self::Client { status_code, .. }
            | Self::Server { status_code, .. }
            | Self::Auth { status_code, .. } => *status_code,
        }
    }

    /// Returns the diagnostic payload.
    pub fn error_detail(&self) -> &ErrorDetail {
        match self {
            Self::Generic { error_detail, .. }
            | Self::Client { error_detail, .. }
            | Self::Server { error_detail, .. }
            | Self::Auth { error_detail, .. } => error_detail,
        }
    }
}

// reqwest hides the interesting part (refused, timed out, ...) in the source chain
fn transport_message(error: &dyn std::error::Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
