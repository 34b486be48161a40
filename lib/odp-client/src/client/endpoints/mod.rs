//! Typed wrappers of the ODP API endpoints.
//!
//! Each method maps its arguments to an endpoint path, query string or JSON
//! body and delegates to [`OdpClient::request`](super::OdpClient::request).
//! Responses are returned as raw [`serde_json::Value`]s.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde::Serialize;
use serde_json::Value;

use super::error::OdpError;

/// Characters escaped in a path segment: everything but RFC 3986 unreserved.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

mod institution;
mod metadata;
pub use self::metadata::{MetadataRecordInput, Pagination};
mod project;

fn json_body(body: &impl Serialize) -> Result<Value, OdpError> {
    serde_json::to_value(body)
        .map_err(|err| OdpError::generic(format!("Cannot serialize the request body: {err}")))
}

/// Encodes a key so it stays a single segment of the endpoint path.
fn path_segment(value: &str) -> Result<String, OdpError> {
    if value.is_empty() || value == "." || value == ".." {
        return Err(OdpError::generic(format!("Invalid path segment '{value}'")));
    }
    Ok(utf8_percent_encode(value, PATH_SEGMENT).to_string())
}
