use http::Method;
use serde::Serialize;
use serde_json::Value;

use super::json_body;
use crate::client::{ApiBase, OdpClient, OdpError};

#[derive(Debug, Serialize)]
struct NewInstitution<'a> {
    key: &'a str,
    name: &'a str,
    parent_key: Option<&'a str>,
}

/// Institution API, served by the admin API only.
impl OdpClient {
    /// Lists all institutions.
    ///
    /// # Errors
    ///
    /// See [`OdpClient::request`]; fails without any network call when no
    /// admin API is configured.
    pub async fn list_institutions(&self) -> Result<Value, OdpError> {
        self.request(Method::GET, "/institution/", ApiBase::Admin, None, None)
            .await
    }

    /// Creates an institution, optionally below a parent institution.
    ///
    /// # Errors
    ///
    /// See [`OdpClient::request`]; fails without any network call when no
    /// admin API is configured.
    pub async fn create_institution(
        &self,
        key: &str,
        name: &str,
        parent_key: Option<&str>,
    ) -> Result<Value, OdpError> {
        let body = json_body(&NewInstitution {
            key,
            name,
            parent_key,
        })?;
        self.request(
            Method::POST,
            "/institution/",
            ApiBase::Admin,
            None,
            Some(&body),
        )
        .await
    }
}
