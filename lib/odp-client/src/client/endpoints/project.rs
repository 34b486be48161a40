use http::Method;
use serde::Serialize;
use serde_json::Value;

use super::json_body;
use crate::client::{ApiBase, OdpClient, OdpError};

#[derive(Debug, Serialize)]
struct NewProject<'a> {
    key: &'a str,
    name: &'a str,
    description: Option<&'a str>,
}

/// Project API.
impl OdpClient {
    /// Lists all projects.
    ///
    /// # Errors
    ///
    /// See [`OdpClient::request`].
    pub async fn list_projects(&self) -> Result<Value, OdpError> {
        self.request(Method::GET, "/project/", ApiBase::Public, None, None)
            .await
    }

    /// Creates a project.
    ///
    /// # Errors
    ///
    /// See [`OdpClient::request`].
    pub async fn create_project(
        &self,
        key: &str,
        name: &str,
        description: Option<&str>,
    ) -> Result<Value, OdpError> {
        let body = json_body(&NewProject {
            key,
            name,
            description,
        })?;
        self.request(Method::POST, "/project/", ApiBase::Public, None, Some(&body))
            .await
    }
}
