use http::Method;
use serde::Serialize;
use serde_json::Value;

use super::{json_body, path_segment};
use crate::client::{ApiBase, OdpClient, OdpError};

/// Offset and limit of a listing call.
///
/// Passed through to the API as-is; iterating over pages is up to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pagination {
    /// Number of records to skip.
    pub offset: u32,
    /// Maximum number of records to return.
    pub limit: u32,
}

impl Pagination {
    /// Creates a pagination window.
    pub fn new(offset: u32, limit: u32) -> Self {
        Self { offset, limit }
    }

    fn to_query(self) -> [(&'static str, String); 2] {
        [
            ("offset", self.offset.to_string()),
            ("limit", self.limit.to_string()),
        ]
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: 100,
        }
    }
}

/// A metadata record to create, or to update when the DOI or the metadata
/// identifies an existing record.
///
/// # Example
///
/// ```rust
/// use odp_client::MetadataRecordInput;
/// use serde_json::json;
///
/// let record = MetadataRecordInput::new(
///     "sadco-collection",
///     "saeon-datacite-4-3",
///     json!({"titles": [{"title": "Sea surface temperature"}]}),
///     "harvester",
///     "https://example.com/data-agreement",
/// )
/// .with_doi("10.15493/SADCO.10000001");
///
/// assert!(record.data_agreement_accepted);
/// assert!(!record.auto_assign_doi);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetadataRecordInput {
    /// Collection the record belongs to.
    pub collection_key: String,
    /// Schema the metadata conforms to.
    pub schema_key: String,
    /// The metadata document.
    pub metadata: Value,
    /// How the metadata was captured.
    pub capture_method: String,
    /// Data agreement governing the record.
    pub data_agreement_url: String,
    /// Whether the data agreement was accepted (default: `true`).
    pub data_agreement_accepted: bool,
    /// Whether the terms and conditions were accepted (default: `true`).
    pub terms_conditions_accepted: bool,
    /// DOI of the record, empty if none (default: empty).
    pub doi: String,
    /// Whether the platform should assign a DOI (default: `false`).
    pub auto_assign_doi: bool,
}

impl MetadataRecordInput {
    /// Creates a record input with the default flags.
    pub fn new(
        collection_key: impl Into<String>,
        schema_key: impl Into<String>,
        metadata: Value,
        capture_method: impl Into<String>,
        data_agreement_url: impl Into<String>,
    ) -> Self {
        Self {
            collection_key: collection_key.into(),
            schema_key: schema_key.into(),
            metadata,
            capture_method: capture_method.into(),
            data_agreement_url: data_agreement_url.into(),
            data_agreement_accepted: true,
            terms_conditions_accepted: true,
            doi: String::new(),
            auto_assign_doi: false,
        }
    }

    /// Sets the DOI.
    #[must_use]
    pub fn with_doi(mut self, doi: impl Into<String>) -> Self {
        self.doi = doi.into();
        self
    }

    /// Asks the platform to assign a DOI.
    #[must_use]
    pub fn with_auto_assign_doi(mut self, auto_assign_doi: bool) -> Self {
        self.auto_assign_doi = auto_assign_doi;
        self
    }

    /// Sets whether the data agreement was accepted.
    #[must_use]
    pub fn with_data_agreement_accepted(mut self, accepted: bool) -> Self {
        self.data_agreement_accepted = accepted;
        self
    }

    /// Sets whether the terms and conditions were accepted.
    #[must_use]
    pub fn with_terms_conditions_accepted(mut self, accepted: bool) -> Self {
        self.terms_conditions_accepted = accepted;
        self
    }
}

/// Metadata API.
impl OdpClient {
    /// Lists the metadata records of an institution.
    ///
    /// # Errors
    ///
    /// See [`OdpClient::request`].
    pub async fn list_metadata_records(
        &self,
        institution_key: &str,
        pagination: Pagination,
    ) -> Result<Value, OdpError> {
        let institution_key = path_segment(institution_key)?;
        let query = pagination.to_query();
        self.request(
            Method::GET,
            &format!("/{institution_key}/metadata/"),
            ApiBase::Public,
            Some(&query[..]),
            None,
        )
        .await
    }

    /// Fetches one metadata record.
    ///
    /// # Errors
    ///
    /// See [`OdpClient::request`]; an unknown record yields
    /// [`OdpError::Client`] with status 404.
    pub async fn get_metadata_record(
        &self,
        institution_key: &str,
        record_id: &str,
    ) -> Result<Value, OdpError> {
        let institution_key = path_segment(institution_key)?;
        let record_id = path_segment(record_id)?;
        self.request(
            Method::GET,
            &format!("/{institution_key}/metadata/{record_id}"),
            ApiBase::Public,
            None,
            None,
        )
        .await
    }

    /// Creates or updates a metadata record of an institution.
    ///
    /// # Errors
    ///
    /// See [`OdpClient::request`].
    pub async fn create_or_update_metadata_record(
        &self,
        institution_key: &str,
        record: &MetadataRecordInput,
    ) -> Result<Value, OdpError> {
        let institution_key = path_segment(institution_key)?;
        let body = json_body(record)?;
        self.request(
            Method::POST,
            &format!("/{institution_key}/metadata/"),
            ApiBase::Public,
            None,
            Some(&body),
        )
        .await
    }
}
