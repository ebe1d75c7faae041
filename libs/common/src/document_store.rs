//! Document store module for the hosted document database
//!
//! This module provides configuration and a thin REST client for creating
//! documents in a collection. The store is treated as an opaque remote
//! service: the client only knows how to send one create request and
//! classify the answer.

use crate::error::{DocumentStoreError, DocumentStoreResult};
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;
use tracing::{debug, info};

/// Document id placeholder that asks the server to generate a unique id
pub const UNIQUE_DOCUMENT_ID: &str = "unique()";

/// Document store configuration struct
#[derive(Debug, Clone)]
pub struct DocumentStoreConfig {
    /// Base URL of the REST API, including the version segment
    pub endpoint: String,
    /// Project the database belongs to
    pub project_id: String,
    /// Database holding the collections
    pub database_id: String,
    /// Server API key, if the client runs with server privileges
    pub api_key: Option<String>,
    /// Session JWT, if the client acts on behalf of a signed-in user
    pub jwt: Option<String>,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl DocumentStoreConfig {
    /// Create a new DocumentStoreConfig from environment variables
    ///
    /// # Environment Variables
    /// - `APPWRITE_ENDPOINT`: REST endpoint (default: "https://cloud.appwrite.io/v1")
    /// - `APPWRITE_PROJECT_ID`: Project id (required)
    /// - `APPWRITE_DATABASE_ID`: Database id (required)
    /// - `APPWRITE_API_KEY`: Server API key (optional)
    /// - `APPWRITE_JWT`: Session JWT (optional)
    /// - `APPWRITE_TIMEOUT_SECS`: Request timeout (default: 10)
    pub fn from_env() -> DocumentStoreResult<Self> {
        let endpoint = env::var("APPWRITE_ENDPOINT")
            .unwrap_or_else(|_| "https://cloud.appwrite.io/v1".to_string());

        let project_id = required_var("APPWRITE_PROJECT_ID")?;
        let database_id = required_var("APPWRITE_DATABASE_ID")?;

        let api_key = env::var("APPWRITE_API_KEY").ok().filter(|v| !v.is_empty());
        let jwt = env::var("APPWRITE_JWT").ok().filter(|v| !v.is_empty());

        let timeout_secs = env::var("APPWRITE_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(10);

        Ok(Self {
            endpoint,
            project_id,
            database_id,
            api_key,
            jwt,
            timeout_secs,
        })
    }
}

fn required_var(name: &str) -> DocumentStoreResult<String> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(DocumentStoreError::Configuration(format!(
            "{} environment variable not set",
            name
        ))),
    }
}

/// Request body for document creation
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateDocumentRequest<'a, T: Serialize> {
    document_id: &'a str,
    data: &'a T,
}

/// The subset of a created document the client cares about
#[derive(Debug, Clone, Deserialize)]
pub struct CreatedDocument {
    #[serde(rename = "$id")]
    pub id: String,
}

/// Error body returned by the store on failure
#[derive(Debug, Deserialize)]
struct StoreErrorBody {
    message: String,
}

/// REST client for the document store
#[derive(Debug, Clone)]
pub struct DocumentStore {
    client: reqwest::Client,
    config: DocumentStoreConfig,
}

impl DocumentStore {
    /// Build a client for the configured endpoint
    pub fn new(config: DocumentStoreConfig) -> DocumentStoreResult<Self> {
        if config.endpoint.trim().is_empty() {
            return Err(DocumentStoreError::Configuration(
                "Document store endpoint is empty".to_string(),
            ));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(DocumentStoreError::Request)?;

        info!(
            "Document store client initialized for endpoint: {}",
            config.endpoint
        );

        Ok(Self { client, config })
    }

    /// URL of the documents resource of a collection
    fn documents_url(&self, collection_id: &str) -> String {
        format!(
            "{}/databases/{}/collections/{}/documents",
            self.config.endpoint.trim_end_matches('/'),
            self.config.database_id,
            collection_id
        )
    }

    /// Create a document with a server-generated id
    pub async fn create_document<T: Serialize>(
        &self,
        collection_id: &str,
        data: &T,
    ) -> DocumentStoreResult<CreatedDocument> {
        let body = serde_json::to_vec(&CreateDocumentRequest {
            document_id: UNIQUE_DOCUMENT_ID,
            data,
        })?;

        let mut request = self
            .client
            .post(self.documents_url(collection_id))
            .header("X-Appwrite-Project", &self.config.project_id)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body);

        if let Some(key) = &self.config.api_key {
            request = request.header("X-Appwrite-Key", key);
        } else if let Some(jwt) = &self.config.jwt {
            request = request.header("X-Appwrite-JWT", jwt);
        }

        let response = request.send().await.map_err(DocumentStoreError::Request)?;
        let status = response.status();

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<StoreErrorBody>(&text)
                .map(|body| body.message)
                .unwrap_or_else(|_| {
                    status
                        .canonical_reason()
                        .unwrap_or("unknown error")
                        .to_string()
                });

            return Err(DocumentStoreError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        let created: CreatedDocument = response
            .json()
            .await
            .map_err(DocumentStoreError::Request)?;
        debug!(
            document_id = %created.id,
            collection_id = %collection_id,
            "document created"
        );

        Ok(created)
    }
}
