//! Content-addressed object storage for candidate symbol images.

use async_trait::async_trait;
use ballot_types::SymbolFile;
use serde::Deserialize;

use crate::error::AdapterError;

/// Uploads files and returns one content URI per stored object.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    async fn upload(&self, files: Vec<SymbolFile>) -> Result<Vec<String>, AdapterError>;
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    #[serde(default)]
    uri: Option<String>,
    #[serde(default)]
    uris: Vec<String>,
}

impl UploadResponse {
    fn into_uris(self) -> Vec<String> {
        self.uri.into_iter().chain(self.uris).collect()
    }
}

/// [`ObjectStorage`] backed by an HTTP upload gateway.
///
/// Each file is posted as the raw request body; the gateway answers with
/// `{"uri": "..."}` or `{"uris": [...]}`.
#[derive(Clone)]
pub struct HttpObjectStorage {
    http: reqwest::Client,
    endpoint: String,
}

impl HttpObjectStorage {
    pub fn new(endpoint: impl Into<String>) -> Result<Self, AdapterError> {
        Ok(Self {
            http: crate::http::build_client()?,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn upload_one(&self, file: SymbolFile) -> Result<Vec<String>, AdapterError> {
        let response = self
            .http
            .post(&self.endpoint)
            .header(reqwest::header::CONTENT_TYPE, file.content_type.as_str())
            .header("x-file-name", file.file_name.as_str())
            .body(file.bytes)
            .send()
            .await
            .map_err(|e| AdapterError::Upload(e.to_string()))?;

        crate::http::check_status("object storage", &response)?;

        let parsed: UploadResponse = response
            .json()
            .await
            .map_err(|e| AdapterError::decode("upload", e))?;
        Ok(parsed.into_uris())
    }
}

#[async_trait]
impl ObjectStorage for HttpObjectStorage {
    async fn upload(&self, files: Vec<SymbolFile>) -> Result<Vec<String>, AdapterError> {
        let mut uris = Vec::with_capacity(files.len());
        for file in files {
            tracing::debug!(file = %file.file_name, bytes = file.len(), "uploading");
            uris.extend(self.upload_one(file).await?);
        }
        Ok(uris)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upload_response_accepts_either_shape() {
        let single: UploadResponse = serde_json::from_str(r#"{"uri": "ipfs://a"}"#).unwrap();
        assert_eq!(single.into_uris(), vec!["ipfs://a".to_string()]);

        let many: UploadResponse =
            serde_json::from_str(r#"{"uris": ["ipfs://a", "ipfs://b"]}"#).unwrap();
        assert_eq!(many.into_uris().len(), 2);

        let none: UploadResponse = serde_json::from_str("{}").unwrap();
        assert!(none.into_uris().is_empty());
    }

    #[test]
    fn storage_client_creation() {
        let storage = HttpObjectStorage::new("http://127.0.0.1:5001/upload").unwrap();
        assert_eq!(storage.endpoint(), "http://127.0.0.1:5001/upload");
    }
}
