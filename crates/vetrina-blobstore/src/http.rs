// SPDX-FileCopyrightText: 2026 Vetrina Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP bucket-style object store.
//!
//! Speaks the common hosted-storage wire shape: authenticated
//! `POST {endpoint}/object/{bucket}/{path}` for uploads, with objects served
//! publicly at `{endpoint}/object/public/{bucket}/{path}`.

use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use tracing::debug;
use vetrina_core::{ObjectStore, VetrinaError};

/// Object store over a bucket-style storage HTTP API.
pub struct HttpBlobStore {
    http: reqwest::Client,
    endpoint: String,
    bucket: String,
    service_key: SecretString,
}

impl HttpBlobStore {
    /// Create a store over `endpoint` uploading into `bucket`.
    pub fn new(
        endpoint: impl Into<String>,
        bucket: impl Into<String>,
        service_key: SecretString,
    ) -> Result<Self, VetrinaError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| VetrinaError::Internal(format!("failed to build HTTP client: {e}")))?;
        let endpoint = endpoint.into();
        Ok(Self {
            http,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            bucket: bucket.into(),
            service_key,
        })
    }
}

#[async_trait]
impl ObjectStore for HttpBlobStore {
    async fn put(
        &self,
        path: &str,
        bytes: &[u8],
        content_type: &str,
    ) -> Result<String, VetrinaError> {
        let upload_url = format!("{}/object/{}/{}", self.endpoint, self.bucket, path);

        let response = self
            .http
            .post(&upload_url)
            .bearer_auth(self.service_key.expose_secret())
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(bytes.to_vec())
            .send()
            .await
            .map_err(|e| VetrinaError::Blob {
                message: format!("blob upload request failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(VetrinaError::Blob {
                message: format!("blob upload returned {status}: {body}"),
                source: None,
            });
        }

        debug!(path, content_type, size = bytes.len(), "blob uploaded");
        Ok(format!(
            "{}/object/public/{}/{}",
            self.endpoint, self.bucket, path
        ))
    }
}
