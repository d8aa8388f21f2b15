// SPDX-FileCopyrightText: 2026 Vetrina Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! YCE 2D-VTO provider adapter for Vetrina.
//!
//! Implements [`TryOnProvider`] over the YCE S2S API: category-namespaced
//! payload construction, task creation, fixed-budget polling, and result
//! normalization.

pub mod auth;
pub mod client;
pub mod extract;
pub mod payload;
pub mod poll;
pub mod types;

use async_trait::async_trait;
use tracing::warn;
use vetrina_core::{
    JewelryCategory, ProviderError, TaskId, TryOnProvider, TryOnRequest, TryOnResult,
    VetrinaError,
};

pub use auth::{clean_api_key, validate_api_key, CredentialError};
pub use client::{YceClient, YceConfig, DEFAULT_BASE_URL};

/// The YCE provider adapter.
pub struct YceProvider {
    client: YceClient,
}

impl YceProvider {
    /// Build a provider over the given configuration.
    pub fn new(config: YceConfig) -> Result<Self, VetrinaError> {
        Ok(Self {
            client: YceClient::new(config)?,
        })
    }
}

#[async_trait]
impl TryOnProvider for YceProvider {
    fn validate_credentials(&self) -> Result<(), String> {
        use secrecy::ExposeSecret;
        let key = self.client.config.api_key.expose_secret();
        auth::validate_api_key(key).map_err(|e| e.to_string())
    }

    async fn create_task(&self, request: &TryOnRequest) -> Result<TaskId, ProviderError> {
        self.client.create_task(request).await
    }

    async fn await_completion(
        &self,
        category: JewelryCategory,
        task: &TaskId,
    ) -> Result<TryOnResult, ProviderError> {
        let data = self.client.poll_task(category, task).await?;

        let Some(result_url) = extract::extract_result_url(&data) else {
            // The task reported success, so this is contract drift worth
            // noticing, not a silent miss.
            warn!(task_id = %task, payload = ?data, "task succeeded but no result URL found");
            return Err(ProviderError::MissingResult);
        };

        Ok(TryOnResult {
            result_url: result_url.to_string(),
            mask_url: extract::extract_mask_url(&data).map(str::to_string),
        })
    }
}
