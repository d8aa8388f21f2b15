// SPDX-FileCopyrightText: 2026 Vetrina Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The `serve` subcommand: wire storage, blob store, provider, pipeline,
//! and gateway from the resolved configuration, then run the HTTP server.

use std::sync::Arc;
use std::time::Duration;

use secrecy::SecretString;
use tracing::{info, warn};
use vetrina_config::VetrinaConfig;
use vetrina_core::{ObjectStore, VetrinaError};
use vetrina_gateway::{GatewayState, RateLimitSettings, ServerConfig};
use vetrina_pipeline::TryOnPipeline;
use vetrina_storage::Database;
use vetrina_yce::{clean_api_key, validate_api_key, YceConfig, YceProvider};

/// Assemble the blob store backend selected by configuration.
fn build_blobstore(config: &VetrinaConfig) -> Result<Arc<dyn ObjectStore>, VetrinaError> {
    match config.blobstore.backend.as_str() {
        "http" => {
            // Presence of endpoint and service_key was checked by config
            // validation; missing values here mean serve was handed an
            // unvalidated config.
            let endpoint = config.blobstore.endpoint.clone().ok_or_else(|| {
                VetrinaError::Config("blobstore.endpoint is required for the http backend".into())
            })?;
            let service_key = config.blobstore.service_key.clone().ok_or_else(|| {
                VetrinaError::Config(
                    "blobstore.service_key is required for the http backend".into(),
                )
            })?;
            Ok(Arc::new(vetrina_blobstore::HttpBlobStore::new(
                endpoint,
                config.blobstore.bucket.clone(),
                SecretString::from(service_key),
            )?))
        }
        _ => Ok(Arc::new(vetrina_blobstore::FsBlobStore::new(
            config.blobstore.root_dir.clone(),
            config.blobstore.public_base_url.clone(),
        ))),
    }
}

/// Build the provider client from configuration.
///
/// A missing or malformed key does not stop the server: catalogs and
/// session minting still work, and each submission re-checks the credential
/// and fails with an operator-facing diagnostic.
fn build_provider(config: &VetrinaConfig) -> Result<Arc<YceProvider>, VetrinaError> {
    let raw_key = config.provider.api_key.clone().unwrap_or_default();
    let key = clean_api_key(&raw_key);
    if let Err(e) = validate_api_key(&key) {
        warn!(error = %e, "provider API key missing or malformed; try-on submissions will fail until fixed");
    }

    let provider_config = YceConfig::new(SecretString::from(key))
        .with_base_url(config.provider.base_url.clone())
        .with_poll_budget(
            Duration::from_millis(config.provider.poll_interval_ms),
            config.provider.max_poll_attempts,
        );
    Ok(Arc::new(YceProvider::new(provider_config)?))
}

/// Run the server until it exits.
pub async fn run(config: VetrinaConfig) -> Result<(), VetrinaError> {
    let db = Database::open(&config.storage.database_path).await?;
    info!(path = %config.storage.database_path, "database ready");

    let blobs = build_blobstore(&config)?;
    let provider = build_provider(&config)?;
    let pipeline = TryOnPipeline::new(db.clone(), blobs, provider);

    let state = GatewayState {
        pipeline,
        db,
        public_url: config.server.public_url.clone(),
        rate_limit: RateLimitSettings {
            window_secs: config.rate_limit.window_secs,
            max_requests: config.rate_limit.max_requests,
        },
    };

    let server_config = ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
    };

    vetrina_gateway::start_server(&server_config, state).await
}
