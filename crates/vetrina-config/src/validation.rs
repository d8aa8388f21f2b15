// SPDX-FileCopyrightText: 2026 Vetrina Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes, such as valid bind addresses, backend selectors, and sane
//! polling budgets. The provider API key is deliberately NOT validated here:
//! its presence and format are checked per submission so a server without a
//! key can still boot, serve catalogs, and mint sessions.

use crate::diagnostic::ConfigError;
use crate::model::VetrinaConfig;

const BLOBSTORE_BACKENDS: [&str; 2] = ["local", "http"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &VetrinaConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    // Validate server.host is not empty and looks like an IP or hostname.
    let host = config.server.host.trim();
    if host.is_empty() {
        errors.push(ConfigError::Validation {
            message: "server.host must not be empty".to_string(),
        });
    } else {
        let is_valid_ip = host.parse::<std::net::IpAddr>().is_ok();
        let is_valid_hostname = host
            .chars()
            .all(|c| c.is_alphanumeric() || c == '.' || c == '-' || c == ':');
        if !is_valid_ip && !is_valid_hostname {
            errors.push(ConfigError::Validation {
                message: format!("server.host `{host}` is not a valid IP address or hostname"),
            });
        }
    }

    if config.server.public_url.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "server.public_url must not be empty".to_string(),
        });
    }

    if config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "storage.database_path must not be empty".to_string(),
        });
    }

    if !config.provider.base_url.starts_with("http://")
        && !config.provider.base_url.starts_with("https://")
    {
        errors.push(ConfigError::Validation {
            message: format!(
                "provider.base_url must be an http(s) URL, got `{}`",
                config.provider.base_url
            ),
        });
    }

    if config.provider.poll_interval_ms == 0 {
        errors.push(ConfigError::Validation {
            message: "provider.poll_interval_ms must be at least 1".to_string(),
        });
    }

    if config.provider.max_poll_attempts == 0 {
        errors.push(ConfigError::Validation {
            message: "provider.max_poll_attempts must be at least 1".to_string(),
        });
    }

    if !BLOBSTORE_BACKENDS.contains(&config.blobstore.backend.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "blobstore.backend must be one of {}, got `{}`",
                BLOBSTORE_BACKENDS.join(", "),
                config.blobstore.backend
            ),
        });
    }

    if config.blobstore.backend == "http" {
        if config.blobstore.endpoint.is_none() {
            errors.push(ConfigError::Validation {
                message: "blobstore.endpoint is required when blobstore.backend = \"http\""
                    .to_string(),
            });
        }
        if config.blobstore.service_key.is_none() {
            errors.push(ConfigError::Validation {
                message: "blobstore.service_key is required when blobstore.backend = \"http\""
                    .to_string(),
            });
        }
    }

    if config.rate_limit.window_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "rate_limit.window_secs must be at least 1".to_string(),
        });
    }

    if config.rate_limit.max_requests == 0 {
        errors.push(ConfigError::Validation {
            message: "rate_limit.max_requests must be at least 1".to_string(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
