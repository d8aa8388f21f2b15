// SPDX-FileCopyrightText: 2026 Vetrina Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./vetrina.toml` > `~/.config/vetrina/vetrina.toml`
//! > `/etc/vetrina/vetrina.toml`, with environment variable overrides via the
//! `VETRINA_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::VetrinaConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/vetrina/vetrina.toml` (system-wide)
/// 3. `~/.config/vetrina/vetrina.toml` (user XDG config)
/// 4. `./vetrina.toml` (local directory)
/// 5. `VETRINA_*` environment variables
pub fn load_config() -> Result<VetrinaConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(VetrinaConfig::default()))
        .merge(Toml::file("/etc/vetrina/vetrina.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("vetrina/vetrina.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("vetrina.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env vars).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<VetrinaConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(VetrinaConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<VetrinaConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(VetrinaConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Create the environment variable provider using explicit `map()` for
/// section-to-dot mapping.
///
/// Uses `Env::map()` instead of `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names: `VETRINA_RATE_LIMIT_WINDOW_SECS` must map
/// to `rate_limit.window_secs`, not `rate.limit.window.secs`.
fn env_provider() -> Env {
    Env::prefixed("VETRINA_").map(|key| {
        // `key` is the lowercased env var name with prefix stripped.
        // Example: VETRINA_PROVIDER_API_KEY -> "provider_api_key"
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("server_", "server.", 1)
            .replacen("provider_", "provider.", 1)
            .replacen("storage_", "storage.", 1)
            .replacen("blobstore_", "blobstore.", 1)
            .replacen("rate_limit_", "rate_limit.", 1)
            .replacen("log_", "log.", 1);
        mapped.into()
    })
}
