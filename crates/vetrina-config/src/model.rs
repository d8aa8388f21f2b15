// SPDX-FileCopyrightText: 2026 Vetrina Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Vetrina try-on service.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Vetrina configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable
/// overrides. All sections are optional and default to sensible values; the
/// provider API key is the one value with no default.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct VetrinaConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Try-on provider API settings.
    #[serde(default)]
    pub provider: ProviderConfig,

    /// SQLite storage settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Capture blob store settings.
    #[serde(default)]
    pub blobstore: BlobstoreConfig,

    /// Session-minting rate limit settings.
    #[serde(default)]
    pub rate_limit: RateLimitConfig,

    /// Logging settings.
    #[serde(default)]
    pub log: LogConfig,
}

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Address to bind the server to.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Public base URL of this deployment, used to build try-on links.
    #[serde(default = "default_public_url")]
    pub public_url: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            public_url: default_public_url(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8420
}

fn default_public_url() -> String {
    "http://127.0.0.1:8420".to_string()
}

/// Try-on provider API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ProviderConfig {
    /// S2S secret key for the provider API. `None` requires an environment
    /// variable; the key is validated at submission time, not load time.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Provider API base URL.
    #[serde(default = "default_provider_base_url")]
    pub base_url: String,

    /// Milliseconds to sleep before each poll attempt.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Maximum number of poll attempts before declaring a timeout.
    #[serde(default = "default_max_poll_attempts")]
    pub max_poll_attempts: u32,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_provider_base_url(),
            poll_interval_ms: default_poll_interval_ms(),
            max_poll_attempts: default_max_poll_attempts(),
        }
    }
}

fn default_provider_base_url() -> String {
    "https://yce-api-01.makeupar.com".to_string()
}

fn default_poll_interval_ms() -> u64 {
    2000
}

fn default_max_poll_attempts() -> u32 {
    15
}

/// SQLite storage configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("vetrina").join("vetrina.db"))
        .unwrap_or_else(|| std::path::PathBuf::from("vetrina.db"))
        .to_string_lossy()
        .into_owned()
}

/// Capture blob store configuration.
///
/// The `local` backend writes captures under `root_dir` and assumes a static
/// file host serves that directory at `public_base_url`. The `http` backend
/// uploads to a bucket-style storage API at `endpoint`.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BlobstoreConfig {
    /// Backend selector: "local" or "http".
    #[serde(default = "default_blobstore_backend")]
    pub backend: String,

    /// Directory for the local backend.
    #[serde(default = "default_blobstore_root_dir")]
    pub root_dir: String,

    /// Public base URL under which stored objects resolve (local backend).
    #[serde(default = "default_blobstore_public_base_url")]
    pub public_base_url: String,

    /// Storage API endpoint (http backend). Required when backend = "http".
    #[serde(default)]
    pub endpoint: Option<String>,

    /// Bucket name for uploaded captures.
    #[serde(default = "default_blobstore_bucket")]
    pub bucket: String,

    /// Service key authorizing uploads (http backend).
    #[serde(default)]
    pub service_key: Option<String>,
}

impl Default for BlobstoreConfig {
    fn default() -> Self {
        Self {
            backend: default_blobstore_backend(),
            root_dir: default_blobstore_root_dir(),
            public_base_url: default_blobstore_public_base_url(),
            endpoint: None,
            bucket: default_blobstore_bucket(),
            service_key: None,
        }
    }
}

fn default_blobstore_backend() -> String {
    "local".to_string()
}

fn default_blobstore_root_dir() -> String {
    dirs::data_dir()
        .map(|p| p.join("vetrina").join("captures"))
        .unwrap_or_else(|| std::path::PathBuf::from("captures"))
        .to_string_lossy()
        .into_owned()
}

fn default_blobstore_public_base_url() -> String {
    "http://127.0.0.1:8420/captures".to_string()
}

fn default_blobstore_bucket() -> String {
    "vto-captures".to_string()
}

/// Rate limit configuration for the public session-minting endpoint.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RateLimitConfig {
    /// Counter window length in seconds.
    #[serde(default = "default_rate_limit_window_secs")]
    pub window_secs: u64,

    /// Maximum requests per identity per window.
    #[serde(default = "default_rate_limit_max_requests")]
    pub max_requests: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            window_secs: default_rate_limit_window_secs(),
            max_requests: default_rate_limit_max_requests(),
        }
    }
}

fn default_rate_limit_window_secs() -> u64 {
    60
}

fn default_rate_limit_max_requests() -> u32 {
    30
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LogConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}
