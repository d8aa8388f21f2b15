// SPDX-FileCopyrightText: 2026 Vetrina Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Vetrina try-on service.

use thiserror::Error;

/// The primary infrastructure error type used across Vetrina crates.
#[derive(Debug, Error)]
pub enum VetrinaError {
    /// Configuration errors (invalid TOML, missing required fields, malformed values).
    #[error("configuration error: {0}")]
    Config(String),

    /// Storage backend errors (database connection, query failure, migration).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Object store errors (upload failure, unreachable backend).
    #[error("blob store error: {message}")]
    Blob {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Failures at the try-on provider boundary.
///
/// The orchestrator's retry and user-messaging policy differs per kind:
/// timeouts may be surfaced as "try again", auth failures are
/// operator-actionable, and task failures carry the provider's own
/// diagnostic text. Each kind is therefore its own variant.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Task creation was rejected (non-2xx, malformed envelope, or missing
    /// task id). Definitive; never retried at this layer.
    #[error("task creation failed: {message}")]
    Rejected { message: String },

    /// The provider returned HTTP 401 while polling. Not transient.
    #[error("authentication failed during polling")]
    AuthFailed,

    /// The provider reported the task itself as failed.
    #[error("{message}")]
    TaskFailed { message: String },

    /// The polling budget was exhausted without a terminal status.
    #[error("task timed out during polling after {attempts} attempts")]
    Timeout { attempts: u32 },

    /// The task reported success but no result URL could be extracted.
    #[error("no result URL found in provider response")]
    MissingResult,

    /// A transport-level failure while creating the task. Definitive, since
    /// the provider may or may not have registered (and charged for) the task.
    #[error("provider transport error: {message}")]
    Transport {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeout_message_names_attempt_count() {
        let err = ProviderError::Timeout { attempts: 15 };
        assert_eq!(
            err.to_string(),
            "task timed out during polling after 15 attempts"
        );
    }

    #[test]
    fn task_failed_preserves_provider_text() {
        let err = ProviderError::TaskFailed {
            message: "wrist not detected".into(),
        };
        assert_eq!(err.to_string(), "wrist not detected");
    }
}
