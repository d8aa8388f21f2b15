// SPDX-FileCopyrightText: 2026 Vetrina Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Vetrina virtual try-on service.
//!
//! This crate provides the foundational trait definitions, error types, and
//! domain types used throughout the Vetrina workspace. The provider and
//! object-store seams are defined here so the orchestration layer never
//! depends on a concrete vendor client or storage backend.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::{ProviderError, VetrinaError};
pub use types::{
    JewelryCategory, ProductId, SessionId, TaskId, TenantId, TryOnRequest, TryOnResult,
    TryOnState, UnsupportedCategory,
};

pub use traits::{ObjectStore, TryOnProvider};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vetrina_error_has_all_variants() {
        let _config = VetrinaError::Config("test".into());
        let _storage = VetrinaError::Storage {
            source: Box::new(std::io::Error::other("test")),
        };
        let _blob = VetrinaError::Blob {
            message: "test".into(),
            source: None,
        };
        let _internal = VetrinaError::Internal("test".into());
    }

    #[test]
    fn provider_error_kinds_are_distinguishable() {
        // The orchestration layer branches on these kinds, so each must be
        // a distinct variant rather than a message convention.
        let rejected = ProviderError::Rejected {
            message: "bad envelope".into(),
        };
        let auth = ProviderError::AuthFailed;
        let task = ProviderError::TaskFailed {
            message: "left hand not detected".into(),
        };
        let timeout = ProviderError::Timeout { attempts: 15 };
        let missing = ProviderError::MissingResult;

        assert!(matches!(rejected, ProviderError::Rejected { .. }));
        assert!(matches!(auth, ProviderError::AuthFailed));
        assert!(matches!(task, ProviderError::TaskFailed { .. }));
        assert!(matches!(timeout, ProviderError::Timeout { attempts: 15 }));
        assert!(matches!(missing, ProviderError::MissingResult));
    }

    #[test]
    fn trait_objects_are_usable() {
        fn _assert_provider(_: &dyn TryOnProvider) {}
        fn _assert_store(_: &dyn ObjectStore) {}
    }
}
