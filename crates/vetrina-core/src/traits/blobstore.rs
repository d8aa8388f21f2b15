// SPDX-FileCopyrightText: 2026 Vetrina Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Trait for durable object storage backends.

use async_trait::async_trait;

use crate::error::VetrinaError;

/// A durable object store that serves uploaded objects at public URLs.
///
/// The try-on provider fetches the capture by URL, so `put` must return a
/// location the provider can resolve, not an internal handle.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store `bytes` at `path` with the given content type.
    ///
    /// Returns the publicly resolvable URL of the stored object.
    async fn put(
        &self,
        path: &str,
        bytes: &[u8],
        content_type: &str,
    ) -> Result<String, VetrinaError>;
}
