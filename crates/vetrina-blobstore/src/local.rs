// SPDX-FileCopyrightText: 2026 Vetrina Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Filesystem-backed object store.

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;
use vetrina_core::{ObjectStore, VetrinaError};

/// Object store writing under a local root directory.
///
/// Assumes a static file host serves `root_dir` at `public_base_url`.
pub struct FsBlobStore {
    root_dir: PathBuf,
    public_base_url: String,
}

impl FsBlobStore {
    /// Create a store over `root_dir`, served at `public_base_url`.
    pub fn new(root_dir: impl Into<PathBuf>, public_base_url: impl Into<String>) -> Self {
        let public_base_url = public_base_url.into();
        Self {
            root_dir: root_dir.into(),
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Reject absolute paths and parent-directory segments: object paths are
    /// server-generated, so anything else indicates a bug or tampering.
    fn safe_join(&self, path: &str) -> Result<PathBuf, VetrinaError> {
        let relative = Path::new(path);
        let all_normal = relative
            .components()
            .all(|c| matches!(c, Component::Normal(_)));
        if path.is_empty() || !all_normal {
            return Err(VetrinaError::Blob {
                message: format!("refusing unsafe object path: {path}"),
                source: None,
            });
        }
        Ok(self.root_dir.join(relative))
    }
}

#[async_trait]
impl ObjectStore for FsBlobStore {
    async fn put(
        &self,
        path: &str,
        bytes: &[u8],
        content_type: &str,
    ) -> Result<String, VetrinaError> {
        let target = self.safe_join(path)?;

        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| VetrinaError::Blob {
                    message: format!("failed to create blob directory: {e}"),
                    source: Some(Box::new(e)),
                })?;
        }

        tokio::fs::write(&target, bytes)
            .await
            .map_err(|e| VetrinaError::Blob {
                message: format!("failed to write blob: {e}"),
                source: Some(Box::new(e)),
            })?;

        debug!(path, content_type, size = bytes.len(), "blob stored locally");
        Ok(format!("{}/{}", self.public_base_url, path))
    }
}
