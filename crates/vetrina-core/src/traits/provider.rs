// SPDX-FileCopyrightText: 2026 Vetrina Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Trait for external virtual try-on providers.

use async_trait::async_trait;

use crate::error::ProviderError;
use crate::types::{JewelryCategory, TaskId, TryOnRequest, TryOnResult};

/// An external service that composites jewelry onto a capture image.
///
/// Task creation and completion are split so the orchestrator can persist
/// the task id as soon as it exists: even when polling later fails, the
/// session record must carry the id of the (already charged) provider task.
#[async_trait]
pub trait TryOnProvider: Send + Sync {
    /// Check that the configured credential is present and plausibly
    /// well-formed, before any charged call is attempted.
    ///
    /// Returns an operator-facing diagnostic on failure. The message must
    /// not contain the credential itself.
    fn validate_credentials(&self) -> Result<(), String>;

    /// Submit a task-creation request. Returns the provider's task id.
    async fn create_task(&self, request: &TryOnRequest) -> Result<TaskId, ProviderError>;

    /// Wait for the task to reach a terminal state and normalize its result.
    ///
    /// Implementations own the polling budget; exhausting it yields
    /// [`ProviderError::Timeout`], distinguishable from an authentication
    /// failure ([`ProviderError::AuthFailed`]) and from a provider-reported
    /// task failure ([`ProviderError::TaskFailed`]).
    async fn await_completion(
        &self,
        category: JewelryCategory,
        task: &TaskId,
    ) -> Result<TryOnResult, ProviderError>;
}
