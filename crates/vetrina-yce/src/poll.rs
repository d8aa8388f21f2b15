// SPDX-FileCopyrightText: 2026 Vetrina Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Task status polling.
//!
//! Fixed-interval polling with a bounded attempt count. Each attempt sleeps
//! first: the provider never resolves a task instantly, so probing at t=0
//! is a wasted round-trip.

use secrecy::ExposeSecret;
use tracing::{debug, warn};
use vetrina_core::{JewelryCategory, ProviderError, TaskId};

use crate::client::YceClient;
use crate::types::{Envelope, TaskData, TaskStatus};

impl YceClient {
    /// Poll the task until it reaches a terminal state or the attempt
    /// budget is exhausted.
    ///
    /// Per attempt:
    /// - HTTP 401 stops immediately with [`ProviderError::AuthFailed`];
    ///   a bad credential will not become good by waiting.
    /// - An envelope with application status 200 and `task_status =
    ///   "success"` returns the payload.
    /// - `task_status = "error"` stops with [`ProviderError::TaskFailed`],
    ///   preserving the provider's own error message.
    /// - Anything else, including transport errors and unparseable bodies,
    ///   is transient: the attempt is consumed and the loop continues.
    ///
    /// Exhausting the budget yields [`ProviderError::Timeout`], a distinct
    /// kind because the orchestration layer surfaces it differently from an
    /// auth failure or a provider-reported task failure.
    pub async fn poll_task(
        &self,
        category: JewelryCategory,
        task: &TaskId,
    ) -> Result<TaskData, ProviderError> {
        let url = self.task_url(category, Some(task));
        let max_attempts = self.config.max_poll_attempts;

        for attempt in 1..=max_attempts {
            tokio::time::sleep(self.config.poll_interval).await;

            let response = match self
                .http
                .get(&url)
                .bearer_auth(self.config.api_key.expose_secret())
                .send()
                .await
            {
                Ok(response) => response,
                Err(e) => {
                    warn!(attempt, max_attempts, error = %e, "poll attempt failed, continuing");
                    continue;
                }
            };

            if response.status() == reqwest::StatusCode::UNAUTHORIZED {
                return Err(ProviderError::AuthFailed);
            }

            let envelope: Option<Envelope<TaskData>> = response.json().await.ok();
            let Some(envelope) = envelope else {
                warn!(attempt, max_attempts, "unparseable poll response, continuing");
                continue;
            };

            if envelope.status != Some(200) {
                debug!(attempt, max_attempts, status = ?envelope.status, "non-200 envelope, continuing");
                continue;
            }

            let Some(data) = envelope.data else {
                debug!(attempt, max_attempts, "envelope without data, continuing");
                continue;
            };

            match data.task_status {
                Some(TaskStatus::Success) => {
                    debug!(task_id = %task, attempt, "task succeeded");
                    return Ok(data);
                }
                Some(TaskStatus::Error) => {
                    let message = data
                        .error_message
                        .unwrap_or_else(|| "Task failed".to_string());
                    return Err(ProviderError::TaskFailed { message });
                }
                status => {
                    debug!(task_id = %task, attempt, max_attempts, ?status, "task still in progress");
                }
            }
        }

        Err(ProviderError::Timeout {
            attempts: max_attempts,
        })
    }
}
