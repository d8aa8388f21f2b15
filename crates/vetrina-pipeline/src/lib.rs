// SPDX-FileCopyrightText: 2026 Vetrina Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Try-on orchestration.
//!
//! [`TryOnPipeline`] is the only component that writes session state and
//! triggers unit settlement. One submission runs strictly sequentially:
//! validate, upload, claim, create task, poll, persist, settle. The claim is
//! a single conditional UPDATE, so duplicate submissions for the same
//! session cannot both reach the (charged) provider call.

pub mod error;

use std::sync::Arc;

use tracing::{info, warn};
use vetrina_core::{
    JewelryCategory, ObjectStore, ProviderError, TryOnProvider, TryOnRequest, TryOnResult,
    TryOnState,
};
use vetrina_ledger::UnitLedger;
use vetrina_storage::queries::{products, sessions, tenants};
use vetrina_storage::{Database, Product, TryOnSession};

pub use error::TryOnError;

/// Captures below this size are blank or corrupt; rejecting them avoids a
/// charged provider task that cannot succeed.
pub const MIN_CAPTURE_BYTES: usize = 1_000;

/// Upper size bound for captures, to cap cost and abuse.
pub const MAX_CAPTURE_BYTES: usize = 10 * 1024 * 1024;

/// An uploaded capture as received from the HTTP layer.
#[derive(Debug, Clone)]
pub struct CaptureUpload {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// The try-on orchestrator.
#[derive(Clone)]
pub struct TryOnPipeline {
    db: Database,
    blobs: Arc<dyn ObjectStore>,
    provider: Arc<dyn TryOnProvider>,
    ledger: UnitLedger,
}

impl TryOnPipeline {
    /// Assemble the pipeline over its collaborators.
    pub fn new(
        db: Database,
        blobs: Arc<dyn ObjectStore>,
        provider: Arc<dyn TryOnProvider>,
    ) -> Self {
        let ledger = UnitLedger::new(db.clone());
        Self {
            db,
            blobs,
            provider,
            ledger,
        }
    }

    /// Mint a new try-on session for an active product of an active, funded
    /// tenant.
    pub async fn mint_session(&self, product_id: &str) -> Result<TryOnSession, TryOnError> {
        let product = products::get_product(&self.db, product_id)
            .await?
            .ok_or(TryOnError::ProductNotFound)?;
        if !product.is_active {
            return Err(TryOnError::ProductNotFound);
        }

        let tenant = tenants::get_tenant(&self.db, &product.tenant_id).await?;
        let tenant = match tenant {
            Some(tenant) if tenant.is_active => tenant,
            _ => return Err(TryOnError::TenantInactive),
        };
        if tenant.unit_balance <= 0 {
            return Err(TryOnError::UnitsExhausted);
        }

        let session = TryOnSession::new(&tenant.id, &product.id);
        sessions::create_session(&self.db, &session).await?;
        info!(session_id = %session.id, product_id, "try-on session minted");
        Ok(session)
    }

    /// Run one capture submission end to end.
    ///
    /// Every definitive failure after the claim persists a terminal
    /// `failed` state (with the task id when one exists) before returning,
    /// so a session is never left dangling in `awaiting_provider` once this
    /// pipeline has locally decided the outcome.
    pub async fn submit(
        &self,
        session_id: &str,
        product_id: &str,
        capture: CaptureUpload,
    ) -> Result<TryOnResult, TryOnError> {
        validate_capture(&capture)?;

        // Preconditions against a fresh session read; the atomic claim
        // below re-checks, this is the cheap early reject.
        let session = sessions::get_session(&self.db, session_id)
            .await?
            .ok_or(TryOnError::SessionNotFound)?;
        if session.product_id != product_id {
            return Err(TryOnError::SessionNotFound);
        }
        match session.state {
            TryOnState::Unstarted => {}
            TryOnState::AwaitingProvider => return Err(TryOnError::TaskInFlight),
            TryOnState::Succeeded | TryOnState::Failed => {
                return Err(TryOnError::AlreadyResolved)
            }
        }

        let product = products::get_product(&self.db, &session.product_id)
            .await?
            .ok_or(TryOnError::ProductNotFound)?;
        let category = JewelryCategory::parse(&product.category)
            .map_err(|e| TryOnError::InvalidInput(e.to_string()))?;

        // Cheapest external call first: a failed upload leaves the session
        // unclaimed and retryable.
        let path = format!(
            "{}/{}/{}.jpg",
            session.tenant_id,
            session.id,
            uuid::Uuid::new_v4()
        );
        let capture_url = self
            .blobs
            .put(&path, &capture.bytes, &capture.content_type)
            .await
            .map_err(|e| TryOnError::Upload(e.to_string()))?;

        // The idempotency guard proper: one conditional UPDATE, checked
        // against live state immediately before task creation.
        let claimed =
            sessions::claim_for_processing(&self.db, &session.id, &capture_url).await?;
        if !claimed {
            let current = sessions::get_session(&self.db, &session.id).await?;
            return Err(match current.map(|s| s.state) {
                Some(TryOnState::AwaitingProvider) => TryOnError::TaskInFlight,
                _ => TryOnError::AlreadyResolved,
            });
        }

        // Terminal configuration failure is recorded onto the session
        // before responding; it must not be left in `awaiting_provider`.
        if let Err(detail) = self.provider.validate_credentials() {
            sessions::mark_failed(&self.db, &session.id, None, &detail).await?;
            return Err(TryOnError::Config { detail });
        }

        match self
            .run_provider(&session, &product, category, &capture_url)
            .await
        {
            Ok(result) => {
                let first_success = sessions::mark_succeeded(
                    &self.db,
                    &session.id,
                    &result.result_url,
                    result.mask_url.as_deref(),
                )
                .await?;

                if first_success {
                    // Billing is best-effort: the provider cost is already
                    // incurred, so a settlement shortfall is logged, never
                    // surfaced to the shopper.
                    if let Err(e) = self
                        .ledger
                        .settle_success(&session.tenant_id, &session.id)
                        .await
                    {
                        warn!(session_id = %session.id, error = %e, "unit settlement failed");
                    }
                } else {
                    info!(session_id = %session.id, "session already resolved, skipping settlement");
                }

                Ok(result)
            }
            Err((task_id, provider_err)) => {
                let message = provider_err.to_string();
                sessions::mark_failed(&self.db, &session.id, task_id.as_deref(), &message)
                    .await?;
                Err(TryOnError::Provider(provider_err))
            }
        }
    }

    /// Task creation and completion wait.
    ///
    /// Returns the failure together with the task id when one was obtained,
    /// so the caller can persist it.
    async fn run_provider(
        &self,
        session: &TryOnSession,
        product: &Product,
        category: JewelryCategory,
        capture_url: &str,
    ) -> Result<TryOnResult, (Option<String>, ProviderError)> {
        let tuning = product_tuning(product);
        let request = TryOnRequest {
            source_image_url: capture_url.to_string(),
            product_image_url: product.image_url.clone(),
            category,
            src_mask_url: tuning
                .get("src_mask_url")
                .and_then(|v| v.as_str())
                .map(str::to_string),
            ref_mask_url: tuning
                .get("ref_mask_url")
                .and_then(|v| v.as_str())
                .map(str::to_string),
            tuning,
        };

        let task_id = self
            .provider
            .create_task(&request)
            .await
            .map_err(|e| (None, e))?;

        // Recorded as soon as the task exists: even if polling fails, the
        // session must carry the id of the already charged task.
        if let Err(e) = sessions::record_task_id(&self.db, &session.id, &task_id.0).await {
            warn!(session_id = %session.id, error = %e, "failed to record task id");
        }

        let result = self
            .provider
            .await_completion(category, &task_id)
            .await
            .map_err(|e| (Some(task_id.0.clone()), e))?;

        Ok(result)
    }
}

/// Reject captures that would waste a charged provider task.
fn validate_capture(capture: &CaptureUpload) -> Result<(), TryOnError> {
    if !capture.content_type.starts_with("image/") {
        return Err(TryOnError::InvalidInput(
            "Invalid file type. Please upload an image.".to_string(),
        ));
    }
    if capture.bytes.len() < MIN_CAPTURE_BYTES {
        return Err(TryOnError::InvalidInput(
            "File too small. Please capture a valid image.".to_string(),
        ));
    }
    if capture.bytes.len() > MAX_CAPTURE_BYTES {
        return Err(TryOnError::InvalidInput(
            "File too large. Maximum size is 10MB.".to_string(),
        ));
    }
    Ok(())
}

/// The product's tuning parameters as a JSON object map.
fn product_tuning(product: &Product) -> serde_json::Map<String, serde_json::Value> {
    match &product.tuning {
        Some(serde_json::Value::Object(map)) => map.clone(),
        _ => serde_json::Map::new(),
    }
}
