// SPDX-FileCopyrightText: 2026 Vetrina Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain model types for storage entities.

use serde::{Deserialize, Serialize};
use vetrina_core::TryOnState;

/// Current UTC timestamp in the ISO 8601 format used across all tables.
pub(crate) fn now_iso() -> String {
    chrono::Utc::now()
        .format("%Y-%m-%dT%H:%M:%S%.3fZ")
        .to_string()
}

/// A retailer tenant. Created and edited by the CRUD layer; the pipeline
/// reads it and the ledger decrements its unit balance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tenant {
    pub id: String,
    /// URL-safe identifier used by the storefront catalog endpoint.
    pub slug: String,
    pub name: String,
    /// Remaining try-on units. Non-negative in steady state; mutated only
    /// through the ledger's conditional decrement.
    pub unit_balance: i64,
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl Tenant {
    /// Build a new tenant row with a generated id and fresh timestamps.
    pub fn new(slug: &str, name: &str, unit_balance: i64) -> Self {
        let now = now_iso();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            slug: slug.to_string(),
            name: name.to_string(),
            unit_balance,
            is_active: true,
            created_at: now.clone(),
            updated_at: now,
        }
    }
}

/// A tenant's product. The category and tuning parameters drive the
/// provider payload; both are read-only inputs to the pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub tenant_id: String,
    pub name: String,
    /// Jewelry category as stored; parsed into a closed enum at the
    /// pipeline boundary so unsupported values fail eagerly.
    pub category: String,
    /// Public URL of the reference image.
    pub image_url: String,
    pub price: Option<f64>,
    /// Category-specific tuning parameters and optional mask references,
    /// as a JSON object.
    pub tuning: Option<serde_json::Value>,
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl Product {
    /// Build a new product row with a generated id and fresh timestamps.
    pub fn new(tenant_id: &str, name: &str, category: &str, image_url: &str) -> Self {
        let now = now_iso();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            tenant_id: tenant_id.to_string(),
            name: name.to_string(),
            category: category.to_string(),
            image_url: image_url.to_string(),
            price: None,
            tuning: None,
            is_active: true,
            created_at: now.clone(),
            updated_at: now,
        }
    }

    /// Attach category-specific tuning parameters.
    pub fn with_tuning(mut self, tuning: serde_json::Value) -> Self {
        self.tuning = Some(tuning);
        self
    }
}

/// One try-on attempt. The state machine moves strictly forward:
/// `unstarted -> awaiting_provider -> {succeeded | failed}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TryOnSession {
    pub id: String,
    pub tenant_id: String,
    pub product_id: String,
    pub state: TryOnState,
    /// Public URL of the shopper's capture; set by the claim transition.
    pub capture_url: Option<String>,
    /// Provider task id; set as soon as a task is created.
    pub task_id: Option<String>,
    /// Set only on `succeeded`.
    pub result_url: Option<String>,
    /// Best-effort mask URL, when the provider supplied one.
    pub mask_url: Option<String>,
    /// Set only on `failed`.
    pub error_message: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl TryOnSession {
    /// Mint a new unstarted session for the given tenant and product.
    pub fn new(tenant_id: &str, product_id: &str) -> Self {
        let now = now_iso();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            tenant_id: tenant_id.to_string(),
            product_id: product_id.to_string(),
            state: TryOnState::Unstarted,
            capture_url: None,
            task_id: None,
            result_url: None,
            mask_url: None,
            error_message: None,
            created_at: now.clone(),
            updated_at: now,
        }
    }
}
