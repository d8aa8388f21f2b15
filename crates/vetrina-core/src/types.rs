// SPDX-FileCopyrightText: 2026 Vetrina Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common domain types used across the Vetrina workspace.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use thiserror::Error;

/// Unique identifier for a try-on session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub String);

/// Unique identifier for a tenant (retailer).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TenantId(pub String);

/// Unique identifier for a product.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProductId(pub String);

/// Opaque task identifier assigned by the external try-on provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaskId(pub String);

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A category value outside the supported set.
///
/// Raised eagerly when parsing, never silently coerced to a default.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unsupported jewelry category: {0}")]
pub struct UnsupportedCategory(pub String);

/// The jewelry categories the try-on provider supports.
///
/// Each category has its own parameter namespace on the provider wire
/// (`watch_wearing_location` vs `ring_wearing_location` and so on), so the
/// category is carried as a closed enum rather than a string.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum JewelryCategory {
    Watch,
    Ring,
    Bracelet,
}

impl JewelryCategory {
    /// Parse a stored category value, case-insensitively.
    pub fn parse(value: &str) -> Result<Self, UnsupportedCategory> {
        value
            .to_ascii_lowercase()
            .parse()
            .map_err(|_| UnsupportedCategory(value.to_string()))
    }
}

/// Lifecycle state of a try-on session.
///
/// Replaces the implicit "status plus nullable task id" encoding: whether a
/// provider task is in flight is part of the state itself. Transitions move
/// strictly forward; a terminal session is never reprocessed into a new
/// provider task.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TryOnState {
    /// Session minted; no capture submitted yet.
    Unstarted,
    /// A provider task is in flight for this session. Acts as a mutex
    /// against duplicate task creation.
    AwaitingProvider,
    /// Terminal: the try-on produced a result image.
    Succeeded,
    /// Terminal: the try-on failed; `error_message` records why.
    Failed,
}

impl TryOnState {
    /// Whether this state is terminal.
    pub fn is_terminal(self) -> bool {
        matches!(self, TryOnState::Succeeded | TryOnState::Failed)
    }

    /// Whether a transition from `self` to `next` is legal.
    pub fn can_transition(self, next: TryOnState) -> bool {
        matches!(
            (self, next),
            (TryOnState::Unstarted, TryOnState::AwaitingProvider)
                | (TryOnState::AwaitingProvider, TryOnState::Succeeded)
                | (TryOnState::AwaitingProvider, TryOnState::Failed)
        )
    }
}

/// A normalized try-on request handed to a [`crate::TryOnProvider`].
#[derive(Debug, Clone)]
pub struct TryOnRequest {
    /// Public URL of the shopper's capture image.
    pub source_image_url: String,
    /// Public URL of the product reference image.
    pub product_image_url: String,
    /// Jewelry category; selects the provider endpoint and parameter namespace.
    pub category: JewelryCategory,
    /// Category-specific tuning overrides from the product record
    /// (numeric knobs and optional anchor-point arrays).
    pub tuning: serde_json::Map<String, serde_json::Value>,
    /// Optional mask for the source image.
    pub src_mask_url: Option<String>,
    /// Optional mask for the reference image.
    pub ref_mask_url: Option<String>,
}

/// The normalized outcome of a successful try-on task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TryOnResult {
    /// URL of the composited result image.
    pub result_url: String,
    /// Optional mask/segmentation URL, when the provider supplies one.
    pub mask_url: Option<String>,
}
