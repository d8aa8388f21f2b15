// SPDX-FileCopyrightText: 2026 Vetrina Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The user-facing error taxonomy of the try-on pipeline.
//!
//! Display strings double as the `error` field of JSON responses, so they
//! are written for shoppers and store operators, never exposing credential
//! material or raw provider internals beyond the provider's own diagnostic
//! text.

use thiserror::Error;
use vetrina_core::{ProviderError, VetrinaError};

/// Everything that can go wrong between accepting a capture and returning
/// a result. The HTTP layer maps each variant to a status code.
#[derive(Debug, Error)]
pub enum TryOnError {
    /// Malformed request input (bad file, bad ids). Rejected before any
    /// state is mutated.
    #[error("{0}")]
    InvalidInput(String),

    /// Unknown session, or the session does not reference the claimed
    /// product.
    #[error("Invalid session.")]
    SessionNotFound,

    /// Unknown or inactive product.
    #[error("Product not found.")]
    ProductNotFound,

    /// A provider task is already in flight for this session.
    #[error("Task already in progress. Please wait for the current attempt to complete.")]
    TaskInFlight,

    /// The session already reached a terminal state; it is never
    /// reprocessed into a new provider task.
    #[error("This session has already completed. Start a new try-on session.")]
    AlreadyResolved,

    /// Too many session-minting requests from one client identity.
    #[error("Too many requests. Please try again later.")]
    RateLimited,

    /// The store is deactivated (session minting only).
    #[error("Store is inactive")]
    TenantInactive,

    /// The store has no try-on units left (session minting only).
    #[error("This store has no try-on credits remaining.")]
    UnitsExhausted,

    /// Operator-side configuration problem, e.g. a malformed provider
    /// credential.
    #[error("Server configuration error: {detail}")]
    Config { detail: String },

    /// The capture could not be stored. Surfaced before any provider call.
    #[error("Failed to store capture: {0}")]
    Upload(String),

    /// A definitive provider-side failure; the inner kind determines the
    /// status code and user messaging.
    #[error(transparent)]
    Provider(ProviderError),

    /// Storage-layer failure.
    #[error("Internal storage error")]
    Storage(#[from] VetrinaError),
}
