// SPDX-FileCopyrightText: 2026 Vetrina Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP surface for the Vetrina try-on pipeline, built on axum.
//!
//! Three shopper-facing routes plus health:
//! - `POST /v1/tryon`: multipart capture submission, the pipeline entry;
//! - `POST /v1/sessions`: rate-limited try-on session minting;
//! - `GET /v1/stores/{slug}/products`: the storefront widget catalog;
//! - `GET /health`: liveness for process supervisors.
//!
//! The gateway owns HTTP concerns only: multipart decoding, client identity
//! extraction, status-code mapping, cache headers. All session and balance
//! writes happen inside [`vetrina_pipeline::TryOnPipeline`].

pub mod handlers;
pub mod server;

pub use server::{build_router, start_server, GatewayState, RateLimitSettings, ServerConfig};
