// SPDX-FileCopyrightText: 2026 Vetrina Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Object store backends for capture images.
//!
//! Two [`vetrina_core::ObjectStore`] implementations:
//! - [`FsBlobStore`] writes under a local directory fronted by a static
//!   file host; the default for development and single-node deployments.
//! - [`HttpBlobStore`] uploads to a bucket-style storage HTTP API with a
//!   service key.
//!
//! Both return publicly resolvable URLs, since the try-on provider fetches
//! the capture by URL.

pub mod http;
pub mod local;

pub use http::HttpBlobStore;
pub use local::FsBlobStore;
