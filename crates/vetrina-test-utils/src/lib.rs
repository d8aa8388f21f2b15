// SPDX-FileCopyrightText: 2026 Vetrina Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Vetrina integration tests.
//!
//! [`TestHarness`] assembles the full try-on stack against disposable
//! infrastructure: a temp SQLite database, a temp filesystem blob store, and
//! a wiremock server standing in for the try-on provider. Tests drive the
//! real pipeline and the real provider client; only the network endpoints
//! are fake.

pub mod harness;
pub mod provider_stubs;

pub use harness::{TestHarness, TestHarnessBuilder};
