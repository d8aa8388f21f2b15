// SPDX-FileCopyrightText: 2026 Vetrina Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite persistence layer for the Vetrina try-on service.
//!
//! Provides WAL-mode SQLite storage with embedded migrations, a single-writer
//! concurrency model via `tokio-rusqlite`, and typed query operations for
//! tenants, products, try-on sessions, and the rate-limit counter store.
//!
//! Session state transitions are expressed as conditional UPDATEs guarded on
//! the expected prior state; the affected-row count is the transition
//! outcome. This makes check-and-set atomic at the storage layer instead of
//! a racy read-then-write in the application.

pub mod database;
pub mod migrations;
pub mod models;
pub mod queries;

pub use database::Database;
pub use models::*;
