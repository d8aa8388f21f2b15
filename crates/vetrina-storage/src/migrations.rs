// SPDX-FileCopyrightText: 2026 Vetrina Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Embedded database migrations using refinery.
//!
//! SQL migration files are compiled into the binary at build time via
//! `embed_migrations!`. Migrations run automatically on database open.

mod embedded {
    use refinery::embed_migrations;
    embed_migrations!("migrations");
}

/// The migration runner over the embedded SQL files.
///
/// Refinery tracks applied migrations in its own `refinery_schema_history`
/// table, so running it on every open is idempotent.
pub fn runner() -> refinery::Runner {
    embedded::migrations::runner()
}
