// SPDX-FileCopyrightText: 2026 Vetrina Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database connection management with PRAGMA setup, WAL mode, and lifecycle.
//!
//! All writes are serialized through tokio-rusqlite's single background
//! thread. Do NOT create additional Connection instances for writes.

use vetrina_core::VetrinaError;

/// Convert a tokio-rusqlite error into `VetrinaError::Storage`.
pub(crate) fn map_tr_err(e: tokio_rusqlite::Error<rusqlite::Error>) -> VetrinaError {
    VetrinaError::Storage {
        source: Box::new(e),
    }
}

/// Handle to the SQLite database behind the tokio-rusqlite worker thread.
#[derive(Clone)]
pub struct Database {
    conn: tokio_rusqlite::Connection,
}

impl Database {
    /// Open (or create) the database at `path`, apply PRAGMAs, and run
    /// pending migrations.
    pub async fn open(path: &str) -> Result<Self, VetrinaError> {
        if let Some(parent) = std::path::Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|e| VetrinaError::Storage {
                        source: Box::new(e),
                    })?;
            }
        }

        let conn = tokio_rusqlite::Connection::open(path)
            .await
            .map_err(|e| VetrinaError::Storage {
                source: Box::new(e),
            })?;

        conn.call(|conn| {
            conn.pragma_update(None, "journal_mode", "WAL")?;
            conn.pragma_update(None, "foreign_keys", "ON")?;
            conn.pragma_update(None, "busy_timeout", 5000)?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)?;

        conn.call(|conn| crate::migrations::runner().run(conn).map(|_| ()))
            .await
            .map_err(|e| VetrinaError::Storage {
                source: Box::new(e),
            })?;

        tracing::debug!(path, "database opened");
        Ok(Self { conn })
    }

    /// Open an in-memory database with migrations applied. For tests.
    pub async fn open_in_memory() -> Result<Self, VetrinaError> {
        let conn = tokio_rusqlite::Connection::open_in_memory()
            .await
            .map_err(|e| VetrinaError::Storage {
                source: Box::new(e),
            })?;

        conn.call(|conn| crate::migrations::runner().run(conn).map(|_| ()))
            .await
            .map_err(|e| VetrinaError::Storage {
                source: Box::new(e),
            })?;

        Ok(Self { conn })
    }

    /// The underlying tokio-rusqlite connection.
    pub fn connection(&self) -> &tokio_rusqlite::Connection {
        &self.conn
    }

    /// Close this handle to the database, flushing pending writes.
    pub async fn close(self) -> Result<(), VetrinaError> {
        self.conn
            .close()
            .await
            .map_err(|e| VetrinaError::Internal(format!("failed to close database: {e:?}")))
    }
}
