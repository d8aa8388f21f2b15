// SPDX-FileCopyrightText: 2026 Vetrina Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared rate-limit counter store keyed by source identity.
//!
//! Counters live in the database rather than process memory so the limit
//! holds across multiple server instances sharing the same storage. Each
//! row is a fixed window: the first hit after `reset_at` starts a new one.

use rusqlite::params;
use vetrina_core::VetrinaError;

use crate::database::Database;
use crate::models::now_iso;

/// Register one hit for `identity` and report whether it exceeds
/// `max_requests` within the current window.
///
/// The read-and-bump runs inside a single transaction on the storage
/// thread, so concurrent hits for the same identity cannot lose updates.
pub async fn register_hit(
    db: &Database,
    identity: &str,
    window_secs: u64,
    max_requests: u32,
) -> Result<bool, VetrinaError> {
    let identity = identity.to_string();
    let now = now_iso();
    let reset_at = (chrono::Utc::now() + chrono::Duration::seconds(window_secs as i64))
        .format("%Y-%m-%dT%H:%M:%S%.3fZ")
        .to_string();

    db.connection()
        .call(move |conn| {
            let tx = conn.transaction()?;

            let current: Option<(i64, String)> = {
                let mut stmt =
                    tx.prepare("SELECT count, reset_at FROM rate_limits WHERE identity = ?1")?;
                match stmt.query_row(params![identity], |row| Ok((row.get(0)?, row.get(1)?))) {
                    Ok(row) => Some(row),
                    Err(rusqlite::Error::QueryReturnedNoRows) => None,
                    Err(e) => return Err(e),
                }
            };

            let limited = match current {
                // Fixed-format ISO timestamps compare lexicographically.
                Some((count, existing_reset)) if now <= existing_reset => {
                    let count = count + 1;
                    tx.execute(
                        "UPDATE rate_limits SET count = ?1 WHERE identity = ?2",
                        params![count, identity],
                    )?;
                    count > max_requests as i64
                }
                _ => {
                    tx.execute(
                        "INSERT INTO rate_limits (identity, count, reset_at) VALUES (?1, 1, ?2)
                         ON CONFLICT(identity) DO UPDATE SET count = 1, reset_at = ?2",
                        params![identity, reset_at],
                    )?;
                    false
                }
            };

            tx.commit()?;
            Ok(limited)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn under_limit_is_allowed() {
        let db = Database::open_in_memory().await.unwrap();
        for _ in 0..5 {
            let limited = register_hit(&db, "203.0.113.9", 60, 5).await.unwrap();
            assert!(!limited);
        }
    }

    #[tokio::test]
    async fn exceeding_limit_is_rejected() {
        let db = Database::open_in_memory().await.unwrap();
        for _ in 0..3 {
            assert!(!register_hit(&db, "203.0.113.9", 60, 3).await.unwrap());
        }
        assert!(register_hit(&db, "203.0.113.9", 60, 3).await.unwrap());
    }

    #[tokio::test]
    async fn identities_are_independent() {
        let db = Database::open_in_memory().await.unwrap();
        for _ in 0..3 {
            register_hit(&db, "198.51.100.1", 60, 2).await.unwrap();
        }
        // A different identity starts from zero.
        assert!(!register_hit(&db, "198.51.100.2", 60, 2).await.unwrap());
    }

    #[tokio::test]
    async fn expired_window_resets_the_counter() {
        let db = Database::open_in_memory().await.unwrap();

        // Seed an exhausted counter whose window expired in the past.
        db.connection()
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute(
                    "INSERT INTO rate_limits (identity, count, reset_at)
                     VALUES ('198.51.100.7', 99, '2000-01-01T00:00:00.000Z')",
                    [],
                )?;
                Ok(())
            })
            .await
            .unwrap();

        let limited = register_hit(&db, "198.51.100.7", 60, 3).await.unwrap();
        assert!(!limited, "a new window starts after reset_at passes");
    }
}
