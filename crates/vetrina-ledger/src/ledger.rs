// SPDX-FileCopyrightText: 2026 Vetrina Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The unit ledger: atomic decrement plus audit row.

use rusqlite::params;
use tracing::{info, warn};
use vetrina_core::VetrinaError;
use vetrina_storage::Database;

/// Outcome of a settlement attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnitSettlement {
    /// One unit was deducted; `remaining` is the balance afterwards.
    Deducted { remaining: i64 },
    /// This session was already settled (audit row exists). No deduction.
    AlreadySettled,
    /// The tenant's balance was already zero. No deduction; the result is
    /// still served and the shortfall is an operator follow-up.
    InsufficientUnits,
    /// The tenant row could not be found. No deduction.
    TenantMissing,
}

/// Persistent unit ledger over the shared database.
#[derive(Clone)]
pub struct UnitLedger {
    db: Database,
}

impl UnitLedger {
    /// Create a ledger over an open database.
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Settle one successful try-on for `session_id` against `tenant_id`.
    ///
    /// Runs as a single transaction on the storage thread:
    /// 1. insert the audit row (UNIQUE(session_id) rejects a duplicate);
    /// 2. conditionally decrement `unit_balance` where it is positive.
    ///
    /// The decrement is a read-check-decrement inside one statement, so two
    /// concurrently completing try-ons for the same tenant cannot lose an
    /// update.
    pub async fn settle_success(
        &self,
        tenant_id: &str,
        session_id: &str,
    ) -> Result<UnitSettlement, VetrinaError> {
        let tenant = tenant_id.to_string();
        let session = session_id.to_string();
        let entry_id = uuid::Uuid::new_v4().to_string();
        let created_at = chrono::Utc::now()
            .format("%Y-%m-%dT%H:%M:%S%.3fZ")
            .to_string();

        let outcome = self
            .db
            .connection()
            .call(move |conn| -> Result<UnitSettlement, rusqlite::Error> {
                let tx = conn.transaction()?;

                let inserted = tx.execute(
                    "INSERT OR IGNORE INTO unit_ledger (id, tenant_id, session_id, units, created_at)
                     VALUES (?1, ?2, ?3, 1, ?4)",
                    params![entry_id, tenant, session, created_at],
                )?;
                if inserted == 0 {
                    tx.commit()?;
                    return Ok(UnitSettlement::AlreadySettled);
                }

                let decremented = tx.execute(
                    "UPDATE tenants SET unit_balance = unit_balance - 1,
                     updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
                     WHERE id = ?1 AND unit_balance > 0",
                    params![tenant],
                )?;

                if decremented == 0 {
                    // Keep no audit row for a charge that never happened,
                    // but report why the deduction was skipped.
                    tx.execute(
                        "DELETE FROM unit_ledger WHERE session_id = ?1",
                        params![session],
                    )?;
                    let exists: bool = tx.query_row(
                        "SELECT COUNT(*) > 0 FROM tenants WHERE id = ?1",
                        params![tenant],
                        |row| row.get(0),
                    )?;
                    tx.commit()?;
                    return Ok(if exists {
                        UnitSettlement::InsufficientUnits
                    } else {
                        UnitSettlement::TenantMissing
                    });
                }

                let remaining: i64 = tx.query_row(
                    "SELECT unit_balance FROM tenants WHERE id = ?1",
                    params![tenant],
                    |row| row.get(0),
                )?;
                tx.commit()?;
                Ok(UnitSettlement::Deducted { remaining })
            })
            .await
            .map_err(|e| VetrinaError::Storage {
                source: Box::new(e),
            })?;

        match &outcome {
            UnitSettlement::Deducted { remaining } => {
                info!(tenant_id, session_id, remaining, "unit deducted");
            }
            UnitSettlement::AlreadySettled => {
                info!(tenant_id, session_id, "session already settled, not deducting again");
            }
            UnitSettlement::InsufficientUnits => {
                warn!(tenant_id, session_id, "cannot decrement units: balance already zero");
            }
            UnitSettlement::TenantMissing => {
                warn!(tenant_id, session_id, "cannot decrement units: tenant not found");
            }
        }

        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vetrina_storage::queries::tenants::create_tenant;
    use vetrina_storage::Tenant;

    async fn setup_tenant(balance: i64) -> (Database, Tenant) {
        let db = Database::open_in_memory().await.unwrap();
        let tenant = Tenant::new("atelier", "Atelier", balance);
        create_tenant(&db, &tenant).await.unwrap();
        (db, tenant)
    }

    async fn balance_of(db: &Database, tenant_id: &str) -> i64 {
        let tenant_id = tenant_id.to_string();
        db.connection()
            .call(move |conn| -> Result<i64, rusqlite::Error> {
                conn.query_row(
                    "SELECT unit_balance FROM tenants WHERE id = ?1",
                    params![tenant_id],
                    |row| row.get(0),
                )
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn settle_deducts_exactly_one_unit() {
        let (db, tenant) = setup_tenant(5).await;
        let ledger = UnitLedger::new(db.clone());

        let outcome = ledger.settle_success(&tenant.id, "sess-1").await.unwrap();
        assert_eq!(outcome, UnitSettlement::Deducted { remaining: 4 });
        assert_eq!(balance_of(&db, &tenant.id).await, 4);
    }

    #[tokio::test]
    async fn settle_twice_charges_once() {
        let (db, tenant) = setup_tenant(5).await;
        let ledger = UnitLedger::new(db.clone());

        ledger.settle_success(&tenant.id, "sess-1").await.unwrap();
        let second = ledger.settle_success(&tenant.id, "sess-1").await.unwrap();

        assert_eq!(second, UnitSettlement::AlreadySettled);
        assert_eq!(balance_of(&db, &tenant.id).await, 4);
    }

    #[tokio::test]
    async fn zero_balance_skips_deduction() {
        let (db, tenant) = setup_tenant(0).await;
        let ledger = UnitLedger::new(db.clone());

        let outcome = ledger.settle_success(&tenant.id, "sess-1").await.unwrap();
        assert_eq!(outcome, UnitSettlement::InsufficientUnits);
        assert_eq!(balance_of(&db, &tenant.id).await, 0);
    }

    #[tokio::test]
    async fn missing_tenant_is_reported_not_fatal() {
        let db = Database::open_in_memory().await.unwrap();
        let ledger = UnitLedger::new(db);

        let outcome = ledger
            .settle_success("no-such-tenant", "sess-1")
            .await
            .unwrap();
        assert_eq!(outcome, UnitSettlement::TenantMissing);
    }

    #[tokio::test]
    async fn skipped_settlement_leaves_session_retriable_in_ledger() {
        // After an InsufficientUnits outcome the audit row is gone, so a
        // later top-up plus manual re-settlement would still be possible.
        let (db, tenant) = setup_tenant(0).await;
        let ledger = UnitLedger::new(db.clone());
        ledger.settle_success(&tenant.id, "sess-1").await.unwrap();

        db.connection()
            .call({
                let id = tenant.id.clone();
                move |conn| -> Result<(), rusqlite::Error> {
                    conn.execute(
                        "UPDATE tenants SET unit_balance = 3 WHERE id = ?1",
                        params![id],
                    )?;
                    Ok(())
                }
            })
            .await
            .unwrap();

        let outcome = ledger.settle_success(&tenant.id, "sess-1").await.unwrap();
        assert_eq!(outcome, UnitSettlement::Deducted { remaining: 2 });
    }

    #[tokio::test]
    async fn concurrent_settlements_for_same_session_charge_once() {
        let (db, tenant) = setup_tenant(10).await;
        let ledger = UnitLedger::new(db.clone());

        let mut handles = Vec::new();
        for _ in 0..6 {
            let ledger = ledger.clone();
            let tenant_id = tenant.id.clone();
            handles.push(tokio::spawn(async move {
                ledger.settle_success(&tenant_id, "sess-dup").await
            }));
        }

        let mut deductions = 0;
        for handle in handles {
            if let UnitSettlement::Deducted { .. } = handle.await.unwrap().unwrap() {
                deductions += 1;
            }
        }

        assert_eq!(deductions, 1);
        assert_eq!(balance_of(&db, &tenant.id).await, 9);
    }

    #[tokio::test]
    async fn concurrent_settlements_across_sessions_lose_no_updates() {
        let (db, tenant) = setup_tenant(10).await;
        let ledger = UnitLedger::new(db.clone());

        let mut handles = Vec::new();
        for i in 0..4 {
            let ledger = ledger.clone();
            let tenant_id = tenant.id.clone();
            handles.push(tokio::spawn(async move {
                ledger
                    .settle_success(&tenant_id, &format!("sess-{i}"))
                    .await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert_eq!(balance_of(&db, &tenant.id).await, 6);
    }
}
