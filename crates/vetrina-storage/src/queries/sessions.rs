// SPDX-FileCopyrightText: 2026 Vetrina Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Try-on session operations.
//!
//! State transitions are single conditional UPDATEs guarded on the expected
//! prior state. Callers branch on the returned row count: `true` means this
//! call performed the transition, `false` means another request got there
//! first (or the session was already terminal). There is deliberately no
//! unconditional state setter.

use rusqlite::params;
use vetrina_core::{TryOnState, VetrinaError};

use crate::database::Database;
use crate::models::TryOnSession;

const SESSION_COLUMNS: &str = "id, tenant_id, product_id, state, capture_url, task_id, \
                               result_url, mask_url, error_message, created_at, updated_at";

fn row_to_session(row: &rusqlite::Row<'_>) -> Result<TryOnSession, rusqlite::Error> {
    let state: String = row.get(3)?;
    let state: TryOnState = state.parse().map_err(|e: strum::ParseError| {
        rusqlite::Error::FromSqlConversionFailure(3, rusqlite::types::Type::Text, Box::new(e))
    })?;
    Ok(TryOnSession {
        id: row.get(0)?,
        tenant_id: row.get(1)?,
        product_id: row.get(2)?,
        state,
        capture_url: row.get(4)?,
        task_id: row.get(5)?,
        result_url: row.get(6)?,
        mask_url: row.get(7)?,
        error_message: row.get(8)?,
        created_at: row.get(9)?,
        updated_at: row.get(10)?,
    })
}

/// Insert a freshly minted session.
pub async fn create_session(db: &Database, session: &TryOnSession) -> Result<(), VetrinaError> {
    let session = session.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO vto_sessions (id, tenant_id, product_id, state, capture_url,
                 task_id, result_url, mask_url, error_message, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
                params![
                    session.id,
                    session.tenant_id,
                    session.product_id,
                    session.state.to_string(),
                    session.capture_url,
                    session.task_id,
                    session.result_url,
                    session.mask_url,
                    session.error_message,
                    session.created_at,
                    session.updated_at,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Get a session by ID.
pub async fn get_session(db: &Database, id: &str) -> Result<Option<TryOnSession>, VetrinaError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {SESSION_COLUMNS} FROM vto_sessions WHERE id = ?1"
            ))?;
            let result = stmt.query_row(params![id], row_to_session);
            match result {
                Ok(session) => Ok(Some(session)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Atomically claim a session for processing: `unstarted -> awaiting_provider`,
/// recording the capture URL.
///
/// Returns `false` when the session was not in `unstarted`: either a task is
/// already in flight or the session has resolved. This single UPDATE is the
/// idempotency guard: two near-simultaneous submissions cannot both win it.
pub async fn claim_for_processing(
    db: &Database,
    id: &str,
    capture_url: &str,
) -> Result<bool, VetrinaError> {
    let id = id.to_string();
    let capture_url = capture_url.to_string();
    db.connection()
        .call(move |conn| {
            let changed = conn.execute(
                "UPDATE vto_sessions
                 SET state = ?1, capture_url = ?2,
                     updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
                 WHERE id = ?3 AND state = ?4",
                params![
                    TryOnState::AwaitingProvider.to_string(),
                    capture_url,
                    id,
                    TryOnState::Unstarted.to_string(),
                ],
            )?;
            Ok(changed > 0)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Record the provider task id on an in-flight session.
///
/// Persisted as soon as the task exists so a later polling failure still
/// leaves the (already charged) task id on the record.
pub async fn record_task_id(db: &Database, id: &str, task_id: &str) -> Result<(), VetrinaError> {
    let id = id.to_string();
    let task_id = task_id.to_string();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "UPDATE vto_sessions
                 SET task_id = ?1, updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
                 WHERE id = ?2 AND state = ?3",
                params![task_id, id, TryOnState::AwaitingProvider.to_string()],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Transition an in-flight session to `failed`, recording the error message
/// and, when one was obtained, the provider task id.
///
/// Returns `false` when the session was not in `awaiting_provider`.
pub async fn mark_failed(
    db: &Database,
    id: &str,
    task_id: Option<&str>,
    error_message: &str,
) -> Result<bool, VetrinaError> {
    let id = id.to_string();
    let task_id = task_id.map(str::to_string);
    let error_message = error_message.to_string();
    db.connection()
        .call(move |conn| {
            let changed = conn.execute(
                "UPDATE vto_sessions
                 SET state = ?1, task_id = COALESCE(?2, task_id), error_message = ?3,
                     updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
                 WHERE id = ?4 AND state = ?5",
                params![
                    TryOnState::Failed.to_string(),
                    task_id,
                    error_message,
                    id,
                    TryOnState::AwaitingProvider.to_string(),
                ],
            )?;
            Ok(changed > 0)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Transition an in-flight session to `succeeded`, recording the result.
///
/// Returns `true` only for the first-time transition; a retried request that
/// lost the race observes `false` and must not charge the tenant again.
pub async fn mark_succeeded(
    db: &Database,
    id: &str,
    result_url: &str,
    mask_url: Option<&str>,
) -> Result<bool, VetrinaError> {
    let id = id.to_string();
    let result_url = result_url.to_string();
    let mask_url = mask_url.map(str::to_string);
    db.connection()
        .call(move |conn| {
            let changed = conn.execute(
                "UPDATE vto_sessions
                 SET state = ?1, result_url = ?2, mask_url = ?3,
                     updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
                 WHERE id = ?4 AND state = ?5",
                params![
                    TryOnState::Succeeded.to_string(),
                    result_url,
                    mask_url,
                    id,
                    TryOnState::AwaitingProvider.to_string(),
                ],
            )?;
            Ok(changed > 0)
        })
        .await
        .map_err(crate::database::map_tr_err)
}
