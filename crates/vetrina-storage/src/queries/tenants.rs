// SPDX-FileCopyrightText: 2026 Vetrina Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tenant read operations and CRUD-layer insert.

use rusqlite::params;
use vetrina_core::VetrinaError;

use crate::database::Database;
use crate::models::Tenant;

fn row_to_tenant(row: &rusqlite::Row<'_>) -> Result<Tenant, rusqlite::Error> {
    Ok(Tenant {
        id: row.get(0)?,
        slug: row.get(1)?,
        name: row.get(2)?,
        unit_balance: row.get(3)?,
        is_active: row.get(4)?,
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    })
}

const TENANT_COLUMNS: &str = "id, slug, name, unit_balance, is_active, created_at, updated_at";

/// Insert a tenant row. Used by the CRUD layer and by tests.
pub async fn create_tenant(db: &Database, tenant: &Tenant) -> Result<(), VetrinaError> {
    let tenant = tenant.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO tenants (id, slug, name, unit_balance, is_active, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    tenant.id,
                    tenant.slug,
                    tenant.name,
                    tenant.unit_balance,
                    tenant.is_active,
                    tenant.created_at,
                    tenant.updated_at,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Get a tenant by ID.
pub async fn get_tenant(db: &Database, id: &str) -> Result<Option<Tenant>, VetrinaError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {TENANT_COLUMNS} FROM tenants WHERE id = ?1"
            ))?;
            let result = stmt.query_row(params![id], row_to_tenant);
            match result {
                Ok(tenant) => Ok(Some(tenant)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Get a tenant by its storefront slug.
pub async fn get_tenant_by_slug(db: &Database, slug: &str) -> Result<Option<Tenant>, VetrinaError> {
    let slug = slug.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {TENANT_COLUMNS} FROM tenants WHERE slug = ?1"
            ))?;
            let result = stmt.query_row(params![slug], row_to_tenant);
            match result {
                Ok(tenant) => Ok(Some(tenant)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}
