// SPDX-FileCopyrightText: 2026 Vetrina Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Product read operations and CRUD-layer insert.

use rusqlite::params;
use vetrina_core::VetrinaError;

use crate::database::Database;
use crate::models::Product;

const PRODUCT_COLUMNS: &str =
    "id, tenant_id, name, category, image_url, price, tuning, is_active, created_at, updated_at";

fn row_to_product(row: &rusqlite::Row<'_>) -> Result<Product, rusqlite::Error> {
    let tuning: Option<String> = row.get(6)?;
    let tuning = match tuning {
        Some(raw) => Some(serde_json::from_str(&raw).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(6, rusqlite::types::Type::Text, Box::new(e))
        })?),
        None => None,
    };
    Ok(Product {
        id: row.get(0)?,
        tenant_id: row.get(1)?,
        name: row.get(2)?,
        category: row.get(3)?,
        image_url: row.get(4)?,
        price: row.get(5)?,
        tuning,
        is_active: row.get(7)?,
        created_at: row.get(8)?,
        updated_at: row.get(9)?,
    })
}

/// Insert a product row. Used by the CRUD layer and by tests.
pub async fn create_product(db: &Database, product: &Product) -> Result<(), VetrinaError> {
    let product = product.clone();
    let tuning = match &product.tuning {
        Some(value) => Some(serde_json::to_string(value).map_err(|e| {
            VetrinaError::Internal(format!("failed to serialize product tuning: {e}"))
        })?),
        None => None,
    };
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO products (id, tenant_id, name, category, image_url, price, tuning,
                 is_active, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
                params![
                    product.id,
                    product.tenant_id,
                    product.name,
                    product.category,
                    product.image_url,
                    product.price,
                    tuning,
                    product.is_active,
                    product.created_at,
                    product.updated_at,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Get a product by ID.
pub async fn get_product(db: &Database, id: &str) -> Result<Option<Product>, VetrinaError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?1"
            ))?;
            let result = stmt.query_row(params![id], row_to_product);
            match result {
                Ok(product) => Ok(Some(product)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// List a tenant's active products, newest first. Backs the storefront
/// catalog endpoint.
pub async fn list_active_products(
    db: &Database,
    tenant_id: &str,
) -> Result<Vec<Product>, VetrinaError> {
    let tenant_id = tenant_id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {PRODUCT_COLUMNS} FROM products
                 WHERE tenant_id = ?1 AND is_active = 1
                 ORDER BY created_at DESC"
            ))?;
            let rows = stmt.query_map(params![tenant_id], row_to_product)?;
            let mut products = Vec::new();
            for row in rows {
                products.push(row?);
            }
            Ok(products)
        })
        .await
        .map_err(crate::database::map_tr_err)
}
