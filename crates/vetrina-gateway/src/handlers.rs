// SPDX-FileCopyrightText: 2026 Vetrina Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers for the try-on API.
//!
//! Handles POST /v1/tryon, POST /v1/sessions, GET /v1/stores/{slug}/products,
//! and GET /health.

use axum::{
    extract::{Multipart, Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};
use vetrina_core::ProviderError;
use vetrina_pipeline::{CaptureUpload, TryOnError};
use vetrina_storage::queries::{products, rate_limits, tenants};

use crate::server::GatewayState;

/// Error response body. Always a single human-readable message; provider
/// internals and credential material never appear here.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Response body for POST /v1/tryon.
#[derive(Debug, Serialize)]
pub struct TryOnResponse {
    pub result_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mask_url: Option<String>,
}

/// Request body for POST /v1/sessions.
#[derive(Debug, Deserialize)]
pub struct MintSessionRequest {
    pub product_id: String,
}

/// Response body for POST /v1/sessions.
#[derive(Debug, Serialize)]
pub struct MintSessionResponse {
    pub session_id: String,
    /// Shopper-facing try-on link for this session.
    pub url: String,
}

/// Response body for GET /v1/stores/{slug}/products.
#[derive(Debug, Serialize)]
pub struct CatalogResponse {
    pub store: String,
    pub products: Vec<CatalogProduct>,
}

/// One storefront catalog entry. Tuning parameters and mask references are
/// pipeline inputs, not widget data, so they are not exposed.
#[derive(Debug, Serialize)]
pub struct CatalogProduct {
    pub id: String,
    pub name: String,
    pub category: String,
    pub image_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
}

/// Response body for GET /health.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

fn status_for(err: &TryOnError) -> StatusCode {
    match err {
        TryOnError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        TryOnError::SessionNotFound | TryOnError::ProductNotFound => StatusCode::NOT_FOUND,
        TryOnError::TaskInFlight | TryOnError::AlreadyResolved => StatusCode::CONFLICT,
        TryOnError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
        TryOnError::TenantInactive | TryOnError::UnitsExhausted => StatusCode::FORBIDDEN,
        TryOnError::Config { .. } | TryOnError::Upload(_) | TryOnError::Storage(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
        TryOnError::Provider(provider_err) => match provider_err {
            ProviderError::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
            _ => StatusCode::BAD_GATEWAY,
        },
    }
}

fn error_response(err: TryOnError) -> Response {
    let status = status_for(&err);
    if status.is_server_error() {
        error!(%err, %status, "try-on request failed");
    } else {
        warn!(%err, %status, "try-on request rejected");
    }
    (
        status,
        Json(ErrorResponse {
            error: err.to_string(),
        }),
    )
        .into_response()
}

fn bad_request(message: &str) -> Response {
    error_response(TryOnError::InvalidInput(message.to_string()))
}

/// Client identity for rate limiting: first hop of `x-forwarded-for`, then
/// `x-real-ip`, then a shared "unknown" bucket.
fn client_identity(headers: &HeaderMap) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .or_else(|| headers.get("x-real-ip").and_then(|v| v.to_str().ok()))
        .unwrap_or("unknown")
        .to_string()
}

fn is_valid_product_id(id: &str) -> bool {
    !id.is_empty()
        && id.len() <= 50
        && id.chars().all(|c| matches!(c, '0'..='9' | 'a'..='f' | '-'))
}

fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug.len() <= 100
        && slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

/// POST /v1/tryon
///
/// Multipart form: `session_id`, `product_id`, and the capture as `file`.
/// Runs the pipeline to completion and returns the composited result URL.
pub async fn post_try_on(
    State(state): State<GatewayState>,
    mut multipart: Multipart,
) -> Response {
    let mut session_id: Option<String> = None;
    let mut product_id: Option<String> = None;
    let mut capture: Option<CaptureUpload> = None;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(_) => return bad_request("Malformed multipart body."),
        };
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("session_id") => match field.text().await {
                Ok(text) => session_id = Some(text),
                Err(_) => return bad_request("Malformed session_id field."),
            },
            Some("product_id") => match field.text().await {
                Ok(text) => product_id = Some(text),
                Err(_) => return bad_request("Malformed product_id field."),
            },
            Some("file") => {
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                match field.bytes().await {
                    Ok(bytes) => {
                        capture = Some(CaptureUpload {
                            content_type,
                            bytes: bytes.to_vec(),
                        })
                    }
                    Err(_) => return bad_request("Failed to read uploaded file."),
                }
            }
            _ => {}
        }
    }

    let Some(session_id) = session_id else {
        return bad_request("Missing session_id.");
    };
    let Some(product_id) = product_id else {
        return bad_request("Missing product_id.");
    };
    let Some(capture) = capture else {
        return bad_request("Missing file.");
    };

    // Detached from the connection: if the shopper disconnects mid-poll, the
    // provider task has already been charged for, so the pipeline runs to a
    // terminal session state regardless.
    let pipeline = state.pipeline.clone();
    let submission =
        tokio::spawn(async move { pipeline.submit(&session_id, &product_id, capture).await });

    match submission.await {
        Ok(Ok(result)) => (
            StatusCode::OK,
            Json(TryOnResponse {
                result_url: result.result_url,
                mask_url: result.mask_url,
            }),
        )
            .into_response(),
        Ok(Err(err)) => error_response(err),
        Err(join_err) => {
            error!(error = %join_err, "try-on submission task panicked");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Internal server error".to_string(),
                }),
            )
                .into_response()
        }
    }
}

/// POST /v1/sessions
///
/// Mints a try-on session for a product and returns the shopper link.
/// Rate-limited per client identity through the shared counter store.
pub async fn post_sessions(
    State(state): State<GatewayState>,
    headers: HeaderMap,
    Json(body): Json<MintSessionRequest>,
) -> Response {
    let identity = client_identity(&headers);
    let limited = match rate_limits::register_hit(
        &state.db,
        &identity,
        state.rate_limit.window_secs,
        state.rate_limit.max_requests,
    )
    .await
    {
        Ok(limited) => limited,
        Err(e) => return error_response(TryOnError::Storage(e)),
    };
    if limited {
        return error_response(TryOnError::RateLimited);
    }

    if !is_valid_product_id(&body.product_id) {
        return bad_request("Invalid product id.");
    }

    match state.pipeline.mint_session(&body.product_id).await {
        Ok(session) => {
            let url = format!(
                "{}/try/{}",
                state.public_url.trim_end_matches('/'),
                session.id
            );
            (
                StatusCode::OK,
                // Each response mints a fresh session; a cached one would
                // hand two shoppers the same mutex.
                [(header::CACHE_CONTROL, "no-store")],
                Json(MintSessionResponse {
                    session_id: session.id,
                    url,
                }),
            )
                .into_response()
        }
        Err(err) => error_response(err),
    }
}

/// GET /v1/stores/{slug}/products
///
/// The storefront widget catalog: store name plus active products.
pub async fn get_store_products(
    State(state): State<GatewayState>,
    Path(slug): Path<String>,
) -> Response {
    if !is_valid_slug(&slug) {
        return bad_request("Invalid store identifier.");
    }

    let tenant = match tenants::get_tenant_by_slug(&state.db, &slug).await {
        Ok(tenant) => tenant,
        Err(e) => return error_response(TryOnError::Storage(e)),
    };
    let tenant = match tenant {
        Some(tenant) if tenant.is_active => tenant,
        _ => {
            return (
                StatusCode::NOT_FOUND,
                Json(ErrorResponse {
                    error: "Store not found.".to_string(),
                }),
            )
                .into_response()
        }
    };

    let listed = match products::list_active_products(&state.db, &tenant.id).await {
        Ok(listed) => listed,
        Err(e) => return error_response(TryOnError::Storage(e)),
    };

    let catalog = CatalogResponse {
        store: tenant.name,
        products: listed
            .into_iter()
            .map(|p| CatalogProduct {
                id: p.id,
                name: p.name,
                category: p.category,
                image_url: p.image_url,
                price: p.price,
            })
            .collect(),
    };

    (
        StatusCode::OK,
        [(header::CACHE_CONTROL, "public, max-age=60")],
        Json(catalog),
    )
        .into_response()
}

/// GET /health
pub async fn get_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
