// SPDX-FileCopyrightText: 2026 Vetrina Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Category-specific payload construction.
//!
//! Every parameter key is namespaced by category on the provider wire
//! (`watch_wearing_location`, `ring_wearing_location`, ...). Defaults and
//! tuning overrides are resolved strictly within the request's own
//! namespace, so a product record carrying keys for another category can
//! never leak them into the payload.

use serde_json::{Map, Value};
use vetrina_core::TryOnRequest;

use crate::types::{CreateTaskRequest, ObjectInfo, SourceInfo};

/// The numeric tuning knobs a product may override, without their category
/// prefix.
const NUMERIC_KNOBS: [&str; 3] = [
    "wearing_location",
    "shadow_intensity",
    "ambient_light_intensity",
];

/// Default parameter set for a category.
fn default_parameters(prefix: &str) -> Map<String, Value> {
    let mut params = Map::new();
    params.insert(
        format!("{prefix}_need_remove_background"),
        Value::Bool(false),
    );
    params.insert(format!("{prefix}_wearing_location"), Value::from(0.3));
    params.insert(format!("{prefix}_shadow_intensity"), Value::from(0.15));
    params.insert(format!("{prefix}_ambient_light_intensity"), Value::from(1));
    params
}

/// Build the category-namespaced parameter map: defaults, then numeric
/// overrides from the product tuning, then the anchor-point array.
///
/// Anchor points pass through unmodified when present and array-shaped;
/// any other shape is dropped silently.
fn build_parameters(request: &TryOnRequest) -> Map<String, Value> {
    let prefix = request.category.to_string();
    let mut params = default_parameters(&prefix);

    for knob in NUMERIC_KNOBS {
        let key = format!("{prefix}_{knob}");
        if let Some(value) = request.tuning.get(&key) {
            if value.is_number() {
                params.insert(key, value.clone());
            }
        }
    }

    let anchor_key = format!("{prefix}_anchor_point");
    if let Some(anchor) = request.tuning.get(&anchor_key) {
        if anchor.is_array() {
            params.insert(anchor_key, anchor.clone());
        }
    }

    params
}

/// Build the full task-creation request body for a try-on.
pub fn build_create_request(request: &TryOnRequest) -> CreateTaskRequest {
    let parameter = build_parameters(request);

    let object_info = ObjectInfo {
        name: request.product_image_url.clone(),
        parameter,
        mask_name: request.ref_mask_url.clone(),
    };

    CreateTaskRequest {
        src_file_url: request.source_image_url.clone(),
        source_info: SourceInfo {
            name: request.source_image_url.clone(),
            mask_name: request.src_mask_url.clone(),
        },
        ref_file_urls: vec![request.product_image_url.clone()],
        ref_file_ids: vec![],
        refmsk_file_urls: request
            .ref_mask_url
            .clone()
            .map(|url| vec![url])
            .unwrap_or_default(),
        refmsk_file_ids: vec![],
        object_infos: vec![object_info],
        srcmsk_file_url: request.src_mask_url.clone(),
    }
}
