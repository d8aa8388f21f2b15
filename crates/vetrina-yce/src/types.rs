// SPDX-FileCopyrightText: 2026 Vetrina Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wire types for the YCE 2D-VTO S2S API.
//!
//! Responses are modeled as explicit structs with optional fields rather
//! than ad hoc JSON probing: the provider contract is undocumented in
//! places, and the extractor walks a fixed fallback chain over these shapes
//! so contract drift shows up as a logged unrecognized payload instead of a
//! silent null.

use serde::{Deserialize, Serialize};

/// Task-creation request body.
#[derive(Debug, Clone, Serialize)]
pub struct CreateTaskRequest {
    pub src_file_url: String,
    pub source_info: SourceInfo,
    pub ref_file_urls: Vec<String>,
    pub ref_file_ids: Vec<String>,
    pub refmsk_file_urls: Vec<String>,
    pub refmsk_file_ids: Vec<String>,
    pub object_infos: Vec<ObjectInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub srcmsk_file_url: Option<String>,
}

/// Source image descriptor.
#[derive(Debug, Clone, Serialize)]
pub struct SourceInfo {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mask_name: Option<String>,
}

/// Per-object descriptor: reference image plus its category-namespaced
/// parameter map.
#[derive(Debug, Clone, Serialize)]
pub struct ObjectInfo {
    pub name: String,
    pub parameter: serde_json::Map<String, serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mask_name: Option<String>,
}

/// The provider's response envelope. `status` is an application-level code
/// carried in the body, separate from the HTTP status.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    #[serde(default)]
    pub status: Option<i64>,
    #[serde(default)]
    pub data: Option<T>,
}

/// Payload of a successful task-creation response.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CreateTaskData {
    pub task_id: Option<String>,
}

/// Asynchronous task status as reported by the polling endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Pending,
    Processing,
    Success,
    Error,
    /// Any status value this client does not know about. Treated as
    /// non-terminal so polling continues.
    #[serde(other)]
    Unknown,
}

/// Payload of a polling response.
///
/// The provider has shipped several shapes for the same endpoint; every
/// observed variant is represented so the extractor can express its
/// priority order over plain struct fields.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TaskData {
    pub task_status: Option<TaskStatus>,
    pub error_message: Option<String>,
    /// Newer responses nest result fields under `results`.
    pub results: Option<ResultsObject>,
    /// Older responses carry the result URL at the top level.
    pub result_url: Option<String>,
    #[serde(rename = "resultUrl")]
    pub result_url_camel: Option<String>,
    /// Array-form variant.
    pub result: Option<Vec<ResultEntry>>,
    pub mask_url: Option<String>,
}

/// The nested `results` object.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ResultsObject {
    pub result_url: Option<String>,
    pub url: Option<String>,
    pub image_url: Option<String>,
    pub output_url: Option<String>,
    pub mask_url: Option<String>,
    pub segmentation_url: Option<String>,
}

/// One entry of the array-form result variant.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ResultEntry {
    pub url: Option<String>,
    pub result_url: Option<String>,
}
