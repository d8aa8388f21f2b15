// SPDX-FileCopyrightText: 2026 Vetrina Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Canned wiremock expectations for the try-on provider's wire shapes.
//!
//! Each helper mounts mocks for one provider behavior. Scenarios outside
//! these (mixed shapes, custom envelopes) mount raw wiremock mocks on
//! `TestHarness::provider_server` directly.

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn create_path(category: &str) -> String {
    format!("/s2s/v2.0/task/2d-vto/{category}")
}

fn poll_path(category: &str, task_id: &str) -> String {
    format!("/s2s/v2.0/task/2d-vto/{category}/{task_id}")
}

/// Task creation succeeds with `task_id`. Expects exactly one creation call;
/// a duplicate creation fails the test when the server verifies.
pub async fn stub_create_task(server: &MockServer, category: &str, task_id: &str) {
    Mock::given(method("POST"))
        .and(path(create_path(category)))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": 200,
            "data": {"task_id": task_id}
        })))
        .expect(1)
        .mount(server)
        .await;
}

/// Task creation rejected by the provider (non-2xx).
pub async fn stub_create_task_rejected(server: &MockServer, category: &str) {
    Mock::given(method("POST"))
        .and(path(create_path(category)))
        .respond_with(ResponseTemplate::new(422).set_body_json(serde_json::json!({
            "status": 422,
            "error": "unprocessable source image"
        })))
        .mount(server)
        .await;
}

/// Polling reports `processing` for the first `processing_polls` attempts,
/// then `success` with the given results payload.
pub async fn stub_poll_success_after(
    server: &MockServer,
    category: &str,
    task_id: &str,
    processing_polls: u64,
    results: serde_json::Value,
) {
    if processing_polls > 0 {
        Mock::given(method("GET"))
            .and(path(poll_path(category, task_id)))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "status": 200,
                "data": {"task_status": "processing"}
            })))
            .up_to_n_times(processing_polls)
            .mount(server)
            .await;
    }

    let mut data = serde_json::json!({"task_status": "success"});
    if let (Some(data_obj), Some(results_obj)) = (data.as_object_mut(), results.as_object()) {
        for (key, value) in results_obj {
            data_obj.insert(key.clone(), value.clone());
        }
    }
    Mock::given(method("GET"))
        .and(path(poll_path(category, task_id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": 200,
            "data": data
        })))
        .mount(server)
        .await;
}

/// Polling never reaches a terminal status; drives the timeout path.
pub async fn stub_poll_never_terminal(server: &MockServer, category: &str, task_id: &str) {
    Mock::given(method("GET"))
        .and(path(poll_path(category, task_id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": 200,
            "data": {"task_status": "pending"}
        })))
        .mount(server)
        .await;
}

/// Polling answers HTTP 401; drives the authentication failure path.
pub async fn stub_poll_unauthorized(server: &MockServer, category: &str, task_id: &str) {
    Mock::given(method("GET"))
        .and(path(poll_path(category, task_id)))
        .respond_with(ResponseTemplate::new(401))
        .mount(server)
        .await;
}

/// The provider reports the task itself as failed with its own message.
pub async fn stub_poll_task_error(
    server: &MockServer,
    category: &str,
    task_id: &str,
    message: &str,
) {
    Mock::given(method("GET"))
        .and(path(poll_path(category, task_id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": 200,
            "data": {"task_status": "error", "error_message": message}
        })))
        .mount(server)
        .await;
}
