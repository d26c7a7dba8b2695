// ABOUTME: JSON response utilities shared by the storefront and admin handlers
// ABOUTME: Builds the `{error, message}` and `{ok, message}` envelopes the frontend expects
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use serde_json::{json, Value};

/// Serialize `value` with the given status
pub fn json_response<T: Serialize>(value: T, status: StatusCode) -> impl IntoResponse {
    (status, Json(value))
}

/// `{"error": false, "message": ...}`
#[must_use]
pub fn message(message: &str) -> Value {
    json!({ "error": false, "message": message })
}

/// `{"error": true, "message": ...}` for failures reported with a non-error status
#[must_use]
pub fn error_message(message: &str) -> Value {
    json!({ "error": true, "message": message })
}

/// Result envelope of the payment workflows
#[derive(Debug, Clone, PartialEq, Eq, Serialize, serde::Deserialize)]
pub struct WorkflowResponse {
    pub ok: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_id: Option<i64>,
}

impl WorkflowResponse {
    /// Successful workflow
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            ok: true,
            message: message.into(),
            order_id: None,
        }
    }

    /// Failed workflow with a customer-facing message
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            message: message.into(),
            order_id: None,
        }
    }

    /// Attach the id of the order created by the workflow
    #[must_use]
    pub fn with_order_id(mut self, order_id: i64) -> Self {
        self.order_id = Some(order_id);
        self
    }
}
