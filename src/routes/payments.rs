// ABOUTME: Storefront payment route handlers for intents, widget checkout and plan subscriptions
// ABOUTME: Card failures are reported as `{ok: false, message}` so the storefront can show them
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde::Deserialize;
use tracing::{info, warn};
use widget_store_core::errors::{AppError, AppResult};

use super::json_body;
use crate::resources::ServerResources;
use crate::services::{deserialize_cents, CheckoutRequest, SubscriptionRequest};
use crate::utils::json_responses::{json_response, WorkflowResponse};

/// Body of POST /api/payment-intent
#[derive(Debug, Deserialize)]
pub struct PaymentIntentRequest {
    /// Cents, usually sent as a string
    #[serde(deserialize_with = "deserialize_cents")]
    pub amount: i64,
    pub currency: String,
}

/// Payment routes implementation
pub struct PaymentRoutes;

impl PaymentRoutes {
    /// Create all storefront payment routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/payment-intent", post(handle_payment_intent))
            .route("/api/checkout", post(handle_checkout))
            .route(
                "/api/create-customer-and-subscribe-to-plan",
                post(handle_subscribe),
            )
            .with_state(resources)
    }
}

/// Handle POST /api/payment-intent
async fn handle_payment_intent(
    State(resources): State<Arc<ServerResources>>,
    payload: Result<Json<PaymentIntentRequest>, JsonRejection>,
) -> AppResult<Response> {
    let request = json_body(payload)?;
    if request.amount <= 0 {
        return Err(AppError::invalid_input("amount must be positive"));
    }

    match resources
        .payments
        .create_payment_intent(&request.currency, request.amount)
        .await
    {
        Ok(intent) => {
            info!(payment_intent = %intent.id, amount = intent.amount, "Payment intent created");
            Ok(json_response(intent, StatusCode::OK).into_response())
        }
        Err(e) => {
            warn!("Payment intent rejected: {e}");
            Ok(json_response(
                WorkflowResponse::failure(e.customer_message()),
                StatusCode::OK,
            )
            .into_response())
        }
    }
}

/// Handle POST /api/checkout
async fn handle_checkout(
    State(resources): State<Arc<ServerResources>>,
    payload: Result<Json<CheckoutRequest>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let request = json_body(payload)?;
    let response = resources.checkout().checkout(&request).await?;
    Ok(json_response(response, StatusCode::OK))
}

/// Handle POST /api/create-customer-and-subscribe-to-plan
async fn handle_subscribe(
    State(resources): State<Arc<ServerResources>>,
    payload: Result<Json<SubscriptionRequest>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let request = json_body(payload)?;
    let response = resources.checkout().subscribe(&request).await?;
    Ok(json_response(response, StatusCode::OK))
}
