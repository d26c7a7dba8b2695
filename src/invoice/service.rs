// ABOUTME: HTTP router of the invoice microservice
// ABOUTME: Accepts invoice JSON and acknowledges creation; rendering and mailing happen downstream
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use widget_store_core::errors::AppResult;

use super::Invoice;
use crate::routes::{json_body, HealthRoutes};
use crate::utils::json_responses::{json_response, message};

/// Invoice microservice routes
pub struct InvoiceServiceRoutes;

impl InvoiceServiceRoutes {
    /// Create all invoice service routes
    pub fn routes() -> Router {
        Router::new()
            .route("/invoice/create-and-send", post(handle_create_and_send))
            .merge(HealthRoutes::routes())
            .layer(TraceLayer::new_for_http())
    }
}

/// Handle POST /invoice/create-and-send
async fn handle_create_and_send(
    payload: Result<Json<Invoice>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let invoice = json_body(payload).inspect_err(|e| warn!("Rejected invoice payload: {e}"))?;

    info!(
        invoice.id = invoice.id,
        invoice.amount = invoice.amount,
        invoice.product = %invoice.product,
        "Invoice created"
    );

    Ok(json_response(
        message(&format!(
            "Invoice {}.pdf created and sent to {}",
            invoice.id, invoice.email
        )),
        StatusCode::CREATED,
    ))
}
