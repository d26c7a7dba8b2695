// ABOUTME: Admin sales route handlers for order listings, refunds and subscription cancellation
// ABOUTME: Listings page through one-off sales or recurring subscriptions, newest first
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use serde::Serialize;
use tracing::info;
use widget_store_core::errors::AppResult;
use widget_store_core::models::Order;
use widget_store_core::pagination::{Page, PageRequest};

use crate::middleware::AuthenticatedUser;
use crate::resources::ServerResources;
use crate::routes::{json_body, path_param};
use crate::services::{CancelRequest, RefundRequest, VirtualTerminalRequest};
use crate::utils::json_responses::{json_response, message};

/// One page of orders as rendered by the admin dashboard
#[derive(Debug, Serialize)]
pub struct PaginatedOrders {
    pub current_page: i64,
    pub page_size: i64,
    pub last_page: i64,
    pub total_records: i64,
    pub orders: Vec<Order>,
}

impl From<Page<Order>> for PaginatedOrders {
    fn from(page: Page<Order>) -> Self {
        Self {
            current_page: page.current_page,
            page_size: page.page_size,
            last_page: page.last_page,
            total_records: page.total_records,
            orders: page.items,
        }
    }
}

/// Handle POST /api/admin/virtual-terminal-succeeded
pub(super) async fn handle_virtual_terminal_succeeded(
    State(resources): State<Arc<ServerResources>>,
    Extension(AuthenticatedUser(admin)): Extension<AuthenticatedUser>,
    payload: Result<Json<VirtualTerminalRequest>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let request = json_body(payload)?;
    let transaction = resources.checkout().virtual_terminal(&request).await?;

    info!(
        admin.id = admin.id,
        transaction.id = transaction.id,
        "Virtual terminal charge recorded by admin"
    );
    Ok(json_response(transaction, StatusCode::OK))
}

/// Handle POST /api/admin/all-sales
pub(super) async fn handle_all_sales(
    State(resources): State<Arc<ServerResources>>,
    payload: Result<Json<PageRequest>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let page = json_body(payload)?;
    let orders = resources.database.all_orders_paginated(page, false).await?;
    Ok(json_response(PaginatedOrders::from(orders), StatusCode::OK))
}

/// Handle POST /api/admin/all-subscriptions
pub(super) async fn handle_all_subscriptions(
    State(resources): State<Arc<ServerResources>>,
    payload: Result<Json<PageRequest>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let page = json_body(payload)?;
    let orders = resources.database.all_orders_paginated(page, true).await?;
    Ok(json_response(PaginatedOrders::from(orders), StatusCode::OK))
}

/// Handle POST /api/admin/get-sale/:id
pub(super) async fn handle_get_sale(
    State(resources): State<Arc<ServerResources>>,
    id: Result<Path<i64>, PathRejection>,
) -> AppResult<impl IntoResponse> {
    let id = path_param(id)?;
    let order = resources.database.get_order(id).await?;
    Ok(json_response(order, StatusCode::OK))
}

/// Handle POST /api/admin/refund
pub(super) async fn handle_refund(
    State(resources): State<Arc<ServerResources>>,
    Extension(AuthenticatedUser(admin)): Extension<AuthenticatedUser>,
    payload: Result<Json<RefundRequest>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let request = json_body(payload)?;
    resources.checkout().refund(&request).await?;

    info!(admin.id = admin.id, order.id = request.id, "Order refunded");
    Ok(json_response(message("Charge Refunded"), StatusCode::OK))
}

/// Handle POST /api/admin/cancel-subscription
pub(super) async fn handle_cancel_subscription(
    State(resources): State<Arc<ServerResources>>,
    Extension(AuthenticatedUser(admin)): Extension<AuthenticatedUser>,
    payload: Result<Json<CancelRequest>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let request = json_body(payload)?;
    resources.checkout().cancel_subscription(&request).await?;

    info!(admin.id = admin.id, order.id = request.id, "Subscription cancelled");
    Ok(json_response(
        message("Subscription Cancelled"),
        StatusCode::OK,
    ))
}
