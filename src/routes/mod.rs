// ABOUTME: Route module organization for the Widget Store HTTP API
// ABOUTME: Assembles public storefront routes and token-protected admin routes into one router
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Route module for the Widget Store API
//!
//! Each domain module contains only route definitions and thin handler
//! functions; payment workflows are delegated to [`crate::services`].

/// Admin dashboard routes behind bearer token authentication
pub mod admin;
/// Login, token check and password reset routes
pub mod auth;
/// Health check routes
pub mod health;
/// Storefront payment routes
pub mod payments;
/// Widget catalogue routes
pub mod widgets;

pub use admin::AdminRoutes;
pub use auth::AuthRoutes;
pub use health::HealthRoutes;
pub use payments::PaymentRoutes;
pub use widgets::WidgetRoutes;

use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path,
    },
    Json, Router,
};
use tower_http::trace::TraceLayer;
use tracing::debug;
use widget_store_core::errors::{AppError, AppResult};

use crate::resources::ServerResources;

/// Unwrap a JSON body, turning malformed payloads into `INVALID_INPUT`
pub(crate) fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> AppResult<T> {
    payload.map(|Json(value)| value).map_err(|e| {
        debug!("Rejected request body: {e}");
        AppError::invalid_input(e.body_text())
    })
}

/// Unwrap a path parameter, turning unparsable segments into `INVALID_INPUT`
pub(crate) fn path_param<T>(param: Result<Path<T>, PathRejection>) -> AppResult<T> {
    param.map(|Path(value)| value).map_err(|e| {
        debug!("Rejected path parameter: {e}");
        AppError::invalid_input(e.body_text())
    })
}

/// Widget Store API router
pub struct WidgetStoreRoutes;

impl WidgetStoreRoutes {
    /// Create the complete API router
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .merge(HealthRoutes::routes())
            .merge(WidgetRoutes::routes(resources.clone()))
            .merge(PaymentRoutes::routes(resources.clone()))
            .merge(AuthRoutes::routes(resources.clone()))
            .merge(AdminRoutes::routes(resources))
            .layer(TraceLayer::new_for_http())
    }
}
