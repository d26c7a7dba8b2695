// ABOUTME: Widget catalogue route handlers
// ABOUTME: Serves a single widget so the storefront can render its product page
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;

use axum::{
    extract::{rejection::PathRejection, Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Router,
};
use widget_store_core::errors::AppResult;

use crate::resources::ServerResources;
use crate::routes::path_param;
use crate::utils::json_responses::json_response;

/// Widget routes implementation
pub struct WidgetRoutes;

impl WidgetRoutes {
    /// Create all widget routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/widget/:id", get(handle_get_widget))
            .with_state(resources)
    }
}

/// Handle GET /api/widget/:id
async fn handle_get_widget(
    State(resources): State<Arc<ServerResources>>,
    id: Result<Path<i64>, PathRejection>,
) -> AppResult<impl IntoResponse> {
    let id = path_param(id)?;
    let widget = resources.database.get_widget(id).await?;
    Ok(json_response(widget, StatusCode::OK))
}
