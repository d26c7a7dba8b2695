// ABOUTME: Admin authentication middleware validating opaque bearer tokens
// ABOUTME: Rejects requests with 401 unless the token resolves to an unexpired user token
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use http::HeaderMap;
use tracing::{debug, warn};
use widget_store_core::errors::{AppError, AppResult};
use widget_store_core::models::User;

use crate::database::Database;
use crate::resources::ServerResources;
use crate::utils::auth::extract_bearer_token_from_headers;

/// User resolved from the bearer token, inserted into request extensions
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub User);

/// Resolve the bearer token in `headers` to its user
///
/// # Errors
///
/// Returns `AUTH_INVALID` for a missing or malformed header and for unknown
/// or expired tokens
pub async fn authenticate_token(headers: &HeaderMap, database: &Database) -> AppResult<User> {
    let token = extract_bearer_token_from_headers(headers)?;

    database
        .get_user_for_token(token)
        .await?
        .ok_or_else(|| AppError::auth_invalid("no matching user found"))
}

/// Require a valid admin token on every request passing through this layer
///
/// ```rust,no_run
/// use axum::{middleware, routing::post, Router};
/// use widget_store::middleware::admin_auth_middleware;
/// use widget_store::resources::ServerResources;
/// use std::sync::Arc;
///
/// # async fn handler() -> &'static str { "" }
/// # fn example(resources: Arc<ServerResources>) {
/// let app: Router = Router::new()
///     .route("/api/admin/all-users", post(handler))
///     .layer(middleware::from_fn_with_state(resources.clone(), admin_auth_middleware))
///     .with_state(resources);
/// # }
/// ```
pub async fn admin_auth_middleware(
    State(resources): State<Arc<ServerResources>>,
    mut req: Request,
    next: Next,
) -> Response {
    match authenticate_token(req.headers(), &resources.database).await {
        Ok(user) => {
            debug!(user.id = user.id, "Admin request authenticated");
            req.extensions_mut().insert(AuthenticatedUser(user));
            next.run(req).await
        }
        Err(e) => {
            warn!(path = %req.uri().path(), "Admin authentication failed: {e}");
            AppError::auth_invalid(e.message).into_response()
        }
    }
}
