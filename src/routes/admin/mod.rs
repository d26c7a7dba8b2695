// ABOUTME: Admin API route definitions for sales, subscriptions, refunds and user management
// ABOUTME: Every admin route sits behind the bearer token authentication middleware
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Admin routes for the back office
//!
//! Handlers are thin wrappers over the database and the checkout service.
//! The authenticated user is available as an [`AuthenticatedUser`] extension.
//!
//! [`AuthenticatedUser`]: crate::middleware::AuthenticatedUser

mod sales;
mod users;

pub use sales::PaginatedOrders;
pub use users::UserPayload;

use std::sync::Arc;

use axum::{middleware, routing::post, Router};

use crate::middleware::admin_auth_middleware;
use crate::resources::ServerResources;

/// Admin routes implementation
pub struct AdminRoutes;

impl AdminRoutes {
    /// Create all admin routes, protected by [`admin_auth_middleware`]
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Self::sales_routes()
            .merge(Self::user_routes())
            .layer(middleware::from_fn_with_state(
                resources.clone(),
                admin_auth_middleware,
            ))
            .with_state(resources)
    }

    /// Sales, subscriptions, refunds and the virtual terminal
    fn sales_routes() -> Router<Arc<ServerResources>> {
        Router::new()
            .route(
                "/api/admin/virtual-terminal-succeeded",
                post(sales::handle_virtual_terminal_succeeded),
            )
            .route("/api/admin/all-sales", post(sales::handle_all_sales))
            .route(
                "/api/admin/all-subscriptions",
                post(sales::handle_all_subscriptions),
            )
            .route("/api/admin/get-sale/:id", post(sales::handle_get_sale))
            .route("/api/admin/refund", post(sales::handle_refund))
            .route(
                "/api/admin/cancel-subscription",
                post(sales::handle_cancel_subscription),
            )
    }

    /// Admin user management
    fn user_routes() -> Router<Arc<ServerResources>> {
        Router::new()
            .route("/api/admin/all-users", post(users::handle_all_users))
            .route("/api/admin/all-users/:id", post(users::handle_get_user))
            .route(
                "/api/admin/all-users/edit/:id",
                post(users::handle_edit_user),
            )
            .route(
                "/api/admin/all-users/delete/:id",
                post(users::handle_delete_user),
            )
    }
}
