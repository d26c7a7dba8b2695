// ABOUTME: Admin user management route handlers
// ABOUTME: Lists, shows, adds, edits and deletes back office users
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
use serde::Deserialize;
use tracing::info;
use widget_store_core::errors::{AppError, AppResult};
use widget_store_core::models::User;

use crate::auth::hash_password;
use crate::middleware::AuthenticatedUser;
use crate::resources::ServerResources;
use crate::routes::{json_body, path_param};
use crate::utils::json_responses::{json_response, message};
use crate::validation::Validator;

/// User as submitted by the admin user form
#[derive(Debug, Clone, Deserialize)]
pub struct UserPayload {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    /// New password; empty keeps the current one when editing
    #[serde(default)]
    pub password: String,
}

impl UserPayload {
    fn validate(&self, adding: bool) -> AppResult<()> {
        let mut validator = Validator::new();
        validator
            .check(
                !self.first_name.trim().is_empty(),
                "first_name",
                "must be provided",
            )
            .check(
                !self.last_name.trim().is_empty(),
                "last_name",
                "must be provided",
            )
            .check(self.email.contains('@'), "email", "must be a valid email")
            .check(
                !adding || !self.password.is_empty(),
                "password",
                "must be provided",
            );
        validator.finish()
    }

    fn into_user(self, id: i64) -> User {
        User {
            id,
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            password: String::new(),
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }
    }
}

/// Handle POST /api/admin/all-users
pub(super) async fn handle_all_users(
    State(resources): State<Arc<ServerResources>>,
) -> AppResult<impl IntoResponse> {
    let users = resources.database.all_users().await?;
    Ok(json_response(users, StatusCode::OK))
}

/// Handle POST /api/admin/all-users/:id
pub(super) async fn handle_get_user(
    State(resources): State<Arc<ServerResources>>,
    id: Result<Path<i64>, PathRejection>,
) -> AppResult<impl IntoResponse> {
    let id = path_param(id)?;
    let user = resources.database.get_user(id).await?;
    Ok(json_response(user, StatusCode::OK))
}

/// Handle POST /api/admin/all-users/edit/:id
///
/// Id `0` adds a new user; any other id edits that user and rehashes the
/// password only when one is supplied.
pub(super) async fn handle_edit_user(
    State(resources): State<Arc<ServerResources>>,
    Extension(AuthenticatedUser(admin)): Extension<AuthenticatedUser>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<UserPayload>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let id = path_param(id)?;
    let payload = json_body(payload)?;
    if id < 0 {
        return Err(AppError::invalid_input("user id must not be negative"));
    }

    let adding = id == 0;
    payload.validate(adding)?;

    let password = payload.password.clone();
    let user = payload.into_user(id);

    if adding {
        let hash = hash_password(&password).await?;
        let new_id = resources.database.add_user(&user, &hash).await?;
        info!(admin.id = admin.id, user.id = new_id, "User added");
        return Ok(json_response(message("user added"), StatusCode::OK));
    }

    resources.database.edit_user(&user).await?;
    if !password.is_empty() {
        let hash = hash_password(&password).await?;
        resources.database.update_password(user.id, &hash).await?;
    }

    info!(admin.id = admin.id, user.id = user.id, "User updated");
    Ok(json_response(message("user updated"), StatusCode::OK))
}

/// Handle POST /api/admin/all-users/delete/:id
pub(super) async fn handle_delete_user(
    State(resources): State<Arc<ServerResources>>,
    Extension(AuthenticatedUser(admin)): Extension<AuthenticatedUser>,
    id: Result<Path<i64>, PathRejection>,
) -> AppResult<impl IntoResponse> {
    let id = path_param(id)?;
    resources.database.delete_user(id).await?;

    info!(admin.id = admin.id, user.id = id, "User deleted");
    Ok(json_response(message("user deleted"), StatusCode::OK))
}
