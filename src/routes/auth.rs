// ABOUTME: Authentication route handlers for admin login and password reset
// ABOUTME: Issues bearer tokens, checks them, and runs the signed-link password reset flow
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, info};
use url::Url;
use widget_store_core::constants::auth::RESET_LINK_TTL_MINUTES;
use widget_store_core::errors::{AppError, AppResult};
use widget_store_core::models::Token;

use super::json_body;
use crate::auth::{generate_token, hash_password, verify_password};
use crate::logging::AppLogger;
use crate::mailer::MailMessage;
use crate::middleware::authenticate_token;
use crate::resources::ServerResources;
use crate::utils::json_responses::{error_message, json_response, message};
use crate::validation::Validator;

const INVALID_CREDENTIALS: &str = "invalid authentication credentials";

/// Body of POST /api/authenticate
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Successful login
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub error: bool,
    pub message: String,
    pub authentication_token: Token,
}

/// Body of POST /api/forgot-password
#[derive(Debug, Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

/// Body of POST /api/verify-reset-link
#[derive(Debug, Deserialize)]
pub struct VerifyResetLinkRequest {
    pub link: String,
}

/// Body of POST /api/reset-password
#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    /// Email encrypted by /api/verify-reset-link
    pub email: String,
    pub password: String,
}

/// Authentication routes implementation
pub struct AuthRoutes;

impl AuthRoutes {
    /// Create all authentication routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/authenticate", post(handle_authenticate))
            .route("/api/is-authenticated", post(handle_is_authenticated))
            .route("/api/forgot-password", post(handle_forgot_password))
            .route("/api/verify-reset-link", post(handle_verify_reset_link))
            .route("/api/reset-password", post(handle_reset_password))
            .with_state(resources)
    }
}

/// Handle POST /api/authenticate
async fn handle_authenticate(
    State(resources): State<Arc<ServerResources>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let request = json_body(payload)?;

    let Some(user) = resources.database.get_user_by_email(&request.email).await? else {
        AppLogger::log_auth_event(&request.email, "login", false);
        return Err(AppError::auth_invalid(INVALID_CREDENTIALS));
    };

    if !verify_password(&request.password, &user.password).await {
        AppLogger::log_auth_event(&request.email, "login", false);
        return Err(AppError::auth_invalid(INVALID_CREDENTIALS));
    }

    let token = generate_token(user.id, resources.config.token_ttl_hours);
    resources.database.insert_token(&token, &user).await?;
    AppLogger::log_auth_event(&user.email, "login", true);

    Ok(json_response(
        LoginResponse {
            error: false,
            message: format!("token for {} created", user.email),
            authentication_token: token,
        },
        StatusCode::OK,
    ))
}

/// Handle POST /api/is-authenticated
async fn handle_is_authenticated(
    State(resources): State<Arc<ServerResources>>,
    headers: HeaderMap,
) -> AppResult<impl IntoResponse> {
    let user = authenticate_token(&headers, &resources.database).await?;
    Ok(json_response(
        message(&format!("authenticated user {}", user.email)),
        StatusCode::OK,
    ))
}

/// Handle POST /api/forgot-password
async fn handle_forgot_password(
    State(resources): State<Arc<ServerResources>>,
    payload: Result<Json<ForgotPasswordRequest>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let request = json_body(payload)?;

    if resources
        .database
        .get_user_by_email(&request.email)
        .await?
        .is_none()
    {
        info!("Password reset requested for unknown email");
        return Ok(json_response(
            error_message("No matching email found on system"),
            StatusCode::ACCEPTED,
        ));
    }

    let mut link = Url::parse(&format!(
        "{}/reset-password",
        resources.config.frontend_url.trim_end_matches('/')
    ))
    .map_err(|e| AppError::config(format!("Invalid frontend url: {e}")))?;
    link.query_pairs_mut().append_pair("email", &request.email);
    let signed = resources.signer.sign(link.as_str())?;

    let mail = MailMessage::password_reset(&resources.config.mail_from, &request.email, &signed);
    resources.mailer.send(&mail).await.inspect_err(|e| {
        error!("Password reset mail could not be sent: {e}");
    })?;

    Ok(json_response(
        message("password reset link sent"),
        StatusCode::CREATED,
    ))
}

/// Handle POST /api/verify-reset-link
async fn handle_verify_reset_link(
    State(resources): State<Arc<ServerResources>>,
    payload: Result<Json<VerifyResetLinkRequest>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let request = json_body(payload)?;

    if !resources.signer.verify(&request.link) {
        return Err(AppError::invalid_input("invalid url - tampering detected"));
    }
    if resources
        .signer
        .expired(&request.link, RESET_LINK_TTL_MINUTES)
    {
        return Err(AppError::invalid_input("link expired"));
    }

    let email = Url::parse(&request.link)
        .ok()
        .and_then(|url| {
            url.query_pairs()
                .find(|(key, _)| key == "email")
                .map(|(_, value)| value.into_owned())
        })
        .ok_or_else(|| AppError::invalid_input("link does not carry an email"))?;

    let encrypted = resources.encryption.encrypt(&email)?;
    Ok(json_response(
        json!({ "error": false, "email": encrypted }),
        StatusCode::OK,
    ))
}

/// Handle POST /api/reset-password
async fn handle_reset_password(
    State(resources): State<Arc<ServerResources>>,
    payload: Result<Json<ResetPasswordRequest>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let request = json_body(payload)?;

    let mut validator = Validator::new();
    validator.check(!request.password.is_empty(), "password", "must be provided");
    validator.finish()?;

    let email = resources.encryption.decrypt(&request.email)?;
    let user = resources
        .database
        .get_user_by_email(&email)
        .await?
        .ok_or_else(|| AppError::not_found("User"))?;

    let hash = hash_password(&request.password).await?;
    resources.database.update_password(user.id, &hash).await?;
    AppLogger::log_auth_event(&user.email, "password_reset", true);

    Ok(json_response(message("password changed"), StatusCode::CREATED))
}
