// ABOUTME: Bearer token extraction and shape validation for the Authorization header
// ABOUTME: Shared by the is-authenticated endpoint and the admin authentication middleware
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use http::{header::AUTHORIZATION, HeaderMap};
use widget_store_core::constants::auth::TOKEN_LENGTH;
use widget_store_core::errors::{AppError, AppResult};

/// Extract the token from an `Authorization: Bearer <token>` header value
///
/// The value must split on whitespace into exactly two parts, the first being
/// `Bearer`, and the token must be exactly [`TOKEN_LENGTH`] characters.
///
/// # Errors
///
/// Returns `AUTH_INVALID` for any other shape
pub fn extract_bearer_token(auth_header: &str) -> AppResult<&str> {
    let mut parts = auth_header.split_whitespace();
    let (Some(scheme), Some(token), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(AppError::auth_invalid("invalid authorization header"));
    };

    if scheme != "Bearer" {
        return Err(AppError::auth_invalid("invalid authorization header"));
    }

    if token.len() != TOKEN_LENGTH {
        return Err(AppError::auth_invalid("authentication token wrong size"));
    }

    Ok(token)
}

/// Extract the bearer token from request headers
///
/// # Errors
///
/// Returns `AUTH_INVALID` if the header is missing, not valid UTF-8 or malformed
pub fn extract_bearer_token_from_headers(headers: &HeaderMap) -> AppResult<&str> {
    let header = headers
        .get(AUTHORIZATION)
        .ok_or_else(|| AppError::auth_invalid("no authorization header received"))?
        .to_str()
        .map_err(|_| AppError::auth_invalid("invalid authorization header"))?;

    extract_bearer_token(header)
}
