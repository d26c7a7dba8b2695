// ABOUTME: Password hashing and opaque bearer token issuance for admin authentication
// ABOUTME: bcrypt work runs on the blocking pool; only SHA-256 hashes of tokens are persisted
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Authentication
//!
//! Admins log in with email and password. On success the server issues a
//! random 26 character token, stores its SHA-256 hash and hands the plaintext
//! to the client, which sends it back as `Authorization: Bearer <token>`.

use chrono::{Duration, Utc};
use rand::{distributions::Alphanumeric, Rng};
use sha2::{Digest, Sha256};
use widget_store_core::constants::auth::{BCRYPT_COST, SCOPE_AUTHENTICATION, TOKEN_LENGTH};
use widget_store_core::errors::{AppError, AppResult};
use widget_store_core::models::Token;

/// Generate a fresh token for `user_id` valid for `ttl_hours`
#[must_use]
pub fn generate_token(user_id: i64, ttl_hours: i64) -> Token {
    let plain_text: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(TOKEN_LENGTH)
        .map(char::from)
        .collect();

    Token {
        hash: hash_token(&plain_text),
        plain_text,
        user_id,
        expiry: Utc::now() + Duration::hours(ttl_hours),
        scope: SCOPE_AUTHENTICATION.to_owned(),
    }
}

/// SHA-256 hex digest stored in place of the plaintext token
#[must_use]
pub fn hash_token(plain_text: &str) -> String {
    hex::encode(Sha256::digest(plain_text.as_bytes()))
}

/// Hash a password with bcrypt on the blocking pool
///
/// # Errors
///
/// Returns an internal error if hashing fails or the blocking task panics
pub async fn hash_password(password: &str) -> AppResult<String> {
    let password = password.to_owned();

    tokio::task::spawn_blocking(move || bcrypt::hash(password, BCRYPT_COST))
        .await
        .map_err(|e| AppError::internal(format!("Password hashing task failed: {e}")))?
        .map_err(|e| AppError::internal(format!("Password hashing failed: {e}")))
}

/// Verify password against hash using bcrypt with `spawn_blocking`
///
/// A malformed hash counts as a mismatch.
pub async fn verify_password(password: &str, hash: &str) -> bool {
    let password = password.to_owned();
    let hash = hash.to_owned();

    tokio::task::spawn_blocking(move || bcrypt::verify(&password, &hash).unwrap_or(false))
        .await
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_token_shape() {
        let token = generate_token(7, 24);

        assert_eq!(token.plain_text.len(), TOKEN_LENGTH);
        assert!(token.plain_text.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_eq!(token.user_id, 7);
        assert_eq!(token.scope, SCOPE_AUTHENTICATION);
        assert_eq!(token.hash, hash_token(&token.plain_text));
        assert!(token.expiry > Utc::now() + Duration::hours(23));
    }

    #[test]
    fn test_hash_is_sha256_hex() {
        let hash = hash_token("ABCDEFGHIJKLMNOPQRSTUVWXYZ");
        assert_eq!(hash.len(), 64);
        assert_ne!(hash, hash_token("ABCDEFGHIJKLMNOPQRSTUVWXYz"));
    }

    #[tokio::test]
    async fn test_password_round_trip() {
        let hash = hash_password("password").await.unwrap();
        assert!(hash.starts_with("$2"));
        assert!(verify_password("password", &hash).await);
        assert!(!verify_password("wrong", &hash).await);
        assert!(!verify_password("password", "not-a-hash").await);
    }
}
