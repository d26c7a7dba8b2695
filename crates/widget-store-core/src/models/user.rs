// ABOUTME: Admin user and authentication token models
// ABOUTME: Password hashes and token hashes never leave the process in JSON

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An administrator of the store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    /// bcrypt hash
    #[serde(skip)]
    pub password: String,
    #[serde(default)]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: DateTime<Utc>,
}

/// Opaque bearer token issued on login
///
/// Only `token` and `expiry` are sent to the client. The database keeps the
/// SHA-256 hash of the plaintext, never the plaintext itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    #[serde(rename = "token")]
    pub plain_text: String,
    #[serde(skip)]
    pub user_id: i64,
    #[serde(skip)]
    pub hash: String,
    pub expiry: DateTime<Utc>,
    #[serde(skip)]
    pub scope: String,
}
