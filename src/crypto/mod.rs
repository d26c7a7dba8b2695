// ABOUTME: Cryptography module for signed password reset links and encrypted email handles
// ABOUTME: Both primitives are keyed by the 32-byte SECRET_KEY from configuration
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Cryptographic utilities

/// AES-256-GCM encryption of short strings
pub mod encryption;
/// HMAC-SHA256 link signing
pub mod url_signer;

pub use encryption::Encryption;
pub use url_signer::UrlSigner;
