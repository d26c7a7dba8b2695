// ABOUTME: HTTP middleware for admin authentication
// ABOUTME: Resolves bearer tokens to users and exposes them to handlers as request extensions
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

pub mod auth;

pub use auth::{admin_auth_middleware, authenticate_token, AuthenticatedUser};
