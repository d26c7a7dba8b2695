// ABOUTME: Utility modules for common functionality across the application
// ABOUTME: Contains shared helpers for bearer token parsing, HTTP clients and JSON responses
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Bearer token extraction from Authorization headers
pub mod auth;
/// HTTP client configuration and helpers
pub mod http_client;
/// JSON response formatting utilities
pub mod json_responses;
