// ABOUTME: Configuration module for the Widget Store API and invoice microservice
// ABOUTME: Re-exports the environment-driven server configuration types
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Configuration is read once at startup from environment variables and
//! shared read-only with every request handler.

/// Environment and server configuration
pub mod environment;

pub use environment::{DatabaseUrl, Environment, ServerConfig, StripeConfig};
