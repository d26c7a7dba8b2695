// ABOUTME: Main library entry point for the Widget Store backend
// ABOUTME: Storefront checkout, bronze plan subscriptions, admin sales and user management over HTTP
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Widget Store
//!
//! JSON HTTP backend for a small widget shop. Customers buy widgets or
//! subscribe to the bronze plan with Stripe; administrators log in with an
//! opaque bearer token to browse sales, issue refunds, cancel subscriptions
//! and manage other administrators. Every completed sale is forwarded to the
//! invoice microservice.
//!
//! ## Architecture
//!
//! - **Routes**: thin axum handlers, one module per area
//! - **Services**: payment workflows spanning the processor, the database and invoicing
//! - **Database**: SQLite through sqlx, one file per table
//! - **Payments**: the `PaymentProvider` trait and its Stripe implementation
//! - **Invoice**: the invoice client and the microservice router
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use widget_store::config::environment::ServerConfig;
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = ServerConfig::from_env()?;
//!     println!("Widget Store configured with port: HTTP={}", config.http_port);
//!     Ok(())
//! }
//! ```

// ── Public API ──────────────────────────────────────────────────────────
// These modules are used by binary crates (src/bin/) and integration tests (tests/).

/// Password hashing and authentication token generation
pub mod auth;

/// Environment-driven configuration
pub mod config;

/// Link signing and string encryption
pub mod crypto;

/// SQLite persistence
pub mod database;

/// Invoice microservice client and server
pub mod invoice;

/// Structured logging setup
pub mod logging;

/// Outgoing mail
pub mod mailer;

/// Admin bearer token middleware
pub mod middleware;

/// Payment processor abstraction and Stripe client
pub mod payments;

/// Shared server resources
pub mod resources;

/// HTTP routes
pub mod routes;

/// Payment workflows
pub mod services;

/// Shared helpers
pub mod utils;

/// Field validation
pub mod validation;

pub use widget_store_core::{constants, errors, models, pagination};
