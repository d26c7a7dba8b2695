// ABOUTME: Core types and constants for the Widget Store backend
// ABOUTME: Foundation crate with error handling, pagination, domain models, and constants
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Widget Store Core
//!
//! Foundation crate providing shared types and constants for the Widget Store
//! backend. It has no knowledge of HTTP routing, the database pool or the
//! payment processor; the main crate builds on top of it.
//!
//! ## Modules
//!
//! - **errors**: Unified error handling with `AppError` and `ErrorCode`
//! - **constants**: Application-wide constants organized by domain
//! - **pagination**: Page/offset pagination for sales and subscription listings
//! - **models**: Widgets, customers, transactions, orders, users and tokens

/// Unified error handling system with standard error codes and HTTP responses
pub mod errors;

/// Application constants and configuration values organized by domain
pub mod constants;

/// Page/offset pagination for listing endpoints
pub mod pagination;

/// Core data models (Widget, Order, Transaction, Customer, User, Token)
pub mod models;
