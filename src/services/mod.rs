// ABOUTME: Domain service layer for business logic extracted from route handlers
// ABOUTME: Hosts the payment workflows that span the processor, the database and invoicing
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Domain service layer
//!
//! Route handlers decode requests and render responses; the multi-step
//! workflows they trigger live here so they can be exercised without HTTP.

/// Checkout, subscription, virtual terminal, refund and cancellation workflows
pub mod checkout;

pub use checkout::{
    deserialize_cents, CancelRequest, CheckoutRequest, CheckoutService, RefundRequest,
    SubscriptionRequest, VirtualTerminalRequest,
};
