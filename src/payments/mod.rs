// ABOUTME: Payment processor abstraction for charges, customers, subscriptions and refunds
// ABOUTME: Defines the PaymentProvider trait, its result types and customer-facing card messages
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Payments
//!
//! Handlers and the checkout service talk to the processor only through
//! [`PaymentProvider`]. [`StripeClient`] is the production implementation;
//! tests substitute an in-process mock.

mod stripe;

pub use stripe::StripeClient;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use widget_store_core::errors::AppError;

/// Customer-facing message for a processor error code
///
/// Only expired cards get a distinct message; every other failure reads as a
/// declined card.
#[must_use]
pub fn card_error_message(code: Option<&str>) -> &'static str {
    match code {
        Some("expired_card") => "Your card is expired",
        _ => "Your card was declined",
    }
}

/// Errors returned by a payment processor
#[derive(Debug, Clone, Error)]
pub enum PaymentError {
    /// The processor rejected the request with an error code
    #[error("{message} ({code})")]
    Rejected {
        /// Processor error code, e.g. `card_declined`
        code: String,
        /// Processor message, not shown to customers
        message: String,
    },
    /// The processor replied with a non-success status and no error code
    #[error("processor returned {status}: {message}")]
    Api { status: u16, message: String },
    /// The request never got a reply
    #[error("payment processor unreachable: {0}")]
    Network(String),
    /// The reply could not be decoded
    #[error("unexpected payment processor response: {0}")]
    InvalidResponse(String),
    /// The request could not be built
    #[error("invalid payment processor request: {0}")]
    InvalidRequest(String),
}

impl PaymentError {
    /// Processor error code, if the processor supplied one
    #[must_use]
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Rejected { code, .. } => Some(code),
            _ => None,
        }
    }

    /// Message safe to show to the customer
    #[must_use]
    pub fn customer_message(&self) -> &'static str {
        card_error_message(self.code())
    }
}

impl From<PaymentError> for AppError {
    fn from(error: PaymentError) -> Self {
        Self::payment(error.customer_message()).with_source(error)
    }
}

/// Result type for processor calls
pub type PaymentResult<T> = Result<T, PaymentError>;

/// A payment intent as reported by the processor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentIntent {
    pub id: String,
    pub amount: i64,
    pub currency: String,
    pub status: String,
    #[serde(default)]
    pub client_secret: Option<String>,
    /// Charge created by a confirmed intent; stored as the bank return code
    #[serde(default)]
    pub latest_charge: Option<String>,
    #[serde(default)]
    pub payment_method: Option<String>,
}

impl PaymentIntent {
    /// Whether the customer confirmed the intent and the charge went through
    #[must_use]
    pub fn is_succeeded(&self) -> bool {
        self.status == "succeeded"
    }
}

/// Card details of a payment method
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardDetails {
    pub last_four: String,
    pub expiry_month: i64,
    pub expiry_year: i64,
    #[serde(default)]
    pub brand: String,
}

/// A processor-side customer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentCustomer {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// A recurring subscription
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    pub id: String,
    pub status: String,
    #[serde(default)]
    pub cancel_at_period_end: bool,
}

/// A refund of a charge
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Refund {
    pub id: String,
    pub amount: i64,
    pub status: String,
}

/// Operations the store needs from a payment processor
#[async_trait]
pub trait PaymentProvider: Send + Sync {
    /// Processor name for logs
    fn name(&self) -> &'static str;

    /// Create a card payment intent for `amount` cents
    async fn create_payment_intent(
        &self,
        currency: &str,
        amount: i64,
    ) -> PaymentResult<PaymentIntent>;

    /// Fetch a payment intent by id
    async fn retrieve_payment_intent(&self, id: &str) -> PaymentResult<PaymentIntent>;

    /// Fetch card details of a payment method
    async fn get_payment_method(&self, id: &str) -> PaymentResult<CardDetails>;

    /// Create a customer whose default payment method is `payment_method`
    async fn create_customer(
        &self,
        payment_method: &str,
        email: &str,
    ) -> PaymentResult<PaymentCustomer>;

    /// Subscribe `customer` to `plan`
    async fn subscribe_to_plan(
        &self,
        customer: &PaymentCustomer,
        plan: &str,
        email: &str,
        last_four: &str,
    ) -> PaymentResult<Subscription>;

    /// Refund `amount` cents of the charge behind `payment_intent`
    async fn refund(&self, payment_intent: &str, amount: i64) -> PaymentResult<Refund>;

    /// Cancel a subscription at the end of the current period
    async fn cancel_subscription(&self, subscription_id: &str) -> PaymentResult<Subscription>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_error_messages() {
        assert_eq!(card_error_message(Some("card_declined")), "Your card was declined");
        assert_eq!(card_error_message(Some("expired_card")), "Your card is expired");
        assert_eq!(
            card_error_message(Some("incorrect_cvc")),
            "Your card was declined"
        );
        assert_eq!(card_error_message(None), "Your card was declined");
    }

    #[test]
    fn test_payment_error_becomes_payment_failed() {
        let error = PaymentError::Rejected {
            code: "expired_card".to_owned(),
            message: "Your card has expired.".to_owned(),
        };
        let app_error = AppError::from(error);

        assert_eq!(app_error.http_status(), 402);
        assert_eq!(app_error.message, "Your card is expired");
    }

    #[test]
    fn test_only_succeeded_intents_are_paid() {
        let mut intent: PaymentIntent = serde_json::from_str(
            r#"{"id": "pi_1", "amount": 1000, "currency": "cad", "status": "requires_payment_method"}"#,
        )
        .unwrap();
        assert!(!intent.is_succeeded());

        intent.status = "succeeded".to_owned();
        assert!(intent.is_succeeded());
    }

    #[test]
    fn test_network_error_has_no_code() {
        let error = PaymentError::Network("connection refused".to_owned());
        assert_eq!(error.code(), None);
        assert_eq!(error.customer_message(), "Your card was declined");
    }
}
