// ABOUTME: Payment workflows: widget checkout, plan subscription, virtual terminal, refund, cancel
// ABOUTME: Each workflow is a fixed sequence of processor, database and invoice calls
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Checkout workflows
//!
//! A charge that succeeded at the processor is never rolled back. If a later
//! step fails the error is logged and returned, and the records written so far
//! stay in place. Invoice delivery failures are only logged.

use chrono::Utc;
use serde::{Deserialize, Deserializer};
use tracing::{error, info, warn};
use widget_store_core::constants::limits::MIN_FIRST_NAME_LENGTH;
use widget_store_core::constants::plans::{
    BRONZE_PLAN_AMOUNT, BRONZE_PLAN_PRODUCT, SUBSCRIPTION_CURRENCY,
};
use widget_store_core::errors::{AppError, AppResult};
use widget_store_core::models::{
    NewCustomer, NewOrder, NewTransaction, OrderStatus, Transaction, TransactionStatus,
};

use crate::database::Database;
use crate::invoice::{Invoice, InvoiceSender};
use crate::logging::AppLogger;
use crate::payments::PaymentProvider;
use crate::utils::json_responses::WorkflowResponse;
use crate::validation::Validator;

/// Message returned when a workflow completed
pub const TRANSACTION_SUCCESSFUL: &str = "Transaction successful";
/// Message returned when the plan subscription itself was rejected
pub const SUBSCRIPTION_FAILED: &str = "Error subscribing customer";
/// Message returned when the payment intent was never confirmed
pub const PAYMENT_NOT_COMPLETED: &str = "The payment has not been completed";

/// Amount in cents, sent either as a JSON number or as a numeric string
///
/// # Errors
///
/// Fails for strings that are not integers and for other JSON types
pub fn deserialize_cents<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Cents {
        Number(i64),
        Text(String),
    }

    match Cents::deserialize(deserializer)? {
        Cents::Number(value) => Ok(value),
        Cents::Text(text) => text
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("invalid amount '{text}'"))),
    }
}

const fn default_quantity() -> i64 {
    1
}

/// One-off widget purchase confirmed by the storefront
#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutRequest {
    pub widget_id: i64,
    #[serde(default = "default_quantity")]
    pub quantity: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub payment_intent: String,
    pub payment_method: String,
}

/// Subscription to a recurring widget's plan
#[derive(Debug, Clone, Deserialize)]
pub struct SubscriptionRequest {
    #[serde(alias = "product_id")]
    pub widget_id: i64,
    pub plan: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub payment_method: String,
    #[serde(deserialize_with = "deserialize_cents")]
    pub amount: i64,
    #[serde(default)]
    pub last_four: String,
    #[serde(default)]
    pub card_brand: String,
    #[serde(default)]
    pub expiry_month: i64,
    #[serde(default)]
    pub expiry_year: i64,
}

/// Charge taken by an admin through the virtual terminal
#[derive(Debug, Clone, Deserialize)]
pub struct VirtualTerminalRequest {
    #[serde(deserialize_with = "deserialize_cents")]
    pub amount: i64,
    pub currency: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    pub payment_intent: String,
    pub payment_method: String,
}

/// Refund of a one-off order
#[derive(Debug, Clone, Deserialize)]
pub struct RefundRequest {
    /// Order id
    pub id: i64,
    /// Payment intent of the order's transaction
    pub pi: String,
    #[serde(deserialize_with = "deserialize_cents")]
    pub amount: i64,
    #[serde(default)]
    pub currency: String,
}

/// Cancellation of a subscription order
#[derive(Debug, Clone, Deserialize)]
pub struct CancelRequest {
    /// Order id
    pub id: i64,
    /// Subscription id, stored as the transaction's payment intent
    pub pi: String,
    #[serde(default)]
    pub currency: String,
}

/// Runs the payment workflows against one database, processor and invoice sender
pub struct CheckoutService<'a> {
    database: &'a Database,
    payments: &'a dyn PaymentProvider,
    invoices: &'a dyn InvoiceSender,
}

impl<'a> CheckoutService<'a> {
    #[must_use]
    pub fn new(
        database: &'a Database,
        payments: &'a dyn PaymentProvider,
        invoices: &'a dyn InvoiceSender,
    ) -> Self {
        Self {
            database,
            payments,
            invoices,
        }
    }

    /// Record a widget purchase whose payment intent the storefront confirmed
    ///
    /// A processor failure produces `ok: false` with the card message.
    ///
    /// # Errors
    ///
    /// Returns `VALIDATION_FAILED` for bad input, `RESOURCE_NOT_FOUND` for an
    /// unknown widget and database errors from any insert
    pub async fn checkout(&self, request: &CheckoutRequest) -> AppResult<WorkflowResponse> {
        let mut validator = Validator::new();
        validator
            .check(request.quantity >= 1, "quantity", "must be at least 1")
            .check(!request.email.trim().is_empty(), "email", "must be provided")
            .check(
                !request.payment_intent.is_empty(),
                "payment_intent",
                "must be provided",
            );
        validator.finish()?;

        let widget = self.database.get_widget(request.widget_id).await?;

        let intent = match self
            .payments
            .retrieve_payment_intent(&request.payment_intent)
            .await
        {
            Ok(intent) => intent,
            Err(e) => {
                self.log_payment("retrieve_payment_intent", &request.payment_intent, false);
                return Ok(WorkflowResponse::failure(e.customer_message()));
            }
        };
        if !intent.is_succeeded() {
            warn!(
                payment.intent = %intent.id,
                payment.status = %intent.status,
                "Payment intent has not succeeded"
            );
            return Ok(WorkflowResponse::failure(PAYMENT_NOT_COMPLETED));
        }

        let payment_method = intent
            .payment_method
            .clone()
            .unwrap_or_else(|| request.payment_method.clone());
        let card = match self.payments.get_payment_method(&payment_method).await {
            Ok(card) => card,
            Err(e) => {
                self.log_payment("get_payment_method", &payment_method, false);
                return Ok(WorkflowResponse::failure(e.customer_message()));
            }
        };

        let customer_id = self
            .database
            .insert_customer(&NewCustomer {
                first_name: request.first_name.clone(),
                last_name: request.last_name.clone(),
                email: request.email.clone(),
            })
            .await
            .inspect_err(|e| error!("Checkout could not save customer: {e}"))?;

        let transaction_id = self
            .database
            .insert_transaction(&NewTransaction {
                amount: intent.amount,
                currency: intent.currency.clone(),
                last_four: card.last_four,
                bank_return_code: intent.latest_charge.clone().unwrap_or_default(),
                transaction_status_id: TransactionStatus::Cleared.id(),
                expiry_month: card.expiry_month,
                expiry_year: card.expiry_year,
                payment_intent: intent.id.clone(),
                payment_method,
            })
            .await
            .inspect_err(|e| error!("Checkout could not save transaction: {e}"))?;

        let order_id = self
            .database
            .insert_order(&NewOrder {
                widget_id: widget.id,
                transaction_id,
                customer_id,
                status_id: OrderStatus::Cleared.id(),
                quantity: request.quantity,
                amount: intent.amount,
            })
            .await
            .inspect_err(|e| error!("Checkout could not save order: {e}"))?;

        info!(
            order.id = order_id,
            widget.id = widget.id,
            card.brand = %card.brand,
            "Widget order recorded"
        );

        self.send_invoice(Invoice {
            id: order_id,
            widget_id: widget.id,
            amount: intent.amount,
            product: widget.name,
            quantity: request.quantity,
            first_name: request.first_name.clone(),
            last_name: request.last_name.clone(),
            email: request.email.clone(),
            created_at: Utc::now(),
        })
        .await;

        Ok(WorkflowResponse::success(TRANSACTION_SUCCESSFUL).with_order_id(order_id))
    }

    /// Create a processor customer, subscribe them to the plan and record the order
    ///
    /// # Errors
    ///
    /// Returns `VALIDATION_FAILED` for a first name shorter than two
    /// characters and database errors from any insert
    pub async fn subscribe(&self, request: &SubscriptionRequest) -> AppResult<WorkflowResponse> {
        let mut validator = Validator::new();
        validator.check(
            request.first_name.chars().count() >= MIN_FIRST_NAME_LENGTH,
            "first_name",
            "must be at least 2 characters",
        );
        validator.finish()?;

        let widget = self.database.get_widget(request.widget_id).await?;
        if !widget.is_recurring {
            return Err(AppError::invalid_input(format!(
                "widget {} is not a subscription plan",
                widget.id
            )));
        }

        let customer = match self
            .payments
            .create_customer(&request.payment_method, &request.email)
            .await
        {
            Ok(customer) => customer,
            Err(e) => {
                self.log_payment("create_customer", &request.email, false);
                return Ok(WorkflowResponse::failure(e.customer_message()));
            }
        };

        let subscription = match self
            .payments
            .subscribe_to_plan(&customer, &request.plan, &request.email, &request.last_four)
            .await
        {
            Ok(subscription) => subscription,
            Err(e) => {
                error!(customer.id = %customer.id, "Plan subscription failed: {e}");
                return Ok(WorkflowResponse::failure(SUBSCRIPTION_FAILED));
            }
        };
        self.log_payment("subscribe_to_plan", &subscription.id, true);

        let customer_id = self
            .database
            .insert_customer(&NewCustomer {
                first_name: request.first_name.clone(),
                last_name: request.last_name.clone(),
                email: request.email.clone(),
            })
            .await
            .inspect_err(|e| error!("Subscription could not save customer: {e}"))?;

        let transaction_id = self
            .database
            .insert_transaction(&NewTransaction {
                amount: request.amount,
                currency: SUBSCRIPTION_CURRENCY.to_owned(),
                last_four: request.last_four.clone(),
                bank_return_code: String::new(),
                transaction_status_id: TransactionStatus::Cleared.id(),
                expiry_month: request.expiry_month,
                expiry_year: request.expiry_year,
                payment_intent: subscription.id.clone(),
                payment_method: request.payment_method.clone(),
            })
            .await
            .inspect_err(|e| error!("Subscription could not save transaction: {e}"))?;

        let order_id = self
            .database
            .insert_order(&NewOrder {
                widget_id: widget.id,
                transaction_id,
                customer_id,
                status_id: OrderStatus::Cleared.id(),
                quantity: 1,
                amount: request.amount,
            })
            .await
            .inspect_err(|e| error!("Subscription could not save order: {e}"))?;

        info!(
            order.id = order_id,
            subscription.id = %subscription.id,
            card.brand = %request.card_brand,
            "Subscription recorded"
        );

        self.send_invoice(Invoice {
            id: order_id,
            widget_id: widget.id,
            amount: BRONZE_PLAN_AMOUNT,
            product: BRONZE_PLAN_PRODUCT.to_owned(),
            quantity: 1,
            first_name: request.first_name.clone(),
            last_name: request.last_name.clone(),
            email: request.email.clone(),
            created_at: Utc::now(),
        })
        .await;

        Ok(WorkflowResponse::success(TRANSACTION_SUCCESSFUL).with_order_id(order_id))
    }

    /// Record a charge taken through the virtual terminal; no order is created
    ///
    /// # Errors
    ///
    /// Returns `PAYMENT_FAILED` if the processor lookups fail and database
    /// errors from the insert
    pub async fn virtual_terminal(&self, request: &VirtualTerminalRequest) -> AppResult<Transaction> {
        let intent = self
            .payments
            .retrieve_payment_intent(&request.payment_intent)
            .await?;
        if !intent.is_succeeded() {
            warn!(
                payment.intent = %intent.id,
                payment.status = %intent.status,
                "Payment intent has not succeeded"
            );
            return Err(AppError::payment(PAYMENT_NOT_COMPLETED));
        }
        let card = self
            .payments
            .get_payment_method(&request.payment_method)
            .await?;

        let transaction_id = self
            .database
            .insert_transaction(&NewTransaction {
                amount: request.amount,
                currency: request.currency.clone(),
                last_four: card.last_four,
                bank_return_code: intent.latest_charge.unwrap_or_default(),
                transaction_status_id: TransactionStatus::Cleared.id(),
                expiry_month: card.expiry_month,
                expiry_year: card.expiry_year,
                payment_intent: request.payment_intent.clone(),
                payment_method: request.payment_method.clone(),
            })
            .await
            .inspect_err(|e| error!("Virtual terminal could not save transaction: {e}"))?;

        info!(transaction.id = transaction_id, "Virtual terminal charge recorded");
        self.database.get_transaction(transaction_id).await
    }

    /// Refund an order's charge and mark the order refunded
    ///
    /// # Errors
    ///
    /// Returns `PAYMENT_FAILED` if the processor refuses the refund and a
    /// database error if the refund went through but the order could not be updated
    pub async fn refund(&self, request: &RefundRequest) -> AppResult<()> {
        self.payments
            .refund(&request.pi, request.amount)
            .await
            .inspect_err(|e| error!(order.id = request.id, "Refund failed: {e}"))?;
        self.log_payment("refund", &request.pi, true);

        self.database
            .update_order_status(request.id, OrderStatus::Refunded)
            .await
            .map_err(|e| {
                error!(order.id = request.id, "Refunded order could not be updated: {e}");
                AppError::database("the charge was refunded, but the database could not be updated")
                    .with_source(e)
            })
    }

    /// Cancel a subscription at period end and mark the order cancelled
    ///
    /// # Errors
    ///
    /// Returns `PAYMENT_FAILED` if the processor refuses and a database error
    /// if the cancellation went through but the order could not be updated
    pub async fn cancel_subscription(&self, request: &CancelRequest) -> AppResult<()> {
        self.payments
            .cancel_subscription(&request.pi)
            .await
            .inspect_err(|e| error!(order.id = request.id, "Cancellation failed: {e}"))?;
        self.log_payment("cancel_subscription", &request.pi, true);

        self.database
            .update_order_status(request.id, OrderStatus::Cancelled)
            .await
            .map_err(|e| {
                error!(order.id = request.id, "Cancelled order could not be updated: {e}");
                AppError::database(
                    "the subscription was cancelled, but the database could not be updated",
                )
                .with_source(e)
            })
    }

    async fn send_invoice(&self, invoice: Invoice) {
        if let Err(e) = self.invoices.send_invoice(&invoice).await {
            error!(order.id = invoice.id, "Invoice was not sent: {e}");
        }
    }

    fn log_payment(&self, operation: &str, reference: &str, success: bool) {
        AppLogger::log_payment_event(self.payments.name(), operation, reference, success);
    }
}
