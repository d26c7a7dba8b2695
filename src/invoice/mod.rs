// ABOUTME: Invoice payload and the client that hands invoices to the invoice microservice
// ABOUTME: InvoiceSender abstracts the HTTP call so checkout can be exercised without the service
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Invoicing
//!
//! After a successful order the API posts an [`Invoice`] to the sibling
//! `invoice-service` binary, whose router lives in [`service`].

/// Router of the invoice microservice
pub mod service;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{error, info};
use widget_store_core::constants::service_names;
use widget_store_core::errors::{AppError, AppResult};

use crate::utils::http_client::shared_client;

/// Invoice sent after an order or subscription
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invoice {
    /// Order id
    pub id: i64,
    pub widget_id: i64,
    /// Total in cents
    pub amount: i64,
    pub product: String,
    pub quantity: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// Delivers invoices to whatever renders and mails them
#[async_trait]
pub trait InvoiceSender: Send + Sync {
    /// Send one invoice
    async fn send_invoice(&self, invoice: &Invoice) -> AppResult<()>;
}

/// Posts invoices as JSON to the invoice microservice
#[derive(Clone)]
pub struct HttpInvoiceClient {
    client: Client,
    url: String,
}

impl HttpInvoiceClient {
    /// Create a client for the `create-and-send` endpoint at `url`
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: shared_client().clone(),
            url: url.into(),
        }
    }
}

#[async_trait]
impl InvoiceSender for HttpInvoiceClient {
    async fn send_invoice(&self, invoice: &Invoice) -> AppResult<()> {
        let response = self
            .client
            .post(&self.url)
            .json(invoice)
            .send()
            .await
            .map_err(|e| {
                error!(invoice.id = invoice.id, "Invoice service request failed: {e}");
                AppError::external_service(
                    service_names::INVOICE_SERVICE,
                    format!("request failed: {e}"),
                )
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!(invoice.id = invoice.id, "Invoice service returned {status}: {body}");
            return Err(AppError::external_service(
                service_names::INVOICE_SERVICE,
                format!("returned status {status}"),
            ));
        }

        info!(invoice.id = invoice.id, "Invoice handed to invoice service");
        Ok(())
    }
}
