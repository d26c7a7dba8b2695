// ABOUTME: Shared server resources handed to every request handler
// ABOUTME: Bundles the database, payment provider, invoice sender, mailer, crypto and config
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;

use crate::config::ServerConfig;
use crate::crypto::{Encryption, UrlSigner};
use crate::database::Database;
use crate::invoice::InvoiceSender;
use crate::mailer::Mailer;
use crate::payments::PaymentProvider;
use crate::services::CheckoutService;

/// Everything a handler may need, created once at startup
pub struct ServerResources {
    pub database: Database,
    pub payments: Arc<dyn PaymentProvider>,
    pub invoices: Arc<dyn InvoiceSender>,
    pub mailer: Arc<dyn Mailer>,
    pub signer: UrlSigner,
    pub encryption: Encryption,
    pub config: Arc<ServerConfig>,
}

impl ServerResources {
    /// Assemble resources; signing and encryption are keyed by `config.secret_key`
    #[must_use]
    pub fn new(
        database: Database,
        payments: Arc<dyn PaymentProvider>,
        invoices: Arc<dyn InvoiceSender>,
        mailer: Arc<dyn Mailer>,
        config: Arc<ServerConfig>,
    ) -> Self {
        Self {
            database,
            payments,
            invoices,
            mailer,
            signer: UrlSigner::new(&config.secret_key),
            encryption: Encryption::new(config.secret_key),
            config,
        }
    }

    /// Checkout workflows bound to these resources
    #[must_use]
    pub fn checkout(&self) -> CheckoutService<'_> {
        CheckoutService::new(&self.database, self.payments.as_ref(), self.invoices.as_ref())
    }
}
