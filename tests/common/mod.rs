// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: Provides in-memory databases, mock-backed server resources, seed data and login helpers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::missing_panics_doc,
    clippy::must_use_candidate
)]
//! Shared test utilities for `widget_store`

use std::sync::{Arc, Once};

use axum::Router;
use chrono::Utc;
use serde_json::{json, Value};
use widget_store::{
    auth::hash_password,
    config::{DatabaseUrl, Environment, ServerConfig, StripeConfig},
    database::Database,
    models::{NewCustomer, NewOrder, NewTransaction, NewWidget, OrderStatus, TransactionStatus, User},
    resources::ServerResources,
    routes::WidgetStoreRoutes,
};

use crate::helpers::axum_test::AxumTestRequest;
use crate::helpers::mocks::{MockPaymentProvider, RecordingInvoiceSender, RecordingMailer};

static INIT_LOGGER: Once = Once::new();

/// Password of every seeded administrator
pub const ADMIN_PASSWORD: &str = "password";

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            Ok("WARN" | "ERROR") | _ => tracing::Level::WARN,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

/// Standard test database setup
pub async fn create_test_database() -> Database {
    init_test_logging();
    Database::new("sqlite::memory:").await.unwrap()
}

/// Configuration with a fixed key and no external services
pub fn test_config() -> ServerConfig {
    ServerConfig {
        http_port: 4001,
        invoice_port: 5000,
        environment: Environment::Development,
        database: DatabaseUrl::Memory,
        stripe: StripeConfig {
            key: "pk_test".to_owned(),
            secret: "sk_test".to_owned(),
            api_base: "http://127.0.0.1:9/v1".to_owned(),
        },
        secret_key: [7u8; 32],
        frontend_url: "http://localhost:4000".to_owned(),
        invoice_service_url: "http://127.0.0.1:9/invoice/create-and-send".to_owned(),
        token_ttl_hours: 24,
        mail_from: "info@widgets.local".to_owned(),
    }
}

/// Server resources backed by mocks, with handles to inspect them
pub struct TestServer {
    pub resources: Arc<ServerResources>,
    pub payments: Arc<MockPaymentProvider>,
    pub invoices: Arc<RecordingInvoiceSender>,
    pub mailer: Arc<RecordingMailer>,
}

impl TestServer {
    pub async fn new() -> Self {
        let database = create_test_database().await;
        let payments = Arc::new(MockPaymentProvider::new());
        let invoices = Arc::new(RecordingInvoiceSender::new());
        let mailer = Arc::new(RecordingMailer::new());

        let resources = Arc::new(ServerResources::new(
            database,
            payments.clone(),
            invoices.clone(),
            mailer.clone(),
            Arc::new(test_config()),
        ));

        Self {
            resources,
            payments,
            invoices,
            mailer,
        }
    }

    /// Complete API router over these resources
    pub fn router(&self) -> Router {
        WidgetStoreRoutes::routes(self.resources.clone())
    }

    pub fn database(&self) -> &Database {
        &self.resources.database
    }

    /// Log in through the API and return the bearer token
    pub async fn login(&self, email: &str, password: &str) -> String {
        let response: Value = AxumTestRequest::post("/api/authenticate")
            .json(&json!({ "email": email, "password": password }))
            .send(self.router())
            .await
            .assert_status(axum::http::StatusCode::OK)
            .json();
        response["authentication_token"]["token"]
            .as_str()
            .unwrap()
            .to_owned()
    }

    /// Seed an administrator and log in as them
    pub async fn admin_token(&self) -> String {
        create_admin(self.database(), "admin@example.com").await;
        self.login("admin@example.com", ADMIN_PASSWORD).await
    }
}

/// One-off widget priced at 1000 cents
pub async fn create_widget(database: &Database) -> i64 {
    database
        .create_widget(&NewWidget {
            name: "Widget".to_owned(),
            description: "A very nice widget.".to_owned(),
            inventory_level: 10,
            price: 1000,
            image: "widget.png".to_owned(),
            is_recurring: false,
            plan_id: String::new(),
        })
        .await
        .unwrap()
}

/// Recurring widget subscribing customers to the bronze plan
pub async fn create_bronze_plan(database: &Database) -> i64 {
    database
        .create_widget(&NewWidget {
            name: "Bronze Plan".to_owned(),
            description: "Get three widgets for the price of two every month".to_owned(),
            inventory_level: 0,
            price: 2000,
            image: String::new(),
            is_recurring: true,
            plan_id: "price_bronze".to_owned(),
        })
        .await
        .unwrap()
}

/// Administrator with [`ADMIN_PASSWORD`]
pub async fn create_admin(database: &Database, email: &str) -> i64 {
    let hash = hash_password(ADMIN_PASSWORD).await.unwrap();
    let user = User {
        id: 0,
        first_name: "Admin".to_owned(),
        last_name: "User".to_owned(),
        email: email.to_owned(),
        password: String::new(),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    };
    database.add_user(&user, &hash).await.unwrap()
}

/// Cleared order of `widget_id` with its customer and transaction
pub async fn create_order(database: &Database, widget_id: i64, payment_intent: &str) -> i64 {
    let customer_id = database
        .insert_customer(&NewCustomer {
            first_name: "Ada".to_owned(),
            last_name: "Lovelace".to_owned(),
            email: "ada@example.com".to_owned(),
        })
        .await
        .unwrap();
    let transaction_id = database
        .insert_transaction(&NewTransaction {
            amount: 1000,
            currency: "cad".to_owned(),
            last_four: "4242".to_owned(),
            bank_return_code: "ch_1".to_owned(),
            transaction_status_id: TransactionStatus::Cleared.id(),
            expiry_month: 12,
            expiry_year: 2030,
            payment_intent: payment_intent.to_owned(),
            payment_method: "pm_1".to_owned(),
        })
        .await
        .unwrap();
    database
        .insert_order(&NewOrder {
            widget_id,
            transaction_id,
            customer_id,
            status_id: OrderStatus::Cleared.id(),
            quantity: 1,
            amount: 1000,
        })
        .await
        .unwrap()
}
