// ABOUTME: Integration tests for environment-driven server configuration
// ABOUTME: Mutates process env vars, so every test runs serially
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use std::env;

use serial_test::serial;
use widget_store::config::{DatabaseUrl, Environment, ServerConfig};

const VARS: [&str; 12] = [
    "HTTP_PORT",
    "INVOICE_PORT",
    "ENVIRONMENT",
    "DATABASE_URL",
    "STRIPE_KEY",
    "STRIPE_SECRET",
    "STRIPE_API_BASE",
    "SECRET_KEY",
    "FRONTEND_URL",
    "INVOICE_SERVICE_URL",
    "TOKEN_TTL_HOURS",
    "MAIL_FROM",
];

const SECRET: &str = "abcdefghijklmnopqrstuvwxyz012345";

fn clear_env() {
    for var in VARS {
        env::remove_var(var);
    }
}

#[test]
#[serial]
fn test_defaults() {
    clear_env();
    env::set_var("SECRET_KEY", SECRET);

    let config = ServerConfig::from_env().unwrap();
    assert_eq!(config.http_port, 4001);
    assert_eq!(config.invoice_port, 5000);
    assert_eq!(config.environment, Environment::Development);
    assert_eq!(
        config.database.to_connection_string(),
        "sqlite:./data/widgets.db"
    );
    assert_eq!(config.stripe.api_base, "https://api.stripe.com/v1");
    assert_eq!(&config.secret_key, SECRET.as_bytes());
    assert_eq!(config.frontend_url, "http://localhost:4000");
    assert_eq!(
        config.invoice_service_url,
        "http://localhost:5000/invoice/create-and-send"
    );
    assert_eq!(config.token_ttl_hours, 24);
    assert_eq!(config.mail_from, "info@widgets.local");
}

#[test]
#[serial]
fn test_overrides() {
    clear_env();
    env::set_var("SECRET_KEY", SECRET);
    env::set_var("HTTP_PORT", "8080");
    env::set_var("ENVIRONMENT", "production");
    env::set_var("DATABASE_URL", "sqlite::memory:");
    env::set_var("STRIPE_SECRET", "sk_live");
    env::set_var("TOKEN_TTL_HOURS", "2");

    let config = ServerConfig::from_env().unwrap();
    assert_eq!(config.http_port, 8080);
    assert!(config.environment.is_production());
    assert_eq!(config.database, DatabaseUrl::Memory);
    assert_eq!(config.stripe.secret, "sk_live");
    assert_eq!(config.token_ttl_hours, 2);

    let summary = config.summary();
    assert!(summary.contains("8080"));
    assert!(!summary.contains("sk_live"));
    assert!(!summary.contains(SECRET));
    clear_env();
}

#[test]
#[serial]
fn test_secret_key_is_required() {
    clear_env();
    assert!(ServerConfig::from_env().is_err());

    env::set_var("SECRET_KEY", "short");
    assert!(ServerConfig::from_env().is_err());
    clear_env();
}

#[test]
#[serial]
fn test_invalid_values_are_rejected() {
    clear_env();
    env::set_var("SECRET_KEY", SECRET);

    env::set_var("HTTP_PORT", "not-a-port");
    assert!(ServerConfig::from_env().is_err());
    env::remove_var("HTTP_PORT");

    env::set_var("INVOICE_PORT", "4001");
    assert!(ServerConfig::from_env().is_err());
    env::remove_var("INVOICE_PORT");

    env::set_var("TOKEN_TTL_HOURS", "0");
    assert!(ServerConfig::from_env().is_err());
    env::remove_var("TOKEN_TTL_HOURS");

    env::set_var("FRONTEND_URL", "not a url");
    assert!(ServerConfig::from_env().is_err());
    clear_env();
}
