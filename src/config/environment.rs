// ABOUTME: Environment configuration management for deployment-specific settings
// ABOUTME: Parses ports, database url, Stripe credentials, secrets and service urls from env vars
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Environment-based configuration management

use std::env;
use std::fmt;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use widget_store_core::constants::{auth, ports};

/// Default SQLite database location
const DEFAULT_DATABASE_URL: &str = "sqlite:./data/widgets.db";
/// Default Stripe REST base
const DEFAULT_STRIPE_API_BASE: &str = "https://api.stripe.com/v1";
/// Default storefront used to build links in outgoing mail
const DEFAULT_FRONTEND_URL: &str = "http://localhost:4000";
/// Default invoice microservice endpoint
const DEFAULT_INVOICE_SERVICE_URL: &str = "http://localhost:5000/invoice/create-and-send";
/// Default sender of outgoing mail
const DEFAULT_MAIL_FROM: &str = "info@widgets.local";
/// Required length of `SECRET_KEY` in bytes
pub const SECRET_KEY_LENGTH: usize = 32;

/// Deployment mode
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
    Maintenance,
}

impl Environment {
    /// Parse from string with fallback
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            "maintenance" => Self::Maintenance,
            _ => Self::Development,
        }
    }

    /// Check if this is a production environment
    #[must_use]
    pub const fn is_production(self) -> bool {
        matches!(self, Self::Production)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
            Self::Maintenance => write!(f, "maintenance"),
        }
    }
}

/// Type-safe database location
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DatabaseUrl {
    /// SQLite file, stored as the full sqlx url
    SQLite { url: String },
    /// Private in-memory SQLite database
    Memory,
}

impl DatabaseUrl {
    /// Parse a sqlx SQLite url
    ///
    /// # Errors
    ///
    /// Returns an error for anything that is not a `sqlite:` url
    pub fn parse_url(s: &str) -> Result<Self> {
        if s == "sqlite::memory:" || s == ":memory:" {
            return Ok(Self::Memory);
        }
        if s.starts_with("sqlite:") {
            return Ok(Self::SQLite { url: s.to_owned() });
        }
        Err(anyhow::anyhow!(
            "Unsupported DATABASE_URL '{s}': only sqlite urls are supported"
        ))
    }

    /// Url handed to sqlx
    #[must_use]
    pub fn to_connection_string(&self) -> String {
        match self {
            Self::SQLite { url } => url.clone(),
            Self::Memory => "sqlite::memory:".to_owned(),
        }
    }

    /// Check if this is an in-memory database
    #[must_use]
    pub const fn is_memory(&self) -> bool {
        matches!(self, Self::Memory)
    }
}

impl Default for DatabaseUrl {
    fn default() -> Self {
        Self::SQLite {
            url: DEFAULT_DATABASE_URL.to_owned(),
        }
    }
}

/// Payment processor credentials
#[derive(Debug, Clone, Default)]
pub struct StripeConfig {
    /// Publishable key, handed to the storefront
    pub key: String,
    /// Secret key used for API calls
    pub secret: String,
    /// REST api base url
    pub api_base: String,
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// API listen port
    pub http_port: u16,
    /// Invoice microservice listen port
    pub invoice_port: u16,
    /// Deployment mode
    pub environment: Environment,
    /// Database location
    pub database: DatabaseUrl,
    /// Payment processor credentials
    pub stripe: StripeConfig,
    /// Key for signing reset links and encrypting emails
    pub secret_key: [u8; SECRET_KEY_LENGTH],
    /// Base url of the storefront
    pub frontend_url: String,
    /// Invoice microservice endpoint
    pub invoice_service_url: String,
    /// Authentication token lifetime
    pub token_ttl_hours: i64,
    /// Sender of outgoing mail
    pub mail_from: String,
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if a variable fails to parse or `SECRET_KEY` is missing
    pub fn from_env() -> Result<Self> {
        info!("Loading configuration from environment variables");

        let secret = env::var("SECRET_KEY").context("SECRET_KEY must be set")?;

        let config = Self {
            http_port: env_var_or("HTTP_PORT", &ports::DEFAULT_HTTP_PORT.to_string())
                .parse()
                .context("Invalid HTTP_PORT value")?,
            invoice_port: env_var_or("INVOICE_PORT", &ports::DEFAULT_INVOICE_PORT.to_string())
                .parse()
                .context("Invalid INVOICE_PORT value")?,
            environment: Environment::from_str_or_default(&env_var_or(
                "ENVIRONMENT",
                "development",
            )),
            database: DatabaseUrl::parse_url(&env_var_or("DATABASE_URL", DEFAULT_DATABASE_URL))?,
            stripe: StripeConfig {
                key: env_var_or("STRIPE_KEY", ""),
                secret: env_var_or("STRIPE_SECRET", ""),
                api_base: env_var_or("STRIPE_API_BASE", DEFAULT_STRIPE_API_BASE),
            },
            secret_key: parse_secret_key(&secret)?,
            frontend_url: env_var_or("FRONTEND_URL", DEFAULT_FRONTEND_URL),
            invoice_service_url: env_var_or("INVOICE_SERVICE_URL", DEFAULT_INVOICE_SERVICE_URL),
            token_ttl_hours: env_var_or(
                "TOKEN_TTL_HOURS",
                &auth::DEFAULT_TOKEN_TTL_HOURS.to_string(),
            )
            .parse()
            .context("Invalid TOKEN_TTL_HOURS value")?,
            mail_from: env_var_or("MAIL_FROM", DEFAULT_MAIL_FROM),
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns an error for values that would make the server unusable
    pub fn validate(&self) -> Result<()> {
        if self.http_port == self.invoice_port {
            return Err(anyhow::anyhow!(
                "HTTP_PORT and INVOICE_PORT cannot be the same"
            ));
        }
        if self.token_ttl_hours <= 0 {
            return Err(anyhow::anyhow!("TOKEN_TTL_HOURS must be positive"));
        }
        url::Url::parse(&self.frontend_url).context("Invalid FRONTEND_URL value")?;
        url::Url::parse(&self.invoice_service_url)
            .context("Invalid INVOICE_SERVICE_URL value")?;

        if self.stripe.secret.is_empty() {
            warn!("STRIPE_SECRET is not set; payment requests will be rejected by Stripe");
        }
        Ok(())
    }

    /// Get a summary of the configuration for logging (without secrets)
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "Widget Store Configuration:\n\
             - HTTP Port: {}\n\
             - Invoice Port: {}\n\
             - Environment: {}\n\
             - Database: {}\n\
             - Stripe: {}\n\
             - Frontend: {}\n\
             - Invoice Service: {}\n\
             - Token TTL: {}h",
            self.http_port,
            self.invoice_port,
            self.environment,
            if self.database.is_memory() {
                "SQLite (memory)"
            } else {
                "SQLite"
            },
            if self.stripe.secret.is_empty() {
                "Not configured"
            } else {
                "Configured"
            },
            self.frontend_url,
            self.invoice_service_url,
            self.token_ttl_hours,
        )
    }
}

/// Get environment variable or default value
pub fn env_var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_owned())
}

/// `SECRET_KEY` must be exactly 32 bytes
fn parse_secret_key(value: &str) -> Result<[u8; SECRET_KEY_LENGTH]> {
    value.as_bytes().try_into().map_err(|_| {
        anyhow::anyhow!(
            "SECRET_KEY must be exactly {SECRET_KEY_LENGTH} bytes, got {}",
            value.len()
        )
    })
}
