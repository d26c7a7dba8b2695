// ABOUTME: Shared HTTP client utilities with connection pooling and timeout configuration
// ABOUTME: Used by the Stripe client and the invoice service client

use std::sync::OnceLock;
use std::time::Duration;

use reqwest::{Client, ClientBuilder};

/// Global shared HTTP client with default configuration
static SHARED_CLIENT: OnceLock<Client> = OnceLock::new();

/// Get or create the shared HTTP client with default settings
///
/// This client uses connection pooling and reasonable timeouts.
/// Prefer this over creating new clients.
pub fn shared_client() -> &'static Client {
    SHARED_CLIENT.get_or_init(|| create_client_with_timeout(30, 10))
}

/// Create a new HTTP client with custom timeout settings
///
/// Falls back to a default client if the builder fails.
#[must_use]
pub fn create_client_with_timeout(timeout_secs: u64, connect_timeout_secs: u64) -> Client {
    ClientBuilder::new()
        .timeout(Duration::from_secs(timeout_secs))
        .connect_timeout(Duration::from_secs(connect_timeout_secs))
        .build()
        .unwrap_or_else(|_| Client::new())
}

/// Client for payment processor calls
#[must_use]
pub fn payment_client() -> Client {
    create_client_with_timeout(20, 5)
}
