// ABOUTME: Application constants organized by domain for the Widget Store backend
// ABOUTME: Status ids, plan invoice values, authentication limits and network defaults

//! Constants module
//!
//! Constants are grouped into logical domains rather than being in a single
//! flat namespace.

/// Fixed ids of the `transaction_statuses` table
pub mod transaction_status {
    pub const PENDING: i64 = 1;
    pub const CLEARED: i64 = 2;
    pub const DECLINED: i64 = 3;
    pub const REFUNDED: i64 = 4;
    pub const PARTIALLY_REFUNDED: i64 = 5;
}

/// Fixed ids of the `statuses` (order status) table
pub mod order_status {
    pub const CLEARED: i64 = 1;
    pub const REFUNDED: i64 = 2;
    pub const CANCELLED: i64 = 3;
}

/// Subscription plan constants used when invoicing
pub mod plans {
    /// Amount invoiced for the bronze plan, in cents
    pub const BRONZE_PLAN_AMOUNT: i64 = 2000;
    /// Product line printed on bronze plan invoices
    pub const BRONZE_PLAN_PRODUCT: &str = "Bronze Plan monthly subscription";
    /// Currency used for subscription transactions
    pub const SUBSCRIPTION_CURRENCY: &str = "usd";
}

/// Authentication constants
pub mod auth {
    /// Length of a plaintext bearer token
    pub const TOKEN_LENGTH: usize = 26;
    /// Token scope stored alongside authentication tokens
    pub const SCOPE_AUTHENTICATION: &str = "authentication";
    /// Default token lifetime in hours
    pub const DEFAULT_TOKEN_TTL_HOURS: i64 = 24;
    /// bcrypt work factor for stored passwords
    pub const BCRYPT_COST: u32 = 12;
    /// Minutes a signed password reset link stays valid
    pub const RESET_LINK_TTL_MINUTES: i64 = 60;
}

/// Validation and listing limits
pub mod limits {
    /// Default page size for listing endpoints
    pub const DEFAULT_PAGE_SIZE: i64 = 10;
    /// Maximum page size for listing endpoints
    pub const MAX_PAGE_SIZE: i64 = 100;
    /// Minimum first name length for subscriptions
    pub const MIN_FIRST_NAME_LENGTH: usize = 2;
    /// Per-query timeout in seconds
    pub const QUERY_TIMEOUT_SECS: u64 = 3;
}

/// Network defaults
pub mod ports {
    /// Default HTTP port of the API
    pub const DEFAULT_HTTP_PORT: u16 = 4001;
    /// Default HTTP port of the invoice microservice
    pub const DEFAULT_INVOICE_PORT: u16 = 5000;
}

/// Service names used in logs and error messages
pub mod service_names {
    pub const WIDGET_STORE_API: &str = "widget-store-api";
    pub const INVOICE_SERVICE: &str = "invoice-service";
    pub const STRIPE: &str = "Stripe";
}
