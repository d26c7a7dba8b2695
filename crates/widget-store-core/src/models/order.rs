// ABOUTME: Order, transaction and customer models with their status enums
// ABOUTME: Status enums map onto the fixed ids seeded in the status tables

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Widget;
use crate::constants::{order_status, transaction_status};

/// Lifecycle state of a card transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    Pending,
    Cleared,
    Declined,
    Refunded,
    PartiallyRefunded,
}

impl TransactionStatus {
    /// Id of this status in `transaction_statuses`
    #[must_use]
    pub const fn id(self) -> i64 {
        match self {
            Self::Pending => transaction_status::PENDING,
            Self::Cleared => transaction_status::CLEARED,
            Self::Declined => transaction_status::DECLINED,
            Self::Refunded => transaction_status::REFUNDED,
            Self::PartiallyRefunded => transaction_status::PARTIALLY_REFUNDED,
        }
    }

    /// Display name stored in `transaction_statuses`
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Cleared => "Cleared",
            Self::Declined => "Declined",
            Self::Refunded => "Refunded",
            Self::PartiallyRefunded => "Partially refunded",
        }
    }

    /// All statuses in id order
    pub const ALL: [Self; 5] = [
        Self::Pending,
        Self::Cleared,
        Self::Declined,
        Self::Refunded,
        Self::PartiallyRefunded,
    ];
}

/// State of an order as shown in the admin dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Cleared,
    Refunded,
    Cancelled,
}

impl OrderStatus {
    /// Id of this status in `statuses`
    #[must_use]
    pub const fn id(self) -> i64 {
        match self {
            Self::Cleared => order_status::CLEARED,
            Self::Refunded => order_status::REFUNDED,
            Self::Cancelled => order_status::CANCELLED,
        }
    }

    /// Display name stored in `statuses`
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Cleared => "Cleared",
            Self::Refunded => "Refunded",
            Self::Cancelled => "Cancelled",
        }
    }

    /// Status for a stored id
    #[must_use]
    pub const fn from_id(id: i64) -> Option<Self> {
        match id {
            order_status::CLEARED => Some(Self::Cleared),
            order_status::REFUNDED => Some(Self::Refunded),
            order_status::CANCELLED => Some(Self::Cancelled),
            _ => None,
        }
    }

    /// All statuses in id order
    pub const ALL: [Self; 3] = [Self::Cleared, Self::Refunded, Self::Cancelled];
}

/// A person who bought or subscribed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(skip)]
    pub created_at: DateTime<Utc>,
    #[serde(skip)]
    pub updated_at: DateTime<Utc>,
}

/// Customer fields captured at checkout
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCustomer {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

/// A card transaction as recorded after the processor accepted it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub amount: i64,
    pub currency: String,
    pub last_four: String,
    pub bank_return_code: String,
    pub transaction_status_id: i64,
    pub expiry_month: i64,
    pub expiry_year: i64,
    pub payment_intent: String,
    pub payment_method: String,
    #[serde(skip)]
    pub created_at: DateTime<Utc>,
    #[serde(skip)]
    pub updated_at: DateTime<Utc>,
}

/// Transaction fields to insert
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTransaction {
    pub amount: i64,
    pub currency: String,
    pub last_four: String,
    pub bank_return_code: String,
    pub transaction_status_id: i64,
    pub expiry_month: i64,
    pub expiry_year: i64,
    pub payment_intent: String,
    pub payment_method: String,
}

/// An order with the widget, transaction and customer it references
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: i64,
    pub widget_id: i64,
    pub transaction_id: i64,
    pub customer_id: i64,
    pub status_id: i64,
    pub quantity: i64,
    pub amount: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub widget: Widget,
    pub transaction: Transaction,
    pub customer: Customer,
}

impl Order {
    /// Decoded order status, `None` for ids outside the seeded table
    #[must_use]
    pub const fn status(&self) -> Option<OrderStatus> {
        OrderStatus::from_id(self.status_id)
    }
}

/// Order fields to insert
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewOrder {
    pub widget_id: i64,
    pub transaction_id: i64,
    pub customer_id: i64,
    pub status_id: i64,
    pub quantity: i64,
    pub amount: i64,
}
