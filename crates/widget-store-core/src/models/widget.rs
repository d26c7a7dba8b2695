// ABOUTME: Widget catalogue model covering one-off products and subscription plans
// ABOUTME: A recurring widget carries the processor plan id it subscribes customers to

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A product that can be sold once or subscribed to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Widget {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub inventory_level: i64,
    /// Price in cents
    pub price: i64,
    pub image: String,
    /// Orders for recurring widgets are listed as subscriptions
    pub is_recurring: bool,
    /// Processor plan id, empty for one-off widgets
    pub plan_id: String,
    #[serde(skip)]
    pub created_at: DateTime<Utc>,
    #[serde(skip)]
    pub updated_at: DateTime<Utc>,
}

/// Fields required to add a widget to the catalogue
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewWidget {
    pub name: String,
    pub description: String,
    pub inventory_level: i64,
    pub price: i64,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub is_recurring: bool,
    #[serde(default)]
    pub plan_id: String,
}
