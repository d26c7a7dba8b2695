// ABOUTME: Core data models for the Widget Store backend
// ABOUTME: Re-exports widgets, orders, transactions, customers, users and tokens
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Data Models
//!
//! Plain relational rows. Referential integrity is enforced by the database;
//! the only logic kept here is the mapping between status enums and their
//! fixed table ids.

// Domain modules
mod order;
mod user;
mod widget;

// Widget domain
pub use widget::{NewWidget, Widget};

// Order domain
pub use order::{
    Customer, NewCustomer, NewOrder, NewTransaction, Order, OrderStatus, Transaction,
    TransactionStatus,
};

// User domain
pub use user::{Token, User};
