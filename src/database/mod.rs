// ABOUTME: Database management for widgets, orders, transactions, customers, users and tokens
// ABOUTME: Wraps a SQLite pool, runs idempotent migrations and bounds every query with a timeout
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Database Management
//!
//! Operations are grouped per table in the submodules, each adding methods to
//! [`Database`]. Every public operation runs under [`QUERY_TIMEOUT`].

mod customers;
mod orders;
mod tokens;
mod transactions;
mod users;
mod widgets;

use std::future::Future;
use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use tracing::{debug, info};
use widget_store_core::constants::limits::QUERY_TIMEOUT_SECS;
use widget_store_core::errors::{AppError, AppResult};
use widget_store_core::models::{OrderStatus, TransactionStatus};

/// Upper bound for a single database operation
pub const QUERY_TIMEOUT: Duration = Duration::from_secs(QUERY_TIMEOUT_SECS);

/// Database manager for the store
#[derive(Clone)]
pub struct Database {
    pool: Pool<Sqlite>,
}

impl Database {
    /// Open (creating if missing) the database at `database_url` and migrate it
    ///
    /// # Errors
    ///
    /// Returns an error if the url is invalid, the file cannot be created or
    /// a migration fails
    pub async fn new(database_url: &str) -> AppResult<Self> {
        let options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .foreign_keys(true);

        // Every connection to an in-memory url gets its own private database
        let pool = if database_url.contains(":memory:") {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
                .connect_with(options)
                .await?
        } else {
            if let Some(parent) = options.get_filename().parent() {
                if !parent.as_os_str().is_empty() {
                    tokio::fs::create_dir_all(parent).await.map_err(|e| {
                        AppError::database(format!(
                            "Failed to create database directory {}: {e}",
                            parent.display()
                        ))
                    })?;
                }
            }
            SqlitePoolOptions::new().connect_with(options).await?
        };

        let db = Self { pool };
        db.migrate().await?;

        info!("Database ready at {database_url}");
        Ok(db)
    }

    /// Get a reference to the database pool for advanced operations
    #[must_use]
    pub const fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    /// Run database migrations
    ///
    /// # Errors
    ///
    /// Returns an error if any table fails to create
    pub async fn migrate(&self) -> AppResult<()> {
        self.migrate_statuses().await?;
        self.migrate_widgets().await?;
        self.migrate_customers().await?;
        self.migrate_transactions().await?;
        self.migrate_orders().await?;
        self.migrate_users().await?;
        self.migrate_tokens().await?;
        debug!("Database migrations applied");
        Ok(())
    }

    /// Lookup tables for transaction and order statuses, seeded with fixed ids
    async fn migrate_statuses(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS transaction_statuses (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS statuses (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        for status in TransactionStatus::ALL {
            sqlx::query("INSERT OR IGNORE INTO transaction_statuses (id, name) VALUES ($1, $2)")
                .bind(status.id())
                .bind(status.name())
                .execute(&self.pool)
                .await?;
        }

        for status in OrderStatus::ALL {
            sqlx::query("INSERT OR IGNORE INTO statuses (id, name) VALUES ($1, $2)")
                .bind(status.id())
                .bind(status.name())
                .execute(&self.pool)
                .await?;
        }

        Ok(())
    }
}

/// Run `operation`, failing with a database error once [`QUERY_TIMEOUT`] elapses
pub(crate) async fn timed<T, F>(operation: &str, fut: F) -> AppResult<T>
where
    F: Future<Output = AppResult<T>>,
{
    tokio::time::timeout(QUERY_TIMEOUT, fut)
        .await
        .map_err(|_| {
            AppError::database(format!(
                "{operation} timed out after {}s",
                QUERY_TIMEOUT.as_secs()
            ))
        })?
}
