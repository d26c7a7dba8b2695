// ABOUTME: Customer database operations
// ABOUTME: Records the buyer captured at checkout or subscription time

use chrono::Utc;
use sqlx::Row;
use widget_store_core::errors::AppResult;
use widget_store_core::models::{Customer, NewCustomer};

use super::{timed, Database};

impl Database {
    pub(super) async fn migrate_customers(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS customers (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                first_name TEXT NOT NULL,
                last_name TEXT NOT NULL,
                email TEXT NOT NULL,
                created_at DATETIME NOT NULL,
                updated_at DATETIME NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Insert a customer, returning its id
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails
    pub async fn insert_customer(&self, customer: &NewCustomer) -> AppResult<i64> {
        timed("insert_customer", async {
            let now = Utc::now();
            let result = sqlx::query(
                r"
                INSERT INTO customers (first_name, last_name, email, created_at, updated_at)
                VALUES ($1, $2, $3, $4, $5)
                ",
            )
            .bind(&customer.first_name)
            .bind(&customer.last_name)
            .bind(&customer.email)
            .bind(now)
            .bind(now)
            .execute(&self.pool)
            .await?;

            Ok(result.last_insert_rowid())
        })
        .await
    }

    pub(super) fn row_to_customer(
        row: &sqlx::sqlite::SqliteRow,
        prefix: &str,
    ) -> AppResult<Customer> {
        let col = |name: &str| format!("{prefix}{name}");
        Ok(Customer {
            id: row.try_get(col("id").as_str())?,
            first_name: row.try_get(col("first_name").as_str())?,
            last_name: row.try_get(col("last_name").as_str())?,
            email: row.try_get(col("email").as_str())?,
            created_at: row.try_get(col("created_at").as_str())?,
            updated_at: row.try_get(col("updated_at").as_str())?,
        })
    }
}
