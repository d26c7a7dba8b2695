// ABOUTME: Card transaction database operations
// ABOUTME: Stores what the payment processor reported for each charge or subscription

use chrono::Utc;
use sqlx::Row;
use widget_store_core::errors::{AppError, AppResult};
use widget_store_core::models::{NewTransaction, Transaction};

use super::{timed, Database};

impl Database {
    pub(super) async fn migrate_transactions(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS transactions (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                amount INTEGER NOT NULL,
                currency TEXT NOT NULL,
                last_four TEXT NOT NULL DEFAULT '',
                bank_return_code TEXT NOT NULL DEFAULT '',
                transaction_status_id INTEGER NOT NULL REFERENCES transaction_statuses(id),
                expiry_month INTEGER NOT NULL DEFAULT 0,
                expiry_year INTEGER NOT NULL DEFAULT 0,
                payment_intent TEXT NOT NULL DEFAULT '',
                payment_method TEXT NOT NULL DEFAULT '',
                created_at DATETIME NOT NULL,
                updated_at DATETIME NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Insert a transaction, returning its id
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails, including an unknown status id
    pub async fn insert_transaction(&self, txn: &NewTransaction) -> AppResult<i64> {
        timed("insert_transaction", async {
            let now = Utc::now();
            let result = sqlx::query(
                r"
                INSERT INTO transactions (amount, currency, last_four, bank_return_code,
                                          transaction_status_id, expiry_month, expiry_year,
                                          payment_intent, payment_method, created_at, updated_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
                ",
            )
            .bind(txn.amount)
            .bind(&txn.currency)
            .bind(&txn.last_four)
            .bind(&txn.bank_return_code)
            .bind(txn.transaction_status_id)
            .bind(txn.expiry_month)
            .bind(txn.expiry_year)
            .bind(&txn.payment_intent)
            .bind(&txn.payment_method)
            .bind(now)
            .bind(now)
            .execute(&self.pool)
            .await?;

            Ok(result.last_insert_rowid())
        })
        .await
    }

    /// Get a transaction by id
    ///
    /// # Errors
    ///
    /// Returns `RESOURCE_NOT_FOUND` if no transaction has this id
    pub async fn get_transaction(&self, id: i64) -> AppResult<Transaction> {
        timed("get_transaction", async {
            let row = sqlx::query(
                r"
                SELECT id, amount, currency, last_four, bank_return_code, transaction_status_id,
                       expiry_month, expiry_year, payment_intent, payment_method,
                       created_at, updated_at
                FROM transactions WHERE id = $1
                ",
            )
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

            row.map(|row| Self::row_to_transaction(&row, ""))
                .transpose()?
                .ok_or_else(|| AppError::not_found(format!("Transaction {id}")))
        })
        .await
    }

    pub(super) fn row_to_transaction(
        row: &sqlx::sqlite::SqliteRow,
        prefix: &str,
    ) -> AppResult<Transaction> {
        let col = |name: &str| format!("{prefix}{name}");
        Ok(Transaction {
            id: row.try_get(col("id").as_str())?,
            amount: row.try_get(col("amount").as_str())?,
            currency: row.try_get(col("currency").as_str())?,
            last_four: row.try_get(col("last_four").as_str())?,
            bank_return_code: row.try_get(col("bank_return_code").as_str())?,
            transaction_status_id: row.try_get(col("transaction_status_id").as_str())?,
            expiry_month: row.try_get(col("expiry_month").as_str())?,
            expiry_year: row.try_get(col("expiry_year").as_str())?,
            payment_intent: row.try_get(col("payment_intent").as_str())?,
            payment_method: row.try_get(col("payment_method").as_str())?,
            created_at: row.try_get(col("created_at").as_str())?,
            updated_at: row.try_get(col("updated_at").as_str())?,
        })
    }
}
