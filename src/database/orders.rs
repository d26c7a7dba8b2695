// ABOUTME: Order database operations including paginated sales and subscription listings
// ABOUTME: Read queries join the widget, transaction and customer of each order

use chrono::Utc;
use sqlx::Row;
use widget_store_core::errors::{AppError, AppResult};
use widget_store_core::models::{NewOrder, Order, OrderStatus};
use widget_store_core::pagination::{Page, PageRequest};

use super::{timed, Database};

/// Columns of an order joined with its widget (`w_`), transaction (`t_`) and customer (`c_`)
const ORDER_COLUMNS: &str = r"
    o.id, o.widget_id, o.transaction_id, o.customer_id, o.status_id, o.quantity, o.amount,
    o.created_at, o.updated_at,
    w.id AS w_id, w.name AS w_name, w.description AS w_description,
    w.inventory_level AS w_inventory_level, w.price AS w_price, w.image AS w_image,
    w.is_recurring AS w_is_recurring, w.plan_id AS w_plan_id,
    w.created_at AS w_created_at, w.updated_at AS w_updated_at,
    t.id AS t_id, t.amount AS t_amount, t.currency AS t_currency, t.last_four AS t_last_four,
    t.bank_return_code AS t_bank_return_code, t.transaction_status_id AS t_transaction_status_id,
    t.expiry_month AS t_expiry_month, t.expiry_year AS t_expiry_year,
    t.payment_intent AS t_payment_intent, t.payment_method AS t_payment_method,
    t.created_at AS t_created_at, t.updated_at AS t_updated_at,
    c.id AS c_id, c.first_name AS c_first_name, c.last_name AS c_last_name,
    c.email AS c_email, c.created_at AS c_created_at, c.updated_at AS c_updated_at
";

const ORDER_JOINS: &str = r"
    FROM orders o
    JOIN widgets w ON o.widget_id = w.id
    JOIN transactions t ON o.transaction_id = t.id
    JOIN customers c ON o.customer_id = c.id
";

impl Database {
    pub(super) async fn migrate_orders(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS orders (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                widget_id INTEGER NOT NULL REFERENCES widgets(id),
                transaction_id INTEGER NOT NULL REFERENCES transactions(id),
                customer_id INTEGER NOT NULL REFERENCES customers(id),
                status_id INTEGER NOT NULL REFERENCES statuses(id),
                quantity INTEGER NOT NULL,
                amount INTEGER NOT NULL,
                created_at DATETIME NOT NULL,
                updated_at DATETIME NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_orders_created_at ON orders(created_at)")
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Insert an order, returning its id
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails or a referenced row does not exist
    pub async fn insert_order(&self, order: &NewOrder) -> AppResult<i64> {
        timed("insert_order", async {
            let now = Utc::now();
            let result = sqlx::query(
                r"
                INSERT INTO orders (widget_id, transaction_id, customer_id, status_id,
                                    quantity, amount, created_at, updated_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                ",
            )
            .bind(order.widget_id)
            .bind(order.transaction_id)
            .bind(order.customer_id)
            .bind(order.status_id)
            .bind(order.quantity)
            .bind(order.amount)
            .bind(now)
            .bind(now)
            .execute(&self.pool)
            .await?;

            Ok(result.last_insert_rowid())
        })
        .await
    }

    /// Get one order with its widget, transaction and customer
    ///
    /// # Errors
    ///
    /// Returns `RESOURCE_NOT_FOUND` if no order has this id
    pub async fn get_order(&self, id: i64) -> AppResult<Order> {
        timed("get_order", async {
            let sql = format!("SELECT {ORDER_COLUMNS} {ORDER_JOINS} WHERE o.id = $1");
            let row = sqlx::query(&sql)
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

            row.map(|row| Self::row_to_order(&row))
                .transpose()?
                .ok_or_else(|| AppError::not_found(format!("Order {id}")))
        })
        .await
    }

    /// One page of orders, newest first
    ///
    /// `recurring` selects subscriptions (`true`) or one-off sales (`false`).
    ///
    /// # Errors
    ///
    /// Returns `INVALID_INPUT` for an out-of-range page request, or a database error
    pub async fn all_orders_paginated(
        &self,
        page: PageRequest,
        recurring: bool,
    ) -> AppResult<Page<Order>> {
        page.validate()?;

        timed("all_orders_paginated", async {
            let total_records: i64 = sqlx::query_scalar(
                r"
                SELECT COUNT(o.id)
                FROM orders o
                JOIN widgets w ON o.widget_id = w.id
                WHERE w.is_recurring = $1
                ",
            )
            .bind(recurring)
            .fetch_one(&self.pool)
            .await?;

            let sql = format!(
                "SELECT {ORDER_COLUMNS} {ORDER_JOINS}
                 WHERE w.is_recurring = $1
                 ORDER BY o.created_at DESC, o.id DESC
                 LIMIT $2 OFFSET $3"
            );
            let rows = sqlx::query(&sql)
                .bind(recurring)
                .bind(page.page_size)
                .bind(page.offset())
                .fetch_all(&self.pool)
                .await?;

            let orders = rows
                .iter()
                .map(Self::row_to_order)
                .collect::<AppResult<Vec<_>>>()?;

            Ok(Page::new(page, total_records, orders))
        })
        .await
    }

    /// Set the status of an order
    ///
    /// # Errors
    ///
    /// Returns `RESOURCE_NOT_FOUND` if no order has this id
    pub async fn update_order_status(&self, id: i64, status: OrderStatus) -> AppResult<()> {
        timed("update_order_status", async {
            let result =
                sqlx::query("UPDATE orders SET status_id = $1, updated_at = $2 WHERE id = $3")
                    .bind(status.id())
                    .bind(Utc::now())
                    .bind(id)
                    .execute(&self.pool)
                    .await?;

            if result.rows_affected() == 0 {
                return Err(AppError::not_found(format!("Order {id}")));
            }
            Ok(())
        })
        .await
    }

    fn row_to_order(row: &sqlx::sqlite::SqliteRow) -> AppResult<Order> {
        Ok(Order {
            id: row.try_get("id")?,
            widget_id: row.try_get("widget_id")?,
            transaction_id: row.try_get("transaction_id")?,
            customer_id: row.try_get("customer_id")?,
            status_id: row.try_get("status_id")?,
            quantity: row.try_get("quantity")?,
            amount: row.try_get("amount")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
            widget: Self::row_to_widget(row, "w_")?,
            transaction: Self::row_to_transaction(row, "t_")?,
            customer: Self::row_to_customer(row, "c_")?,
        })
    }
}
