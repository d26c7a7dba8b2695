// ABOUTME: Widget catalogue database operations
// ABOUTME: Looks up products and subscription plans and adds new ones

use chrono::Utc;
use sqlx::Row;
use widget_store_core::errors::{AppError, AppResult};
use widget_store_core::models::{NewWidget, Widget};

use super::{timed, Database};

impl Database {
    pub(super) async fn migrate_widgets(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS widgets (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                description TEXT NOT NULL DEFAULT '',
                inventory_level INTEGER NOT NULL DEFAULT 0,
                price INTEGER NOT NULL,
                image TEXT NOT NULL DEFAULT '',
                is_recurring BOOLEAN NOT NULL DEFAULT 0,
                plan_id TEXT NOT NULL DEFAULT '',
                created_at DATETIME NOT NULL,
                updated_at DATETIME NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Get a widget by id
    ///
    /// # Errors
    ///
    /// Returns `RESOURCE_NOT_FOUND` if no widget has this id
    pub async fn get_widget(&self, id: i64) -> AppResult<Widget> {
        timed("get_widget", async {
            let row = sqlx::query(
                r"
                SELECT id, name, description, inventory_level, price, image,
                       is_recurring, plan_id, created_at, updated_at
                FROM widgets WHERE id = $1
                ",
            )
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

            row.map(|row| Self::row_to_widget(&row, ""))
                .transpose()?
                .ok_or_else(|| AppError::not_found(format!("Widget {id}")))
        })
        .await
    }

    /// Add a widget to the catalogue, returning its id
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails
    pub async fn create_widget(&self, widget: &NewWidget) -> AppResult<i64> {
        timed("create_widget", async {
            let now = Utc::now();
            let result = sqlx::query(
                r"
                INSERT INTO widgets (name, description, inventory_level, price, image,
                                     is_recurring, plan_id, created_at, updated_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
                ",
            )
            .bind(&widget.name)
            .bind(&widget.description)
            .bind(widget.inventory_level)
            .bind(widget.price)
            .bind(&widget.image)
            .bind(widget.is_recurring)
            .bind(&widget.plan_id)
            .bind(now)
            .bind(now)
            .execute(&self.pool)
            .await?;

            Ok(result.last_insert_rowid())
        })
        .await
    }

    /// Map a widget row; `prefix` selects aliased columns in joined queries
    pub(super) fn row_to_widget(row: &sqlx::sqlite::SqliteRow, prefix: &str) -> AppResult<Widget> {
        let col = |name: &str| format!("{prefix}{name}");
        Ok(Widget {
            id: row.try_get(col("id").as_str())?,
            name: row.try_get(col("name").as_str())?,
            description: row.try_get(col("description").as_str())?,
            inventory_level: row.try_get(col("inventory_level").as_str())?,
            price: row.try_get(col("price").as_str())?,
            image: row.try_get(col("image").as_str())?,
            is_recurring: row.try_get(col("is_recurring").as_str())?,
            plan_id: row.try_get(col("plan_id").as_str())?,
            created_at: row.try_get(col("created_at").as_str())?,
            updated_at: row.try_get(col("updated_at").as_str())?,
        })
    }
}
