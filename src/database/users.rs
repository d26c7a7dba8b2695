// ABOUTME: Admin user database operations
// ABOUTME: Handles user lookup, creation, editing, password changes and deletion

use chrono::Utc;
use sqlx::Row;
use widget_store_core::errors::{AppError, AppResult};
use widget_store_core::models::User;

use super::{timed, Database};

const USER_COLUMNS: &str = "id, first_name, last_name, email, password, created_at, updated_at";

impl Database {
    /// Create the users table
    pub(super) async fn migrate_users(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                first_name TEXT NOT NULL,
                last_name TEXT NOT NULL,
                email TEXT UNIQUE NOT NULL,
                password TEXT NOT NULL,
                created_at DATETIME NOT NULL,
                updated_at DATETIME NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_users_email ON users(email)")
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Get user by email, `None` if nobody has this address
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn get_user_by_email(&self, email: &str) -> AppResult<Option<User>> {
        timed("get_user_by_email", async {
            let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1");
            let row = sqlx::query(&sql)
                .bind(email)
                .fetch_optional(&self.pool)
                .await?;

            row.map(|row| Self::row_to_user(&row)).transpose()
        })
        .await
    }

    /// Get user by id
    ///
    /// # Errors
    ///
    /// Returns `RESOURCE_NOT_FOUND` if no user has this id
    pub async fn get_user(&self, id: i64) -> AppResult<User> {
        timed("get_user", async {
            let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
            let row = sqlx::query(&sql)
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

            row.map(|row| Self::row_to_user(&row))
                .transpose()?
                .ok_or_else(|| AppError::not_found(format!("User {id}")))
        })
        .await
    }

    /// All users ordered by last name, then first name
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn all_users(&self) -> AppResult<Vec<User>> {
        timed("all_users", async {
            let sql = format!("SELECT {USER_COLUMNS} FROM users ORDER BY last_name, first_name");
            let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;
            rows.iter().map(Self::row_to_user).collect()
        })
        .await
    }

    /// Insert a user with an already hashed password, returning its id
    ///
    /// # Errors
    ///
    /// Returns `RESOURCE_ALREADY_EXISTS` if the email is taken
    pub async fn add_user(&self, user: &User, password_hash: &str) -> AppResult<i64> {
        timed("add_user", async {
            let now = Utc::now();
            let result = sqlx::query(
                r"
                INSERT INTO users (first_name, last_name, email, password, created_at, updated_at)
                VALUES ($1, $2, $3, $4, $5, $6)
                ",
            )
            .bind(&user.first_name)
            .bind(&user.last_name)
            .bind(&user.email)
            .bind(password_hash)
            .bind(now)
            .bind(now)
            .execute(&self.pool)
            .await?;

            Ok(result.last_insert_rowid())
        })
        .await
    }

    /// Update name and email of `user.id`; the password is left untouched
    ///
    /// # Errors
    ///
    /// Returns `RESOURCE_NOT_FOUND` if the user does not exist or
    /// `RESOURCE_ALREADY_EXISTS` if the new email is taken
    pub async fn edit_user(&self, user: &User) -> AppResult<()> {
        timed("edit_user", async {
            let result = sqlx::query(
                r"
                UPDATE users SET first_name = $1, last_name = $2, email = $3, updated_at = $4
                WHERE id = $5
                ",
            )
            .bind(&user.first_name)
            .bind(&user.last_name)
            .bind(&user.email)
            .bind(Utc::now())
            .bind(user.id)
            .execute(&self.pool)
            .await?;

            if result.rows_affected() == 0 {
                return Err(AppError::not_found(format!("User {}", user.id)));
            }
            Ok(())
        })
        .await
    }

    /// Replace the stored bcrypt hash of a user
    ///
    /// # Errors
    ///
    /// Returns `RESOURCE_NOT_FOUND` if the user does not exist
    pub async fn update_password(&self, user_id: i64, password_hash: &str) -> AppResult<()> {
        timed("update_password", async {
            let result =
                sqlx::query("UPDATE users SET password = $1, updated_at = $2 WHERE id = $3")
                    .bind(password_hash)
                    .bind(Utc::now())
                    .bind(user_id)
                    .execute(&self.pool)
                    .await?;

            if result.rows_affected() == 0 {
                return Err(AppError::not_found(format!("User {user_id}")));
            }
            Ok(())
        })
        .await
    }

    /// Delete a user together with every token issued to them
    ///
    /// # Errors
    ///
    /// Returns an error if either delete fails
    pub async fn delete_user(&self, id: i64) -> AppResult<()> {
        timed("delete_user", async {
            let mut tx = self.pool.begin().await?;

            sqlx::query("DELETE FROM tokens WHERE user_id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?;

            sqlx::query("DELETE FROM users WHERE id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?;

            tx.commit().await?;
            Ok(())
        })
        .await
    }

    pub(super) fn row_to_user(row: &sqlx::sqlite::SqliteRow) -> AppResult<User> {
        Ok(User {
            id: row.try_get("id")?,
            first_name: row.try_get("first_name")?,
            last_name: row.try_get("last_name")?,
            email: row.try_get("email")?,
            password: row.try_get("password")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}
