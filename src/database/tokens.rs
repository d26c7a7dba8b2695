// ABOUTME: Authentication token database operations
// ABOUTME: Stores SHA-256 hashes of bearer tokens and resolves tokens back to users

use chrono::Utc;
use widget_store_core::errors::AppResult;
use widget_store_core::models::{Token, User};

use super::{timed, Database};
use crate::auth::hash_token;

impl Database {
    pub(super) async fn migrate_tokens(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS tokens (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                name TEXT NOT NULL,
                email TEXT NOT NULL,
                token_hash TEXT NOT NULL UNIQUE,
                expiry DATETIME NOT NULL,
                created_at DATETIME NOT NULL,
                updated_at DATETIME NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_tokens_user_id ON tokens(user_id)")
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Store `token` for `user`, replacing any token the user already had
    ///
    /// # Errors
    ///
    /// Returns an error if either statement fails
    pub async fn insert_token(&self, token: &Token, user: &User) -> AppResult<()> {
        timed("insert_token", async {
            let mut tx = self.pool.begin().await?;

            sqlx::query("DELETE FROM tokens WHERE user_id = $1")
                .bind(token.user_id)
                .execute(&mut *tx)
                .await?;

            let now = Utc::now();
            sqlx::query(
                r"
                INSERT INTO tokens (user_id, name, email, token_hash, expiry, created_at, updated_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                ",
            )
            .bind(token.user_id)
            .bind(&user.last_name)
            .bind(&user.email)
            .bind(&token.hash)
            .bind(token.expiry)
            .bind(now)
            .bind(now)
            .execute(&mut *tx)
            .await?;

            tx.commit().await?;
            Ok(())
        })
        .await
    }

    /// Resolve a plaintext bearer token to its user; expired tokens resolve to `None`
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn get_user_for_token(&self, plain_text: &str) -> AppResult<Option<User>> {
        let token_hash = hash_token(plain_text);

        timed("get_user_for_token", async {
            let row = sqlx::query(
                r"
                SELECT u.id, u.first_name, u.last_name, u.email, u.password,
                       u.created_at, u.updated_at
                FROM users u
                JOIN tokens t ON t.user_id = u.id
                WHERE t.token_hash = $1 AND t.expiry > $2
                ",
            )
            .bind(&token_hash)
            .bind(Utc::now())
            .fetch_optional(&self.pool)
            .await?;

            row.map(|row| Self::row_to_user(&row)).transpose()
        })
        .await
    }
}
