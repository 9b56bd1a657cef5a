use sqlx::PgPool;

use crate::auth::repo::User;
use crate::users::dto::{DirectoryEntry, UserUpdate};

impl User {
    /// All users, for the admin listing.
    pub async fn list_all(db: &PgPool) -> anyhow::Result<Vec<User>> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, password_hash, is_admin, created_at
            FROM users
            ORDER BY id
            "#,
        )
        .fetch_all(db)
        .await?;
        Ok(users)
    }

    /// Id + username pairs ordered by name.
    pub async fn directory(db: &PgPool) -> anyhow::Result<Vec<DirectoryEntry>> {
        let entries = sqlx::query_as::<_, DirectoryEntry>(
            "SELECT id, username FROM users ORDER BY username",
        )
        .fetch_all(db)
        .await?;
        Ok(entries)
    }

    /// Apply a partial update; absent fields keep their stored value.
    /// Returns None when no such user exists.
    pub async fn update(
        db: &PgPool,
        id: i64,
        update: &UserUpdate,
    ) -> Result<Option<User>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET username = COALESCE($2, username),
                email = COALESCE($3, email),
                is_admin = COALESCE($4, is_admin)
            WHERE id = $1
            RETURNING id, username, email, password_hash, is_admin, created_at
            "#,
        )
        .bind(id)
        .bind(&update.username)
        .bind(&update.email)
        .bind(update.is_admin)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    /// Delete a user. Returns whether a row was removed.
    pub async fn delete(db: &PgPool, id: i64) -> anyhow::Result<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
