use std::{future::Future, time::Duration};

use anyhow::Context;
use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{auth::repo_types::User, error::StoreError, watchlist::repo_types::WatchlistEntry};

/// Deadline for the store reads backing the watchlist view.
pub const READ_DEADLINE: Duration = Duration::from_secs(10);
/// Deadline for every other store call.
pub const WRITE_DEADLINE: Duration = Duration::from_secs(5);

/// Persistence for users and their watchlist rows.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn create_user(
        &self,
        name: &str,
        email: &str,
        hashed_password: &str,
    ) -> Result<User, StoreError>;
    async fn user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    async fn add_entry(
        &self,
        user_id: i64,
        movie_id: i64,
        status: &str,
        rating: i32,
    ) -> Result<WatchlistEntry, StoreError>;
    /// Rows for one user, newest first.
    async fn list_entries(&self, user_id: i64) -> Result<Vec<WatchlistEntry>, StoreError>;
    async fn update_entry(
        &self,
        user_id: i64,
        movie_id: i64,
        status: &str,
        rating: i32,
    ) -> Result<(), StoreError>;
    async fn delete_entry(&self, user_id: i64, movie_id: i64) -> Result<(), StoreError>;
}

/// Runs a store call under a deadline.
pub async fn with_deadline<T, F>(deadline: Duration, call: F) -> Result<T, StoreError>
where
    F: Future<Output = Result<T, StoreError>>,
{
    tokio::time::timeout(deadline, call)
        .await
        .map_err(|_| StoreError::Timeout(deadline))?
}

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub async fn connect(database_url: &str) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .min_connections(2)
            .idle_timeout(Duration::from_secs(5 * 60))
            .acquire_timeout(WRITE_DEADLINE)
            .connect(database_url)
            .await
            .context("connect to database")?;
        Ok(Self { pool })
    }

    /// Applies `migrations/`; a failure is logged and start-up continues.
    pub async fn migrate(&self) {
        if let Err(e) = sqlx::migrate!("./migrations").run(&self.pool).await {
            tracing::warn!(error = %e, "migration failed; continuing");
        }
    }
}

fn unique_violation(e: sqlx::Error, msg: &'static str) -> StoreError {
    match e {
        sqlx::Error::Database(ref db) if db.is_unique_violation() => StoreError::Conflict(msg),
        other => StoreError::Database(other),
    }
}

#[async_trait]
impl CredentialStore for PgStore {
    async fn create_user(
        &self,
        name: &str,
        email: &str,
        hashed_password: &str,
    ) -> Result<User, StoreError> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, email, hashed_password)
            VALUES ($1, $2, $3)
            RETURNING id, name, email, hashed_password, created_at
            "#,
        )
        .bind(name)
        .bind(email)
        .bind(hashed_password)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| unique_violation(e, "Email already exists"))
    }

    async fn user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, hashed_password, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn add_entry(
        &self,
        user_id: i64,
        movie_id: i64,
        status: &str,
        rating: i32,
    ) -> Result<WatchlistEntry, StoreError> {
        sqlx::query_as::<_, WatchlistEntry>(
            r#"
            INSERT INTO user_movies (user_id, movie_id, status, user_rating)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, movie_id, status, user_rating, created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(movie_id)
        .bind(status)
        .bind(rating)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| unique_violation(e, "Movie already in watchlist"))
    }

    async fn list_entries(&self, user_id: i64) -> Result<Vec<WatchlistEntry>, StoreError> {
        let rows = sqlx::query_as::<_, WatchlistEntry>(
            r#"
            SELECT id, user_id, movie_id, status, user_rating, created_at, updated_at
            FROM user_movies
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn update_entry(
        &self,
        user_id: i64,
        movie_id: i64,
        status: &str,
        rating: i32,
    ) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            UPDATE user_movies
            SET status = $1, user_rating = $2, updated_at = now()
            WHERE user_id = $3 AND movie_id = $4
            "#,
        )
        .bind(status)
        .bind(rating)
        .bind(user_id)
        .bind(movie_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn delete_entry(&self, user_id: i64, movie_id: i64) -> Result<(), StoreError> {
        sqlx::query(r#"DELETE FROM user_movies WHERE user_id = $1 AND movie_id = $2"#)
            .bind(user_id)
            .bind(movie_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
