use chrono::Utc;
use clipcast_core::models::{Account, Role};
use clipcast_core::AppError;
use sqlx::{Sqlite, SqlitePool};
use uuid::Uuid;

/// Repository for registered accounts.
#[derive(Clone)]
pub struct AccountRepository {
    pool: SqlitePool,
}

impl AccountRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a new account. A duplicate email maps to `Conflict`.
    pub async fn create(
        &self,
        username: String,
        email: String,
        password_hash: String,
        role: Role,
    ) -> Result<Account, AppError> {
        let result = sqlx::query_as::<Sqlite, Account>(
            r#"
            INSERT INTO accounts (id, username, email, password_hash, role, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&username)
        .bind(&email)
        .bind(&password_hash)
        .bind(role)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(account) => Ok(account),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => Err(AppError::Conflict(
                format!("account with email {} already exists", email),
            )),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<Account>, AppError> {
        let account = sqlx::query_as::<Sqlite, Account>("SELECT * FROM accounts WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(account)
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<Account>, AppError> {
        let account = sqlx::query_as::<Sqlite, Account>("SELECT * FROM accounts WHERE email = ?1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(account)
    }

    pub async fn list(&self) -> Result<Vec<Account>, AppError> {
        let accounts =
            sqlx::query_as::<Sqlite, Account>("SELECT * FROM accounts ORDER BY created_at DESC")
                .fetch_all(&self.pool)
                .await?;
        Ok(accounts)
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM accounts WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
