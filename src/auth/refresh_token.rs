/// Refresh Token Management
///
/// A refresh token is an opaque UUID v4 string (122 random bits). Each user
/// owns at most one row in `refresh_tokens`; issuing a new token overwrites
/// the previous one in place.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use sqlx::PgPool;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::auth::jwt::IssuedToken;
use crate::error::{AppError, DatabaseError};

#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct RefreshToken {
    pub id: i64,
    pub user_id: i64,
    pub token: String,
    pub expired_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub created_by: String,
    pub updated_at: DateTime<Utc>,
    pub updated_by: String,
}

impl RefreshToken {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expired_at <= now
    }
}

/// Values written by an upsert; `actor` fills the audit columns.
#[derive(Debug, Clone)]
pub struct NewRefreshToken {
    pub user_id: i64,
    pub token: String,
    pub expired_at: DateTime<Utc>,
    pub actor: String,
}

/// Generate a fresh opaque refresh token valid for `expire_hours`.
pub fn generate_refresh_token(now: DateTime<Utc>, expire_hours: i64) -> IssuedToken {
    IssuedToken {
        value: Uuid::new_v4().to_string(),
        expires_at: now + Duration::hours(expire_hours),
    }
}

#[async_trait]
pub trait RefreshTokenStore: Send + Sync {
    /// Replace the user's token row, creating it on first use.
    async fn upsert(&self, token: NewRefreshToken) -> Result<(), AppError>;

    async fn find_by_token(&self, token: &str) -> Result<Option<RefreshToken>, AppError>;

    async fn find_by_user_id(&self, user_id: i64) -> Result<Option<RefreshToken>, AppError>;
}

pub struct PgRefreshTokenStore {
    pool: PgPool,
}

impl PgRefreshTokenStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const REFRESH_TOKEN_COLUMNS: &str =
    "id, user_id, token, expired_at, created_at, created_by, updated_at, updated_by";

#[async_trait]
impl RefreshTokenStore for PgRefreshTokenStore {
    /// One statement, so concurrent first logins for the same user resolve
    /// on the `user_id` unique index instead of racing.
    async fn upsert(&self, token: NewRefreshToken) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO refresh_tokens
                (user_id, token, expired_at, created_at, created_by, updated_at, updated_by)
            VALUES ($1, $2, $3, $4, $5, $4, $5)
            ON CONFLICT (user_id) DO UPDATE
            SET token = EXCLUDED.token,
                expired_at = EXCLUDED.expired_at,
                updated_at = EXCLUDED.updated_at,
                updated_by = EXCLUDED.updated_by
            "#,
        )
        .bind(token.user_id)
        .bind(&token.token)
        .bind(token.expired_at)
        .bind(Utc::now())
        .bind(&token.actor)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_token(&self, token: &str) -> Result<Option<RefreshToken>, AppError> {
        let row = sqlx::query_as::<_, RefreshToken>(&format!(
            "SELECT {} FROM refresh_tokens WHERE token = $1",
            REFRESH_TOKEN_COLUMNS
        ))
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn find_by_user_id(&self, user_id: i64) -> Result<Option<RefreshToken>, AppError> {
        let row = sqlx::query_as::<_, RefreshToken>(&format!(
            "SELECT {} FROM refresh_tokens WHERE user_id = $1",
            REFRESH_TOKEN_COLUMNS
        ))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }
}

/// In-process store keyed by user id.
#[derive(Default)]
pub struct InMemoryRefreshTokenStore {
    state: RwLock<InMemoryTokens>,
}

#[derive(Default)]
struct InMemoryTokens {
    next_id: i64,
    by_user: HashMap<i64, RefreshToken>,
}

impl InMemoryRefreshTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.state.read().await.by_user.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl RefreshTokenStore for InMemoryRefreshTokenStore {
    async fn upsert(&self, token: NewRefreshToken) -> Result<(), AppError> {
        let mut state = self.state.write().await;

        let taken = state
            .by_user
            .values()
            .any(|row| row.token == token.token && row.user_id != token.user_id);
        if taken {
            return Err(DatabaseError::UniqueConstraintViolation(
                "refresh_tokens.token".to_string(),
            )
            .into());
        }

        let now = Utc::now();
        if let Some(row) = state.by_user.get_mut(&token.user_id) {
            row.token = token.token;
            row.expired_at = token.expired_at;
            row.updated_at = now;
            row.updated_by = token.actor;
            return Ok(());
        }

        state.next_id += 1;
        let row = RefreshToken {
            id: state.next_id,
            user_id: token.user_id,
            token: token.token,
            expired_at: token.expired_at,
            created_at: now,
            created_by: token.actor.clone(),
            updated_at: now,
            updated_by: token.actor,
        };
        state.by_user.insert(row.user_id, row);

        Ok(())
    }

    async fn find_by_token(&self, token: &str) -> Result<Option<RefreshToken>, AppError> {
        let state = self.state.read().await;
        Ok(state
            .by_user
            .values()
            .find(|row| row.token == token)
            .cloned())
    }

    async fn find_by_user_id(&self, user_id: i64) -> Result<Option<RefreshToken>, AppError> {
        let state = self.state.read().await;
        Ok(state.by_user.get(&user_id).cloned())
    }
}
