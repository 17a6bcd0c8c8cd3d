/// User persistence.
///
/// `UserStore` is also the credential store consulted at login.

use async_trait::async_trait;
use sqlx::PgPool;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

use crate::error::{AppError, DatabaseError, UserError};
use crate::users::model::{NewUser, UserRecord, UserUpdate};

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_username(&self, username: &str) -> Result<Option<UserRecord>, AppError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<UserRecord>, AppError>;

    /// Fails with `UserError::UsernameAlreadyExists` on a duplicate username.
    async fn create(&self, user: NewUser) -> Result<UserRecord, AppError>;

    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<UserRecord>, AppError>;

    async fn count(&self) -> Result<i64, AppError>;

    /// Returns false when no user has this id.
    async fn update(&self, id: i64, update: UserUpdate) -> Result<bool, AppError>;

    /// Returns false when no user has this id.
    async fn delete(&self, id: i64) -> Result<bool, AppError>;
}

pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const USER_COLUMNS: &str = "id, username, password, firstname, lastname, status, role";

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<UserRecord>, AppError> {
        let user = sqlx::query_as::<_, UserRecord>(&format!(
            "SELECT {} FROM users WHERE username = $1",
            USER_COLUMNS
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<UserRecord>, AppError> {
        let user = sqlx::query_as::<_, UserRecord>(&format!(
            "SELECT {} FROM users WHERE id = $1",
            USER_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn create(&self, user: NewUser) -> Result<UserRecord, AppError> {
        let created = sqlx::query_as::<_, UserRecord>(&format!(
            r#"
            INSERT INTO users (username, password, firstname, lastname, status, role)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {}
            "#,
            USER_COLUMNS
        ))
        .bind(&user.username)
        .bind(&user.password)
        .bind(&user.firstname)
        .bind(&user.lastname)
        .bind(user.status.code())
        .bind(&user.role)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::from)
        .map_err(|e| match e {
            AppError::Database(DatabaseError::UniqueConstraintViolation(_)) => {
                AppError::User(UserError::UsernameAlreadyExists)
            }
            other => other,
        })?;

        Ok(created)
    }

    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<UserRecord>, AppError> {
        let users = sqlx::query_as::<_, UserRecord>(&format!(
            "SELECT {} FROM users ORDER BY id LIMIT $1 OFFSET $2",
            USER_COLUMNS
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    async fn count(&self) -> Result<i64, AppError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    async fn update(&self, id: i64, update: UserUpdate) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET firstname = $1, lastname = $2, status = $3
            WHERE id = $4
            "#,
        )
        .bind(&update.firstname)
        .bind(&update.lastname)
        .bind(update.status.code())
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

/// In-process store keyed by id, for tests and local runs without Postgres.
#[derive(Default)]
pub struct InMemoryUserStore {
    state: RwLock<InMemoryUsers>,
}

#[derive(Default)]
struct InMemoryUsers {
    next_id: i64,
    users: BTreeMap<i64, UserRecord>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<UserRecord>, AppError> {
        let state = self.state.read().await;
        Ok(state
            .users
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<UserRecord>, AppError> {
        let state = self.state.read().await;
        Ok(state.users.get(&id).cloned())
    }

    async fn create(&self, user: NewUser) -> Result<UserRecord, AppError> {
        let mut state = self.state.write().await;
        if state.users.values().any(|u| u.username == user.username) {
            return Err(UserError::UsernameAlreadyExists.into());
        }

        state.next_id += 1;
        let record = UserRecord {
            id: state.next_id,
            username: user.username,
            password: user.password,
            firstname: user.firstname,
            lastname: user.lastname,
            status: user.status.code(),
            role: user.role,
        };
        state.users.insert(record.id, record.clone());

        Ok(record)
    }

    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<UserRecord>, AppError> {
        let state = self.state.read().await;
        Ok(state
            .users
            .values()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .cloned()
            .collect())
    }

    async fn count(&self) -> Result<i64, AppError> {
        let state = self.state.read().await;
        Ok(state.users.len() as i64)
    }

    async fn update(&self, id: i64, update: UserUpdate) -> Result<bool, AppError> {
        let mut state = self.state.write().await;
        match state.users.get_mut(&id) {
            Some(user) => {
                user.firstname = update.firstname;
                user.lastname = update.lastname;
                user.status = update.status.code();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        let mut state = self.state.write().await;
        Ok(state.users.remove(&id).is_some())
    }
}
