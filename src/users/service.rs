use std::sync::Arc;

use crate::auth::PasswordHasher;
use crate::error::{AppError, UserError};
use crate::pagination::PageRequest;
use crate::response::Paging;
use crate::users::model::{
    CreateUserRequest, NewUser, UpdateUserRequest, UserResponse, UserStatus, DEFAULT_ROLE,
};
use crate::users::store::UserStore;

/// User management on top of a `UserStore`.
pub struct UserService {
    store: Arc<dyn UserStore>,
    hasher: Arc<dyn PasswordHasher>,
}

impl UserService {
    pub fn new(store: Arc<dyn UserStore>, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self { store, hasher }
    }

    /// Validates, hashes the password and stores an active user with the
    /// default role.
    pub async fn create(&self, request: CreateUserRequest) -> Result<UserResponse, AppError> {
        let request = request.validate()?;

        if self.store.find_by_username(&request.username).await?.is_some() {
            return Err(UserError::UsernameAlreadyExists.into());
        }

        let hasher = self.hasher.clone();
        let password = request.password;
        let password_hash = tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| AppError::Internal(format!("Password hashing task failed: {}", e)))??;

        let created = self
            .store
            .create(NewUser {
                username: request.username,
                password: password_hash,
                firstname: request.firstname,
                lastname: request.lastname,
                status: UserStatus::Active,
                role: DEFAULT_ROLE.to_string(),
            })
            .await?;

        tracing::info!(user_id = created.id, "User created");
        Ok(created.into())
    }

    pub async fn list(&self, page: PageRequest) -> Result<(Vec<UserResponse>, Paging), AppError> {
        let total = self.store.count().await?;
        let users: Vec<UserResponse> = self
            .store
            .list(page.limit(), page.offset())
            .await?
            .into_iter()
            .map(UserResponse::from)
            .collect();

        let paging = page.paging(users.len(), total);
        Ok((users, paging))
    }

    pub async fn get(&self, id: i64) -> Result<UserResponse, AppError> {
        self.store
            .find_by_id(id)
            .await?
            .map(UserResponse::from)
            .ok_or_else(|| UserError::NotFound.into())
    }

    pub async fn update(
        &self,
        id: i64,
        request: UpdateUserRequest,
    ) -> Result<UserResponse, AppError> {
        let update = request.validate()?;

        if !self.store.update(id, update).await? {
            return Err(UserError::NotFound.into());
        }

        tracing::info!(user_id = id, "User updated");
        self.get(id).await
    }

    pub async fn delete(&self, id: i64) -> Result<(), AppError> {
        if !self.store.delete(id).await? {
            return Err(UserError::NotFound.into());
        }

        tracing::info!(user_id = id, "User deleted");
        Ok(())
    }
}
