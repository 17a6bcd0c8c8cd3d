/// Authentication Service
///
/// Orchestrates login and refresh: credential lookup, password check, token
/// minting and the refresh-token upsert. Failure paths never write to the
/// refresh token store.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;

use crate::auth::jwt::mint_access_token;
use crate::auth::keys::KeyProvider;
use crate::auth::password::PasswordHasher;
use crate::auth::refresh_token::{generate_refresh_token, NewRefreshToken, RefreshTokenStore};
use crate::configuration::AuthSettings;
use crate::error::{AppError, AuthError};
use crate::users::{UserRecord, UserStore};

/// Token pair returned by login and refresh.
#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub access_token: String,
    pub access_token_expire_at: String,
    pub refresh_token: String,
    pub refresh_token_expire_at: String,
}

pub struct AuthService {
    users: Arc<dyn UserStore>,
    refresh_tokens: Arc<dyn RefreshTokenStore>,
    hasher: Arc<dyn PasswordHasher>,
    keys: Arc<dyn KeyProvider>,
    settings: AuthSettings,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserStore>,
        refresh_tokens: Arc<dyn RefreshTokenStore>,
        hasher: Arc<dyn PasswordHasher>,
        keys: Arc<dyn KeyProvider>,
        settings: AuthSettings,
    ) -> Self {
        Self {
            users,
            refresh_tokens,
            hasher,
            keys,
            settings,
        }
    }

    /// Authenticate `username`/`password` and issue a fresh token pair.
    ///
    /// # Errors
    /// - `AuthError::UserNotFound` when no record matches the username
    /// - `AuthError::PasswordMismatch` when the password does not verify
    /// - any store, key or signing failure, unchanged
    pub async fn login(&self, username: &str, password: &str) -> Result<AuthResponse, AppError> {
        let user = self
            .users
            .find_by_username(username)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        if !self.verify_password(password, &user.password).await? {
            tracing::warn!(user_id = user.id, "Password mismatch");
            return Err(AuthError::PasswordMismatch.into());
        }

        let response = self.issue_tokens(&user, Utc::now()).await?;
        tracing::info!(user_id = user.id, "User logged in");
        Ok(response)
    }

    /// Exchange a stored refresh token for a new pair, rotating the stored one.
    pub async fn refresh(&self, refresh_token: &str) -> Result<AuthResponse, AppError> {
        let now = Utc::now();
        let stored = self
            .refresh_tokens
            .find_by_token(refresh_token)
            .await?
            .ok_or(AuthError::InvalidRefreshToken)?;

        if stored.is_expired_at(now) {
            return Err(AuthError::RefreshTokenExpired.into());
        }

        let user = self
            .users
            .find_by_id(stored.user_id)
            .await?
            .ok_or(AuthError::InvalidRefreshToken)?;

        let response = self.issue_tokens(&user, now).await?;
        tracing::info!(user_id = user.id, "Refresh token rotated");
        Ok(response)
    }

    /// Bcrypt is CPU-bound for tens of milliseconds, so it runs off the
    /// async workers.
    async fn verify_password(&self, password: &str, hash: &str) -> Result<bool, AppError> {
        let hasher = self.hasher.clone();
        let password = password.to_string();
        let hash = hash.to_string();

        tokio::task::spawn_blocking(move || hasher.verify(&password, &hash))
            .await
            .map_err(|e| AppError::Internal(format!("Password verification task failed: {}", e)))
    }

    async fn issue_tokens(
        &self,
        user: &UserRecord,
        now: DateTime<Utc>,
    ) -> Result<AuthResponse, AppError> {
        let access_token = mint_access_token(
            user,
            self.keys.signing_key()?,
            &self.settings.issuer,
            self.settings.access_token_expire_hours,
            now,
        )?;
        let refresh_token = generate_refresh_token(now, self.settings.refresh_token_expire_hours);

        self.refresh_tokens
            .upsert(NewRefreshToken {
                user_id: user.id,
                token: refresh_token.value.clone(),
                expired_at: refresh_token.expires_at,
                actor: user.username.clone(),
            })
            .await?;

        Ok(AuthResponse {
            access_token: access_token.value,
            access_token_expire_at: self.settings.format_timestamp(access_token.expires_at),
            refresh_token: refresh_token.value,
            refresh_token_expire_at: self.settings.format_timestamp(refresh_token.expires_at),
        })
    }
}
