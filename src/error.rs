/// Application Error Handling
///
/// Every fallible path in the service returns `AppError`. Domain failures
/// (validation, authentication, user conflicts) map to specific client-facing
/// statuses; infrastructure failures (database, configuration, signing) all
/// collapse into one 500 response. Clients only ever see the canned envelope
/// message from `crate::response`, the full error goes to the tracing log.

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use std::error::Error as StdError;
use std::fmt;

use crate::response::{
    ApiResponse, BAD_REQUEST_MSG, CONFLICT_MSG, INTERNAL_SERVER_ERROR_MSG, NOT_FOUND_MSG,
    UNAUTHORIZED_MSG,
};

/// ============================================================================
/// 1. DOMAIN-SPECIFIC ERROR TYPES
/// ============================================================================

/// Validation errors for request input
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    EmptyField(String),
    TooShort(String, usize),
    TooLong(String, usize),
    InvalidFormat(String),
    MalformedRequest(String),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::EmptyField(field) => write!(f, "{} is empty", field),
            ValidationError::TooShort(field, min) => {
                write!(f, "{} is too short (minimum {} characters)", field, min)
            }
            ValidationError::TooLong(field, max) => {
                write!(f, "{} is too long (maximum {} characters)", field, max)
            }
            ValidationError::InvalidFormat(field) => write!(f, "{} has invalid format", field),
            ValidationError::MalformedRequest(msg) => write!(f, "malformed request: {}", msg),
        }
    }
}

impl StdError for ValidationError {}

/// Database operation errors
#[derive(Debug)]
pub enum DatabaseError {
    UniqueConstraintViolation(String),
    QueryExecution(String),
    ConnectionPool(String),
    UnexpectedError(String),
}

impl fmt::Display for DatabaseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatabaseError::UniqueConstraintViolation(msg) => {
                write!(f, "Duplicate entry: {}", msg)
            }
            DatabaseError::QueryExecution(msg) => write!(f, "Query error: {}", msg),
            DatabaseError::ConnectionPool(msg) => write!(f, "Database connection error: {}", msg),
            DatabaseError::UnexpectedError(msg) => write!(f, "Database error: {}", msg),
        }
    }
}

impl StdError for DatabaseError {}

/// Configuration and key material errors
#[derive(Debug)]
pub enum ConfigError {
    MissingRequired(String),
    InvalidValue(String),
    KeyLoad(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::MissingRequired(msg) => write!(f, "Missing required config: {}", msg),
            ConfigError::InvalidValue(msg) => write!(f, "Invalid config value: {}", msg),
            ConfigError::KeyLoad(msg) => write!(f, "Signing key error: {}", msg),
        }
    }
}

impl StdError for ConfigError {}

/// Authentication errors
#[derive(Debug, Clone, PartialEq)]
pub enum AuthError {
    UserNotFound,
    PasswordMismatch,
    InvalidRefreshToken,
    RefreshTokenExpired,
    MissingToken,
    TokenInvalid,
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::UserNotFound => write!(f, "user not found"),
            AuthError::PasswordMismatch => write!(f, "password not match"),
            AuthError::InvalidRefreshToken => write!(f, "Invalid refresh token"),
            AuthError::RefreshTokenExpired => write!(f, "Refresh token has expired"),
            AuthError::MissingToken => write!(f, "Missing authentication token"),
            AuthError::TokenInvalid => write!(f, "Invalid or expired access token"),
        }
    }
}

impl StdError for AuthError {}

/// User management errors
#[derive(Debug, Clone, PartialEq)]
pub enum UserError {
    NotFound,
    UsernameAlreadyExists,
}

impl fmt::Display for UserError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserError::NotFound => write!(f, "user not found"),
            UserError::UsernameAlreadyExists => write!(f, "username already exists"),
        }
    }
}

impl StdError for UserError {}

/// ============================================================================
/// 2. UNIFIED APPLICATION ERROR TYPE
/// ============================================================================

#[derive(Debug)]
pub enum AppError {
    Validation(ValidationError),
    Auth(AuthError),
    User(UserError),
    Database(DatabaseError),
    Config(ConfigError),
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Validation(e) => write!(f, "{}", e),
            AppError::Auth(e) => write!(f, "{}", e),
            AppError::User(e) => write!(f, "{}", e),
            AppError::Database(e) => write!(f, "{}", e),
            AppError::Config(e) => write!(f, "{}", e),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl StdError for AppError {}

impl AppError {
    /// True for failures the caller cannot fix by changing the request.
    pub fn is_infrastructure(&self) -> bool {
        matches!(
            self,
            AppError::Database(_) | AppError::Config(_) | AppError::Internal(_)
        )
    }
}

// ============================================================================
// FROM IMPLEMENTATIONS
// ============================================================================

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::Validation(err)
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        AppError::Auth(err)
    }
}

impl From<UserError> for AppError {
    fn from(err: UserError) -> Self {
        AppError::User(err)
    }
}

impl From<DatabaseError> for AppError {
    fn from(err: DatabaseError) -> Self {
        AppError::Database(err)
    }
}

impl From<ConfigError> for AppError {
    fn from(err: ConfigError) -> Self {
        AppError::Config(err)
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some("23505") => {
                AppError::Database(DatabaseError::UniqueConstraintViolation(
                    db_err.message().to_string(),
                ))
            }
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                AppError::Database(DatabaseError::ConnectionPool(err.to_string()))
            }
            sqlx::Error::Database(_) | sqlx::Error::ColumnDecode { .. } => {
                AppError::Database(DatabaseError::QueryExecution(err.to_string()))
            }
            _ => AppError::Database(DatabaseError::UnexpectedError(err.to_string())),
        }
    }
}

impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        AppError::Internal(format!("Token signing failed: {}", err))
    }
}

// ============================================================================
// 3. HTTP RESPONSE MAPPING
// ============================================================================

impl AppError {
    /// Canned client-facing message for this error.
    pub fn public_message(&self) -> &'static str {
        match self {
            AppError::Validation(_) => BAD_REQUEST_MSG,
            AppError::Auth(AuthError::UserNotFound) => NOT_FOUND_MSG,
            AppError::Auth(AuthError::PasswordMismatch) => BAD_REQUEST_MSG,
            AppError::Auth(_) => UNAUTHORIZED_MSG,
            AppError::User(UserError::NotFound) => NOT_FOUND_MSG,
            AppError::User(UserError::UsernameAlreadyExists) => CONFLICT_MSG,
            AppError::Database(_) | AppError::Config(_) | AppError::Internal(_) => {
                INTERNAL_SERVER_ERROR_MSG
            }
        }
    }

    fn log_error(&self) {
        match self {
            AppError::Validation(e) => {
                tracing::warn!(error = %e, "Validation error");
            }
            AppError::Auth(AuthError::PasswordMismatch) => {
                tracing::warn!(error = %self, "Invalid credentials attempt");
            }
            AppError::Auth(e) => {
                tracing::warn!(error = %e, "Authentication error");
            }
            AppError::User(e) => {
                tracing::warn!(error = %e, "User request rejected");
            }
            AppError::Database(e) => {
                tracing::error!(error = %e, "Database error");
            }
            AppError::Config(e) => {
                tracing::error!(error = %e, "Configuration error");
            }
            AppError::Internal(msg) => {
                tracing::error!(error = %msg, "Internal error");
            }
        }
    }
}

/// The transaction middleware wraps the handler future in a span, so the log
/// line emitted here carries the request's transaction id.
impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        self.log_error();
        HttpResponse::build(self.status_code()).json(ApiResponse::error(self.public_message()))
    }

    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Auth(e) => match e {
                AuthError::UserNotFound => StatusCode::NOT_FOUND,
                AuthError::PasswordMismatch => StatusCode::BAD_REQUEST,
                _ => StatusCode::UNAUTHORIZED,
            },
            AppError::User(e) => match e {
                UserError::NotFound => StatusCode::NOT_FOUND,
                UserError::UsernameAlreadyExists => StatusCode::CONFLICT,
            },
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
