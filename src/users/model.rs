use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::validators::{is_valid_name, is_valid_password, is_valid_username};

pub const DEFAULT_ROLE: &str = "user";

/// Row of the `users` table. Doubles as the credential record read at login.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct UserRecord {
    pub id: i64,
    pub username: String,
    /// Bcrypt hash, never the plaintext.
    pub password: String,
    pub firstname: String,
    pub lastname: String,
    pub status: i16,
    pub role: String,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UserStatus {
    Inactive = 0,
    Active = 1,
}

impl UserStatus {
    pub fn from_code(code: i16) -> Self {
        if code == 0 {
            UserStatus::Inactive
        } else {
            UserStatus::Active
        }
    }

    pub fn code(self) -> i16 {
        self as i16
    }

    pub fn label(self) -> &'static str {
        match self {
            UserStatus::Active => "Active",
            UserStatus::Inactive => "Inactive",
        }
    }

    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "active" => Ok(UserStatus::Active),
            "inactive" => Ok(UserStatus::Inactive),
            _ => Err(ValidationError::InvalidFormat("status".to_string())),
        }
    }
}

/// Insert payload; `password` is already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub firstname: String,
    pub lastname: String,
    pub status: UserStatus,
    pub role: String,
}

#[derive(Debug, Clone)]
pub struct UserUpdate {
    pub firstname: String,
    pub lastname: String,
    pub status: UserStatus,
}

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub firstname: String,
    #[serde(default)]
    pub lastname: String,
}

impl CreateUserRequest {
    /// Returns the request with trimmed names, or the first failing field.
    pub fn validate(&self) -> Result<CreateUserRequest, ValidationError> {
        let username = is_valid_username(&self.username)?;
        is_valid_password(&self.password)?;
        let firstname = is_valid_name("firstname", &self.firstname)?;
        let lastname = is_valid_name("lastname", &self.lastname)?;

        Ok(CreateUserRequest {
            username,
            password: self.password.clone(),
            firstname,
            lastname,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    #[serde(default)]
    pub firstname: String,
    #[serde(default)]
    pub lastname: String,
    #[serde(default)]
    pub status: String,
}

impl UpdateUserRequest {
    pub fn validate(&self) -> Result<UserUpdate, ValidationError> {
        Ok(UserUpdate {
            firstname: is_valid_name("firstname", &self.firstname)?,
            lastname: is_valid_name("lastname", &self.lastname)?,
            status: UserStatus::parse(&self.status)?,
        })
    }
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
    pub firstname: String,
    pub lastname: String,
    pub status: String,
}

impl From<UserRecord> for UserResponse {
    fn from(user: UserRecord) -> Self {
        Self {
            id: user.id,
            username: user.username,
            firstname: user.firstname,
            lastname: user.lastname,
            status: UserStatus::from_code(user.status).label().to_string(),
        }
    }
}
