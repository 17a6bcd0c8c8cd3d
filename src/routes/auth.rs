/// Authentication Routes
///
/// Login, token refresh and current user information.

use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::auth::{AccessClaims, AuthService};
use crate::error::{AppError, ValidationError};
use crate::response::ok;
use crate::validators::{required, required_secret};

/// User login request
#[derive(Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

impl LoginRequest {
    /// Both fields must be present. Returns the trimmed username.
    fn validate(&self) -> Result<String, ValidationError> {
        let username = required("username", &self.username)?;
        required_secret("password", &self.password)?;
        Ok(username)
    }
}

/// Token refresh request
#[derive(Deserialize)]
pub struct RefreshRequest {
    #[serde(default, rename = "refreshToken")]
    pub refresh_token: String,
}

/// Identity of the caller, taken from the verified access token.
#[derive(Serialize)]
pub struct MeResponse {
    pub id: i64,
    pub username: String,
    pub firstname: String,
    pub lastname: String,
    pub role: String,
}

impl From<AccessClaims> for MeResponse {
    fn from(claims: AccessClaims) -> Self {
        Self {
            id: claims.user_id,
            username: claims.username,
            firstname: claims.firstname,
            lastname: claims.lastname,
            role: claims.role,
        }
    }
}

/// POST /api/v1/login
///
/// # Errors
/// - 400: Missing fields or password mismatch
/// - 404: No user with this username
/// - 500: Key, signing or storage failure
pub async fn login(
    form: web::Json<LoginRequest>,
    auth: web::Data<AuthService>,
) -> Result<HttpResponse, AppError> {
    let username = form.validate()?;
    let response = auth.login(&username, &form.password).await?;

    Ok(ok(response))
}

/// POST /api/v1/refresh-token
///
/// Exchanges a stored refresh token for a new pair. The presented token
/// stops working once the new one is stored.
///
/// # Errors
/// - 400: Missing token
/// - 401: Unknown or expired refresh token
/// - 500: Internal server error
pub async fn refresh(
    form: web::Json<RefreshRequest>,
    auth: web::Data<AuthService>,
) -> Result<HttpResponse, AppError> {
    let token = required("refreshToken", &form.refresh_token)?;
    let response = auth.refresh(&token).await?;

    Ok(ok(response))
}

/// GET /api/v1/me
///
/// **Requires valid JWT access token**; claims are injected by the JWT
/// middleware.
pub async fn get_current_user(claims: web::ReqData<AccessClaims>) -> HttpResponse {
    ok(MeResponse::from(claims.into_inner()))
}
