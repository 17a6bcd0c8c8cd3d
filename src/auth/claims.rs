/// Access token claim set.
///
/// Flat key/value payload signed into every access token. Registered claims
/// (`iss`, `sub`, `iat`, `exp`) follow RFC 7519; the rest describe the user.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::users::UserRecord;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AccessClaims {
    pub iss: String,
    /// User id as a string.
    pub sub: String,
    #[serde(rename = "userID")]
    pub user_id: i64,
    pub username: String,
    pub firstname: String,
    pub lastname: String,
    pub role: String,
    pub iat: i64,
    pub exp: i64,
}

impl AccessClaims {
    pub fn new(user: &UserRecord, issuer: &str, issued_at: DateTime<Utc>, lifetime: Duration) -> Self {
        Self {
            iss: issuer.to_string(),
            sub: user.id.to_string(),
            user_id: user.id,
            username: user.username.clone(),
            firstname: user.firstname.clone(),
            lastname: user.lastname.clone(),
            role: user.role.clone(),
            iat: issued_at.timestamp(),
            exp: (issued_at + lifetime).timestamp(),
        }
    }
}
