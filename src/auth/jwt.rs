/// Access token minting and verification (RS256).
///
/// Tokens are signed with the private key; anything holding only the public
/// key can verify them.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use crate::auth::claims::AccessClaims;
use crate::error::{AppError, AuthError};
use crate::users::UserRecord;

/// A token value paired with the moment it stops being valid.
#[derive(Debug, Clone, PartialEq)]
pub struct IssuedToken {
    pub value: String,
    pub expires_at: DateTime<Utc>,
}

/// Build the claim set for `user` and sign it.
///
/// # Errors
/// Returns `AppError::Internal` if signing fails.
pub fn mint_access_token(
    user: &UserRecord,
    key: &EncodingKey,
    issuer: &str,
    expire_hours: i64,
    now: DateTime<Utc>,
) -> Result<IssuedToken, AppError> {
    let lifetime = Duration::hours(expire_hours);
    let claims = AccessClaims::new(user, issuer, now, lifetime);
    let value = encode(&Header::new(Algorithm::RS256), &claims, key)?;

    Ok(IssuedToken {
        value,
        expires_at: now + lifetime,
    })
}

/// Checks signature, expiry and issuer of access tokens.
#[derive(Clone)]
pub struct AccessTokenVerifier {
    decoding_key: DecodingKey,
    issuer: String,
}

impl AccessTokenVerifier {
    pub fn new(decoding_key: DecodingKey, issuer: &str) -> Self {
        Self {
            decoding_key,
            issuer: issuer.to_string(),
        }
    }

    pub fn verify(&self, token: &str) -> Result<AccessClaims, AppError> {
        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_issuer(&[&self.issuer]);

        decode::<AccessClaims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::warn!("JWT validation error: {}", e);
                AppError::Auth(AuthError::TokenInvalid)
            })
    }
}
