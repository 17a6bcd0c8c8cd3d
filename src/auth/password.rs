/// Password Hashing and Verification
///
/// Bcrypt is salted and deliberately slow; its work factor is the main
/// defense if the users table is ever exfiltrated. Verification compares
/// digests in constant time inside the `bcrypt` crate.

use bcrypt::{hash, verify};

use crate::error::AppError;

pub trait PasswordHasher: Send + Sync {
    /// Produce a new salted hash for `password`.
    fn hash(&self, password: &str) -> Result<String, AppError>;

    /// True when `password` matches `hash`. A malformed hash never matches.
    fn verify(&self, password: &str, hash: &str) -> bool;
}

#[derive(Debug, Clone, Copy)]
pub struct BcryptHasher {
    cost: u32,
}

impl BcryptHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }
}

impl PasswordHasher for BcryptHasher {
    fn hash(&self, password: &str) -> Result<String, AppError> {
        hash(password, self.cost)
            .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))
    }

    fn verify(&self, password: &str, hash: &str) -> bool {
        match verify(password, hash) {
            Ok(matches) => matches,
            Err(e) => {
                tracing::warn!(error = %e, "Stored password hash could not be parsed");
                false
            }
        }
    }
}
