//! RS256 key material for access tokens.
//!
//! Keys are read once at startup and shared behind an `Arc`; nothing mutates
//! them afterwards, so concurrent logins read them without locking.

use jsonwebtoken::{DecodingKey, EncodingKey};
use std::fs;
use std::path::Path;

use crate::auth::jwt::AccessTokenVerifier;
use crate::error::{AppError, ConfigError};

/// Source of the private key used to sign access tokens.
pub trait KeyProvider: Send + Sync {
    fn signing_key(&self) -> Result<&EncodingKey, AppError>;
}

/// RSA key pair loaded from PEM.
#[derive(Clone)]
pub struct Rs256Keys {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    source: String,
}

impl std::fmt::Debug for Rs256Keys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rs256Keys")
            .field("source", &self.source)
            .finish()
    }
}

impl Rs256Keys {
    /// Loads both PEM files. Call once at process start.
    pub fn from_files<P: AsRef<Path>>(
        private_key_path: P,
        public_key_path: P,
    ) -> Result<Self, AppError> {
        let private_key_path = private_key_path.as_ref();
        let public_key_path = public_key_path.as_ref();

        let private_pem = fs::read(private_key_path).map_err(|e| {
            ConfigError::KeyLoad(format!(
                "Failed to read private key {}: {}",
                private_key_path.display(),
                e
            ))
        })?;
        let public_pem = fs::read(public_key_path).map_err(|e| {
            ConfigError::KeyLoad(format!(
                "Failed to read public key {}: {}",
                public_key_path.display(),
                e
            ))
        })?;

        let mut keys = Self::from_pem(&private_pem, &public_pem)?;
        keys.source = private_key_path.display().to_string();
        Ok(keys)
    }

    /// Builds the pair from PEM bytes held in memory.
    pub fn from_pem(private_pem: &[u8], public_pem: &[u8]) -> Result<Self, AppError> {
        let encoding_key = EncodingKey::from_rsa_pem(private_pem)
            .map_err(|e| ConfigError::KeyLoad(format!("Invalid private key format: {}", e)))?;
        let decoding_key = DecodingKey::from_rsa_pem(public_pem)
            .map_err(|e| ConfigError::KeyLoad(format!("Invalid public key format: {}", e)))?;

        Ok(Self {
            encoding_key,
            decoding_key,
            source: "memory".to_string(),
        })
    }

    pub fn verifier(&self, issuer: &str) -> AccessTokenVerifier {
        AccessTokenVerifier::new(self.decoding_key.clone(), issuer)
    }
}

impl KeyProvider for Rs256Keys {
    fn signing_key(&self) -> Result<&EncodingKey, AppError> {
        Ok(&self.encoding_key)
    }
}
