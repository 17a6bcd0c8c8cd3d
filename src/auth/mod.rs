/// Authentication module
///
/// Password hashing, RS256 key material, access token minting/verification,
/// refresh token storage and the login/refresh orchestration on top of them.

mod claims;
mod jwt;
pub mod keys;
mod password;
mod refresh_token;
mod service;

pub use claims::AccessClaims;
pub use jwt::{mint_access_token, AccessTokenVerifier, IssuedToken};
pub use keys::{KeyProvider, Rs256Keys};
pub use password::{BcryptHasher, PasswordHasher};
pub use refresh_token::{
    generate_refresh_token, InMemoryRefreshTokenStore, NewRefreshToken, PgRefreshTokenStore,
    RefreshToken, RefreshTokenStore,
};
pub use service::{AuthResponse, AuthService};
