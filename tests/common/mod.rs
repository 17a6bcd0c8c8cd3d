//! Shared helpers for the HTTP integration tests.
#![allow(dead_code)]

use bookshelf::auth::{BcryptHasher, KeyProvider, PasswordHasher, Rs256Keys};
use bookshelf::configuration::AuthSettings;
use bookshelf::startup::{run, AppState, Stores};
use bookshelf::users::{NewUser, UserRecord, UserStatus};
use serde_json::Value;
use std::net::TcpListener;
use std::sync::Arc;
use std::time::Duration;

pub const TEST_BCRYPT_COST: u32 = 4;

pub const PRIVATE_KEY_PATH: &str = concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/tests/fixtures/jwt_private_key.pem"
);
pub const PUBLIC_KEY_PATH: &str = concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/tests/fixtures/jwt_public_key.pem"
);

pub struct TestApp {
    pub address: String,
    pub stores: Stores,
    pub api_client: reqwest::Client,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    pub async fn post_json(&self, path: &str, body: &Value) -> reqwest::Response {
        self.api_client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.api_client
            .get(self.url(path))
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn login(&self, username: &str, password: &str) -> reqwest::Response {
        self.post_json(
            "/api/v1/login",
            &serde_json::json!({ "username": username, "password": password }),
        )
        .await
    }

    /// Inserts a user directly into the store with a bcrypt hash of `password`.
    pub async fn seed_user(&self, username: &str, password: &str, role: &str) -> UserRecord {
        let hash = BcryptHasher::new(TEST_BCRYPT_COST)
            .hash(password)
            .expect("Failed to hash password");

        self.stores
            .users
            .create(NewUser {
                username: username.to_string(),
                password: hash,
                firstname: "Amiya".to_string(),
                lastname: "Armstrong".to_string(),
                status: UserStatus::Active,
                role: role.to_string(),
            })
            .await
            .expect("Failed to seed user")
    }
}

pub fn fixture_keys() -> Rs256Keys {
    Rs256Keys::from_files(PRIVATE_KEY_PATH, PUBLIC_KEY_PATH).expect("Failed to load fixture keys")
}

pub fn test_auth_settings() -> AuthSettings {
    let mut settings = AuthSettings::with_key_paths(PRIVATE_KEY_PATH, PUBLIC_KEY_PATH);
    settings.bcrypt_cost = TEST_BCRYPT_COST;
    settings
}

/// Server on a random port backed by in-memory stores, with `admin`/`password`
/// already registered.
pub async fn spawn_app() -> TestApp {
    spawn_app_with(Stores::in_memory(), Arc::new(fixture_keys())).await
}

pub async fn spawn_app_with(stores: Stores, keys: Arc<dyn KeyProvider>) -> TestApp {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    let settings = test_auth_settings();
    let verifier = fixture_keys().verifier(&settings.issuer);
    let state = AppState::new(settings, stores.clone(), keys, verifier);

    let server = run(listener, state, Duration::from_secs(10)).expect("Failed to bind address");
    let _ = tokio::spawn(server);

    let app = TestApp {
        address,
        stores,
        api_client: reqwest::Client::new(),
    };
    app.seed_user("admin", "password", "admin").await;
    app
}
