mod common;

use bookshelf::auth::{KeyProvider, NewRefreshToken};
use bookshelf::error::{AppError, ConfigError};
use bookshelf::logger::TRANSACTION_ID_HEADER;
use bookshelf::response::{
    BAD_REQUEST_MSG, INTERNAL_SERVER_ERROR_MSG, NOT_FOUND_MSG, UNAUTHORIZED_MSG,
};
use bookshelf::startup::Stores;
use chrono::{Duration, NaiveDateTime, Utc};
use common::{fixture_keys, spawn_app, spawn_app_with};
use jsonwebtoken::EncodingKey;
use serde_json::{json, Value};
use std::sync::Arc;

struct MissingKeys;

impl KeyProvider for MissingKeys {
    fn signing_key(&self) -> Result<&EncodingKey, AppError> {
        Err(ConfigError::KeyLoad("key file unreadable".to_string()).into())
    }
}

fn error_body(message: &str) -> Value {
    json!({ "status": "ERROR", "message": message })
}

fn parse_expiry(value: &Value) -> chrono::DateTime<Utc> {
    let raw = value.as_str().expect("expiry is a string");
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
        .expect("expiry matches the datetime pattern")
        .and_utc()
}

// --- Login ---

#[tokio::test]
async fn login_returns_200_with_token_pair() {
    let app = spawn_app().await;
    let now = Utc::now();

    let response = app.login("admin", "password").await;

    assert_eq!(200, response.status().as_u16());
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "SUCCESS");
    assert_eq!(body["message"], "");

    let data = &body["data"];
    assert!(!data["accessToken"].as_str().unwrap().is_empty());
    assert!(!data["refreshToken"].as_str().unwrap().is_empty());

    let access_skew = parse_expiry(&data["accessTokenExpireAt"]) - (now + Duration::hours(6));
    let refresh_skew = parse_expiry(&data["refreshTokenExpireAt"]) - (now + Duration::hours(24));
    assert!(access_skew.num_seconds().abs() <= 5);
    assert!(refresh_skew.num_seconds().abs() <= 5);
}

#[tokio::test]
async fn login_access_token_verifies_with_public_key() {
    let app = spawn_app().await;

    let body: Value = app.login("admin", "password").await.json().await.unwrap();
    let token = body["data"]["accessToken"].as_str().unwrap();

    let claims = fixture_keys()
        .verifier("bookshelf")
        .verify(token)
        .expect("token verifies");
    assert_eq!(claims.username, "admin");
    assert_eq!(claims.role, "admin");
}

#[tokio::test]
async fn login_returns_400_for_wrong_password() {
    let app = spawn_app().await;

    let response = app.login("admin", "wrong").await;

    assert_eq!(400, response.status().as_u16());
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, error_body(BAD_REQUEST_MSG));
}

#[tokio::test]
async fn login_returns_404_for_unknown_user() {
    let app = spawn_app().await;

    let response = app.login("nobody", "password").await;

    assert_eq!(404, response.status().as_u16());
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, error_body(NOT_FOUND_MSG));
}

#[tokio::test]
async fn login_returns_400_when_fields_are_missing() {
    let app = spawn_app().await;
    let test_cases = vec![
        (json!({ "username": "admin" }), "missing the password"),
        (json!({ "password": "password" }), "missing the username"),
        (json!({ "username": "  ", "password": "password" }), "blank username"),
        (json!({}), "missing both"),
    ];

    for (invalid_body, description) in test_cases {
        let response = app.post_json("/api/v1/login", &invalid_body).await;

        assert_eq!(
            400,
            response.status().as_u16(),
            "The API did not fail with 400 Bad Request when the payload was {}.",
            description
        );
        let body: Value = response.json().await.unwrap();
        assert_eq!(body, error_body(BAD_REQUEST_MSG));
    }
}

#[tokio::test]
async fn login_returns_400_for_malformed_json() {
    let app = spawn_app().await;

    let response = app
        .api_client
        .post(app.url("/api/v1/login"))
        .header("Content-Type", "application/json")
        .body("{\"username\": \"admin\",")
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(400, response.status().as_u16());
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, error_body(BAD_REQUEST_MSG));
}

#[tokio::test]
async fn login_returns_500_when_signing_key_is_unavailable() {
    let app = spawn_app_with(Stores::in_memory(), Arc::new(MissingKeys)).await;

    let response = app.login("admin", "password").await;

    assert_eq!(500, response.status().as_u16());
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, error_body(INTERNAL_SERVER_ERROR_MSG));
}

#[tokio::test]
async fn second_login_overwrites_stored_refresh_token() {
    let app = spawn_app().await;

    let first: Value = app.login("admin", "password").await.json().await.unwrap();
    let second: Value = app.login("admin", "password").await.json().await.unwrap();

    let first_token = first["data"]["refreshToken"].as_str().unwrap();
    let second_token = second["data"]["refreshToken"].as_str().unwrap();
    assert_ne!(first_token, second_token);

    let admin = app
        .stores
        .users
        .find_by_username("admin")
        .await
        .unwrap()
        .unwrap();
    let stored = app
        .stores
        .refresh_tokens
        .find_by_user_id(admin.id)
        .await
        .unwrap()
        .expect("refresh token row exists");
    assert_eq!(stored.token, second_token);
    assert!(app
        .stores
        .refresh_tokens
        .find_by_token(first_token)
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn failed_login_does_not_store_refresh_token() {
    let app = spawn_app().await;

    app.login("admin", "wrong").await;

    let admin = app
        .stores
        .users
        .find_by_username("admin")
        .await
        .unwrap()
        .unwrap();
    assert!(app
        .stores
        .refresh_tokens
        .find_by_user_id(admin.id)
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn transaction_id_is_echoed() {
    let app = spawn_app().await;

    let response = app
        .api_client
        .post(app.url("/api/v1/login"))
        .header(TRANSACTION_ID_HEADER, "txn-1234")
        .json(&json!({ "username": "admin", "password": "wrong" }))
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(
        response.headers().get(TRANSACTION_ID_HEADER).unwrap(),
        "txn-1234"
    );
}

#[tokio::test]
async fn transaction_id_is_generated_when_absent() {
    let app = spawn_app().await;

    let response = app.login("admin", "password").await;

    let header = response
        .headers()
        .get(TRANSACTION_ID_HEADER)
        .expect("transaction id header")
        .to_str()
        .unwrap();
    assert!(uuid::Uuid::parse_str(header).is_ok());
}

// --- Refresh ---

#[tokio::test]
async fn refresh_token_returns_new_pair() {
    let app = spawn_app().await;
    let login: Value = app.login("admin", "password").await.json().await.unwrap();
    let refresh_token = login["data"]["refreshToken"].as_str().unwrap();

    let response = app
        .post_json(
            "/api/v1/refresh-token",
            &json!({ "refreshToken": refresh_token }),
        )
        .await;

    assert_eq!(200, response.status().as_u16());
    let body: Value = response.json().await.unwrap();
    assert_ne!(body["data"]["refreshToken"], login["data"]["refreshToken"]);

    // The presented token was rotated out
    let reused = app
        .post_json(
            "/api/v1/refresh-token",
            &json!({ "refreshToken": refresh_token }),
        )
        .await;
    assert_eq!(401, reused.status().as_u16());
}

#[tokio::test]
async fn refresh_token_rejects_unknown_token() {
    let app = spawn_app().await;

    let response = app
        .post_json(
            "/api/v1/refresh-token",
            &json!({ "refreshToken": "3f1c2a5e-0000-4000-8000-000000000000" }),
        )
        .await;

    assert_eq!(401, response.status().as_u16());
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, error_body(UNAUTHORIZED_MSG));
}

#[tokio::test]
async fn refresh_token_rejects_expired_token() {
    let app = spawn_app().await;
    let admin = app
        .stores
        .users
        .find_by_username("admin")
        .await
        .unwrap()
        .unwrap();
    app.stores
        .refresh_tokens
        .upsert(NewRefreshToken {
            user_id: admin.id,
            token: "expired-token".to_string(),
            expired_at: Utc::now() - Duration::hours(1),
            actor: "admin".to_string(),
        })
        .await
        .unwrap();

    let response = app
        .post_json(
            "/api/v1/refresh-token",
            &json!({ "refreshToken": "expired-token" }),
        )
        .await;

    assert_eq!(401, response.status().as_u16());
}

#[tokio::test]
async fn refresh_token_requires_token() {
    let app = spawn_app().await;

    let response = app.post_json("/api/v1/refresh-token", &json!({})).await;

    assert_eq!(400, response.status().as_u16());
}

// --- Current user ---

#[tokio::test]
async fn me_returns_identity_for_valid_token() {
    let app = spawn_app().await;
    let login: Value = app.login("admin", "password").await.json().await.unwrap();
    let token = login["data"]["accessToken"].as_str().unwrap();

    let response = app
        .api_client
        .get(app.url("/api/v1/me"))
        .bearer_auth(token)
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(200, response.status().as_u16());
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["data"]["username"], "admin");
    assert_eq!(body["data"]["role"], "admin");
}

#[tokio::test]
async fn me_rejects_missing_token() {
    let app = spawn_app().await;

    let response = app.get("/api/v1/me").await;

    assert_eq!(401, response.status().as_u16());
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, error_body(UNAUTHORIZED_MSG));
}

#[tokio::test]
async fn me_rejects_invalid_token() {
    let app = spawn_app().await;

    let response = app
        .api_client
        .get(app.url("/api/v1/me"))
        .bearer_auth("not.a.jwt")
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(401, response.status().as_u16());
    assert!(response.headers().get(TRANSACTION_ID_HEADER).is_some());
}
