mod common;

use bookshelf::response::{BAD_REQUEST_MSG, CONFLICT_MSG, NOT_FOUND_MSG};
use common::{spawn_app, TestApp};
use serde_json::{json, Value};

async fn create_user(app: &TestApp, username: &str) -> reqwest::Response {
    app.post_json(
        "/api/v1/users",
        &json!({
            "username": username,
            "password": "password123",
            "firstname": "Amiya",
            "lastname": "Armstrong"
        }),
    )
    .await
}

#[tokio::test]
async fn create_user_returns_200_and_new_user_can_log_in() {
    let app = spawn_app().await;

    let response = create_user(&app, "amiya").await;

    assert_eq!(200, response.status().as_u16());
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["data"]["username"], "amiya");
    assert_eq!(body["data"]["status"], "Active");
    assert!(body["data"].get("password").is_none());

    let login = app.login("amiya", "password123").await;
    assert_eq!(200, login.status().as_u16());
}

#[tokio::test]
async fn create_user_returns_409_for_duplicate_username() {
    let app = spawn_app().await;
    create_user(&app, "amiya").await;

    let response = create_user(&app, "amiya").await;

    assert_eq!(409, response.status().as_u16());
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], CONFLICT_MSG);
}

#[tokio::test]
async fn create_user_returns_400_for_invalid_input() {
    let app = spawn_app().await;
    let test_cases = vec![
        (
            json!({ "username": "am", "password": "password123", "firstname": "Amiya", "lastname": "Armstrong" }),
            "short username",
        ),
        (
            json!({ "username": "amiya", "password": "short", "firstname": "Amiya", "lastname": "Armstrong" }),
            "short password",
        ),
        (
            json!({ "username": "amiya", "password": "password123", "lastname": "Armstrong" }),
            "missing firstname",
        ),
        (
            json!({ "username": "am iya", "password": "password123", "firstname": "Amiya", "lastname": "Armstrong" }),
            "username with a space",
        ),
    ];

    for (invalid_body, description) in test_cases {
        let response = app.post_json("/api/v1/users", &invalid_body).await;

        assert_eq!(
            400,
            response.status().as_u16(),
            "The API did not fail with 400 Bad Request when the payload had a {}.",
            description
        );
        let body: Value = response.json().await.unwrap();
        assert_eq!(body["message"], BAD_REQUEST_MSG);
    }
}

#[tokio::test]
async fn list_users_reports_paging() {
    let app = spawn_app().await;
    for name in ["alpha", "bravo"] {
        create_user(&app, name).await;
    }

    let response = app.get("/api/v1/users?page=1&pageSize=2").await;

    assert_eq!(200, response.status().as_u16());
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["currentRecord"], 2);
    assert_eq!(body["currentPage"], 1);
    assert_eq!(body["totalRecord"], 3);
    assert_eq!(body["totalPage"], 2);
    assert_eq!(body["data"][0]["username"], "admin");
    assert_eq!(body["data"][1]["username"], "alpha");
}

#[tokio::test]
async fn list_users_past_last_page_is_empty() {
    let app = spawn_app().await;

    let body: Value = app
        .get("/api/v1/users?page=5&pageSize=10")
        .await
        .json()
        .await
        .unwrap();

    assert_eq!(body["data"], json!([]));
    assert!(body.get("currentRecord").is_none());
    assert_eq!(body["totalRecord"], 1);
}

#[tokio::test]
async fn list_users_rejects_bad_paging() {
    let app = spawn_app().await;

    for query in ["page=abc", "pageSize=0", "pageSize=x"] {
        let response = app.get(&format!("/api/v1/users?{}", query)).await;
        assert_eq!(400, response.status().as_u16(), "query {}", query);
    }
}

#[tokio::test]
async fn get_user_by_id() {
    let app = spawn_app().await;
    let created: Value = create_user(&app, "amiya").await.json().await.unwrap();
    let id = created["data"]["id"].as_i64().unwrap();

    let response = app.get(&format!("/api/v1/users/{}", id)).await;

    assert_eq!(200, response.status().as_u16());
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["data"], created["data"]);
}

#[tokio::test]
async fn get_user_returns_404_when_missing() {
    let app = spawn_app().await;

    let response = app.get("/api/v1/users/999").await;

    assert_eq!(404, response.status().as_u16());
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], NOT_FOUND_MSG);
}

#[tokio::test]
async fn get_user_returns_400_for_non_numeric_id() {
    let app = spawn_app().await;

    let response = app.get("/api/v1/users/abc").await;

    assert_eq!(400, response.status().as_u16());
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], BAD_REQUEST_MSG);
}

#[tokio::test]
async fn update_user_changes_fields() {
    let app = spawn_app().await;
    let created: Value = create_user(&app, "amiya").await.json().await.unwrap();
    let id = created["data"]["id"].as_i64().unwrap();

    let response = app
        .api_client
        .put(app.url(&format!("/api/v1/users/{}", id)))
        .json(&json!({ "firstname": "Amy", "lastname": "Strong", "status": "inactive" }))
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(200, response.status().as_u16());
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["data"]["firstname"], "Amy");
    assert_eq!(body["data"]["status"], "Inactive");
}

#[tokio::test]
async fn update_user_returns_404_when_missing() {
    let app = spawn_app().await;

    let response = app
        .api_client
        .put(app.url("/api/v1/users/999"))
        .json(&json!({ "firstname": "Amy", "lastname": "Strong", "status": "active" }))
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(404, response.status().as_u16());
}

#[tokio::test]
async fn delete_user_then_404() {
    let app = spawn_app().await;
    let created: Value = create_user(&app, "amiya").await.json().await.unwrap();
    let path = format!("/api/v1/users/{}", created["data"]["id"]);

    let first = app
        .api_client
        .delete(app.url(&path))
        .send()
        .await
        .expect("Failed to execute request.");
    assert_eq!(200, first.status().as_u16());
    let body: Value = first.json().await.unwrap();
    assert_eq!(body, json!({ "status": "SUCCESS", "message": "" }));

    let second = app
        .api_client
        .delete(app.url(&path))
        .send()
        .await
        .expect("Failed to execute request.");
    assert_eq!(404, second.status().as_u16());
}
