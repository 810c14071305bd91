//! API integration tests against a running server

use reqwest::Client;
use serde_json::{json, Value};
use uuid::Uuid;

const BASE_URL: &str = "http://localhost:8080/api/v1";

/// Register a fresh account and return its bearer token
async fn register_and_get_token(client: &Client) -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    let response = client
        .post(format!("{}/auth/register", BASE_URL))
        .json(&json!({
            "username": format!("reader-{}", suffix),
            "password": "secret-password",
            "email": format!("reader-{}@example.com", suffix),
            "phone": "0000000000",
            "userType": "student",
            "code": "ST-001"
        }))
        .send()
        .await
        .expect("Failed to send register request");

    assert_eq!(response.status(), 201);

    let body: Value = response.json().await.expect("Failed to parse register response");
    body["accessToken"]
        .as_str()
        .expect("No accessToken in response")
        .to_string()
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_register_then_login() {
    let client = Client::new();
    let suffix = Uuid::new_v4().simple().to_string();
    let username = format!("reader-{}", suffix);

    let response = client
        .post(format!("{}/auth/register", BASE_URL))
        .json(&json!({
            "username": username,
            "password": "secret-password",
            "email": format!("reader-{}@example.com", suffix),
            "phone": "0000000000",
            "userType": "student",
            "code": "ST-001"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 201);

    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({
            "username": username,
            "password": "secret-password"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["accessToken"].is_string());
    assert_eq!(body["user"]["username"], username.as_str());
}

#[tokio::test]
#[ignore]
async fn test_login_invalid_credentials() {
    let client = Client::new();

    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({
            "username": "nobody",
            "password": "wrong"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["code"], "AUTH_001");
}

#[tokio::test]
#[ignore]
async fn test_list_books_requires_token() {
    let client = Client::new();

    let response = client
        .get(format!("{}/books", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);
}

#[tokio::test]
#[ignore]
async fn test_list_books_shape() {
    let client = Client::new();
    let token = register_and_get_token(&client).await;

    let response = client
        .get(format!("{}/books?page=1&limit=12", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["data"].is_array());
    assert!(body["pagination"]["total"].is_number());
    assert!(body["pagination"]["page"].is_number());
    assert!(body["pagination"]["totalPages"].is_number());
}

#[tokio::test]
#[ignore]
async fn test_detail_of_unknown_book_is_404() {
    let client = Client::new();
    let token = register_and_get_token(&client).await;

    let response = client
        .get(format!("{}/books/{}", BASE_URL, Uuid::new_v4()))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 404);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["code"], "BOOK_404");
}

#[tokio::test]
#[ignore]
async fn test_borrow_of_unknown_book_is_rejected() {
    let client = Client::new();
    let token = register_and_get_token(&client).await;

    let response = client
        .post(format!("{}/books/{}/borrow", BASE_URL, Uuid::new_v4()))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["code"], "LIB_003");
}

#[tokio::test]
#[ignore]
async fn test_profile_update_requires_password() {
    let client = Client::new();
    let token = register_and_get_token(&client).await;

    let response = client
        .put(format!("{}/users/me", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "fullName": "New Name" }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["code"], "USER_003");
}
