//! End-to-end tests for registration and token authentication

mod common;

use common::*;
use reqwest::StatusCode;
use serde_json::{json, Value};

#[tokio::test]
async fn test_register_and_fetch_user() {
    let server = TestServer::spawn().await;
    let client = TestClient::new(server.base_url.clone());

    let response = client.add_user(TEST_USER, TEST_PASS, TEST_FULLNAME).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body: Value = response.json().await.unwrap();
    let user_id = body["data"]["userId"].as_str().unwrap().to_string();
    assert!(user_id.starts_with("user-"));

    let response = client.get_user(&user_id).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(
        body["data"]["user"],
        json!({ "id": user_id, "username": TEST_USER, "fullname": TEST_FULLNAME })
    );

    let response = client.get_user("user-unknown").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "User tidak ditemukan");
}

#[tokio::test]
async fn test_duplicate_username_is_rejected() {
    let server = TestServer::spawn().await;
    let client = TestClient::new(server.base_url.clone());

    let response = client.add_user(TEST_USER, TEST_PASS, TEST_FULLNAME).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = client.add_user(TEST_USER, "another", "Someone Else").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(
        body,
        json!({
            "status": "fail",
            "message": "Gagal menambahkan user. Username sudah digunakan."
        })
    );
}

#[tokio::test]
async fn test_login_with_wrong_credentials() {
    let server = TestServer::spawn().await;
    let client = TestClient::new(server.base_url.clone());
    client.add_user(TEST_USER, TEST_PASS, TEST_FULLNAME).await;

    let response = client.login(TEST_USER, "wrong-password").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Kredensial yang Anda berikan salah");

    let response = client.login("nobody", TEST_PASS).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_token_lifecycle() {
    let server = TestServer::spawn().await;
    let (mut client, _) = TestClient::authenticated(server.base_url.clone()).await;
    let refresh_token = client.refresh_token.clone().unwrap();

    // The access token opens protected routes
    assert_eq!(client.get_playlists().await.status(), StatusCode::OK);

    let response = client.refresh(&refresh_token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    let access_token = body["data"]["accessToken"].as_str().unwrap().to_string();
    client.access_token = Some(access_token);
    assert_eq!(client.get_playlists().await.status(), StatusCode::OK);

    let response = client.logout(&refresh_token).await;
    assert_eq!(response.status(), StatusCode::OK);

    // Once deleted, the refresh token can no longer be used
    let response = client.refresh(&refresh_token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Refresh token tidak valid");

    let response = client.logout(&refresh_token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_access_token_is_not_a_refresh_token() {
    let server = TestServer::spawn().await;
    let (client, _) = TestClient::authenticated(server.base_url.clone()).await;
    let access_token = client.access_token.clone().unwrap();

    let response = client.refresh(&access_token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_invalid_bearer_token_is_unauthorized() {
    let server = TestServer::spawn().await;
    let mut client = TestClient::new(server.base_url.clone());
    client.access_token = Some("not-a-token".to_string());

    let response = client.get_playlists().await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], "fail");
}
