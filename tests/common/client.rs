//! HTTP client for end-to-end tests
//!
//! This module provides a high-level HTTP client that wraps reqwest
//! and provides methods for the OpenMusic endpoints.
//!
//! When API routes or request formats change, update only this file.

use super::constants::*;
use reqwest::{RequestBuilder, Response};
use serde_json::{json, Value};
use std::time::Duration;

/// HTTP test client with bearer-token session management
pub struct TestClient {
    /// The underlying reqwest client (public for custom requests in tests)
    pub client: reqwest::Client,
    /// The base URL of the test server
    pub base_url: String,
    /// Access token attached to every request when present
    pub access_token: Option<String>,
    /// Refresh token obtained at login
    pub refresh_token: Option<String>,
}

impl TestClient {
    /// Creates a new unauthenticated client
    pub fn new(base_url: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("Failed to build reqwest client");

        Self {
            client,
            base_url,
            access_token: None,
            refresh_token: None,
        }
    }

    /// Registers `username` and returns a client logged in as them,
    /// along with the new user id.
    ///
    /// # Panics
    ///
    /// Panics if registration or login fails (indicates test infrastructure problem).
    pub async fn registered(base_url: String, username: &str, password: &str) -> (Self, String) {
        let mut client = Self::new(base_url);

        let response = client.add_user(username, password, TEST_FULLNAME).await;
        assert_eq!(
            response.status(),
            reqwest::StatusCode::CREATED,
            "User registration failed"
        );
        let body: Value = response.json().await.expect("Invalid registration body");
        let user_id = body["data"]["userId"]
            .as_str()
            .expect("Missing userId")
            .to_string();

        let response = client.login(username, password).await;
        assert_eq!(
            response.status(),
            reqwest::StatusCode::CREATED,
            "Test user authentication failed"
        );
        let body: Value = response.json().await.expect("Invalid login body");
        client.access_token = body["data"]["accessToken"].as_str().map(String::from);
        client.refresh_token = body["data"]["refreshToken"].as_str().map(String::from);

        (client, user_id)
    }

    /// Creates a client logged in as the regular test user
    pub async fn authenticated(base_url: String) -> (Self, String) {
        Self::registered(base_url, TEST_USER, TEST_PASS).await
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn with_auth(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.access_token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send(&self, builder: RequestBuilder) -> Response {
        self.with_auth(builder)
            .send()
            .await
            .expect("Request failed")
    }

    // ========================================================================
    // Users and Authentication Endpoints
    // ========================================================================

    /// POST /users
    pub async fn add_user(&self, username: &str, password: &str, fullname: &str) -> Response {
        self.send(self.client.post(self.url("/users")).json(&json!({
            "username": username,
            "password": password,
            "fullname": fullname,
        })))
        .await
    }

    /// GET /users/{id}
    pub async fn get_user(&self, id: &str) -> Response {
        self.send(self.client.get(self.url(&format!("/users/{}", id))))
            .await
    }

    /// POST /authentications
    pub async fn login(&self, username: &str, password: &str) -> Response {
        self.send(self.client.post(self.url("/authentications")).json(&json!({
            "username": username,
            "password": password,
        })))
        .await
    }

    /// PUT /authentications
    pub async fn refresh(&self, refresh_token: &str) -> Response {
        self.send(
            self.client
                .put(self.url("/authentications"))
                .json(&json!({ "refreshToken": refresh_token })),
        )
        .await
    }

    /// DELETE /authentications
    pub async fn logout(&self, refresh_token: &str) -> Response {
        self.send(
            self.client
                .delete(self.url("/authentications"))
                .json(&json!({ "refreshToken": refresh_token })),
        )
        .await
    }

    // ========================================================================
    // Album Endpoints
    // ========================================================================

    /// POST /albums
    pub async fn add_album(&self, name: &str, year: i64) -> Response {
        self.send(
            self.client
                .post(self.url("/albums"))
                .json(&json!({ "name": name, "year": year })),
        )
        .await
    }

    /// POST /albums and returns the new album id
    pub async fn create_album(&self) -> String {
        let response = self.add_album(ALBUM_NAME, ALBUM_YEAR).await;
        assert_eq!(response.status(), reqwest::StatusCode::CREATED);
        data_string(response, "albumId").await
    }

    /// GET /albums/{id}
    pub async fn get_album(&self, id: &str) -> Response {
        self.send(self.client.get(self.url(&format!("/albums/{}", id))))
            .await
    }

    /// PUT /albums/{id}
    pub async fn edit_album(&self, id: &str, name: &str, year: i64) -> Response {
        self.send(
            self.client
                .put(self.url(&format!("/albums/{}", id)))
                .json(&json!({ "name": name, "year": year })),
        )
        .await
    }

    /// DELETE /albums/{id}
    pub async fn delete_album(&self, id: &str) -> Response {
        self.send(self.client.delete(self.url(&format!("/albums/{}", id))))
            .await
    }

    /// POST /albums/{id}/covers
    pub async fn upload_cover(
        &self,
        id: &str,
        file_name: &str,
        mime: &str,
        bytes: Vec<u8>,
    ) -> Response {
        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str(mime)
            .expect("Invalid mime type");
        let form = reqwest::multipart::Form::new().part("cover", part);
        self.send(
            self.client
                .post(self.url(&format!("/albums/{}/covers", id)))
                .multipart(form),
        )
        .await
    }

    /// POST /albums/{id}/likes
    pub async fn toggle_like(&self, id: &str) -> Response {
        self.send(self.client.post(self.url(&format!("/albums/{}/likes", id))))
            .await
    }

    /// GET /albums/{id}/likes
    pub async fn get_likes(&self, id: &str) -> Response {
        self.send(self.client.get(self.url(&format!("/albums/{}/likes", id))))
            .await
    }

    // ========================================================================
    // Song Endpoints
    // ========================================================================

    /// POST /songs with an arbitrary body
    pub async fn add_song(&self, body: Value) -> Response {
        self.send(self.client.post(self.url("/songs")).json(&body))
            .await
    }

    /// POST /songs with sample data and returns the new song id
    pub async fn create_song(&self, title: &str, album_id: Option<&str>) -> String {
        let mut body = json!({
            "title": title,
            "year": ALBUM_YEAR,
            "genre": SONG_GENRE,
            "performer": SONG_PERFORMER,
            "duration": 240,
        });
        if let Some(album_id) = album_id {
            body["albumId"] = json!(album_id);
        }
        let response = self.add_song(body).await;
        assert_eq!(response.status(), reqwest::StatusCode::CREATED);
        data_string(response, "songId").await
    }

    /// GET /songs with optional query filters
    pub async fn get_songs(&self, query: &[(&str, &str)]) -> Response {
        self.send(self.client.get(self.url("/songs")).query(query))
            .await
    }

    /// GET /songs/{id}
    pub async fn get_song(&self, id: &str) -> Response {
        self.send(self.client.get(self.url(&format!("/songs/{}", id))))
            .await
    }

    /// PUT /songs/{id}
    pub async fn edit_song(&self, id: &str, body: Value) -> Response {
        self.send(
            self.client
                .put(self.url(&format!("/songs/{}", id)))
                .json(&body),
        )
        .await
    }

    /// DELETE /songs/{id}
    pub async fn delete_song(&self, id: &str) -> Response {
        self.send(self.client.delete(self.url(&format!("/songs/{}", id))))
            .await
    }

    // ========================================================================
    // Playlist Endpoints
    // ========================================================================

    /// POST /playlists
    pub async fn add_playlist(&self, name: &str) -> Response {
        self.send(
            self.client
                .post(self.url("/playlists"))
                .json(&json!({ "name": name })),
        )
        .await
    }

    /// POST /playlists and returns the new playlist id
    pub async fn create_playlist(&self) -> String {
        let response = self.add_playlist(PLAYLIST_NAME).await;
        assert_eq!(response.status(), reqwest::StatusCode::CREATED);
        data_string(response, "playlistId").await
    }

    /// GET /playlists
    pub async fn get_playlists(&self) -> Response {
        self.send(self.client.get(self.url("/playlists"))).await
    }

    /// DELETE /playlists/{id}
    pub async fn delete_playlist(&self, id: &str) -> Response {
        self.send(self.client.delete(self.url(&format!("/playlists/{}", id))))
            .await
    }

    /// POST /playlists/{id}/songs
    pub async fn add_playlist_song(&self, id: &str, song_id: &str) -> Response {
        self.send(
            self.client
                .post(self.url(&format!("/playlists/{}/songs", id)))
                .json(&json!({ "songId": song_id })),
        )
        .await
    }

    /// GET /playlists/{id}/songs
    pub async fn get_playlist_songs(&self, id: &str) -> Response {
        self.send(self.client.get(self.url(&format!("/playlists/{}/songs", id))))
            .await
    }

    /// DELETE /playlists/{id}/songs
    pub async fn delete_playlist_song(&self, id: &str, song_id: &str) -> Response {
        self.send(
            self.client
                .delete(self.url(&format!("/playlists/{}/songs", id)))
                .json(&json!({ "songId": song_id })),
        )
        .await
    }

    /// GET /playlists/{id}/activities
    pub async fn get_activities(&self, id: &str) -> Response {
        self.send(
            self.client
                .get(self.url(&format!("/playlists/{}/activities", id))),
        )
        .await
    }

    // ========================================================================
    // Collaboration and Export Endpoints
    // ========================================================================

    /// POST /collaborations
    pub async fn add_collaborator(&self, playlist_id: &str, user_id: &str) -> Response {
        self.send(self.client.post(self.url("/collaborations")).json(&json!({
            "playlistId": playlist_id,
            "userId": user_id,
        })))
        .await
    }

    /// DELETE /collaborations
    pub async fn remove_collaborator(&self, playlist_id: &str, user_id: &str) -> Response {
        self.send(self.client.delete(self.url("/collaborations")).json(&json!({
            "playlistId": playlist_id,
            "userId": user_id,
        })))
        .await
    }

    /// POST /export/playlists/{id}
    pub async fn export_playlist(&self, id: &str, target_email: &str) -> Response {
        self.send(
            self.client
                .post(self.url(&format!("/export/playlists/{}", id)))
                .json(&json!({ "targetEmail": target_email })),
        )
        .await
    }
}

/// Reads `data.<key>` from a success envelope as a string.
async fn data_string(response: Response, key: &str) -> String {
    let body: Value = response.json().await.expect("Invalid JSON body");
    body["data"][key]
        .as_str()
        .unwrap_or_else(|| panic!("Missing data.{} in {}", key, body))
        .to_string()
}
