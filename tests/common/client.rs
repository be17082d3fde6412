//! HTTP client for end-to-end tests
//!
//! This module wraps reqwest and provides methods for all the server's
//! endpoints. When API routes or request formats change, update only this file.
#![allow(dead_code)]

use super::constants::*;
use reqwest::Response;
use serde_json::{json, Value};
use std::time::Duration;

/// HTTP test client with cookie-based session management
pub struct TestClient {
    /// The underlying reqwest client (public for custom requests in tests)
    pub client: reqwest::Client,
    /// The base URL of the test server
    pub base_url: String,
    /// Id of the logged-in user, if any
    pub user_id: Option<usize>,
}

impl TestClient {
    /// Creates a new unauthenticated client
    pub fn new(base_url: String) -> Self {
        let client = reqwest::Client::builder()
            .cookie_store(true) // Automatically handle session cookies
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("Failed to build reqwest client");

        Self {
            client,
            base_url,
            user_id: None,
        }
    }

    /// Creates a client logged in as `TEST_USER`
    ///
    /// # Panics
    ///
    /// Panics if authentication fails (indicates test infrastructure problem).
    pub async fn authenticated(base_url: String) -> Self {
        Self::authenticated_as(base_url, TEST_USER, TEST_PASS).await
    }

    /// Creates a client logged in as `OTHER_USER`
    pub async fn authenticated_other(base_url: String) -> Self {
        Self::authenticated_as(base_url, OTHER_USER, OTHER_PASS).await
    }

    async fn authenticated_as(base_url: String, username: &str, password: &str) -> Self {
        let mut client = Self::new(base_url);

        let response = client.login(username, password).await;
        assert_eq!(
            response.status(),
            reqwest::StatusCode::OK,
            "Authentication of {} failed",
            username
        );
        let body: Value = response.json().await.expect("Login body is not JSON");
        client.user_id = body["user_id"].as_u64().map(|id| id as usize);

        client
    }

    /// Id of the logged-in user.
    pub fn uid(&self) -> usize {
        self.user_id.expect("Client is not authenticated")
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api{}", self.base_url, path)
    }

    async fn get(&self, path: &str) -> Response {
        self.client
            .get(self.url(path))
            .send()
            .await
            .expect("GET request failed")
    }

    pub async fn post(&self, path: &str, body: Value) -> Response {
        self.client
            .post(self.url(path))
            .json(&body)
            .send()
            .await
            .expect("POST request failed")
    }

    async fn delete(&self, path: &str) -> Response {
        self.client
            .delete(self.url(path))
            .send()
            .await
            .expect("DELETE request failed")
    }

    // ========================================================================
    // Authentication Endpoints
    // ========================================================================

    /// POST /api/signup
    pub async fn signup(&self, username: &str, email: &str, password: &str) -> Response {
        self.post(
            "/signup",
            json!({ "username": username, "email": email, "password": password }),
        )
        .await
    }

    /// POST /api/login
    pub async fn login(&self, username: &str, password: &str) -> Response {
        self.post(
            "/login",
            json!({ "username": username, "password": password }),
        )
        .await
    }

    /// GET /api/logout
    pub async fn logout(&self) -> Response {
        self.get("/logout").await
    }

    // ========================================================================
    // Songs
    // ========================================================================

    /// GET /api/songs
    pub async fn get_songs(&self, page: Option<usize>, size: Option<usize>) -> Response {
        let mut query = vec![];
        if let Some(page) = page {
            query.push(format!("page={}", page));
        }
        if let Some(size) = size {
            query.push(format!("size={}", size));
        }
        self.get(&format!("/songs?{}", query.join("&"))).await
    }

    /// GET /api/songs/{id}
    pub async fn get_song(&self, id: usize) -> Response {
        self.get(&format!("/songs/{}", id)).await
    }

    /// GET /api/search?q=
    pub async fn search(&self, q: &str) -> Response {
        self.client
            .get(self.url("/search"))
            .query(&[("q", q)])
            .send()
            .await
            .expect("Search request failed")
    }

    /// POST /api/upload-song
    pub async fn upload_song(&self, youtube_url: &str) -> Response {
        self.post("/upload-song", json!({ "youtube_url": youtube_url }))
            .await
    }

    /// POST /api/test-mood-detection
    pub async fn test_mood_detection(&self, youtube_url: &str) -> Response {
        self.post("/test-mood-detection", json!({ "youtube_url": youtube_url }))
            .await
    }

    /// POST /api/classify
    pub async fn classify(&self, body: Value) -> Response {
        self.post("/classify", body).await
    }

    /// GET /api/health
    pub async fn health(&self) -> Response {
        self.get("/health").await
    }

    // ========================================================================
    // Favorites
    // ========================================================================

    /// GET /api/users/{uid}/favorites
    pub async fn get_favorites(&self, user_id: usize) -> Response {
        self.get(&format!("/users/{}/favorites", user_id)).await
    }

    /// POST /api/users/{uid}/favorites
    pub async fn add_favorite(&self, user_id: usize, song_id: usize) -> Response {
        self.post(
            &format!("/users/{}/favorites", user_id),
            json!({ "song_id": song_id }),
        )
        .await
    }

    /// DELETE /api/users/{uid}/favorites/{sid}
    pub async fn remove_favorite(&self, user_id: usize, song_id: usize) -> Response {
        self.delete(&format!("/users/{}/favorites/{}", user_id, song_id))
            .await
    }

    // ========================================================================
    // Playlists
    // ========================================================================

    /// GET /api/users/{uid}/playlists
    pub async fn get_playlists(&self, user_id: usize) -> Response {
        self.get(&format!("/users/{}/playlists", user_id)).await
    }

    /// POST /api/users/{uid}/playlists
    pub async fn create_playlist(&self, user_id: usize, name: &str) -> Response {
        self.post(
            &format!("/users/{}/playlists", user_id),
            json!({ "playlist_name": name }),
        )
        .await
    }

    /// Creates a playlist and returns its id.
    pub async fn create_playlist_id(&self, name: &str) -> usize {
        let response = self.create_playlist(self.uid(), name).await;
        assert_eq!(response.status(), reqwest::StatusCode::CREATED);
        let body: Value = response.json().await.unwrap();
        body["playlist"]["id"].as_u64().unwrap() as usize
    }

    /// GET /api/playlists/{pid}
    pub async fn get_playlist(&self, playlist_id: usize) -> Response {
        self.get(&format!("/playlists/{}", playlist_id)).await
    }

    /// DELETE /api/playlists/{pid}
    pub async fn delete_playlist(&self, playlist_id: usize) -> Response {
        self.delete(&format!("/playlists/{}", playlist_id)).await
    }

    /// POST /api/playlists/{pid}/songs
    pub async fn add_playlist_song(&self, playlist_id: usize, song_id: usize) -> Response {
        self.post(
            &format!("/playlists/{}/songs", playlist_id),
            json!({ "song_id": song_id }),
        )
        .await
    }

    /// DELETE /api/playlists/{pid}/songs/{sid}
    pub async fn remove_playlist_song(&self, playlist_id: usize, song_id: usize) -> Response {
        self.delete(&format!("/playlists/{}/songs/{}", playlist_id, song_id))
            .await
    }

    // ========================================================================
    // Listening History & Recommendations
    // ========================================================================

    /// GET /api/users/{uid}/history
    pub async fn get_history(&self, user_id: usize) -> Response {
        self.get(&format!("/users/{}/history", user_id)).await
    }

    /// POST /api/users/{uid}/history
    pub async fn add_history(&self, user_id: usize, song_id: usize) -> Response {
        self.post(
            &format!("/users/{}/history", user_id),
            json!({ "song_id": song_id }),
        )
        .await
    }

    /// POST /api/listening-history
    pub async fn post_listening_history(&self, body: Value) -> Response {
        self.post("/listening-history", body).await
    }

    /// GET /api/recommend_songs/{uid}
    pub async fn recommend(&self, user_id: usize, weather: Option<&str>) -> Response {
        let mut request = self
            .client
            .get(self.url(&format!("/recommend_songs/{}", user_id)));
        if let Some(weather) = weather {
            request = request.query(&[("weather", weather)]);
        }
        request.send().await.expect("Recommend request failed")
    }
}
