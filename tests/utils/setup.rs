use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, Response},
    Router,
};
use chrono::{Duration, Utc};
use serde_json::Value;
use tower::ServiceExt;

use infinity_backend::{
    player::{history::MatchEntry, repository::InMemoryPlayerRepository, PlayerRecord},
    router,
    shared::AppState,
};

pub const TEST_API_KEY: &str = "workflow-secret";

// ============================================================================
// Test Setup Infrastructure
// ============================================================================

/// Full application wired to an in-memory store, plus a handle on the
/// store for asserting side effects.
pub struct TestApp {
    pub app: Router,
    pub repository: Arc<InMemoryPlayerRepository>,
}

pub struct TestAppBuilder {
    players: Vec<PlayerRecord>,
}

impl TestAppBuilder {
    pub fn new() -> Self {
        Self { players: vec![] }
    }

    pub fn with_players(mut self, players: Vec<PlayerRecord>) -> Self {
        self.players = players;
        self
    }

    pub fn build(self) -> TestApp {
        let repository = Arc::new(InMemoryPlayerRepository::with_players(self.players));
        let state = AppState::new(repository.clone(), TEST_API_KEY.to_string());

        TestApp {
            app: router(state),
            repository,
        }
    }
}

impl TestApp {
    pub fn new() -> Self {
        TestAppBuilder::new().build()
    }

    /// GET with the configured API key
    pub async fn get(&self, uri: &str) -> Response<Body> {
        let request = Request::builder()
            .method("GET")
            .uri(uri)
            .header("x-api-key", TEST_API_KEY)
            .body(Body::empty())
            .unwrap();
        self.app.clone().oneshot(request).await.unwrap()
    }

    /// GET with an arbitrary API key
    pub async fn get_with_key(&self, uri: &str, api_key: &str) -> Response<Body> {
        let request = Request::builder()
            .method("GET")
            .uri(uri)
            .header("x-api-key", api_key)
            .body(Body::empty())
            .unwrap();
        self.app.clone().oneshot(request).await.unwrap()
    }

    /// GET without any API key
    pub async fn get_without_key(&self, uri: &str) -> Response<Body> {
        let request = Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        self.app.clone().oneshot(request).await.unwrap()
    }

    /// POST a JSON body with the configured API key
    pub async fn post_json(&self, uri: &str, body: Value) -> Response<Body> {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header("x-api-key", TEST_API_KEY)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.app.clone().oneshot(request).await.unwrap()
    }

    /// POST a JSON body without any API key
    pub async fn post_json_without_key(&self, uri: &str, body: Value) -> Response<Body> {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.app.clone().oneshot(request).await.unwrap()
    }
}

// ============================================================================
// Response helpers
// ============================================================================

/// Reads a response body as JSON
pub async fn read_json(response: Response<Body>) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

/// Reads a response body as plain text
pub async fn read_text(response: Response<Body>) -> String {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(body.to_vec()).unwrap()
}

// ============================================================================
// Record builders for seeding the store
// ============================================================================

/// Player with a given rating and win/loss record
pub fn ranked_player(id: &str, rating: i64, games_played: i64, wins: i64) -> PlayerRecord {
    let mut record = PlayerRecord::new(id);
    record.rating = rating;
    record.games_played = games_played;
    record.wins = wins;
    record
}

/// Match entry recorded `days_ago` days in the past
pub fn match_entry(win: bool, days_ago: i64) -> MatchEntry {
    MatchEntry {
        hero: "axe".to_string(),
        win,
        prestige: 0,
        kills: 0,
        damage: 0,
        recorded_at: Utc::now() - Duration::days(days_ago),
    }
}

/// Player whose only match was recorded `days_ago` days in the past
pub fn player_with_match(id: &str, win: bool, days_ago: i64) -> PlayerRecord {
    let mut record = PlayerRecord::new(id);
    record.games_played = 1;
    if win {
        record.wins = 1;
    }
    record.match_history.record(match_entry(win, days_ago));
    record
}
