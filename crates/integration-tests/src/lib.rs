//! End-to-end tests for the Bazaar marketplace API.
//!
//! Each test spawns a real server on an ephemeral localhost port, backed by
//! an in-memory `SQLite` database, and drives it with `reqwest`. Tests are
//! fully self-contained; no external services are required.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p bazaar-integration-tests
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::str::FromStr;
use std::time::Duration;

use secrecy::SecretString;
use serde_json::{Value, json};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

use bazaar_api::config::ApiConfig;
use bazaar_api::state::AppState;
use bazaar_api::{db, routes};

/// A running API server under test.
pub struct TestApp {
    /// Base URL of the server, e.g. `http://127.0.0.1:49152`.
    pub base_url: String,
    /// HTTP client for driving the server.
    pub client: reqwest::Client,
}

impl TestApp {
    /// Spawn a server on an ephemeral port with a fresh in-memory database.
    ///
    /// # Panics
    ///
    /// Panics if the database or listener cannot be set up; tests cannot
    /// proceed without them.
    pub async fn spawn() -> Self {
        let config = ApiConfig {
            database_url: SecretString::from("sqlite::memory:"),
            host: "127.0.0.1".parse().expect("valid host"),
            port: 0,
            token_secret: SecretString::from("kP9#mW2$vQ7!xT4@nB6^zR8&cJ1*fH3%"),
            token_ttl: Duration::from_secs(3600),
            sentry_dsn: None,
            sentry_environment: None,
        };

        // Single connection so every query sees the same in-memory database
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .expect("valid database URL")
            .foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .expect("failed to open in-memory database");
        db::init_schema(&pool).await.expect("failed to create schema");

        let state = AppState::new(&config, pool);
        let app = routes::routes().with_state(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind test listener");
        let addr = listener.local_addr().expect("listener has an address");

        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("test server error");
        });

        Self {
            base_url: format!("http://{addr}"),
            client: reqwest::Client::new(),
        }
    }

    /// Full URL for a path.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Register an account.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be sent.
    pub async fn register(
        &self,
        email: &str,
        username: &str,
        password: &str,
    ) -> reqwest::Response {
        self.client
            .post(self.url("/auth/register"))
            .json(&json!({
                "email": email,
                "username": username,
                "password": password,
            }))
            .send()
            .await
            .expect("register request failed")
    }

    /// Log in and return the access token.
    ///
    /// # Panics
    ///
    /// Panics if login does not succeed.
    pub async fn login_token(&self, email: &str, password: &str) -> String {
        let response = self
            .client
            .post(self.url("/auth/login"))
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .expect("login request failed");
        assert_eq!(response.status(), reqwest::StatusCode::OK);

        let body: Value = response.json().await.expect("login response is JSON");
        body["access_token"]
            .as_str()
            .expect("login response has access_token")
            .to_owned()
    }

    /// Register an account and return a logged-in token for it.
    ///
    /// # Panics
    ///
    /// Panics if registration or login fails.
    pub async fn register_and_login(&self, email: &str, username: &str, password: &str) -> String {
        let response = self.register(email, username, password).await;
        assert_eq!(response.status(), reqwest::StatusCode::CREATED);
        self.login_token(email, password).await
    }

    /// Create a product and return its record.
    ///
    /// # Panics
    ///
    /// Panics if creation fails.
    pub async fn create_product(&self, token: &str, title: &str, category: &str) -> Value {
        let response = self
            .client
            .post(self.url("/products/"))
            .bearer_auth(token)
            .json(&json!({
                "title": title,
                "description": "a fine item",
                "category": category,
                "price": "19.99",
                "image_url": "https://img.example/item.png",
            }))
            .send()
            .await
            .expect("create product request failed");
        assert_eq!(response.status(), reqwest::StatusCode::CREATED);

        response.json().await.expect("product response is JSON")
    }
}
