//! Test helpers for integration tests
//!
//! Provides utilities for spawning test servers, seeding users and channels,
//! minting access tokens and making HTTP requests.

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Result;
use chat_api::{create_app, create_app_state, AppState};
use chat_common::{AppConfig, JwtService};
use chat_core::{Channel, Snowflake, User};
use reqwest::{Client, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Test server instance that manages lifecycle
pub struct TestServer {
    pub addr: SocketAddr,
    pub client: Client,
    state: AppState,
    _handle: JoinHandle<()>,
}

impl TestServer {
    /// Start a new test server on an ephemeral port
    pub async fn start() -> Result<Self> {
        let config = test_config()?;
        let state = create_app_state(config).await?;
        let app = create_app(state.clone())?;

        let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
        let addr = listener.local_addr()?;

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        let client = Client::builder().timeout(Duration::from_secs(10)).build()?;

        Ok(Self {
            addr,
            client,
            state,
            _handle: handle,
        })
    }

    /// Get base URL for the server
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    fn jwt(&self) -> &JwtService {
        self.state.jwt_service()
    }

    /// Create a user directly in the store and return an access token for it
    pub async fn create_user(&self, name: Option<&str>) -> Result<TestUser> {
        let ctx = self.state.service_context();
        let user = User::new(ctx.generate_id(), name.map(str::to_string));
        ctx.user_repo().create(&user).await?;

        let token = self.jwt().issue_access_token(user.id)?;
        Ok(TestUser { id: user.id, token })
    }

    /// A token whose subject has no user row
    pub fn token_for_unknown_user(&self) -> Result<String> {
        let ctx = self.state.service_context();
        Ok(self.jwt().issue_access_token(ctx.generate_id())?)
    }

    /// Create a channel directly in the store
    pub async fn create_channel(&self, name: &str) -> Result<Snowflake> {
        let ctx = self.state.service_context();
        let channel = Channel::new(ctx.generate_id(), name);
        ctx.channel_repo().create(&channel).await?;
        Ok(channel.id)
    }

    /// Make a GET request
    pub async fn get(&self, path: &str) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self.client.get(&url).send().await?)
    }

    /// Make a GET request with auth token
    pub async fn get_auth(&self, path: &str, token: &str) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self.client.get(&url).bearer_auth(token).send().await?)
    }

    /// Make a POST request with auth token and JSON body
    pub async fn post_auth<T: Serialize>(
        &self,
        path: &str,
        token: &str,
        body: &T,
    ) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self
            .client
            .post(&url)
            .bearer_auth(token)
            .json(body)
            .send()
            .await?)
    }

    /// Make a POST request with auth token and no body
    pub async fn post_auth_empty(&self, path: &str, token: &str) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self.client.post(&url).bearer_auth(token).send().await?)
    }
}

/// A seeded user and its access token
#[derive(Debug, Clone)]
pub struct TestUser {
    pub id: Snowflake,
    pub token: String,
}

/// Configuration from the environment; the port is irrelevant because the
/// test server binds its own listener
pub fn test_config() -> Result<AppConfig> {
    dotenvy::dotenv().ok();

    AppConfig::from_lookup(|key: &str| match std::env::var(key) {
        Ok(value) => Some(value),
        Err(_) if key == "API_PORT" => Some("0".to_string()),
        Err(_) if key == "JWT_SECRET" => Some("integration-test-secret".to_string()),
        Err(_) => None,
    })
    .map_err(|e| anyhow::anyhow!("Config error: {e}"))
}

/// Helper to check if test environment is available
pub fn check_test_env() -> bool {
    for var in ["DATABASE_URL", "REDIS_URL"] {
        if std::env::var(var).is_err() {
            eprintln!("Skipping test: {var} not set");
            return false;
        }
    }
    true
}

/// Assert response status and parse JSON body
pub async fn assert_json<T: DeserializeOwned>(response: Response, expected_status: StatusCode) -> Result<T> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        anyhow::bail!("Expected status {expected_status}, got {status}. Body: {body}");
    }
    Ok(response.json().await?)
}

/// Assert response status without parsing body
pub async fn assert_status(response: Response, expected_status: StatusCode) -> Result<()> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        anyhow::bail!("Expected status {expected_status}, got {status}. Body: {body}");
    }
    Ok(())
}
