#![allow(dead_code)]

use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::StatusCode;
use serde_json::Value;

use city_info_api::auth::{generate_jwt, Claims};
use city_info_api::config::AppConfig;
use city_info_api::database::DatabaseManager;
use city_info_api::{app, AppState};

/// A server running inside the calling test's runtime with its own seeded in-memory store
pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    pub config: AppConfig,
    pub client: reqwest::Client,
}

impl TestServer {
    async fn spawn(config: AppConfig) -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        let repository = DatabaseManager::connect(&config.database).await?;
        let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
            .await
            .context("failed to bind test port")?;
        let router = app(AppState::new(config.clone(), repository));
        tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });

        Ok(Self {
            port,
            base_url,
            config,
            client: reqwest::Client::new(),
        })
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline {
                break;
            }
            if let Ok(resp) = self.client.get(self.url("/health")).send().await {
                if resp.status() == StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Token signed with the server's own settings carrying the given `city` claim
    pub fn token_for_city(&self, city: Option<&str>) -> String {
        let security = &self.config.security;
        let claims = Claims::new("1".into(), "Rhea".into(), "Doggie".into(), city.map(str::to_string), security);
        generate_jwt(&claims, security).expect("sign test token")
    }

    /// Token for a caller without a city claim
    pub fn token(&self) -> String {
        self.token_for_city(None)
    }

    /// Id of the seeded or created city with exactly this name
    pub async fn city_id(&self, name: &str) -> Result<i64> {
        let res = self
            .client
            .get(self.url("/api/cities"))
            .query(&[("name", name)])
            .bearer_auth(self.token())
            .send()
            .await?;
        let body: Value = res.json().await?;
        body["data"][0]["id"]
            .as_i64()
            .with_context(|| format!("city {} not found", name))
    }

    pub async fn create_city(&self, name: &str) -> Result<i64> {
        let res = self
            .client
            .post(self.url("/api/cities"))
            .bearer_auth(self.token())
            .json(&serde_json::json!({ "name": name }))
            .send()
            .await?;
        anyhow::ensure!(res.status() == StatusCode::CREATED, "create city returned {}", res.status());
        let body: Value = res.json().await?;
        body["data"]["id"].as_i64().context("created city has no id")
    }
}

/// Fresh server over the seeded development configuration
pub async fn spawn_server() -> Result<TestServer> {
    spawn_server_with(AppConfig::development()).await
}

pub async fn spawn_server_with(config: AppConfig) -> Result<TestServer> {
    let server = TestServer::spawn(config).await?;
    server.wait_ready(Duration::from_secs(10)).await?;
    Ok(server)
}
