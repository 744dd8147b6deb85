use std::sync::Arc;

use anyhow::{Context, Result};
use questoes_api::database::models::{Question, User};
use questoes_api::testing::{MemoryBackend, MemoryHealth, MemoryStore};

/// A live server on a free port, backed by in-memory stores
pub struct TestServer {
    pub base_url: String,
    pub client: reqwest::Client,
    pub questions: Arc<MemoryStore<Question>>,
    pub users: Arc<MemoryStore<User>>,
    pub health: Arc<MemoryHealth>,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

pub async fn spawn_server() -> Result<TestServer> {
    // Pick an unused port for isolation
    let port = portpicker::pick_unused_port().context("failed to pick free port")?;
    let base_url = format!("http://127.0.0.1:{}", port);

    let backend = MemoryBackend::new();
    let router = backend.router();

    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
        .await
        .context("failed to bind test port")?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });

    Ok(TestServer {
        base_url,
        client: reqwest::Client::new(),
        questions: backend.questions.clone(),
        users: backend.users.clone(),
        health: backend.health.clone(),
    })
}
