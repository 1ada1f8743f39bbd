use async_trait::async_trait;
use reqwest::{header, Client, StatusCode};
use std::time::Duration;

use crate::error::Result;
use crate::models::RepoRef;

/// Answers whether a repository's model weights are already published.
#[async_trait]
pub trait WeightsRegistry: Send + Sync {
    async fn has_published_weights(&self, repo: &RepoRef) -> bool;
}

/// Never finds weights, so every repository gets an issue.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoWeightsRegistry;

#[async_trait]
impl WeightsRegistry for NoWeightsRegistry {
    async fn has_published_weights(&self, _repo: &RepoRef) -> bool {
        false
    }
}

/// Looks the repository up as a model id on the Hugging Face Hub.
pub struct HuggingFaceRegistry {
    client: Client,
    base_url: String,
}

impl HuggingFaceRegistry {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::USER_AGENT,
            header::HeaderValue::from_static("gh-issues-agent/0.1"),
        );

        let client = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    pub fn model_url(&self, repo: &RepoRef) -> String {
        format!(
            "{}/api/models/{}/{}",
            self.base_url,
            repo.owner.to_lowercase(),
            repo.repo.to_lowercase()
        )
    }
}

#[async_trait]
impl WeightsRegistry for HuggingFaceRegistry {
    /// An unreachable Hub counts as "not published".
    async fn has_published_weights(&self, repo: &RepoRef) -> bool {
        let url = self.model_url(repo);

        match self.client.get(&url).send().await {
            Ok(response) if response.status() == StatusCode::OK => {
                tracing::info!("Weights for {} already on the Hub", repo);
                true
            }
            Ok(response) => {
                tracing::debug!("No Hub model for {} ({})", repo, response.status());
                false
            }
            Err(e) => {
                tracing::warn!("Hub lookup for {} failed: {}", repo, e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_url_is_lowercased() {
        let registry =
            HuggingFaceRegistry::new("https://huggingface.co", Duration::from_secs(5)).unwrap();
        assert_eq!(
            registry.model_url(&RepoRef::new("MiniMax-AI", "MiniMax-M1")),
            "https://huggingface.co/api/models/minimax-ai/minimax-m1"
        );
    }

    #[tokio::test]
    async fn test_placeholder_never_finds_weights() {
        let registry = NoWeightsRegistry;
        assert!(!registry.has_published_weights(&RepoRef::new("a", "b")).await);
    }

    #[tokio::test]
    async fn test_existing_model_is_published() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/models/minimax-ai/minimax-m1")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"id": "MiniMaxAI/MiniMax-M1", "private": false}"#)
            .create_async()
            .await;

        let registry = HuggingFaceRegistry::new(server.url(), Duration::from_secs(5)).unwrap();
        assert!(registry
            .has_published_weights(&RepoRef::new("MiniMax-AI", "MiniMax-M1"))
            .await);

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_missing_model_is_not_published() {
        let mut server = mockito::Server::new_async().await;
        let missing = server
            .mock("GET", "/api/models/lab/model")
            .with_status(404)
            .with_body(r#"{"error": "Repository not found"}"#)
            .create_async()
            .await;
        let gated = server
            .mock("GET", "/api/models/lab/private")
            .with_status(401)
            .create_async()
            .await;

        let registry = HuggingFaceRegistry::new(server.url(), Duration::from_secs(5)).unwrap();
        assert!(!registry.has_published_weights(&RepoRef::new("lab", "model")).await);
        assert!(!registry.has_published_weights(&RepoRef::new("lab", "private")).await);

        missing.assert_async().await;
        gated.assert_async().await;
    }

    #[tokio::test]
    async fn test_unreachable_registry_fails_open() {
        let registry =
            HuggingFaceRegistry::new("http://127.0.0.1:9", Duration::from_secs(2)).unwrap();
        assert!(!registry.has_published_weights(&RepoRef::new("a", "b")).await);
    }
}
