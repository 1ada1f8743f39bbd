use async_trait::async_trait;
use crate::error::Result;

/// Anything that can turn a paper URL into the GitHub links it cites.
#[async_trait]
pub trait PaperSource: Send + Sync {
    async fn extract_links(&self, url: &str) -> Result<Vec<String>>;
}
