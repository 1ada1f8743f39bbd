use async_trait::async_trait;
use reqwest::{header, Client};
use std::time::Duration;

use crate::error::{Error, Result};
use crate::extract::links::scan_github_links;
use crate::extract::source::PaperSource;

/// Downloads papers over HTTP and scans their text layer for GitHub links.
pub struct PdfLinkExtractor {
    client: Client,
}

impl PdfLinkExtractor {
    pub fn new(timeout: Duration) -> Result<Self> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::USER_AGENT,
            header::HeaderValue::from_static("gh-issues-agent/0.1"),
        );

        let client = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self { client })
    }

    pub async fn fetch_pdf(&self, url: &str) -> Result<Vec<u8>> {
        tracing::debug!("Downloading {}", url);

        let response = self.client.get(url).send().await.map_err(|e| Error::Fetch {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Fetch {
                url: url.to_string(),
                reason: format!("HTTP {}", status),
            });
        }

        let bytes = response.bytes().await.map_err(|e| Error::Fetch {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        tracing::debug!("Downloaded {} bytes from {}", bytes.len(), url);
        Ok(bytes.to_vec())
    }
}

#[async_trait]
impl PaperSource for PdfLinkExtractor {
    async fn extract_links(&self, url: &str) -> Result<Vec<String>> {
        let bytes = self.fetch_pdf(url).await?;

        // Text extraction is CPU-bound; keep it off the async workers.
        let text = tokio::task::spawn_blocking(move || extract_pdf_text(&bytes))
            .await
            .map_err(|e| Error::Parse(format!("Extraction task failed: {}", e)))??;

        let links = scan_github_links(&text);
        tracing::info!("Found {} GitHub links in {}", links.len(), url);
        Ok(links)
    }
}

/// Extracts the text layer of every page, in document order, concatenated.
pub fn extract_pdf_text(bytes: &[u8]) -> Result<String> {
    // pdf-extract panics on some malformed documents instead of returning an error.
    let pages = std::panic::catch_unwind(|| pdf_extract::extract_text_from_mem_by_pages(bytes))
        .map_err(|_| Error::Parse("PDF text extraction panicked".to_string()))?
        .map_err(|e| Error::Parse(e.to_string()))?;

    Ok(pages.concat())
}
