use std::sync::Arc;

use crate::config::PipelineConfig;
use crate::extract::PaperSource;
use crate::github::parse_repo_ref;
use crate::models::{RepoRef, ScanReport, SourceFailure};
use crate::pipeline::batch::{map_isolated, progress_bar};

/// Extraction and parsing stages, shared by scan-only and posting runs.
pub struct Scanner {
    source: Arc<dyn PaperSource>,
    config: PipelineConfig,
}

impl Scanner {
    pub fn new(source: impl PaperSource + 'static, config: PipelineConfig) -> Self {
        Self {
            source: Arc::new(source),
            config,
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Extracts links from every source and flattens them in source order.
    /// Sources that fail are returned separately and contribute no links.
    pub async fn extract_all(&self, sources: &[String]) -> (Vec<String>, Vec<SourceFailure>) {
        let pb = progress_bar(sources.len(), "papers", self.config.show_progress);
        let source = &self.source;

        let results = map_isolated(
            sources.to_vec(),
            self.config.concurrency_limit,
            &pb,
            |url| async move { source.extract_links(&url).await },
        )
        .await;
        pb.finish_and_clear();

        let mut links = Vec::new();
        let mut failures = Vec::new();

        for (url, result) in sources.iter().zip(results) {
            match result {
                Ok(found) => links.extend(found),
                Err(e) => {
                    tracing::warn!("Skipping {}: {}", url, e);
                    failures.push(SourceFailure {
                        source: url.clone(),
                        error: e.to_string(),
                    });
                }
            }
        }

        tracing::info!("Extracted {} urls", links.len());
        (links, failures)
    }

    /// Links with override applied. Non-empty overrides replace the
    /// extracted list entirely.
    pub fn target_links(&self, links: Vec<String>) -> Vec<String> {
        if self.config.override_repos.is_empty() {
            return links;
        }
        tracing::info!("Overriding with {}", self.config.override_repos.join(", "));
        self.config.override_repos.clone()
    }

    pub async fn scan(&self, sources: &[String]) -> ScanReport {
        let (links, failed_sources) = self.extract_all(sources).await;
        let repos = parse_all(&self.target_links(links.clone()));

        ScanReport {
            links,
            repos,
            failed_sources,
        }
    }
}

/// Parses every link, dropping the ones without an owner/repo path.
pub fn parse_all(links: &[String]) -> Vec<RepoRef> {
    links
        .iter()
        .filter_map(|link| {
            let parsed = parse_repo_ref(link);
            if parsed.is_none() {
                tracing::debug!("No repository in {}", link);
            }
            parsed
        })
        .collect()
}
