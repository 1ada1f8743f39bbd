use std::sync::Arc;

use chrono::Utc;

use crate::github::IssueTracker;
use crate::huggingface::{NoWeightsRegistry, WeightsRegistry};
use crate::models::{IssueResult, RepoRef, RunSummary};
use crate::pipeline::batch::{map_isolated, progress_bar};
use crate::pipeline::scanner::{parse_all, Scanner};

/// Drives the whole run: extract, parse, filter, post, aggregate.
pub struct IssueAgent {
    scanner: Scanner,
    tracker: Arc<dyn IssueTracker>,
    registry: Arc<dyn WeightsRegistry>,
}

impl IssueAgent {
    pub fn new(scanner: Scanner, tracker: impl IssueTracker + 'static) -> Self {
        Self {
            scanner,
            tracker: Arc::new(tracker),
            registry: Arc::new(NoWeightsRegistry),
        }
    }

    /// Skip repositories whose weights the registry already knows about.
    pub fn with_registry(mut self, registry: impl WeightsRegistry + 'static) -> Self {
        self.registry = Arc::new(registry);
        self
    }

    pub async fn run(&self, sources: &[String]) -> RunSummary {
        let mut summary = RunSummary::new(sources.len(), Utc::now());
        let limit = self.scanner.config().concurrency_limit;
        let show_progress = self.scanner.config().show_progress;

        // Step 1: Extract links from every paper
        let (links, failed_sources) = self.scanner.extract_all(sources).await;
        summary.extracted_links = links.len();
        summary.failed_sources = failed_sources;

        // Step 2: Resolve repositories
        let repos = parse_all(&self.scanner.target_links(links));
        tracing::info!("Resolved {} repositories", repos.len());

        // Step 3: Drop repositories that already publish weights
        let repos = self.unpublished(repos, limit, &mut summary).await;

        // Step 4: Post issues
        let pb = progress_bar(repos.len(), "issues", show_progress);
        let tracker = &self.tracker;
        let results = map_isolated(repos.clone(), limit, &pb, |repo| async move {
            Ok(tracker.post_issue(&repo.owner, &repo.repo).await)
        })
        .await;
        pb.finish_and_clear();

        // Step 5: Aggregate
        for (repo, result) in repos.iter().zip(results) {
            let result = result.unwrap_or_else(|e| IssueResult::failed(None, e.to_string()));
            summary.record(repo, result);
        }

        summary.finished_at = Utc::now();
        tracing::info!(
            "Total success: {}, total failures: {}",
            summary.total_success,
            summary.total_failure
        );
        summary
    }

    async fn unpublished(
        &self,
        repos: Vec<RepoRef>,
        limit: usize,
        summary: &mut RunSummary,
    ) -> Vec<RepoRef> {
        let registry = &self.registry;
        let checks = map_isolated(
            repos.clone(),
            limit,
            &indicatif::ProgressBar::hidden(),
            |repo| async move { Ok(registry.has_published_weights(&repo).await) },
        )
        .await;

        let mut remaining = Vec::with_capacity(repos.len());
        for (repo, published) in repos.into_iter().zip(checks) {
            if matches!(published, Ok(true)) {
                summary.skipped.push(repo.to_string());
            } else {
                remaining.push(repo);
            }
        }
        remaining
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PipelineConfig;
    use crate::error::{Error, Result};
    use crate::extract::PaperSource;
    use async_trait::async_trait;
    use std::collections::HashMap;

    struct FakeSource(HashMap<&'static str, Vec<&'static str>>);

    #[async_trait]
    impl PaperSource for FakeSource {
        async fn extract_links(&self, url: &str) -> Result<Vec<String>> {
            self.0
                .get(url)
                .map(|links| links.iter().map(|l| l.to_string()).collect())
                .ok_or_else(|| Error::Parse(format!("{} is not a PDF", url)))
        }
    }

    /// Creates issue #1 on every repo except the ones in `forbidden`.
    #[derive(Default)]
    struct FakeTracker {
        forbidden: Vec<&'static str>,
    }

    #[async_trait]
    impl IssueTracker for FakeTracker {
        async fn post_issue(&self, owner: &str, repo: &str) -> IssueResult {
            if self.forbidden.iter().any(|f| *f == repo) {
                return IssueResult::failed(Some(403), "Resource not accessible");
            }
            IssueResult::created(format!("https://github.com/{}/{}/issues/1", owner, repo))
        }
    }

    struct KnownWeights(Vec<&'static str>);

    #[async_trait]
    impl WeightsRegistry for KnownWeights {
        async fn has_published_weights(&self, repo: &RepoRef) -> bool {
            self.0.iter().any(|r| *r == repo.repo)
        }
    }

    fn source() -> FakeSource {
        let mut papers = HashMap::new();
        papers.insert(
            "https://papers.org/with-code.pdf",
            vec!["https://github.com/lab/model", "https://github.com/lab/data.git"],
        );
        papers.insert("https://papers.org/theory.pdf", vec![]);
        FakeSource(papers)
    }

    fn urls(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_end_to_end_two_papers() {
        let scanner = Scanner::new(source(), PipelineConfig::default());
        let agent = IssueAgent::new(scanner, FakeTracker::default());

        let summary = agent
            .run(&urls(&["https://papers.org/with-code.pdf", "https://papers.org/theory.pdf"]))
            .await;

        assert_eq!(summary.total_success, 2);
        assert_eq!(summary.total_failure, 0);
        assert_eq!(
            summary.urls,
            urls(&[
                "https://github.com/lab/model/issues/1",
                "https://github.com/lab/data/issues/1",
            ])
        );
        assert_eq!(summary.extracted_links, 2);
        assert!(summary.failed_sources.is_empty());
        assert!(!summary.is_total_failure());
    }

    #[tokio::test]
    async fn test_failures_are_collected_not_thrown() {
        let scanner = Scanner::new(source(), PipelineConfig::default());
        let tracker = FakeTracker {
            forbidden: vec!["model"],
        };
        let agent = IssueAgent::new(scanner, tracker);

        let summary = agent
            .run(&urls(&["https://papers.org/broken.pdf", "https://papers.org/with-code.pdf"]))
            .await;

        assert_eq!(summary.total_success, 1);
        assert_eq!(summary.total_failure, 1);
        assert_eq!(summary.urls, urls(&["https://github.com/lab/data/issues/1"]));
        assert_eq!(summary.failed_sources.len(), 1);
        assert_eq!(summary.failed_sources[0].source, "https://papers.org/broken.pdf");
        assert_eq!(summary.failed_issues[0].repo, "lab/model");
        assert_eq!(summary.failed_issues[0].status, Some(403));
        assert!(!summary.is_total_failure());
    }

    #[tokio::test]
    async fn test_published_weights_are_skipped() {
        let scanner = Scanner::new(source(), PipelineConfig::default());
        let agent = IssueAgent::new(scanner, FakeTracker::default())
            .with_registry(KnownWeights(vec!["model"]));

        let summary = agent.run(&urls(&["https://papers.org/with-code.pdf"])).await;

        assert_eq!(summary.total_success, 1);
        assert_eq!(summary.skipped, urls(&["lab/model"]));
        assert_eq!(summary.urls, urls(&["https://github.com/lab/data/issues/1"]));
    }

    #[tokio::test]
    async fn test_no_links_posts_nothing() {
        let scanner = Scanner::new(source(), PipelineConfig::default());
        let agent = IssueAgent::new(scanner, FakeTracker::default());

        let summary = agent.run(&urls(&["https://papers.org/theory.pdf"])).await;

        assert_eq!(summary.total_success, 0);
        assert_eq!(summary.total_failure, 0);
        assert!(summary.urls.is_empty());
        assert!(!summary.is_total_failure());
    }

    #[tokio::test]
    async fn test_every_post_failing_is_total_failure() {
        let scanner = Scanner::new(source(), PipelineConfig::default());
        let tracker = FakeTracker {
            forbidden: vec!["model", "data"],
        };
        let agent = IssueAgent::new(scanner, tracker);

        let summary = agent.run(&urls(&["https://papers.org/with-code.pdf"])).await;

        assert_eq!(summary.total_failure, 2);
        assert!(summary.is_total_failure());
    }
}
