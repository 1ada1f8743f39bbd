use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::issue::IssueResult;
use super::repo::RepoRef;

/// A PDF source whose links could not be extracted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceFailure {
    pub source: String,
    pub error: String,
}

/// A repository where issue creation failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueFailure {
    pub repo: String,
    pub status: Option<u16>,
    pub detail: Option<String>,
}

/// Aggregated outcome of one pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub total_success: u32,
    pub total_failure: u32,
    /// Created issue URLs, in input order.
    pub urls: Vec<String>,
    pub sources: usize,
    pub extracted_links: usize,
    /// Repositories skipped because weights are already published.
    pub skipped: Vec<String>,
    pub failed_sources: Vec<SourceFailure>,
    pub failed_issues: Vec<IssueFailure>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl RunSummary {
    pub fn new(sources: usize, started_at: DateTime<Utc>) -> Self {
        Self {
            total_success: 0,
            total_failure: 0,
            urls: Vec::new(),
            sources,
            extracted_links: 0,
            skipped: Vec::new(),
            failed_sources: Vec::new(),
            failed_issues: Vec::new(),
            started_at,
            finished_at: started_at,
        }
    }

    pub fn record(&mut self, repo: &RepoRef, result: IssueResult) {
        if result.success {
            self.total_success += 1;
            if let Some(url) = result.url {
                self.urls.push(url);
            }
        } else {
            self.total_failure += 1;
            self.failed_issues.push(IssueFailure {
                repo: repo.to_string(),
                status: result.status,
                detail: result.detail,
            });
        }
    }

    /// True when work was attempted and none of it succeeded: every source
    /// failed to extract, or every attempted post failed.
    pub fn is_total_failure(&self) -> bool {
        let all_sources_failed = self.sources > 0 && self.failed_sources.len() == self.sources;
        let all_posts_failed = self.total_failure > 0 && self.total_success == 0;
        all_sources_failed || all_posts_failed
    }
}

/// Result of a scan-only run: links and repositories, nothing posted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanReport {
    pub links: Vec<String>,
    pub repos: Vec<RepoRef>,
    pub failed_sources: Vec<SourceFailure>,
}
