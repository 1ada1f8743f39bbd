use async_trait::async_trait;
use crate::models::IssueResult;

/// Files issues on a repository's tracker.
///
/// Failures are reported in the returned [`IssueResult`], never as an error,
/// so one repository cannot abort a batch.
#[async_trait]
pub trait IssueTracker: Send + Sync {
    async fn post_issue(&self, owner: &str, repo: &str) -> IssueResult;
}
