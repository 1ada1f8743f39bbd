pub mod repo;
pub mod issue;
pub mod summary;

pub use repo::RepoRef;
pub use issue::{CreatedIssue, IssueRequest, IssueResult, IssueTemplate};
pub use summary::{IssueFailure, RunSummary, ScanReport, SourceFailure};
