pub mod client;
pub mod repo_ref;
pub mod tracker;

pub use client::GitHubClient;
pub use repo_ref::parse_repo_ref;
pub use tracker::IssueTracker;
