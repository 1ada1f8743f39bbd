pub mod config;
pub mod error;
pub mod models;
pub mod extract;
pub mod github;
pub mod huggingface;
pub mod pipeline;

pub use config::{Config, PipelineConfig};
pub use error::{Error, Result};
pub use extract::{PaperSource, PdfLinkExtractor};
pub use github::{parse_repo_ref, GitHubClient, IssueTracker};
pub use huggingface::{HuggingFaceRegistry, NoWeightsRegistry, WeightsRegistry};
pub use pipeline::{IssueAgent, Scanner};
