use crate::error::{Error, Result};
use crate::models::IssueTemplate;
use secrecy::SecretString;
use std::env;
use std::time::Duration;

pub const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";
pub const DEFAULT_HF_API_URL: &str = "https://huggingface.co";

/// Process configuration, read once from the environment.
///
/// The token is held as a [`SecretString`] so neither `Debug` output nor
/// log lines can leak it.
#[derive(Debug)]
pub struct Config {
    pub github_token: Option<SecretString>,
    pub github_api_url: String,
    pub hf_api_url: String,
    pub concurrency_limit: usize,
    pub http_timeout: Duration,
    pub template: IssueTemplate,
}

impl Config {
    /// Full configuration for a run that posts issues. `GITHUB_TOKEN` is required.
    pub fn from_env() -> Result<Self> {
        let config = Self::load()?;
        if config.github_token.is_none() {
            return Err(Error::Config(
                "GITHUB_TOKEN environment variable not set".to_string(),
            ));
        }
        Ok(config)
    }

    /// Configuration for a scan-only run, where the token may be absent.
    pub fn for_scan() -> Result<Self> {
        Self::load()
    }

    fn load() -> Result<Self> {
        let github_token = non_blank(env::var("GITHUB_TOKEN").ok()).map(SecretString::from);

        let github_api_url = env::var("GITHUB_API_URL")
            .map(|v| v.trim_end_matches('/').to_string())
            .unwrap_or_else(|_| DEFAULT_GITHUB_API_URL.to_string());

        let hf_api_url = env::var("HF_API_URL")
            .map(|v| v.trim_end_matches('/').to_string())
            .unwrap_or_else(|_| DEFAULT_HF_API_URL.to_string());

        let concurrency_limit = env::var("CONCURRENCY_LIMIT")
            .ok()
            .and_then(|v| v.parse().ok())
            .filter(|n: &usize| *n > 0)
            .unwrap_or(5);

        let http_timeout = timeout_from(env::var("HTTP_TIMEOUT_SECS").ok());

        let mut template = IssueTemplate::default();
        if let Some(title) = non_blank(env::var("ISSUE_TITLE").ok()) {
            template.title = title;
        }
        if let Some(path) = non_blank(env::var("ISSUE_BODY_FILE").ok()) {
            template.body = std::fs::read_to_string(&path).map_err(|e| {
                Error::Config(format!("Cannot read ISSUE_BODY_FILE {}: {}", path, e))
            })?;
        }

        Ok(Self {
            github_token,
            github_api_url,
            hf_api_url,
            concurrency_limit,
            http_timeout,
            template,
        })
    }

    pub fn github_token(&self) -> Result<&SecretString> {
        self.github_token
            .as_ref()
            .ok_or_else(|| Error::Config("GITHUB_TOKEN environment variable not set".to_string()))
    }
}

/// Unset and whitespace-only values both mean "use the default".
fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Seconds, strictly positive; anything else falls back to 60.
fn timeout_from(value: Option<String>) -> Duration {
    value
        .and_then(|v| v.trim().parse().ok())
        .filter(|s: &u64| *s > 0)
        .map(Duration::from_secs)
        .unwrap_or(Duration::from_secs(60))
}

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub concurrency_limit: usize,
    /// Replaces every extracted link with these repository URLs before posting.
    pub override_repos: Vec<String>,
    pub show_progress: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            concurrency_limit: 5,
            override_repos: Vec::new(),
            show_progress: false,
        }
    }
}

impl From<&Config> for PipelineConfig {
    fn from(config: &Config) -> Self {
        Self {
            concurrency_limit: config.concurrency_limit,
            ..Self::default()
        }
    }
}
