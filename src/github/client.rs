use async_trait::async_trait;
use reqwest::{header, Client, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use std::time::Duration;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::github::tracker::IssueTracker;
use crate::models::{CreatedIssue, IssueRequest, IssueResult, IssueTemplate};

pub struct GitHubClient {
    client: Client,
    base_url: String,
    template: IssueTemplate,
}

impl GitHubClient {
    pub fn new(
        token: &SecretString,
        base_url: impl Into<String>,
        template: IssueTemplate,
        timeout: Duration,
    ) -> Result<Self> {
        let mut auth = header::HeaderValue::from_str(&format!("Bearer {}", token.expose_secret()))?;
        auth.set_sensitive(true);

        let mut headers = header::HeaderMap::new();
        headers.insert(header::AUTHORIZATION, auth);
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(
            "X-GitHub-Api-Version",
            header::HeaderValue::from_static("2022-11-28"),
        );
        headers.insert(
            header::USER_AGENT,
            header::HeaderValue::from_static("gh-issues-agent/0.1"),
        );

        let client = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            template,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(
            config.github_token()?,
            config.github_api_url.clone(),
            config.template.clone(),
            config.http_timeout,
        )
    }

    /// Opens one issue from the template. Anything but `201 Created` is an
    /// [`Error::Post`] carrying the status and response body.
    pub async fn create_issue(&self, owner: &str, repo: &str) -> Result<CreatedIssue> {
        let url = format!("{}/repos/{}/{}/issues", self.base_url, owner, repo);
        tracing::debug!("Creating issue on {}/{}", owner, repo);

        let response = self
            .client
            .post(&url)
            .json(&IssueRequest::from(&self.template))
            .send()
            .await?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| unreadable_body(status, e))?;
        parse_created(status, &body)
    }
}

/// A response that arrived but whose body could not be read still reports
/// its status, so a created issue is never mistaken for a transport failure.
fn unreadable_body(status: StatusCode, err: impl std::fmt::Display) -> Error {
    Error::Post {
        status: status.as_u16(),
        body: format!("Failed to read response body: {}", err),
    }
}

fn parse_created(status: StatusCode, body: &str) -> Result<CreatedIssue> {
    if status != StatusCode::CREATED {
        return Err(Error::Post {
            status: status.as_u16(),
            body: body.to_string(),
        });
    }
    Ok(serde_json::from_str(body)?)
}

#[async_trait]
impl IssueTracker for GitHubClient {
    async fn post_issue(&self, owner: &str, repo: &str) -> IssueResult {
        let outcome = self.create_issue(owner, repo).await;

        match &outcome {
            Ok(issue) => tracing::info!("Issue created: {}", issue.html_url),
            Err(Error::Post { status, body }) => {
                tracing::error!(
                    "Failed to create issue on {}/{}: {} - {}",
                    owner,
                    repo,
                    status,
                    body
                );
            }
            Err(e) => tracing::error!("Failed to create issue on {}/{}: {}", owner, repo, e),
        }

        IssueResult::from(outcome)
    }
}
