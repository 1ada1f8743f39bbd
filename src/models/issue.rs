use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub const DEFAULT_ISSUE_TITLE: &str = "Share your model weights with the community 🚀";

pub const DEFAULT_ISSUE_BODY: &str = "👋 Hello from the Hugging Face Team!

Your repo includes a model, but we couldn’t find its weights on Hugging Face.
Publishing them helps your work reach a wider audience, boosts reproducibility, and enables developers worldwide to build on your research.

You can easily upload your model here:
https://huggingface.co/docs/hub/en/models-uploading

Thanks for contributing to an open and collaborative ML ecosystem!
— The Hugging Face Team
";

/// Title and body of the issue filed on every repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueTemplate {
    pub title: String,
    pub body: String,
}

impl Default for IssueTemplate {
    fn default() -> Self {
        Self {
            title: DEFAULT_ISSUE_TITLE.to_string(),
            body: DEFAULT_ISSUE_BODY.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct IssueRequest<'a> {
    pub title: &'a str,
    pub body: &'a str,
}

impl<'a> From<&'a IssueTemplate> for IssueRequest<'a> {
    fn from(template: &'a IssueTemplate) -> Self {
        Self {
            title: &template.title,
            body: &template.body,
        }
    }
}

/// The subset of GitHub's issue payload we read back.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatedIssue {
    pub html_url: String,
    #[serde(default)]
    pub number: Option<u64>,
}

/// Outcome of posting one issue.
///
/// Failed results carry the HTTP status (when a response arrived) and the
/// response body or transport error so a run can be diagnosed afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl IssueResult {
    pub fn created(url: impl Into<String>) -> Self {
        Self {
            success: true,
            url: Some(url.into()),
            status: Some(201),
            detail: None,
        }
    }

    pub fn failed(status: Option<u16>, detail: impl Into<String>) -> Self {
        Self {
            success: false,
            url: None,
            status,
            detail: Some(detail.into()),
        }
    }
}

impl From<Result<CreatedIssue>> for IssueResult {
    fn from(outcome: Result<CreatedIssue>) -> Self {
        match outcome {
            Ok(issue) => Self::created(issue.html_url),
            Err(Error::Post { status, body }) => Self::failed(Some(status), body),
            Err(e) => Self::failed(None, e.to_string()),
        }
    }
}
