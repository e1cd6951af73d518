//! Pull-request comment publishing
//!
//! The report is posted as an issue comment. Once the new comment is in
//! place, earlier reports (comments by the automation account carrying the
//! report marker) are deleted so the pull request shows a single report.

use std::time::Duration;

use flowdiff_core::errors::{ExError, ExErrorKind, Result};
use flowdiff_core::REPORT_MARKER;
use flowdiff_core_types::Sensitive;
use reqwest::blocking::{Client, Response};
use reqwest::header::{ACCEPT, AUTHORIZATION, LINK, USER_AGENT};
use reqwest::StatusCode;
use serde::Deserialize;

pub const DEFAULT_API_BASE: &str = "https://api.github.com";
const AUTOMATION_LOGIN: &str = "github-actions[bot]";
const PAGE_SIZE: u32 = 100;

/// Destination for the report comment
pub trait CommentClient {
    /// Post `body`; returns the identifier of the new comment
    ///
    /// # Errors
    ///
    /// Fails with `ExErrorKind::ExternalService` when the comment is not created.
    fn post_comment(&self, body: &str) -> Result<u64>;

    /// Delete earlier report comments, keeping `keep`; returns how many were deleted
    ///
    /// # Errors
    ///
    /// Fails with `ExErrorKind::ExternalService` when the comments cannot be listed.
    fn delete_previous_comments(&self, keep: u64) -> Result<usize>;
}

#[derive(Debug, Deserialize)]
struct IssueComment {
    id: u64,
    #[serde(default)]
    body: Option<String>,
    #[serde(default)]
    user: Option<CommentAuthor>,
}

#[derive(Debug, Deserialize)]
struct CommentAuthor {
    login: String,
}

#[derive(Debug, Deserialize)]
struct CreatedComment {
    id: u64,
}

impl IssueComment {
    fn is_previous_report(&self) -> bool {
        self.user.as_ref().is_some_and(|u| u.login == AUTOMATION_LOGIN)
            && self.body.as_deref().is_some_and(|b| b.contains(REPORT_MARKER))
    }
}

fn external(op: &str, message: impl Into<String>) -> ExError {
    ExError::new(ExErrorKind::ExternalService)
        .with_op(op.to_string())
        .with_message(message)
}

/// URL of the `rel="next"` page in a `Link` header
fn next_page(link_header: &str) -> Option<String> {
    link_header
        .split(',')
        .find(|part| part.contains("rel=\"next\""))
        .and_then(|part| {
            let start = part.find('<')? + 1;
            let end = part[start..].find('>')? + start;
            Some(part[start..end].to_string())
        })
}

/// GitHub REST client for one pull request
#[derive(Debug)]
pub struct GitHubClient {
    http: Client,
    api_base: String,
    repository: String,
    issue_number: u64,
    token: Sensitive<String>,
}

impl GitHubClient {
    /// # Errors
    ///
    /// Fails when the HTTP client cannot be built.
    pub fn with_api_base(
        api_base: &str,
        token: String,
        repository: String,
        issue_number: u64,
    ) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| external("github_client", e.to_string()))?;
        Ok(Self {
            http,
            api_base: api_base.trim_end_matches('/').to_string(),
            repository,
            issue_number,
            token: Sensitive::new(token),
        })
    }

    fn comments_url(&self) -> String {
        format!(
            "{}/repos/{}/issues/{}/comments",
            self.api_base, self.repository, self.issue_number
        )
    }

    fn request(&self, builder: reqwest::blocking::RequestBuilder, op: &str) -> Result<Response> {
        builder
            .header(AUTHORIZATION, format!("Token {}", self.token.expose()))
            .header(ACCEPT, "application/vnd.github+json")
            .header(USER_AGENT, "flowdiff")
            .send()
            .map_err(|e| external(op, e.to_string()))
    }

    fn list_comments(&self) -> Result<Vec<IssueComment>> {
        let mut comments = Vec::new();
        let mut url = Some(format!("{}?per_page={}", self.comments_url(), PAGE_SIZE));

        while let Some(page) = url.take() {
            let response = self.request(self.http.get(&page), "list_comments")?;
            if !response.status().is_success() {
                return Err(external(
                    "list_comments",
                    format!("unexpected status {}", response.status()),
                ));
            }
            url = response
                .headers()
                .get(LINK)
                .and_then(|v| v.to_str().ok())
                .and_then(next_page);
            let batch: Vec<IssueComment> = response
                .json()
                .map_err(|e| external("list_comments", e.to_string()))?;
            comments.extend(batch);
        }
        Ok(comments)
    }

    fn delete_comment(&self, id: u64) -> Result<()> {
        let url = format!(
            "{}/repos/{}/issues/comments/{}",
            self.api_base, self.repository, id
        );
        let response = self.request(self.http.delete(&url), "delete_comment")?;
        match response.status() {
            StatusCode::NO_CONTENT => Ok(()),
            status => Err(external(
                "delete_comment",
                format!("unexpected status {} deleting comment {}", status, id),
            )),
        }
    }
}

impl CommentClient for GitHubClient {
    fn post_comment(&self, body: &str) -> Result<u64> {
        let payload = serde_json::json!({ "body": body });
        let response = self.request(
            self.http.post(self.comments_url()).json(&payload),
            "post_comment",
        )?;
        if response.status() != StatusCode::CREATED {
            return Err(external(
                "post_comment",
                format!("unexpected status {}", response.status()),
            ));
        }
        let created: CreatedComment = response
            .json()
            .map_err(|e| external("post_comment", e.to_string()))?;
        tracing::info!(comment_id = created.id, "report comment posted");
        Ok(created.id)
    }

    fn delete_previous_comments(&self, keep: u64) -> Result<usize> {
        let mut deleted = 0;
        for comment in self.list_comments()? {
            if comment.id == keep || !comment.is_previous_report() {
                continue;
            }
            // A comment that cannot be deleted stays; the others still go
            match self.delete_comment(comment.id) {
                Ok(()) => deleted += 1,
                Err(err) => tracing::warn!(comment_id = comment.id, error = %err, "failed to delete previous report"),
            }
        }
        tracing::info!(deleted, "previous report comments deleted");
        Ok(deleted)
    }
}
