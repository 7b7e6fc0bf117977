use super::error::ApiError;
use crate::github::{client::GithubError, GithubIssue};
use crate::snippets::SnippetMatch;

use std::collections::VecDeque;
use std::sync::Mutex;

/// How many created issues the debug buffer remembers.
pub const RECENT_ISSUES_CAPACITY: usize = 50;

/// Body of `POST /create-issue`.
#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CreateIssueRequest {
    pub user_id: Option<String>,
    pub title: Option<String>,
    pub body: Option<String>,
    pub labels: Option<Vec<String>>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CreatedIssue {
    pub issue_number: u64,
    pub issue_url: String,
    pub title: String,
    pub matched_snippets: Vec<SnippetMatch>,
}

/// Projection of a GitHub issue returned by `GET /issue-status/{number}`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct IssueStatus {
    pub number: u64,
    pub title: String,
    pub state: String,
    pub labels: Vec<String>,
    pub assignee: Option<String>,
    pub url: String,
}

impl From<GithubIssue> for IssueStatus {
    fn from(i: GithubIssue) -> Self {
        IssueStatus {
            number: i.number,
            title: i.title,
            state: i.state,
            labels: i.labels.into_iter().map(|l| l.name).collect(),
            assignee: i.assignee.map(|a| a.login),
            url: i.html_url,
        }
    }
}

#[derive(Debug)]
pub enum IssueError {
    MissingUserId,
    MissingTitle,
    NoRepoSelected,
    NotAuthenticated,
    InvalidIssueNumber,
    /// `GITHUB_TOKEN`, `REPO_OWNER` or `REPO_NAME` is not configured.
    MissingGlobalConfig,
    Github(GithubError),
    Sqlx(sqlx::Error),
}

impl From<sqlx::Error> for IssueError {
    fn from(e: sqlx::Error) -> Self {
        Self::Sqlx(e)
    }
}

impl From<GithubError> for IssueError {
    fn from(e: GithubError) -> Self {
        Self::Github(e)
    }
}

impl From<IssueError> for ApiError {
    fn from(e: IssueError) -> Self {
        match e {
            IssueError::MissingUserId => ApiError::MissingInput("Missing userId".to_string()),
            IssueError::MissingTitle => ApiError::MissingInput("Missing issue title".to_string()),
            IssueError::NoRepoSelected => ApiError::MissingInput(
                "No repository selected; choose one before creating issues".to_string(),
            ),
            IssueError::NotAuthenticated => {
                ApiError::NotAuthenticated("GitHub is not connected for this user".to_string())
            }
            IssueError::InvalidIssueNumber => {
                ApiError::MissingInput("Invalid issue number".to_string())
            }
            IssueError::MissingGlobalConfig => ApiError::ServerFault(
                "GitHub environment variables are missing (REPO_OWNER, REPO_NAME, GITHUB_TOKEN)"
                    .to_string(),
            ),
            IssueError::Github(GithubError::Upstream { status, body }) => {
                log::error!("GitHub issue error ({}): {}", status, body);
                ApiError::Upstream { status, body }
            }
            IssueError::Github(e) => {
                log::error!("GitHub issue request failed: {:?}", e);
                ApiError::ServerFault("Server error while talking to GitHub".to_string())
            }
            IssueError::Sqlx(e) => {
                log::error!("database error handling issue: {:?}", e);
                ApiError::ServerFault("Server error while creating issue".to_string())
            }
        }
    }
}

/// Bounded, newest-first record of issues created by this process. Diagnostic only.
#[derive(Debug)]
pub struct RecentIssues {
    capacity: usize,
    issues: Mutex<VecDeque<CreatedIssue>>,
}

impl Default for RecentIssues {
    fn default() -> Self {
        Self::with_capacity(RECENT_ISSUES_CAPACITY)
    }
}

impl RecentIssues {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            issues: Mutex::new(VecDeque::with_capacity(capacity)),
        }
    }

    pub fn push(&self, issue: CreatedIssue) {
        if self.capacity == 0 {
            return;
        }
        // A poisoned lock only means another request panicked mid-push; the data is still usable.
        let mut issues = self.issues.lock().unwrap_or_else(|e| e.into_inner());
        if issues.len() == self.capacity {
            issues.pop_back();
        }
        issues.push_front(issue);
    }

    pub fn snapshot(&self) -> Vec<CreatedIssue> {
        let issues = self.issues.lock().unwrap_or_else(|e| e.into_inner());
        issues.iter().cloned().collect()
    }
}
