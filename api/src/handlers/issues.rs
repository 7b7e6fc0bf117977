use crate::github::NewIssue;
use crate::models::error::ApiError;
use crate::models::issue::{CreateIssueRequest, CreatedIssue, IssueError, IssueStatus};
use crate::persisters::{repo_selection::RepoSelectionGet, token::TokenGet, Query};
use crate::state::{AppState, State};

use actix_web::{get, post, web};

/// Appended to every issue body so readers know where the report came from.
pub const ATTRIBUTION_FOOTER: &str = "\n\nReported via BugSync+";
/// Label applied when the caller does not pass any.
pub const DEFAULT_LABEL: &str = "from-cliq";

/// Opens an issue in the repository `user_id` selected, with their own token.
///
/// The stores are checked before GitHub is contacted, so a user without a repo selection or
/// token never causes a network call.
pub async fn create_issue(
    user_id: &str,
    title: &str,
    body: &str,
    labels: Option<Vec<String>>,
    state: &State,
) -> Result<CreatedIssue, IssueError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(IssueError::MissingTitle);
    }

    let repo = RepoSelectionGet {
        user_id: user_id.to_string(),
    }
    .fetch(state)
    .await?
    .ok_or(IssueError::NoRepoSelected)?;

    let token = TokenGet {
        user_id: user_id.to_string(),
    }
    .fetch(state)
    .await?
    .ok_or(IssueError::NotAuthenticated)?;

    let new_issue = NewIssue {
        title: title.to_string(),
        body: format!("{}{}", body, ATTRIBUTION_FOOTER),
        labels: labels.unwrap_or_else(|| vec![DEFAULT_LABEL.to_string()]),
    };

    let issue = state
        .github
        .create_issue(
            &token.access_token,
            &repo.repo_owner,
            &repo.repo_name,
            &new_issue,
        )
        .await?;

    info!(
        "user {} created issue #{} in {}/{}",
        user_id, issue.number, repo.repo_owner, repo.repo_name
    );

    let created = CreatedIssue {
        issue_number: issue.number,
        issue_url: issue.html_url,
        title: issue.title,
        matched_snippets: state.snippets.match_text(&format!("{} {}", title, body)),
    };
    state.recent_issues.push(created.clone());

    Ok(created)
}

/// Looks up an issue in the globally configured repository with the global token.
pub async fn issue_status(number: u64, state: &State) -> Result<IssueStatus, IssueError> {
    if number == 0 {
        return Err(IssueError::InvalidIssueNumber);
    }

    let config = &state.config;
    let (token, owner, name) = match (&config.gh_token, &config.repo_owner, &config.repo_name) {
        (Some(token), Some(owner), Some(name)) => (token, owner, name),
        _ => return Err(IssueError::MissingGlobalConfig),
    };

    let issue = state.github.get_issue(token, owner, name, number).await?;
    Ok(issue.into())
}

#[post("/create-issue")]
async fn post_create_issue(
    form: web::Json<CreateIssueRequest>,
    state: AppState,
) -> Result<web::Json<CreatedIssue>, ApiError> {
    let req = form.into_inner();
    let title = req.title.unwrap_or_default();
    let body = req.body.unwrap_or_default();

    if title.trim().is_empty() {
        return Err(IssueError::MissingTitle.into());
    }
    let user_id = req
        .user_id
        .filter(|u| !u.trim().is_empty())
        .ok_or(IssueError::MissingUserId)?;

    let created = create_issue(&user_id, &title, &body, req.labels, &state).await?;
    Ok(web::Json(created))
}

#[get("/issue-status/{number}")]
async fn get_issue_status(
    number: web::Path<String>,
    state: AppState,
) -> Result<web::Json<IssueStatus>, ApiError> {
    let number = number
        .trim()
        .parse::<u64>()
        .map_err(|_| IssueError::InvalidIssueNumber)?;

    let status = issue_status(number, &state).await?;
    Ok(web::Json(status))
}

/// Issues created since startup, newest first. Not authoritative; GitHub is.
#[get("/debug/issues")]
async fn debug_issues(state: AppState) -> web::Json<Vec<CreatedIssue>> {
    web::Json(state.recent_issues.snapshot())
}

pub fn init(cfg: &mut web::ServiceConfig) {
    cfg.service(post_create_issue);
    cfg.service(get_issue_status);
    cfg.service(debug_issues);
}
