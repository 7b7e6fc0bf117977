use super::error::ApiError;
use crate::github::{client::GithubError, GithubRepo};

/// The repository a user picked; issues they create go here.
#[derive(sqlx::FromRow, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct UserRepoSelection {
    pub repo_owner: String,
    pub repo_name: String,
}

impl UserRepoSelection {
    /// Splits `owner/name` as found in a repo's `full_name`.
    pub fn from_full_name(full_name: &str) -> Option<Self> {
        let (owner, name) = full_name.trim().split_once('/')?;
        let (owner, name) = (owner.trim(), name.trim());
        if owner.is_empty() || name.is_empty() || name.contains('/') {
            return None;
        }
        Some(UserRepoSelection {
            repo_owner: owner.to_string(),
            repo_name: name.to_string(),
        })
    }
}

/// Reduced view of a GitHub repository returned to the browser UI.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct RepoSummary {
    pub id: u64,
    pub name: String,
    pub full_name: String,
    pub private: bool,
    pub owner: Option<String>,
}

impl From<GithubRepo> for RepoSummary {
    fn from(r: GithubRepo) -> Self {
        RepoSummary {
            id: r.id,
            name: r.name,
            full_name: r.full_name,
            private: r.private,
            owner: r.owner.map(|o| o.login),
        }
    }
}

/// Body of `POST /save-repo`. Either `repo` as `owner/name` or both `owner` and `name`.
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct SaveRepoRequest {
    pub user_id: Option<String>,
    pub repo: Option<String>,
    pub owner: Option<String>,
    pub name: Option<String>,
}

impl SaveRepoRequest {
    pub fn selection(&self) -> Option<UserRepoSelection> {
        if let Some(repo) = self.repo.as_deref() {
            return UserRepoSelection::from_full_name(repo);
        }
        match (self.owner.as_deref(), self.name.as_deref()) {
            (Some(owner), Some(name)) => UserRepoSelection::from_full_name(&format!("{}/{}", owner, name)),
            _ => None,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SaveRepoResponse {
    pub saved: bool,
    pub user_id: String,
    pub repo_owner: String,
    pub repo_name: String,
}

#[derive(Debug)]
pub enum RepoError {
    MissingUserId,
    InvalidRepo,
    NotConnected,
    Github(GithubError),
    Sqlx(sqlx::Error),
}

impl From<sqlx::Error> for RepoError {
    fn from(e: sqlx::Error) -> Self {
        Self::Sqlx(e)
    }
}

impl From<GithubError> for RepoError {
    fn from(e: GithubError) -> Self {
        Self::Github(e)
    }
}

impl From<RepoError> for ApiError {
    fn from(e: RepoError) -> Self {
        match e {
            RepoError::MissingUserId => ApiError::MissingInput("Missing userId".to_string()),
            RepoError::InvalidRepo => {
                ApiError::MissingInput("repo must be given as owner/name".to_string())
            }
            RepoError::NotConnected => ApiError::NotAuthenticated("Not connected".to_string()),
            RepoError::Github(GithubError::Upstream { status, body }) => {
                log::error!("GitHub list repos error ({}): {}", status, body);
                ApiError::Upstream { status, body }
            }
            RepoError::Github(e) => {
                log::error!("GitHub API call failed: {:?}", e);
                ApiError::ServerFault("github api error".to_string())
            }
            RepoError::Sqlx(e) => {
                log::error!("database error handling repos: {:?}", e);
                ApiError::ServerFault("server error".to_string())
            }
        }
    }
}
