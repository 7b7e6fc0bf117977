pub mod client;

/// Body of GitHub's `login/oauth/access_token` response.
///
/// GitHub answers errors with a 200 and an `error` field, so every field is optional.
#[derive(Deserialize, Debug, Default)]
pub struct GithubAccessTokenResponse {
    pub access_token: Option<String>,
    pub token_type: Option<String>,
    pub scope: Option<String>,
    pub error: Option<String>,
    pub error_description: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct GithubOwner {
    pub login: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct GithubRepo {
    pub id: u64,
    pub name: String,
    pub full_name: String,
    pub private: bool,
    pub owner: Option<GithubOwner>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct GithubLabel {
    pub name: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct GithubIssue {
    pub number: u64,
    pub title: String,
    pub state: String,
    pub html_url: String,
    #[serde(default)]
    pub labels: Vec<GithubLabel>,
    pub assignee: Option<GithubOwner>,
}

/// Payload for `POST /repos/{owner}/{repo}/issues`.
#[derive(Serialize, Debug, Clone)]
pub struct NewIssue {
    pub title: String,
    pub body: String,
    pub labels: Vec<String>,
}
