use super::{GithubAccessTokenResponse, GithubIssue, GithubRepo, NewIssue};
use crate::config::Config;

use reqwest::{header, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::Value;
use url::Url;

/// Scope requested from GitHub; enough to list private repos and open issues in them.
pub const OAUTH_SCOPE: &str = "repo";

#[derive(Debug, thiserror::Error)]
pub enum GithubError {
    #[error("GitHub request failed: {0}")]
    Transport(#[from] reqwest::Error),
    /// Non-2xx answer. `body` is GitHub's JSON, or the raw text wrapped in a JSON string.
    #[error("GitHub responded with status {status}")]
    Upstream { status: u16, body: Value },
    #[error("unexpected GitHub response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Thin client over the handful of GitHub endpoints the service needs.
///
/// Both base URLs come from config so the client can be aimed at a mock server.
#[derive(Clone, Debug)]
pub struct GithubClient {
    http: reqwest::Client,
    api_base: String,
    oauth_base: String,
    client_id: String,
    client_secret: String,
    redirect_uri: String,
    user_agent: String,
}

impl GithubClient {
    pub fn new(config: &Config) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_base: config.github_api_base.trim_end_matches('/').to_string(),
            oauth_base: config.github_oauth_base.trim_end_matches('/').to_string(),
            client_id: config.gh_client_id.clone(),
            client_secret: config.gh_client_secret.clone(),
            redirect_uri: config.oauth_redirect_uri(),
            user_agent: config.gh_user_agent.clone(),
        }
    }

    /// The GitHub page the user is sent to in order to grant access. `state` carries the user id.
    pub fn authorize_url(&self, user_id: &str) -> Result<Url, url::ParseError> {
        Url::parse_with_params(
            &format!("{}/login/oauth/authorize", self.oauth_base),
            &[
                ("client_id", self.client_id.as_str()),
                ("redirect_uri", self.redirect_uri.as_str()),
                ("scope", OAUTH_SCOPE),
                ("state", user_id),
            ],
        )
    }

    pub async fn exchange_code(
        &self,
        code: &str,
        state: &str,
    ) -> Result<GithubAccessTokenResponse, GithubError> {
        let req = self
            .http
            .post(format!("{}/login/oauth/access_token", self.oauth_base))
            .header(header::ACCEPT, "application/json")
            .header(header::USER_AGENT, &self.user_agent)
            .form(&[
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("code", code),
                ("redirect_uri", self.redirect_uri.as_str()),
                ("state", state),
            ]);

        send_json(req).await
    }

    pub async fn list_repos(&self, access_token: &str) -> Result<Vec<GithubRepo>, GithubError> {
        let req = self
            .api_get(access_token, "/user/repos")
            .query(&[("per_page", "100")]);

        send_json(req).await
    }

    pub async fn create_issue(
        &self,
        access_token: &str,
        owner: &str,
        repo: &str,
        issue: &NewIssue,
    ) -> Result<GithubIssue, GithubError> {
        let req = self
            .authorized(
                access_token,
                self.http
                    .post(format!("{}/repos/{}/{}/issues", self.api_base, owner, repo)),
            )
            .json(issue);

        send_json(req).await
    }

    pub async fn get_issue(
        &self,
        access_token: &str,
        owner: &str,
        repo: &str,
        number: u64,
    ) -> Result<GithubIssue, GithubError> {
        let path = format!("/repos/{}/{}/issues/{}", owner, repo, number);
        send_json(self.api_get(access_token, &path)).await
    }

    fn api_get(&self, access_token: &str, path: &str) -> RequestBuilder {
        self.authorized(
            access_token,
            self.http.get(format!("{}{}", self.api_base, path)),
        )
    }

    fn authorized(&self, access_token: &str, req: RequestBuilder) -> RequestBuilder {
        req.header(header::USER_AGENT, &self.user_agent)
            .header(header::ACCEPT, "application/vnd.github+json")
            .header(header::AUTHORIZATION, format!("token {}", access_token))
    }
}

async fn send_json<T: DeserializeOwned>(req: RequestBuilder) -> Result<T, GithubError> {
    let res = req.send().await?;
    let status = res.status();
    let bytes = res.bytes().await?;

    let body = serde_json::from_slice::<Value>(&bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));

    if !status.is_success() {
        debug!("GitHub answered {}: {}", status, body);
        return Err(GithubError::Upstream {
            status: status.as_u16(),
            body,
        });
    }

    Ok(serde_json::from_value(body)?)
}
