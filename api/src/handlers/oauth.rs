use crate::github::{client::GithubError, GithubAccessTokenResponse};
use crate::persisters::{token::TokenUpsert, Persist};
use crate::state::State;
use crate::DEFAULT_USER_ID;

use actix_web::error;

/// Where to send `user_id` so they can grant the app access to their repos.
pub fn begin_auth(user_id: Option<&str>, state: &State) -> Result<url::Url, OAuthError> {
    let user_id = user_id
        .map(str::trim)
        .filter(|u| !u.is_empty())
        .unwrap_or(DEFAULT_USER_ID);

    let url = state.github.authorize_url(user_id)?;
    info!("redirecting {} to GitHub OAuth", user_id);
    Ok(url)
}

/// Exchanges the OAuth `code` for a token and stores it under the user carried in `oauth_state`.
///
/// Returns the user id the token was stored for. Nothing is written unless GitHub hands back an
/// access token.
pub async fn complete_auth(
    code: Option<&str>,
    oauth_state: Option<&str>,
    state: &State,
) -> Result<String, OAuthError> {
    let code = code
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .ok_or(OAuthError::MissingCode)?;
    let user_id = oauth_state
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(DEFAULT_USER_ID)
        .to_string();

    let token = match state.github.exchange_code(code, &user_id).await {
        Ok(token) => token,
        Err(GithubError::Upstream { status, body }) => {
            let rejected = serde_json::from_value::<GithubAccessTokenResponse>(body)
                .unwrap_or_default();
            return Err(OAuthError::Denied(denial_message(&rejected, Some(status))));
        }
        Err(e) => return Err(OAuthError::Exchange(e)),
    };

    let access_token = match (&token.error, &token.access_token) {
        (None, Some(access_token)) if !access_token.is_empty() => access_token.clone(),
        _ => return Err(OAuthError::Denied(denial_message(&token, None))),
    };

    TokenUpsert {
        user_id: user_id.clone(),
        access_token,
        token_type: token.token_type.unwrap_or_default(),
        scope: token.scope.unwrap_or_default(),
    }
    .persist(state)
    .await?;

    info!("GitHub connected for user {}", user_id);
    Ok(user_id)
}

fn denial_message(token: &GithubAccessTokenResponse, status: Option<u16>) -> String {
    token
        .error_description
        .clone()
        .or_else(|| token.error.clone())
        .unwrap_or_else(|| match status {
            Some(status) => format!("GitHub answered with status {}.", status),
            None => "GitHub did not return an access token.".to_string(),
        })
}

#[derive(Debug)]
pub enum OAuthError {
    MissingCode,
    /// GitHub answered but did not grant a token.
    Denied(String),
    Exchange(GithubError),
    Store(sqlx::Error),
    Url(url::ParseError),
}

impl From<sqlx::Error> for OAuthError {
    fn from(e: sqlx::Error) -> Self {
        Self::Store(e)
    }
}

impl From<url::ParseError> for OAuthError {
    fn from(e: url::ParseError) -> Self {
        Self::Url(e)
    }
}

impl From<OAuthError> for actix_web::Error {
    fn from(e: OAuthError) -> Self {
        match e {
            OAuthError::MissingCode => error::ErrorBadRequest("Missing \"code\" from GitHub."),
            OAuthError::Denied(msg) => {
                log::error!("GitHub OAuth denied: {}", msg);
                error::ErrorInternalServerError(format!("GitHub OAuth failed: {}", msg))
            }
            OAuthError::Exchange(e) => {
                log::error!("error exchanging GitHub OAuth code: {:?}", e);
                error::ErrorInternalServerError("Error completing OAuth.")
            }
            OAuthError::Store(e) => {
                log::error!("error saving token to DB: {:?}", e);
                error::ErrorInternalServerError("Error saving OAuth token.")
            }
            OAuthError::Url(e) => {
                log::error!("could not build GitHub authorize URL: {:?}", e);
                error::ErrorInternalServerError("GitHub OAuth is misconfigured.")
            }
        }
    }
}
