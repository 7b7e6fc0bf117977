use crate::models::error::ApiError;
use crate::models::repo::{
    RepoError, RepoSummary, SaveRepoRequest, SaveRepoResponse, UserRepoSelection,
};
use crate::persisters::{
    repo_selection::{RepoSelectionGet, RepoSelectionUpsert},
    token::TokenGet,
    Persist, Query,
};
use crate::state::{AppState, State};

use actix_web::{get, post, web};

/// Repositories visible to the user's stored GitHub token.
pub async fn list_repos(user_id: &str, state: &State) -> Result<Vec<RepoSummary>, RepoError> {
    let token = TokenGet {
        user_id: user_id.to_string(),
    }
    .fetch(state)
    .await?
    .ok_or(RepoError::NotConnected)?;

    let repos = state.github.list_repos(&token.access_token).await?;
    Ok(repos.into_iter().map(RepoSummary::from).collect())
}

pub async fn save_repo_selection(
    user_id: &str,
    owner: &str,
    name: &str,
    state: &State,
) -> Result<UserRepoSelection, RepoError> {
    let saved = RepoSelectionUpsert {
        user_id: user_id.to_string(),
        repo_owner: owner.to_string(),
        repo_name: name.to_string(),
    }
    .persist(state)
    .await?;

    info!(
        "user {} selected {}/{}",
        user_id, saved.repo_owner, saved.repo_name
    );
    Ok(saved)
}

pub async fn get_repo(user_id: &str, state: &State) -> Result<Option<UserRepoSelection>, RepoError> {
    let selection = RepoSelectionGet {
        user_id: user_id.to_string(),
    }
    .fetch(state)
    .await?;
    Ok(selection)
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct RepoParams {
    user_id: Option<String>,
}

#[get("/github/repos")]
async fn get_repos(
    params: web::Query<RepoParams>,
    state: AppState,
) -> Result<web::Json<Vec<RepoSummary>>, ApiError> {
    let user_id = params
        .into_inner()
        .user_id
        .filter(|u| !u.trim().is_empty())
        .ok_or_else(|| ApiError::MissingInput("Missing userId query param".to_string()))?;

    let repos = list_repos(&user_id, &state).await?;
    Ok(web::Json(repos))
}

#[post("/save-repo")]
async fn save_repo(
    form: web::Json<SaveRepoRequest>,
    state: AppState,
) -> Result<web::Json<SaveRepoResponse>, ApiError> {
    let req = form.into_inner();

    let user_id = req
        .user_id
        .clone()
        .filter(|u| !u.trim().is_empty())
        .ok_or(RepoError::MissingUserId)?;
    let selection = req.selection().ok_or(RepoError::InvalidRepo)?;

    let saved =
        save_repo_selection(&user_id, &selection.repo_owner, &selection.repo_name, &state).await?;

    Ok(web::Json(SaveRepoResponse {
        saved: true,
        user_id,
        repo_owner: saved.repo_owner,
        repo_name: saved.repo_name,
    }))
}

pub fn init(cfg: &mut web::ServiceConfig) {
    cfg.service(get_repos);
    cfg.service(save_repo);
}
