use crate::handlers::oauth::{begin_auth, complete_auth};
use crate::models::error::ApiError;
use crate::models::token::TokenStatus;
use crate::persisters::{token::TokenGet, Query};
use crate::state::AppState;

use actix_web::{get, http::header, web, HttpResponse, Result};

const CONNECTED_PAGE: &str = r#"<!doctype html>
<html>
  <head><meta charset="utf-8"><title>BugSync+</title></head>
  <body>
    <h1>GitHub Connected Successfully 🎉</h1>
    <p>Your account is now authorized. You can close this window.</p>
  </body>
</html>
"#;

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct UserParams {
    user_id: Option<String>,
}

#[derive(Deserialize, Debug)]
struct Callback {
    code: Option<String>,
    state: Option<String>,
}

#[get("/connect/github")]
async fn connect_github(params: web::Query<UserParams>, state: AppState) -> Result<HttpResponse> {
    let url = begin_auth(params.user_id.as_deref(), &state)?;
    Ok(HttpResponse::Found()
        .append_header((header::LOCATION, url.as_str()))
        .finish())
}

#[get("/auth/github/callback")]
async fn github_callback(params: web::Query<Callback>, state: AppState) -> Result<HttpResponse> {
    let params = params.into_inner();
    complete_auth(params.code.as_deref(), params.state.as_deref(), &state).await?;
    Ok(HttpResponse::Ok()
        .content_type(header::ContentType::html())
        .body(CONNECTED_PAGE))
}

/// Dev diagnostic: is a token stored for this user? Unauthenticated, never returns the token.
#[get("/debug/token")]
async fn debug_token(
    params: web::Query<UserParams>,
    state: AppState,
) -> Result<web::Json<TokenStatus>, ApiError> {
    let user_id = params
        .into_inner()
        .user_id
        .filter(|u| !u.trim().is_empty())
        .ok_or_else(|| ApiError::MissingInput("missing userId".to_string()))?;

    let token = TokenGet { user_id }.fetch(&state).await.map_err(|e| {
        log::error!("debug token db error: {:?}", e);
        ApiError::ServerFault("db error".to_string())
    })?;

    Ok(web::Json(token.into()))
}

pub fn init(cfg: &mut web::ServiceConfig) {
    cfg.service(connect_github);
    cfg.service(github_callback);
    cfg.service(debug_token);
}
