#![allow(dead_code)]

use bugsync_api::config::Config;
use bugsync_api::persisters::MIGRATOR;
use bugsync_api::snippets::{Snippet, SnippetCorpus, SnippetId};
use bugsync_api::state::{AppStateRaw, State};
use bugsync_api::PoolOptions;

use std::sync::Arc;

/// Builds the full route set around `$state`, the way the binary does.
#[macro_export]
macro_rules! test_app {
    ($state:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data(actix_web::web::Data::new($state.clone()))
                .default_service(actix_web::web::route().to(bugsync_api::handlers::not_found))
                .configure(bugsync_api::handlers::init),
        )
        .await
    };
}

/// Config pointing both GitHub base URLs at `github_url`.
pub fn test_config(github_url: &str) -> Config {
    Config {
        app_base_url: "http://bugsync.test".to_string(),
        backend_base_url: "http://bugsync.test".to_string(),
        gh_client_id: "client-id".to_string(),
        gh_client_secret: "client-secret".to_string(),
        github_api_base: github_url.to_string(),
        github_oauth_base: github_url.to_string(),
        ..Default::default()
    }
}

pub fn test_snippets() -> SnippetCorpus {
    SnippetCorpus::new(vec![
        Snippet {
            id: SnippetId::Number(1.into()),
            title: "App crashes".to_string(),
            description: "Check the crash log".to_string(),
            snippet: "adb logcat".to_string(),
            keywords: vec!["crash".to_string()],
        },
        Snippet {
            id: SnippetId::Text("auth-1".to_string()),
            title: "Login problems".to_string(),
            description: "Clear the session".to_string(),
            snippet: String::new(),
            keywords: vec!["login".to_string(), "session".to_string()],
        },
    ])
}

/// A fresh in-memory database with migrations applied.
///
/// One connection only: every `sqlite::memory:` connection is its own database.
pub async fn test_pool() -> bugsync_api::SqlPool {
    let pool = PoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .expect("failed to create test database");

    MIGRATOR
        .run(&pool)
        .await
        .expect("failed to run migrations");

    pool
}

pub async fn state_with(config: Config) -> AppStateRaw {
    Arc::new(State::new(config, test_pool().await, test_snippets()))
}

pub async fn test_state(github_url: &str) -> AppStateRaw {
    state_with(test_config(github_url)).await
}
