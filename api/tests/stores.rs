mod common;

use bugsync_api::handlers::repos::{get_repo, save_repo_selection};
use bugsync_api::models::repo::UserRepoSelection;
use bugsync_api::persisters::{token::TokenGet, token::TokenUpsert, Persist, Query};

use common::test_state;

fn token(user_id: &str, access_token: &str, scope: &str) -> TokenUpsert {
    TokenUpsert {
        user_id: user_id.to_string(),
        access_token: access_token.to_string(),
        token_type: "bearer".to_string(),
        scope: scope.to_string(),
    }
}

#[actix_rt::test]
async fn repo_selection_round_trips() {
    let state = test_state("http://127.0.0.1:9").await;

    save_repo_selection("u1", "acme", "widgets", &state)
        .await
        .unwrap();

    let selection = get_repo("u1", &state).await.unwrap();
    assert_eq!(
        selection,
        Some(UserRepoSelection {
            repo_owner: "acme".to_string(),
            repo_name: "widgets".to_string(),
        })
    );
}

#[actix_rt::test]
async fn repo_selection_is_overwritten_per_user() {
    let state = test_state("http://127.0.0.1:9").await;

    save_repo_selection("u1", "acme", "widgets", &state)
        .await
        .unwrap();
    save_repo_selection("u1", "acme", "gadgets", &state)
        .await
        .unwrap();
    save_repo_selection("u2", "other", "thing", &state)
        .await
        .unwrap();

    let u1 = get_repo("u1", &state).await.unwrap().unwrap();
    assert_eq!(u1.repo_name, "gadgets");
    let u2 = get_repo("u2", &state).await.unwrap().unwrap();
    assert_eq!(u2.repo_owner, "other");
    assert_eq!(get_repo("nobody", &state).await.unwrap(), None);
}

#[actix_rt::test]
async fn token_upsert_overwrites_previous_credential() {
    let state = test_state("http://127.0.0.1:9").await;

    token("u1", "gho_first", "repo").persist(&state).await.unwrap();
    token("u1", "gho_second", "repo,user")
        .persist(&state)
        .await
        .unwrap();

    let stored = TokenGet {
        user_id: "u1".to_string(),
    }
    .fetch(&state)
    .await
    .unwrap()
    .expect("token should be stored");

    assert_eq!(stored.access_token, "gho_second");
    assert_eq!(stored.scope, "repo,user");
    assert_eq!(stored.token_type, "bearer");
}

#[actix_rt::test]
async fn missing_token_is_none() {
    let state = test_state("http://127.0.0.1:9").await;

    let stored = TokenGet {
        user_id: "ghost".to_string(),
    }
    .fetch(&state)
    .await
    .unwrap();

    assert!(stored.is_none());
}
