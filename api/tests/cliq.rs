#[macro_use]
mod common;

use actix_web::{http::StatusCode, test};
use bugsync_api::command::{CliqMessage, BUGSTATUS_USAGE, BUG_USAGE};
use bugsync_api::handlers::repos::save_repo_selection;
use bugsync_api::persisters::{token::TokenUpsert, Persist};
use mockito::{Matcher, Server};
use serde_json::json;

use common::{state_with, test_config, test_state};

#[actix_rt::test]
async fn bug_without_pipe_replies_with_usage() {
    let mut server = Server::new_async().await;
    let github = server
        .mock("POST", Matcher::Any)
        .expect(0)
        .create_async()
        .await;
    let state = test_state(&server.url()).await;
    let app = test_app!(state);

    let req = test::TestRequest::post()
        .uri("/cliq/commands/bug")
        .set_json(json!({"text": "everything is broken #urgent"}))
        .to_request();
    let reply: CliqMessage = test::call_and_read_body_json(&app, req).await;

    assert_eq!(reply, CliqMessage::text(BUG_USAGE));
    github.assert_async().await;
}

#[actix_rt::test]
async fn bug_creates_issue_and_renders_card() {
    let mut server = Server::new_async().await;
    let github = server
        .mock("POST", "/repos/acme/widgets/issues")
        .match_body(Matcher::Json(json!({
            "title": "App crash",
            "body": "Opening settings crashes\n\nReported via BugSync+",
            "labels": ["mobile", "p1"]
        })))
        .with_status(201)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "number": 21,
                "title": "App crash",
                "state": "open",
                "html_url": "https://github.com/acme/widgets/issues/21",
                "labels": [],
                "assignee": null
            })
            .to_string(),
        )
        .create_async()
        .await;
    let state = test_state(&server.url()).await;
    TokenUpsert {
        user_id: "cliq-user".to_string(),
        access_token: "gho_user".to_string(),
        token_type: "bearer".to_string(),
        scope: "repo".to_string(),
    }
    .persist(&state)
    .await
    .unwrap();
    save_repo_selection("cliq-user", "acme", "widgets", &state)
        .await
        .unwrap();
    let app = test_app!(state);

    let req = test::TestRequest::post()
        .uri("/cliq/commands/bug")
        .set_json(json!({
            "text": "App crash | Opening settings crashes | #mobile #p1",
            "user": {"id": "cliq-user"}
        }))
        .to_request();
    let reply: CliqMessage = test::call_and_read_body_json(&app, req).await;
    github.assert_async().await;

    assert_eq!(
        reply.text,
        "✅ Issue created: [#21](https://github.com/acme/widgets/issues/21)"
    );
    let suggestions = &reply.attachments[0].fields[0].value;
    assert!(suggestions.starts_with("**App crashes**\nCheck the crash log\n```\nadb logcat\n```"));
}

#[actix_rt::test]
async fn bug_for_unconnected_user_links_to_connect() {
    let server = Server::new_async().await;
    let state = test_state(&server.url()).await;
    let app = test_app!(state);

    let req = test::TestRequest::post()
        .uri("/cliq/commands/bug")
        .set_json(json!({"text": "Crash | boom", "userId": "u9"}))
        .to_request();
    let reply: CliqMessage = test::call_and_read_body_json(&app, req).await;

    assert!(reply.text.starts_with("⚠️ GitHub Issue Creation Failed: \"No repository selected"));
    assert!(reply
        .text
        .ends_with("http://bugsync.test/connect/github?userId=u9"));
    assert!(reply.attachments.is_empty());
}

#[actix_rt::test]
async fn bug_accepts_form_encoded_commands() {
    let mut server = Server::new_async().await;
    let github = server
        .mock("POST", Matcher::Any)
        .expect(0)
        .create_async()
        .await;
    let state = test_state(&server.url()).await;
    let app = test_app!(state);

    let req = test::TestRequest::post()
        .uri("/cliq/commands/bug")
        .insert_header(("content-type", "application/x-www-form-urlencoded"))
        .set_payload("text=hello")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let reply: CliqMessage = test::read_body_json(resp).await;
    assert_eq!(reply, CliqMessage::text(BUG_USAGE));

    let req = test::TestRequest::post()
        .uri("/cliq/commands/bug")
        .insert_header(("content-type", "application/x-www-form-urlencoded"))
        .set_payload("text=Crash+%7C+boom&userId=u7")
        .to_request();
    let reply: CliqMessage = test::call_and_read_body_json(&app, req).await;
    assert!(reply.text.starts_with("⚠️ GitHub Issue Creation Failed"));
    assert!(reply
        .text
        .ends_with("http://bugsync.test/connect/github?userId=u7"));
    github.assert_async().await;
}

#[actix_rt::test]
async fn unreadable_command_body_replies_with_usage() {
    let server = Server::new_async().await;
    let state = test_state(&server.url()).await;
    let app = test_app!(state);

    let req = test::TestRequest::post()
        .uri("/cliq/commands/bugstatus")
        .insert_header(("content-type", "text/plain"))
        .set_payload("{not json")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let reply: CliqMessage = test::read_body_json(resp).await;
    assert_eq!(reply, CliqMessage::text(BUGSTATUS_USAGE));
}

#[actix_rt::test]
async fn bugstatus_with_bad_number_replies_with_usage() {
    let server = Server::new_async().await;
    let state = test_state(&server.url()).await;
    let app = test_app!(state);

    let req = test::TestRequest::post()
        .uri("/cliq/commands/bugstatus")
        .set_json(json!({"text": "latest"}))
        .to_request();
    let reply: CliqMessage = test::call_and_read_body_json(&app, req).await;
    assert_eq!(reply, CliqMessage::text(BUGSTATUS_USAGE));
}

#[actix_rt::test]
async fn bugstatus_replies_with_issue_summary() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/repos/acme/widgets/issues/21")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "number": 21,
                "title": "App crash",
                "state": "closed",
                "html_url": "https://github.com/acme/widgets/issues/21",
                "labels": [],
                "assignee": {"login": "octocat"}
            })
            .to_string(),
        )
        .create_async()
        .await;
    let mut config = test_config(&server.url());
    config.gh_token = Some("ghp_global".to_string());
    config.repo_owner = Some("acme".to_string());
    config.repo_name = Some("widgets".to_string());
    let state = state_with(config).await;
    let app = test_app!(state);

    let req = test::TestRequest::post()
        .uri("/cliq/commands/bugstatus")
        .set_json(json!({"text": "21"}))
        .to_request();
    let reply: CliqMessage = test::call_and_read_body_json(&app, req).await;
    assert_eq!(
        reply.text,
        "Issue #21: App crash\nStatus: closed\nURL: https://github.com/acme/widgets/issues/21"
    );
}

#[actix_rt::test]
async fn bugstatus_reports_github_errors() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/repos/acme/widgets/issues/404")
        .with_status(404)
        .with_header("content-type", "application/json")
        .with_body(json!({"message": "Not Found"}).to_string())
        .create_async()
        .await;
    let mut config = test_config(&server.url());
    config.gh_token = Some("ghp_global".to_string());
    config.repo_owner = Some("acme".to_string());
    config.repo_name = Some("widgets".to_string());
    let state = state_with(config).await;
    let app = test_app!(state);

    let req = test::TestRequest::post()
        .uri("/cliq/commands/bugstatus")
        .set_json(json!({"text": "404"}))
        .to_request();
    let reply: CliqMessage = test::call_and_read_body_json(&app, req).await;
    assert_eq!(
        reply.text,
        "⚠️ Error fetching status: {\"message\":\"Not Found\"}"
    );
}
