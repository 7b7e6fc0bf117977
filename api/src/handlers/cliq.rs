use crate::command::{
    parse_bug_text, parse_issue_number, CliqMessage, BUGSTATUS_USAGE, BUG_USAGE,
};
use crate::handlers::issues::{create_issue, issue_status};
use crate::models::error::ApiError;
use crate::models::issue::IssueError;
use crate::state::{AppState, State};
use crate::DEFAULT_USER_ID;

use actix_web::{post, web};

#[derive(Deserialize, Debug, Default)]
pub struct CliqUser {
    pub id: Option<String>,
}

/// Slash-command payload posted by Cliq. Depending on the handler configuration the command
/// text arrives as `text`, `message` or `command`.
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct CliqCommand {
    pub text: Option<String>,
    pub message: Option<String>,
    pub command: Option<String>,
    pub user_id: Option<String>,
    pub user: Option<CliqUser>,
}

impl CliqCommand {
    /// Reads a command posted as JSON or as a urlencoded form. Any other body is an empty
    /// command, which the handlers answer with their usage text.
    pub fn from_body(body: &[u8]) -> Self {
        if let Ok(cmd) = serde_json::from_slice(body) {
            return cmd;
        }
        std::str::from_utf8(body)
            .ok()
            .and_then(|raw| web::Query::<CliqCommand>::from_query(raw).ok())
            .map(web::Query::into_inner)
            .unwrap_or_default()
    }

    pub fn text(&self) -> &str {
        [&self.text, &self.message, &self.command]
            .into_iter()
            .flatten()
            .map(String::as_str)
            .find(|t| !t.trim().is_empty())
            .unwrap_or_default()
    }

    pub fn user_id(&self) -> &str {
        self.user_id
            .as_deref()
            .or_else(|| self.user.as_ref().and_then(|u| u.id.as_deref()))
            .filter(|u| !u.trim().is_empty())
            .unwrap_or(DEFAULT_USER_ID)
    }
}

/// Handles `/bug <title> | <description> | #labels`.
pub async fn bug_command(cmd: &CliqCommand, state: &State) -> CliqMessage {
    let parsed = parse_bug_text(cmd.text());
    if !parsed.has_title() {
        return CliqMessage::text(BUG_USAGE);
    }

    let user_id = cmd.user_id();
    let labels = if parsed.labels.is_empty() {
        None
    } else {
        Some(parsed.labels)
    };

    match create_issue(user_id, &parsed.title, &parsed.body, labels, state).await {
        Ok(created) => CliqMessage::issue_card(
            created.issue_number,
            &created.issue_url,
            &created.matched_snippets,
        ),
        Err(e) => {
            let hint = match e {
                IssueError::NotAuthenticated | IssueError::NoRepoSelected => Some(connect_hint(
                    &state.config.backend_base_url,
                    user_id,
                )),
                _ => None,
            };
            let err = ApiError::from(e);
            let mut text = format!("⚠️ GitHub Issue Creation Failed: {}", err.body());
            if let Some(hint) = hint {
                text.push('\n');
                text.push_str(&hint);
            }
            CliqMessage::text(text)
        }
    }
}

/// Handles `/bugstatus <issueNumber>`.
pub async fn bugstatus_command(cmd: &CliqCommand, state: &State) -> CliqMessage {
    let number = match parse_issue_number(cmd.text()) {
        Some(n) => n,
        None => return CliqMessage::text(BUGSTATUS_USAGE),
    };

    match issue_status(number, state).await {
        Ok(status) => CliqMessage::text(format!(
            "Issue #{}: {}\nStatus: {}\nURL: {}",
            status.number, status.title, status.state, status.url
        )),
        Err(e) => CliqMessage::text(format!(
            "⚠️ Error fetching status: {}",
            ApiError::from(e).body()
        )),
    }
}

fn connect_hint(backend_base_url: &str, user_id: &str) -> String {
    let link = url::Url::parse_with_params(
        &format!("{}/connect/github", backend_base_url.trim_end_matches('/')),
        &[("userId", user_id)],
    );
    match link {
        Ok(link) => format!(
            "Connect GitHub and pick a repository first: {}",
            link.as_str()
        ),
        Err(_) => "Connect GitHub and pick a repository first.".to_string(),
    }
}

#[post("/bug")]
async fn post_bug(body: web::Bytes, state: AppState) -> web::Json<CliqMessage> {
    let cmd = CliqCommand::from_body(&body);
    web::Json(bug_command(&cmd, &state).await)
}

#[post("/bugstatus")]
async fn post_bugstatus(body: web::Bytes, state: AppState) -> web::Json<CliqMessage> {
    let cmd = CliqCommand::from_body(&body);
    web::Json(bugstatus_command(&cmd, &state).await)
}

pub fn init(cfg: &mut web::ServiceConfig) {
    cfg.service(post_bug);
    cfg.service(post_bugstatus);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_falls_back_to_message_then_command() {
        let cmd: CliqCommand =
            serde_json::from_str(r#"{"text": " ", "message": "a | b"}"#).unwrap();
        assert_eq!(cmd.text(), "a | b");

        let cmd: CliqCommand = serde_json::from_str(r#"{"command": "7"}"#).unwrap();
        assert_eq!(cmd.text(), "7");

        assert_eq!(CliqCommand::default().text(), "");
    }

    #[test]
    fn user_id_prefers_explicit_then_cliq_user() {
        let cmd: CliqCommand =
            serde_json::from_str(r#"{"userId": "u1", "user": {"id": "u2"}}"#).unwrap();
        assert_eq!(cmd.user_id(), "u1");

        let cmd: CliqCommand = serde_json::from_str(r#"{"user": {"id": "u2"}}"#).unwrap();
        assert_eq!(cmd.user_id(), "u2");

        assert_eq!(CliqCommand::default().user_id(), DEFAULT_USER_ID);
    }

    #[test]
    fn body_may_be_json_or_form() {
        let cmd = CliqCommand::from_body(br#"{"text": "42", "userId": "u1"}"#);
        assert_eq!(cmd.text(), "42");
        assert_eq!(cmd.user_id(), "u1");

        let cmd = CliqCommand::from_body(b"text=Crash+%7C+boom&userId=u2");
        assert_eq!(cmd.text(), "Crash | boom");
        assert_eq!(cmd.user_id(), "u2");

        let cmd = CliqCommand::from_body(&[0xff, 0xfe]);
        assert_eq!(cmd.text(), "");
        assert_eq!(cmd.user_id(), DEFAULT_USER_ID);
    }

    #[test]
    fn connect_hint_escapes_user() {
        let hint = connect_hint("https://bugsync.example.com/", "a b");
        assert!(hint.ends_with("https://bugsync.example.com/connect/github?userId=a+b"));
    }
}
