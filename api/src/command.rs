//! Parsing of Cliq slash-command text and rendering of the chat replies.

use crate::snippets::SnippetMatch;
use regex::Regex;

pub const BUG_USAGE: &str = "❗ Usage: /bug <title> | <description> | #labels";
pub const BUGSTATUS_USAGE: &str = "❗ Usage: /bugstatus <issueNumber>";

lazy_static! {
    static ref HASHTAG: Regex = Regex::new(r"#(\w+)").unwrap();
    static ref LABEL_SEPARATOR: Regex = Regex::new(r"[ ,]+").unwrap();
}

/// A `/bug` command split into its parts. An empty title means the text was unusable.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BugCommand {
    pub title: String,
    pub body: String,
    pub labels: Vec<String>,
}

impl BugCommand {
    pub fn has_title(&self) -> bool {
        !self.title.is_empty()
    }
}

/// Parses `Title | Body | #label1 #label2`.
///
/// Text without any `|` is rejected with an empty command. Empty segments are dropped, so
/// `Title || #bug` yields the body `#bug`. Labels come from the third segment when there is
/// one, otherwise from any `#word` in the whole text.
pub fn parse_bug_text(text: &str) -> BugCommand {
    if !text.contains('|') {
        return BugCommand::default();
    }

    let parts = text
        .split('|')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect::<Vec<&str>>();

    let title = parts.first().copied().unwrap_or_default().to_string();
    let body = parts.get(1).copied().unwrap_or_default().to_string();

    let labels = match parts.get(2) {
        Some(segment) => LABEL_SEPARATOR
            .split(segment)
            .map(|l| l.strip_prefix('#').unwrap_or(l).trim())
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect(),
        None => HASHTAG
            .captures_iter(text)
            .map(|c| c[1].to_string())
            .collect(),
    };

    BugCommand {
        title,
        body,
        labels,
    }
}

/// First whitespace separated token of a `/bugstatus` command, if it is a positive integer.
pub fn parse_issue_number(text: &str) -> Option<u64> {
    text.split_whitespace()
        .next()
        .and_then(|t| t.parse::<u64>().ok())
        .filter(|n| *n > 0)
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CliqField {
    pub title: String,
    pub value: String,
    pub short: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CliqAttachment {
    pub title: String,
    pub text: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub fields: Vec<CliqField>,
}

/// Reply body understood by Cliq: plain text, optionally with card attachments.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CliqMessage {
    pub text: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<CliqAttachment>,
}

impl CliqMessage {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            attachments: Vec::new(),
        }
    }

    pub fn issue_card(issue_number: u64, issue_url: &str, matched: &[SnippetMatch]) -> Self {
        let suggestions = matched
            .iter()
            .map(|s| {
                let code_block = if s.snippet.is_empty() {
                    String::new()
                } else {
                    format!("```\n{}\n```", s.snippet)
                };
                format!("**{}**\n{}\n{}", s.title, s.description, code_block)
            })
            .collect::<Vec<_>>()
            .join("\n\n---\n\n");

        let value = if suggestions.is_empty() {
            "No relevant suggestions found".to_string()
        } else {
            suggestions
        };

        Self {
            text: format!("✅ Issue created: [#{}]({})", issue_number, issue_url),
            attachments: vec![CliqAttachment {
                title: format!("Issue #{}", issue_number),
                text: issue_url.to_string(),
                kind: "rich".to_string(),
                fields: vec![CliqField {
                    title: "Suggestions".to_string(),
                    value,
                    short: false,
                }],
            }],
        }
    }
}
