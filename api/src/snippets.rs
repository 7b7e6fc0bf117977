//! Keyword matching of free text against the static troubleshooting snippets.
//!
//! The corpus is read once at startup and never mutated afterwards, so the
//! matcher is a pure function of its input.

use std::path::Path;

/// Maximum number of snippets returned for a single piece of text.
pub const MAX_MATCHES: usize = 3;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum SnippetId {
    Number(serde_json::Number),
    Text(String),
}

#[derive(Deserialize, Debug, Clone)]
pub struct Snippet {
    pub id: SnippetId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub snippet: String,
    #[serde(default)]
    pub keywords: Vec<String>,
}

impl Snippet {
    /// Number of keywords that occur anywhere in `lowered`, which must already be lowercase.
    fn score(&self, lowered: &str) -> usize {
        self.keywords
            .iter()
            .filter(|k| lowered.contains(&k.to_lowercase()))
            .count()
    }
}

/// The projection of a snippet returned to callers.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SnippetMatch {
    pub id: SnippetId,
    pub title: String,
    pub snippet: String,
    pub description: String,
}

impl From<&Snippet> for SnippetMatch {
    fn from(s: &Snippet) -> Self {
        SnippetMatch {
            id: s.id.clone(),
            title: s.title.clone(),
            snippet: s.snippet.clone(),
            description: s.description.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ScoredSnippet<'a> {
    pub snippet: &'a Snippet,
    pub score: usize,
}

#[derive(Debug)]
pub enum SnippetLoadError {
    Io(std::io::Error),
    Json(serde_json::Error),
}

impl From<std::io::Error> for SnippetLoadError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for SnippetLoadError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}

#[derive(Debug, Clone, Default)]
pub struct SnippetCorpus {
    snippets: Vec<Snippet>,
}

impl SnippetCorpus {
    pub fn new(snippets: Vec<Snippet>) -> Self {
        Self { snippets }
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SnippetLoadError> {
        let raw = std::fs::read_to_string(path)?;
        Ok(Self::from_json(&raw)?)
    }

    /// Parses a JSON array of snippets. Entries that are not valid snippets are skipped.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        let entries = serde_json::from_str::<Vec<serde_json::Value>>(raw)?;
        let snippets = entries
            .into_iter()
            .enumerate()
            .filter_map(|(i, entry)| match serde_json::from_value::<Snippet>(entry) {
                Ok(snippet) => Some(snippet),
                Err(e) => {
                    warn!("skipping snippet #{}: {}", i, e);
                    None
                }
            })
            .collect();
        Ok(Self::new(snippets))
    }

    /// Loads the corpus, falling back to an empty one so the service can still start.
    pub fn load_or_empty(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        Self::from_file(path).unwrap_or_else(|e| {
            warn!("could not load snippets from {}: {:?}", path.display(), e);
            Self::default()
        })
    }

    pub fn len(&self) -> usize {
        self.snippets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snippets.is_empty()
    }

    /// Every snippet with at least one keyword hit, best first. Ties keep corpus order.
    pub fn rank(&self, text: &str) -> Vec<ScoredSnippet<'_>> {
        if text.is_empty() {
            return Vec::new();
        }
        let lowered = text.to_lowercase();

        let mut ranked = self
            .snippets
            .iter()
            .map(|snippet| ScoredSnippet {
                snippet,
                score: snippet.score(&lowered),
            })
            .filter(|s| s.score > 0)
            .collect::<Vec<_>>();

        // `sort_by` is stable.
        ranked.sort_by(|a, b| b.score.cmp(&a.score));
        ranked
    }

    pub fn match_text(&self, text: &str) -> Vec<SnippetMatch> {
        self.rank(text)
            .into_iter()
            .take(MAX_MATCHES)
            .map(|s| SnippetMatch::from(s.snippet))
            .collect()
    }
}
