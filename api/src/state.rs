use crate::config::Config;
use crate::github::client::GithubClient;
use crate::models::issue::RecentIssues;
use crate::snippets::SnippetCorpus;
use crate::SqlPool;

pub struct State {
    pub config: Config,
    pub db_conn: SqlPool,
    pub github: GithubClient,
    pub snippets: SnippetCorpus,
    pub recent_issues: RecentIssues,
}

impl State {
    pub fn new(config: Config, db_conn: SqlPool, snippets: SnippetCorpus) -> Self {
        let github = GithubClient::new(&config);
        Self {
            config,
            db_conn,
            github,
            snippets,
            recent_issues: RecentIssues::default(),
        }
    }
}

pub type AppStateRaw = std::sync::Arc<State>;
pub type AppState = actix_web::web::Data<AppStateRaw>;
