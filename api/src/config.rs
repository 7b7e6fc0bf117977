use crate::persisters::MIGRATOR;
use crate::snippets::SnippetCorpus;
use crate::state::*;
use crate::PoolOptions;

use sqlx::sqlite::SqliteConnectOptions;
use std::collections::HashMap;
use std::env;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

#[derive(Serialize, Deserialize, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    /// Public URL of this service; the OAuth redirect URI is derived from it.
    pub app_base_url: String,
    /// URL used in chat replies that link users back to this service.
    pub backend_base_url: String,
    pub gh_client_id: String,
    pub gh_client_secret: String,
    pub gh_user_agent: String,
    /// Global token and repository used for issue status lookups.
    pub gh_token: Option<String>,
    pub repo_owner: Option<String>,
    pub repo_name: Option<String>,
    pub snippets_file: String,
    pub github_api_base: String,
    pub github_oauth_base: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            database_url: "sqlite:bugsync.sqlite".to_string(),
            port: 3000,
            app_base_url: "http://localhost:3000".to_string(),
            backend_base_url: "http://localhost:3000".to_string(),
            gh_client_id: String::new(),
            gh_client_secret: String::new(),
            gh_user_agent: "bugsync-plus".to_string(),
            gh_token: None,
            repo_owner: None,
            repo_name: None,
            snippets_file: "snippets.json".to_string(),
            github_api_base: "https://api.github.com".to_string(),
            github_oauth_base: "https://github.com".to_string(),
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &self.database_url)
            .field("port", &self.port)
            .field("app_base_url", &self.app_base_url)
            .field("backend_base_url", &self.backend_base_url)
            .field("gh_client_id", &self.gh_client_id)
            .field("gh_client_secret", &"<redacted>")
            .field("gh_user_agent", &self.gh_user_agent)
            .field("gh_token", &self.gh_token.as_ref().map(|_| "<redacted>"))
            .field("repo_owner", &self.repo_owner)
            .field("repo_name", &self.repo_name)
            .field("snippets_file", &self.snippets_file)
            .field("github_api_base", &self.github_api_base)
            .field("github_oauth_base", &self.github_oauth_base)
            .finish()
    }
}

impl Config {
    pub fn parse_from_env() -> Self {
        // Load environment variables from a .env file. This is used for dev workflows.
        dotenv::dotenv().ok();

        Self::from_vars(env::vars().collect())
    }

    /// Builds the config from a snapshot of the environment.
    pub fn from_vars(mut env_vars: HashMap<String, String>) -> Self {
        let defaults = Config::default();

        // Note: it's okay to panic here, because without this env var we can't build
        // the OAuth redirect URI, and it only happens at startup.
        let app_base_url = env_vars
            .remove("APP_BASE_URL")
            .expect("no APP_BASE_URL environment variable present");
        // Without OAuth credentials the connect flow fails upstream, but health, issue status
        // and the chat usage replies still work.
        let gh_client_id = env_vars.remove("GITHUB_CLIENT_ID").unwrap_or_else(|| {
            warn!("GITHUB_CLIENT_ID is not set; GitHub connect will fail");
            defaults.gh_client_id.clone()
        });
        let gh_client_secret = env_vars.remove("GITHUB_CLIENT_SECRET").unwrap_or_else(|| {
            warn!("GITHUB_CLIENT_SECRET is not set; GitHub connect will fail");
            defaults.gh_client_secret.clone()
        });

        let port = env_vars
            .remove("PORT")
            .map(|p| p.parse::<u16>().expect("invalid port"))
            .unwrap_or(defaults.port);

        let backend_base_url = env_vars
            .remove("BACKEND_BASE_URL")
            .unwrap_or_else(|| app_base_url.clone());

        let non_empty = |v: String| if v.trim().is_empty() { None } else { Some(v) };

        Config {
            database_url: env_vars
                .remove("DATABASE_URL")
                .unwrap_or(defaults.database_url),
            port,
            app_base_url,
            backend_base_url,
            gh_client_id,
            gh_client_secret,
            gh_user_agent: env_vars
                .remove("GH_USER_AGENT")
                .unwrap_or(defaults.gh_user_agent),
            gh_token: env_vars.remove("GITHUB_TOKEN").and_then(non_empty),
            repo_owner: env_vars.remove("REPO_OWNER").and_then(non_empty),
            repo_name: env_vars.remove("REPO_NAME").and_then(non_empty),
            snippets_file: env_vars
                .remove("SNIPPETS_FILE")
                .unwrap_or(defaults.snippets_file),
            github_api_base: env_vars
                .remove("GITHUB_API_BASE_URL")
                .unwrap_or(defaults.github_api_base),
            github_oauth_base: env_vars
                .remove("GITHUB_OAUTH_BASE_URL")
                .unwrap_or(defaults.github_oauth_base),
        }
    }

    /// The callback GitHub redirects to after the user authorizes the app.
    pub fn oauth_redirect_uri(&self) -> String {
        format!(
            "{}/auth/github/callback",
            self.app_base_url.trim_end_matches('/')
        )
    }

    pub async fn into_state(self) -> AppStateRaw {
        info!("config: {:?}", self);

        let connect_options = SqliteConnectOptions::from_str(&self.database_url)
            .expect("Invalid SqlDB URL")
            .create_if_missing(true);

        let db_conn = PoolOptions::new()
            .connect_with(connect_options)
            .await
            .expect("sql open");

        MIGRATOR.run(&db_conn).await.expect("database migration");
        info!("database migrated");

        let snippets = SnippetCorpus::load_or_empty(&self.snippets_file);
        info!("loaded {} snippets", snippets.len());

        Arc::new(State::new(self, db_conn, snippets))
    }
}

#[derive(clap::Parser, Debug)]
#[clap(version, about = "BugSync+ backend: Cliq slash-commands to GitHub issues")]
pub struct Opts {
    /// Verbose mode (-v, -vv, -vvv, etc.)
    #[clap(short, long, parse(from_occurrences))]
    pub verbose: u8,
}

impl Opts {
    pub fn parse_from_args() -> (JoinHandle, Self) {
        use clap::Parser;
        let opt: Self = Opts::parse();

        let level = match opt.verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _more => LevelFilter::Trace,
        };

        let formater = BaseFormater::new()
            .local(true)
            .color(true)
            .level(4)
            .formater(format);
        let filter = BaseFilter::new()
            .starts_with(true)
            .notfound(true)
            .max_level(level)
            .chain(
                "sqlx",
                if opt.verbose > 1 {
                    LevelFilter::Debug
                } else {
                    LevelFilter::Warn
                },
            );

        let handle = NonblockLogger::new()
            .filter(filter)
            .unwrap()
            .formater(formater)
            .log_to_stdout()
            .map_err(|e| eprintln!("failed to init nonblock_logger: {:?}", e))
            .unwrap();

        info!("opt: {:?}", opt);

        (handle, opt)
    }
}

use nonblock_logger::{
    log::{LevelFilter, Record},
    BaseFilter, BaseFormater, FixedLevel, JoinHandle, NonblockLogger,
};

pub fn format(base: &BaseFormater, record: &Record) -> String {
    let level = FixedLevel::with_color(record.level(), base.color_get())
        .length(base.level_get())
        .into_colored()
        .into_coloredfg();

    format!(
        "[{} {}#{}:{} {}] {}\n",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S.%3f"),
        level,
        record.module_path().unwrap_or("*"),
        record.line().unwrap_or(0),
        nonblock_logger::current_thread_name(),
        record.args()
    )
}
