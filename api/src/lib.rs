#[macro_use]
extern crate log;
#[macro_use]
extern crate async_trait;
#[macro_use]
extern crate serde;
#[macro_use]
extern crate lazy_static;

pub mod command;
pub mod config;
pub mod github;
pub mod handlers;
pub mod models;
pub mod persisters;
pub mod snippets;
pub mod state;

pub type SqlPool = sqlx::SqlitePool;
pub type PoolOptions = sqlx::sqlite::SqlitePoolOptions;

/// User id used when a caller does not identify itself.
pub const DEFAULT_USER_ID: &str = "default_user";
