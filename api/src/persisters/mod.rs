pub mod repo_selection;
pub mod token;

use crate::state::State;

use sqlx::migrate::Migrator;

/// Schema for `user_tokens` and `user_settings`, embedded from `migrations/`.
pub static MIGRATOR: Migrator = sqlx::migrate!();

/// Abstraction over the notion of a query.
///
/// Usually, we will implement this type on a params struct built from the request. In the
/// handler, we can then simply call `fetch` on it to retrieve the relevant model instance.
#[async_trait]
pub trait Query {
    /// The type returned when the query resolves.
    type Resolve;
    /// Error type returned if the query fails.
    type Error;
    /// Fetches the model instance from underlying storage.
    ///
    /// Usually, this is where the raw SQL query lives.
    async fn fetch(self, state: &State) -> Result<Self::Resolve, Self::Error>;
}

/// Abstraction over the notion of persisting data.
///
/// Every row here is keyed by user id, so persisting is always an upsert: the last write for a
/// user wins.
#[async_trait]
pub trait Persist {
    /// The return type used to indicate a successful attempt to persist the item.
    type Ret;
    /// Error type returned from unsuccessful attempts to persist the item.
    type Error;
    /// Persist the value to the database held by `state`.
    async fn persist(self, state: &State) -> Result<Self::Ret, Self::Error>;
}
