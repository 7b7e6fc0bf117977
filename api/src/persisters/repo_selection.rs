use crate::models::repo::UserRepoSelection;
use crate::persisters::{Persist, Query};
use crate::state::State;

/// Insert or overwrite the repository chosen by `user_id`.
#[derive(Debug)]
pub struct RepoSelectionUpsert {
    pub user_id: String,
    pub repo_owner: String,
    pub repo_name: String,
}

pub struct RepoSelectionGet {
    pub user_id: String,
}

#[async_trait]
impl Persist for RepoSelectionUpsert {
    type Ret = UserRepoSelection;
    type Error = sqlx::Error;

    async fn persist(self, state: &State) -> Result<Self::Ret, Self::Error> {
        sqlx::query(
            r#"
            INSERT INTO user_settings (user_id, repo_owner, repo_name)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(user_id) DO UPDATE SET
                repo_owner = excluded.repo_owner,
                repo_name  = excluded.repo_name
            "#,
        )
        .bind(&self.user_id)
        .bind(&self.repo_owner)
        .bind(&self.repo_name)
        .execute(&state.db_conn)
        .await
        .map_err(|e| {
            error!("error saving repo selection for {}: {:?}", self.user_id, e);
            e
        })?;

        Ok(UserRepoSelection {
            repo_owner: self.repo_owner,
            repo_name: self.repo_name,
        })
    }
}

#[async_trait]
impl Query for RepoSelectionGet {
    type Resolve = Option<UserRepoSelection>;
    type Error = sqlx::Error;

    async fn fetch(self, state: &State) -> Result<Self::Resolve, Self::Error> {
        sqlx::query_as::<_, UserRepoSelection>(
            r#"
            SELECT repo_owner, repo_name
            FROM user_settings
            WHERE user_id = ?1
            "#,
        )
        .bind(&self.user_id)
        .fetch_optional(&state.db_conn)
        .await
    }
}
