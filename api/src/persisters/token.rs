use crate::models::token::UserToken;
use crate::persisters::{Persist, Query};
use crate::state::State;

/// Insert or overwrite the credential for `user_id`.
#[derive(Debug)]
pub struct TokenUpsert {
    pub user_id: String,
    pub access_token: String,
    pub token_type: String,
    pub scope: String,
}

pub struct TokenGet {
    pub user_id: String,
}

#[async_trait]
impl Persist for TokenUpsert {
    type Ret = ();
    type Error = sqlx::Error;

    async fn persist(self, state: &State) -> Result<Self::Ret, Self::Error> {
        sqlx::query(
            r#"
            INSERT INTO user_tokens (user_id, access_token, token_type, scope)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT(user_id) DO UPDATE SET
                access_token = excluded.access_token,
                token_type   = excluded.token_type,
                scope        = excluded.scope
            "#,
        )
        .bind(&self.user_id)
        .bind(&self.access_token)
        .bind(&self.token_type)
        .bind(&self.scope)
        .execute(&state.db_conn)
        .await
        .map_err(|e| {
            error!("error saving token for {}: {:?}", self.user_id, e);
            e
        })?;

        debug!("stored GitHub token for user {}", self.user_id);
        Ok(())
    }
}

#[async_trait]
impl Query for TokenGet {
    type Resolve = Option<UserToken>;
    type Error = sqlx::Error;

    async fn fetch(self, state: &State) -> Result<Self::Resolve, Self::Error> {
        sqlx::query_as::<_, UserToken>(
            r#"
            SELECT user_id, access_token, token_type, scope
            FROM user_tokens
            WHERE user_id = ?1
            "#,
        )
        .bind(&self.user_id)
        .fetch_optional(&state.db_conn)
        .await
    }
}
