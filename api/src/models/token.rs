/// A GitHub OAuth credential, stored in plaintext and keyed by user id.
#[derive(sqlx::FromRow, Clone)]
pub struct UserToken {
    pub user_id: String,
    pub access_token: String,
    pub token_type: String,
    pub scope: String,
}

impl std::fmt::Debug for UserToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserToken")
            .field("user_id", &self.user_id)
            .field("access_token", &"<redacted>")
            .field("token_type", &self.token_type)
            .field("scope", &self.scope)
            .finish()
    }
}

/// Response of `GET /debug/token`. Never includes the token itself.
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TokenStatus {
    pub found: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
}

impl From<Option<UserToken>> for TokenStatus {
    fn from(token: Option<UserToken>) -> Self {
        match token {
            Some(t) => TokenStatus {
                found: true,
                user_id: Some(t.user_id),
                scope: Some(t.scope),
            },
            None => TokenStatus {
                found: false,
                user_id: None,
                scope: None,
            },
        }
    }
}
