use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use derive_more::Display;
use serde_json::Value;

/// JSON body of every error answered by the JSON endpoints.
#[derive(Serialize, Deserialize, Debug)]
pub struct ErrorBody {
    pub error: Value,
}

/// Errors as the HTTP layer sees them. Domain errors convert into this at the handler boundary.
#[derive(Debug, Display)]
pub enum ApiError {
    /// 400: a required field is absent or malformed.
    #[display(fmt = "{}", _0)]
    MissingInput(String),
    /// 401: no stored GitHub credential for the user.
    #[display(fmt = "{}", _0)]
    NotAuthenticated(String),
    /// GitHub said no; its status and body go back to the caller untouched.
    #[display(fmt = "GitHub responded with status {}", status)]
    Upstream { status: u16, body: Value },
    /// 500: anything unexpected. The detail is logged where the error is converted.
    #[display(fmt = "{}", _0)]
    ServerFault(String),
}

impl ApiError {
    pub fn body(&self) -> Value {
        match self {
            ApiError::Upstream { body, .. } => body.clone(),
            other => Value::String(other.to_string()),
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MissingInput(_) => StatusCode::BAD_REQUEST,
            ApiError::NotAuthenticated(_) => StatusCode::UNAUTHORIZED,
            ApiError::Upstream { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            ApiError::ServerFault(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorBody { error: self.body() })
    }
}
