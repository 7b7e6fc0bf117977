pub mod cliq;
pub mod connect;
pub mod health;
pub mod issues;
pub mod oauth;
pub mod repos;

use crate::models::error::ApiError;

use actix_web::{error, error::JsonPayloadError, web, HttpRequest, Result};

/// Mounts every route of the service.
pub fn init(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error));
    health::init(cfg);
    connect::init(cfg);
    repos::init(cfg);
    issues::init(cfg);
    cfg.service(web::scope("/cliq/commands").configure(cliq::init));
}

/// Bodies the JSON extractor rejects get the same `{"error": …}` shape as every other failure.
fn json_error(err: JsonPayloadError, req: &HttpRequest) -> error::Error {
    warn!("rejected JSON body on {}: {}", req.path(), err);
    ApiError::MissingInput(format!("Invalid JSON body: {}", err)).into()
}

pub async fn not_found() -> Result<&'static str> {
    Err(error::ErrorNotFound("route not found"))
}
