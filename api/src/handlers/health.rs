use actix_web::{get, web};
use chrono::{SecondsFormat, Utc};

#[derive(Serialize, Deserialize, Debug)]
pub struct Health {
    pub status: String,
    pub message: String,
    pub time: String,
}

#[get("/health")]
async fn health() -> web::Json<Health> {
    web::Json(Health {
        status: "ok".to_string(),
        message: "BugSync+ backend is running".to_string(),
        time: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    })
}

pub fn init(cfg: &mut web::ServiceConfig) {
    cfg.service(health);
}
