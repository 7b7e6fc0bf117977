#[macro_use]
extern crate lazy_static;

use actix_web::{middleware, web, App, HttpServer};
use bugsync_api::config::{Config, Opts};
use bugsync_api::handlers;

lazy_static! {
    pub static ref CONFIG: Config = Config::parse_from_env();
}

#[actix_rt::main]
async fn main() -> std::io::Result<()> {
    let (_handle, _opt) = Opts::parse_from_args();
    let config = &*CONFIG;
    let state = config.clone().into_state().await;
    let port = state.config.port;

    log::info!("BugSync+ server running on port {}", port);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(state.clone()))
            .app_data(web::PathConfig::default())
            .app_data(web::QueryConfig::default())
            .wrap(middleware::Compress::default())
            .wrap(middleware::Logger::default())
            .default_service(web::route().to(handlers::not_found))
            .configure(handlers::init)
    })
    .keep_alive(std::time::Duration::from_secs(300))
    .bind(("0.0.0.0", port))?
    .run()
    .await
}
