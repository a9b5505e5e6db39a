use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use dotenv::dotenv;
use std::sync::Arc;

mod config;
mod controllers;
mod error;
mod hub;
mod models;

use config::Config;
use hub::HubStore;

pub struct AppState {
    pub store: Arc<HubStore>,
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init();

    let config = Config::from_env();
    let port = config.port;
    let store = Arc::new(HubStore::new());

    log::info!("Starting hub backend on port {}", port);
    log::info!("State is in-memory only and resets on restart");

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header()
            .max_age(3600);

        App::new()
            .app_data(web::Data::new(AppState {
                store: Arc::clone(&store),
            }))
            .wrap(Logger::default())
            .wrap(cors)
            .configure(controllers::health::config)
            .configure(controllers::hub::config)
            .configure(controllers::profiles::config)
    })
    .bind(("0.0.0.0", port))?
    .run()
    .await
}
