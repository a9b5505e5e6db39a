use actix_web::{web, HttpResponse, Responder};
use chrono::Utc;

use crate::AppState;

/// Service name from Cargo.toml, available at compile time
pub const SERVICE: &str = env!("CARGO_PKG_NAME");

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/health").route(web::get().to(health_check)));
}

async fn health_check(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "timestamp": Utc::now(),
        "service": SERVICE,
        "activeVisitors": state.store.visitor_count(),
        "registeredProfiles": state.store.profile_count(),
    }))
}
