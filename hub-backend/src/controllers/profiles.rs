//! Profile controller — registration and the profile directory.

use actix_web::{web, HttpResponse, Responder};
use serde::Deserialize;

use crate::controllers::require_field;
use crate::error::HubResult;
use crate::AppState;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RegisterProfileRequest {
    user_id: Option<String>,
    name: Option<String>,
}

/// GET /hub/profiles — all registered profiles with their current state,
/// most recently seen first
async fn list_profiles(state: web::Data<AppState>) -> impl Responder {
    let profiles = state.store.profiles_by_last_seen();
    HttpResponse::Ok().json(serde_json::json!({
        "count": profiles.len(),
        "profiles": profiles,
    }))
}

/// POST /hub/profile/register — create or refresh a visitor's profile
async fn register_profile(
    state: web::Data<AppState>,
    body: web::Json<RegisterProfileRequest>,
) -> HubResult<HttpResponse> {
    let user_id = require_field(body.user_id.as_deref(), "userId")?;
    let name = require_field(body.name.as_deref(), "name")?;

    let update = state.store.register_profile(user_id, name)?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "ok": true,
        "profile": update.profile,
        "visitorId": update.visitor_id,
    })))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/hub/profiles").route(web::get().to(list_profiles)));
    cfg.service(web::resource("/hub/profile/register").route(web::post().to(register_profile)));
}
