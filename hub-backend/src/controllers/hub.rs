//! Hub state controller — state reads/updates, the task catalog, reset,
//! and the admin user listing.

use actix_web::{web, HttpResponse, Responder};
use serde::Deserialize;
use serde_json::Value;

use crate::controllers::require_field;
use crate::error::HubResult;
use crate::models::default_task_catalog;
use crate::AppState;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StateUpdateRequest {
    user_id: Option<String>,
    state: Option<Value>,
    display_name: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResetRequest {
    user_id: Option<String>,
}

/// POST /hub/state — apply a partial update to a visitor's state
async fn update_state(
    state: web::Data<AppState>,
    body: web::Json<StateUpdateRequest>,
) -> HubResult<HttpResponse> {
    let user_id = require_field(body.user_id.as_deref(), "userId")?;
    let display_name = body.display_name.as_deref().filter(|name| !name.is_empty());

    let update = state
        .store
        .update_state(user_id, body.state.as_ref(), display_name)?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "ok": true,
        "state": update.state,
        "visitorId": update.visitor_id,
    })))
}

/// GET /hub/state/{userId} — read a visitor's state, creating it on
/// first access. Returns the bare record, no envelope.
async fn get_state(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> HubResult<HttpResponse> {
    let user_id = path.into_inner();
    let snapshot = state.store.state_snapshot(&user_id)?;
    Ok(HttpResponse::Ok().json(snapshot.state))
}

/// GET /hub/tasks — the built-in task catalog
async fn get_tasks() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "tasks": default_task_catalog(),
    }))
}

/// POST /hub/reset — replace a visitor's state with a fresh default
async fn reset_state(
    state: web::Data<AppState>,
    body: web::Json<ResetRequest>,
) -> HubResult<HttpResponse> {
    let user_id = require_field(body.user_id.as_deref(), "userId")?;
    let update = state.store.reset_state(user_id)?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "ok": true,
        "state": update.state,
    })))
}

/// GET /hub/users — admin/debug listing of known ids and mappings
async fn list_users(state: web::Data<AppState>) -> impl Responder {
    let snapshot = state.store.users_snapshot();
    HttpResponse::Ok().json(serde_json::json!({
        "count": snapshot.visitor_ids.len(),
        "visitorIds": snapshot.visitor_ids,
        "profiles": snapshot.profile_ids,
        "alexaMappings": snapshot.alexa_mappings,
    }))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/hub/state").route(web::post().to(update_state)));
    cfg.service(web::resource("/hub/state/{user_id}").route(web::get().to(get_state)));
    cfg.service(web::resource("/hub/tasks").route(web::get().to(get_tasks)));
    cfg.service(web::resource("/hub/reset").route(web::post().to(reset_state)));
    cfg.service(web::resource("/hub/users").route(web::get().to(list_users)));
}
