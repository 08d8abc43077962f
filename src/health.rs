use actix_web::{web, HttpResponse, Responder};
use serde_json::json;

use crate::state::app_state::AppState;

pub async fn health(app_state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(json!({
        "status": "ok",
        "activeMatches": app_state.registry.active_matches(),
    }))
}
