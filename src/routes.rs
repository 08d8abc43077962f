use actix_web::web;

use crate::health::health;
use crate::ws::session::upgrade;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health))
        .route("/ws", web::get().to(upgrade));
}
