//! HTTP route modules. Each handler is a direct pass-through to one
//! orchestrator/resolver operation; typed core errors map to
//! `application/problem+json` via `AppError`.

pub mod games;
pub mod health;
pub mod personalities;
pub mod users;

use actix_web::web;

pub fn configure(cfg: &mut web::ServiceConfig) {
    health::configure_routes(cfg);
    users::configure_routes(cfg);
    personalities::configure_routes(cfg);
    games::configure_routes(cfg);
}
