use actix_web::web;

pub mod health;
pub mod simulation;

/// Register every route. Used by `main.rs` and by route tests alike.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.configure(health::configure_routes);
    cfg.service(web::scope("/api/simulation").configure(simulation::configure_routes));
}
