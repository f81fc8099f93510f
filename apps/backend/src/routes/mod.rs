use actix_web::web;

pub mod admin;
pub mod health;
pub mod veto;

/// Register every route; `main.rs` and the route tests share this.
pub fn configure(cfg: &mut web::ServiceConfig) {
    // Health check: /health
    cfg.configure(health::configure_routes);

    // Administrative repairs and scans: /api/admin/veto/**
    // Registered before the player scope so `/api/admin` is not shadowed.
    cfg.service(web::scope("/api/admin/veto").configure(admin::configure_routes));

    // Player-facing veto routes: /api/matches/**, /api/veto/**
    cfg.service(web::scope("/api").configure(veto::configure_routes));
}
