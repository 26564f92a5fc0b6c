use actix_web::{web, HttpResponse, Responder};

use crate::AppState;

/// Version from Cargo.toml, available at compile time
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/api/health").route(web::get().to(health_check)));
    cfg.service(web::resource("/api/version").route(web::get().to(get_version)));
}

/// Healthy only while the backing file loads; a corrupt store reports 503
async fn health_check(data: web::Data<AppState>) -> impl Responder {
    match data.store.load_all().await {
        Ok(notes) => HttpResponse::Ok().json(serde_json::json!({
            "status": "ok",
            "version": VERSION,
            "note_count": notes.len()
        })),
        Err(e) => {
            log::error!("[HEALTH] Note store unreadable: {}", e);
            HttpResponse::ServiceUnavailable().json(serde_json::json!({
                "status": "degraded",
                "version": VERSION,
                "error": "Note store unreadable"
            }))
        }
    }
}

async fn get_version() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "version": VERSION
    }))
}
