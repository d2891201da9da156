// src/handlers/health.rs
// DOCUMENTATION: Health check handler
// PURPOSE: Liveness plus a database round trip

use actix_web::{web, HttpResponse, Responder};
use serde_json::json;
use sqlx::PgPool;

pub async fn health_check(pool: web::Data<PgPool>) -> impl Responder {
    let database = match sqlx::query("SELECT 1").execute(pool.get_ref()).await {
        Ok(_) => "ok",
        Err(e) => {
            log::warn!("Health check database probe failed: {}", e);
            "unavailable"
        }
    };

    let body = json!({
        "status": if database == "ok" { "ok" } else { "degraded" },
        "service": "ssis-api",
        "database": database,
        "version": env!("CARGO_PKG_VERSION")
    });

    if database == "ok" {
        HttpResponse::Ok().json(body)
    } else {
        HttpResponse::ServiceUnavailable().json(body)
    }
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check));
}
