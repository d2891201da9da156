// src/handlers/stats.rs
// DOCUMENTATION: Dashboard statistics endpoint

use crate::errors::ApiError;
use crate::services::StatsService;
use actix_web::{web, HttpResponse, Responder};
use sqlx::PgPool;

/// GET /stats
pub async fn get_stats(pool: web::Data<PgPool>) -> Result<impl Responder, ApiError> {
    let stats = StatsService::dashboard(pool.get_ref()).await?;
    Ok(HttpResponse::Ok().json(stats))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource(["/stats", "/stats/"]).route(web::get().to(get_stats)));
}
