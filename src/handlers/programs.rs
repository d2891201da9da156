// src/handlers/programs.rs
// DOCUMENTATION: HTTP handlers for program operations
// PURPOSE: Parse requests, call ProgramService, return responses

use crate::errors::ApiError;
use crate::models::{CreateProgramRequest, ListQuery, ProgramFilterQuery, UpdateProgramRequest};
use crate::services::ProgramService;
use actix_web::{web, HttpResponse, Responder};
use serde_json::json;
use sqlx::PgPool;

/// GET /programs
/// Accepts `college=CCS,COE` in addition to the common list parameters
pub async fn list_programs(
    pool: web::Data<PgPool>,
    query: web::Query<ListQuery>,
    filters: web::Query<ProgramFilterQuery>,
) -> Result<impl Responder, ApiError> {
    let result = ProgramService::list(pool.get_ref(), &query, &filters).await?;
    Ok(HttpResponse::Ok().json(result))
}

/// GET /programs/{code}
pub async fn get_program(
    pool: web::Data<PgPool>,
    path: web::Path<String>,
) -> Result<impl Responder, ApiError> {
    let program = ProgramService::get(pool.get_ref(), &path).await?;
    Ok(HttpResponse::Ok().json(program))
}

/// POST /programs
pub async fn create_program(
    pool: web::Data<PgPool>,
    req: web::Json<CreateProgramRequest>,
) -> Result<impl Responder, ApiError> {
    let program = ProgramService::create(pool.get_ref(), req.into_inner()).await?;
    Ok(HttpResponse::Created().json(program))
}

/// PUT /programs/{code}
pub async fn update_program(
    pool: web::Data<PgPool>,
    path: web::Path<String>,
    req: web::Json<UpdateProgramRequest>,
) -> Result<impl Responder, ApiError> {
    let program = ProgramService::update(pool.get_ref(), &path, req.into_inner()).await?;
    Ok(HttpResponse::Ok().json(program))
}

/// DELETE /programs/{code}
pub async fn delete_program(
    pool: web::Data<PgPool>,
    path: web::Path<String>,
) -> Result<impl Responder, ApiError> {
    ProgramService::delete(pool.get_ref(), &path).await?;
    Ok(HttpResponse::Ok().json(json!({ "message": "Program deleted successfully" })))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/programs")
            .service(
                web::resource(["", "/"])
                    .route(web::get().to(list_programs))
                    .route(web::post().to(create_program)),
            )
            .route("/{code}", web::get().to(get_program))
            .route("/{code}", web::put().to(update_program))
            .route("/{code}", web::delete().to(delete_program)),
    );
}
