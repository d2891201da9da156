// src/handlers/students.rs
// DOCUMENTATION: HTTP handlers for student operations
// PURPOSE: Create and update take multipart forms with an optional avatar file

use crate::errors::ApiError;
use crate::handlers::forms::{read_multipart, FormParts};
use crate::models::{ListQuery, StudentFilterQuery, StudentForm};
use crate::services::{FileUpload, ImageStore, StudentService};
use actix_multipart::Multipart;
use actix_web::{web, HttpResponse, Responder};
use serde_json::json;
use sqlx::PgPool;

const AVATAR_FIELDS: &[&str] = &["avatar"];

fn into_student_form(parts: FormParts) -> (StudentForm, Option<FileUpload>) {
    let mut form = StudentForm::default();
    for (name, value) in parts.texts {
        form.set(&name, value);
    }
    (form, parts.file)
}

/// GET /students
/// Filters: `program`, `year`, `gender` (comma-separated)
pub async fn list_students(
    pool: web::Data<PgPool>,
    query: web::Query<ListQuery>,
    filters: web::Query<StudentFilterQuery>,
) -> Result<impl Responder, ApiError> {
    let result = StudentService::list(pool.get_ref(), &query, &filters).await?;
    Ok(HttpResponse::Ok().json(result))
}

/// GET /students/{student_id}
pub async fn get_student(
    pool: web::Data<PgPool>,
    path: web::Path<String>,
) -> Result<impl Responder, ApiError> {
    let student = StudentService::get(pool.get_ref(), &path).await?;
    Ok(HttpResponse::Ok().json(student))
}

/// POST /students
pub async fn create_student(
    pool: web::Data<PgPool>,
    store: web::Data<dyn ImageStore>,
    payload: Multipart,
) -> Result<impl Responder, ApiError> {
    let (form, avatar) = into_student_form(read_multipart(payload, AVATAR_FIELDS).await?);
    let student = StudentService::create(pool.get_ref(), store.get_ref(), form, avatar).await?;
    Ok(HttpResponse::Created().json(student))
}

/// PUT /students/{student_id}
pub async fn update_student(
    pool: web::Data<PgPool>,
    store: web::Data<dyn ImageStore>,
    path: web::Path<String>,
    payload: Multipart,
) -> Result<impl Responder, ApiError> {
    let (form, avatar) = into_student_form(read_multipart(payload, AVATAR_FIELDS).await?);
    let student =
        StudentService::update(pool.get_ref(), store.get_ref(), &path, form, avatar).await?;
    Ok(HttpResponse::Ok().json(student))
}

/// DELETE /students/{student_id}
pub async fn delete_student(
    pool: web::Data<PgPool>,
    path: web::Path<String>,
) -> Result<impl Responder, ApiError> {
    StudentService::delete(pool.get_ref(), &path).await?;
    Ok(HttpResponse::Ok().json(json!({ "message": "Student deleted successfully" })))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/students")
            .service(
                web::resource(["", "/"])
                    .route(web::get().to(list_students))
                    .route(web::post().to(create_student)),
            )
            .route("/{student_id}", web::get().to(get_student))
            .route("/{student_id}", web::put().to(update_student))
            .route("/{student_id}", web::delete().to(delete_student)),
    );
}
