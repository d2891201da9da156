// src/handlers/colleges.rs
// DOCUMENTATION: HTTP handlers for college operations
// PURPOSE: Parse requests, call CollegeService, return responses

use crate::errors::ApiError;
use crate::models::{CreateCollegeRequest, ListQuery, UpdateCollegeRequest};
use crate::services::CollegeService;
use actix_web::{web, HttpResponse, Responder};
use serde_json::json;
use sqlx::PgPool;

/// GET /colleges
/// Full list, or a page when both `page` and `limit` are given
pub async fn list_colleges(
    pool: web::Data<PgPool>,
    query: web::Query<ListQuery>,
) -> Result<impl Responder, ApiError> {
    let result = CollegeService::list(pool.get_ref(), &query).await?;
    Ok(HttpResponse::Ok().json(result))
}

/// GET /colleges/{code}
pub async fn get_college(
    pool: web::Data<PgPool>,
    path: web::Path<String>,
) -> Result<impl Responder, ApiError> {
    let college = CollegeService::get(pool.get_ref(), &path).await?;
    Ok(HttpResponse::Ok().json(college))
}

/// POST /colleges
pub async fn create_college(
    pool: web::Data<PgPool>,
    req: web::Json<CreateCollegeRequest>,
) -> Result<impl Responder, ApiError> {
    let college = CollegeService::create(pool.get_ref(), req.into_inner()).await?;
    Ok(HttpResponse::Created().json(college))
}

/// PUT /colleges/{code}
pub async fn update_college(
    pool: web::Data<PgPool>,
    path: web::Path<String>,
    req: web::Json<UpdateCollegeRequest>,
) -> Result<impl Responder, ApiError> {
    let college = CollegeService::update(pool.get_ref(), &path, req.into_inner()).await?;
    Ok(HttpResponse::Ok().json(college))
}

/// DELETE /colleges/{code}
pub async fn delete_college(
    pool: web::Data<PgPool>,
    path: web::Path<String>,
) -> Result<impl Responder, ApiError> {
    CollegeService::delete(pool.get_ref(), &path).await?;
    Ok(HttpResponse::Ok().json(json!({ "message": "College deleted successfully" })))
}

/// Configuration for college routes
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/colleges")
            .service(
                web::resource(["", "/"])
                    .route(web::get().to(list_colleges))
                    .route(web::post().to(create_college)),
            )
            .route("/{code}", web::get().to(get_college))
            .route("/{code}", web::put().to(update_college))
            .route("/{code}", web::delete().to(delete_college)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::{json_config, query_config};
    use actix_web::{http::StatusCode, test, App};
    use sqlx::postgres::PgPoolOptions;

    fn lazy_pool() -> PgPool {
        PgPoolOptions::new()
            .connect_lazy("postgres://postgres@localhost/unused")
            .unwrap()
    }

    #[actix_web::test]
    async fn test_create_without_fields_is_400() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(lazy_pool()))
                .app_data(json_config())
                .configure(config),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/colleges")
            .set_json(json!({ "college_code": "CCS" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "Missing college_code or college_name");
    }

    #[actix_web::test]
    async fn test_malformed_json_is_400() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(lazy_pool()))
                .app_data(json_config())
                .configure(config),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/colleges/")
            .insert_header(("content-type", "application/json"))
            .set_payload("{not json")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert!(body["error"].as_str().unwrap().starts_with("Invalid JSON body"));
    }

    #[actix_web::test]
    async fn test_non_numeric_page_is_400() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(lazy_pool()))
                .app_data(query_config())
                .configure(config),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/colleges?page=two&limit=10")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_empty_update_is_400() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(lazy_pool()))
                .app_data(json_config())
                .configure(config),
        )
        .await;

        let req = test::TestRequest::put()
            .uri("/colleges/CCS")
            .set_json(json!({}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "No data provided");
    }
}
