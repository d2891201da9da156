// src/handlers/users.rs
// DOCUMENTATION: Profile endpoints for the logged-in user
// PURPOSE: Every route here acts on the session's own user row only

use crate::config::Config;
use crate::errors::ApiError;
use crate::handlers::forms::read_multipart;
use crate::models::UpdateProfileRequest;
use crate::services::{AuthService, ImageStore};
use actix_multipart::Multipart;
use actix_session::Session;
use actix_web::{web, HttpResponse, Responder};
use serde_json::json;
use sqlx::PgPool;

/// GET /users/
pub async fn get_profile(
    pool: web::Data<PgPool>,
    session: Session,
) -> Result<impl Responder, ApiError> {
    let user = AuthService::require_user(pool.get_ref(), &session).await?;
    Ok(HttpResponse::Ok().json(json!({ "success": true, "user": user.to_profile() })))
}

/// PUT /users/update
pub async fn update_profile(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    session: Session,
    req: web::Json<UpdateProfileRequest>,
) -> Result<impl Responder, ApiError> {
    let user = AuthService::require_user(pool.get_ref(), &session).await?;
    let profile =
        AuthService::update_profile(pool.get_ref(), &user, req.into_inner(), config.bcrypt_cost)
            .await?;
    Ok(HttpResponse::Ok().json(json!({ "success": true, "user": profile })))
}

/// POST /users/upload-avatar
/// Multipart with the image in `avatar` (or `file`)
pub async fn upload_avatar(
    pool: web::Data<PgPool>,
    store: web::Data<dyn ImageStore>,
    session: Session,
    payload: Multipart,
) -> Result<impl Responder, ApiError> {
    let user = AuthService::require_user(pool.get_ref(), &session).await?;

    let file = read_multipart(payload, &["avatar", "file"])
        .await?
        .file
        .ok_or_else(|| ApiError::Validation("No file provided".to_string()))?;

    let profile = AuthService::update_avatar(pool.get_ref(), store.get_ref(), &user, file).await?;
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "avatar_url": profile.avatar_url,
        "user": profile,
    })))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/users")
            .route("/", web::get().to(get_profile))
            .route("/update", web::put().to(update_profile))
            .route("/upload-avatar", web::post().to(upload_avatar)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::json_config;
    use actix_session::{storage::CookieSessionStore, SessionMiddleware};
    use actix_web::{cookie::Key, http::StatusCode, test, App};
    use sqlx::postgres::PgPoolOptions;

    #[actix_web::test]
    async fn test_profile_routes_require_a_session() {
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://postgres@localhost/unused")
            .unwrap();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(pool))
                .app_data(web::Data::new(Config::from_env()))
                .app_data(json_config())
                .wrap(
                    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
                        .cookie_secure(false)
                        .build(),
                )
                .configure(config),
        )
        .await;

        let req = test::TestRequest::get().uri("/users/").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let req = test::TestRequest::put()
            .uri("/users/update")
            .set_json(json!({ "email": "root@example.com" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "Authentication required");
    }
}
