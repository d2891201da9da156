// src/handlers/auth.rs
// DOCUMENTATION: Session authentication endpoints
// PURPOSE: signup, login, logout and "who am I"

use crate::config::Config;
use crate::errors::ApiError;
use crate::models::{LoginRequest, SignupRequest};
use crate::services::AuthService;
use actix_session::Session;
use actix_web::{web, HttpResponse, Responder};
use serde_json::json;
use sqlx::PgPool;

/// POST /auth/signup
/// Creates the account; the client logs in separately
pub async fn signup(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    req: web::Json<SignupRequest>,
) -> Result<impl Responder, ApiError> {
    let profile = AuthService::signup(pool.get_ref(), req.into_inner(), config.bcrypt_cost).await?;
    log::info!("Account created for user {}", profile.id);
    Ok(HttpResponse::Created().json(json!({ "message": "Account created. Please log in." })))
}

/// POST /auth/login
pub async fn login(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    session: Session,
    req: web::Json<LoginRequest>,
) -> Result<impl Responder, ApiError> {
    let user =
        AuthService::login(pool.get_ref(), &session, req.into_inner(), config.bcrypt_cost).await?;
    Ok(HttpResponse::Ok().json(json!({ "success": true, "user": user })))
}

/// POST /auth/logout
pub async fn logout(session: Session) -> Result<impl Responder, ApiError> {
    AuthService::logout(&session)?;
    Ok(HttpResponse::Ok().json(json!({ "success": true })))
}

/// GET /auth/me
/// Anonymous clients get `{"success": false, "user": null}` with 200
pub async fn me(pool: web::Data<PgPool>, session: Session) -> Result<impl Responder, ApiError> {
    let body = match AuthService::current_user(pool.get_ref(), &session).await? {
        Some(user) => json!({ "success": true, "user": user.to_profile() }),
        None => json!({ "success": false, "user": null }),
    };
    Ok(HttpResponse::Ok().json(body))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .route("/signup", web::post().to(signup))
            .route("/login", web::post().to(login))
            .route("/logout", web::post().to(logout))
            .route("/me", web::get().to(me)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::json_config;
    use actix_session::{storage::CookieSessionStore, SessionMiddleware};
    use actix_web::{cookie::Key, http::StatusCode, test, App};
    use sqlx::postgres::PgPoolOptions;

    fn lazy_pool() -> PgPool {
        PgPoolOptions::new()
            .connect_lazy("postgres://postgres@localhost/unused")
            .unwrap()
    }

    fn session_middleware() -> SessionMiddleware<CookieSessionStore> {
        SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
            .cookie_secure(false)
            .build()
    }

    #[actix_web::test]
    async fn test_me_without_session_is_anonymous() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(lazy_pool()))
                .wrap(session_middleware())
                .configure(config),
        )
        .await;

        let req = test::TestRequest::get().uri("/auth/me").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body, json!({ "success": false, "user": null }));
    }

    #[actix_web::test]
    async fn test_logout_without_session_is_401() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(lazy_pool()))
                .wrap(session_middleware())
                .configure(config),
        )
        .await;

        let req = test::TestRequest::post().uri("/auth/logout").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "Authentication required");
    }

    #[actix_web::test]
    async fn test_signup_missing_password_is_400() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(lazy_pool()))
                .app_data(web::Data::new(Config::from_env()))
                .app_data(json_config())
                .wrap(session_middleware())
                .configure(config),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/auth/signup")
            .set_json(json!({ "username": "admin", "email": "admin@example.com" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "Missing username, email, or password");
    }

    #[actix_web::test]
    async fn test_login_without_password_is_invalid_credentials() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(lazy_pool()))
                .app_data(web::Data::new(Config::from_env()))
                .wrap(session_middleware())
                .configure(config),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/auth/login")
            .set_json(json!({ "username": "admin" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "Invalid credentials");
    }
}
