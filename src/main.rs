// src/main.rs
// DOCUMENTATION: Application entry point
// PURPOSE: Initialize config, database, sessions and start HTTP server

mod config;
mod db;
mod errors;
mod handlers;
mod models;
mod services;

use actix_session::config::PersistentSession;
use actix_session::storage::CookieSessionStore;
use actix_session::SessionMiddleware;
use actix_web::cookie::{time::Duration, Key};
use actix_web::{middleware::Logger, web, App, HttpServer};
use config::{CloudinaryCredentials, Config};
use dotenv::dotenv;
use services::{CloudinaryClient, ImageStore};
use sha2::{Digest, Sha256};
use std::io;
use std::sync::Arc;

#[actix_web::main]
async fn main() -> io::Result<()> {
    // 1. Load environment variables
    dotenv().ok();

    // 2. Load configuration
    let config = Config::from_env();

    // 3. Initialize logging
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", &config.log_level);
    }
    env_logger::init();

    if let Err(e) = config.validate() {
        log::error!("Configuration error: {}", e);
        std::process::exit(1);
    }

    log::info!("Starting ssis-api...");
    log::info!("Environment: {}", config.environment);
    log::info!(
        "Server Address: {}:{}",
        config.server_address,
        config.server_port
    );

    // 4. Initialize database connection pool
    let pool = match config::init_db_pool(&config).await {
        Ok(pool) => pool,
        Err(e) => {
            log::error!("Failed to connect to database: {}", e);
            std::process::exit(1);
        }
    };

    // 5. Image store for avatars
    let credentials = match config.cloudinary_url.as_deref() {
        Some(raw) => CloudinaryCredentials::parse(raw).ok(),
        None => None,
    };
    if credentials.is_none() {
        log::warn!("CLOUDINARY_URL not set; avatar uploads will fail");
    }
    let image_store: Arc<dyn ImageStore> = Arc::new(CloudinaryClient::new(
        credentials,
        config.cloudinary_folder.clone(),
    ));

    // 6. Session cookie key (SECRET_KEY is hashed to the 32+ bytes Key needs)
    let session_key = Key::derive_from(&Sha256::digest(config.secret_key.as_bytes()));
    let secure_cookies = config.is_production();
    let session_ttl = Duration::days(config.session_ttl_days);

    // 7. Start HTTP server
    let server_addr = format!("{}:{}", config.server_address, config.server_port);
    let config_clone = config.clone();

    HttpServer::new(move || {
        App::new()
            // Application state (database pool, config, image store)
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(config_clone.clone()))
            .app_data(web::Data::from(image_store.clone()))
            .app_data(handlers::json_config())
            .app_data(handlers::query_config())
            // Middleware
            .wrap(
                SessionMiddleware::builder(CookieSessionStore::default(), session_key.clone())
                    .cookie_secure(secure_cookies)
                    .session_lifecycle(PersistentSession::default().session_ttl(session_ttl))
                    .build(),
            )
            .wrap(Logger::default())
            .wrap(actix_web::middleware::Compress::default())
            // Routes
            .configure(handlers::health_config)
            .configure(handlers::auth_config)
            .configure(handlers::users_config)
            .configure(handlers::colleges_config)
            .configure(handlers::programs_config)
            .configure(handlers::students_config)
            .configure(handlers::stats_config)
    })
    .bind(&server_addr)?
    .run()
    .await
}
