// src/services/auth_service.rs
// DOCUMENTATION: Accounts, passwords and session identity
// PURPOSE: Signup/login/profile rules on top of UserRepository
//
// A client is either anonymous (no user id in its session) or
// authenticated (session carries the id of an existing user row).

use crate::db::{UserRepository, EMAIL_KEY, USERNAME_KEY};
use crate::errors::{ApiError, DbError};
use crate::models::{LoginRequest, SignupRequest, UpdateProfileRequest, User, UserProfile};
use crate::services::fields::{merge, present};
use crate::services::image_store::{FileUpload, ImageStore};
use actix_session::Session;
use sqlx::PgPool;
use tokio::sync::OnceCell;
use validator::Validate;

/// Session key holding the authenticated user's id
pub const SESSION_USER_KEY: &str = "user_id";

/// Hash checked when the username is unknown, so both rejections cost a bcrypt verify
static UNKNOWN_USER_HASH: OnceCell<String> = OnceCell::const_new();

pub struct AuthService;

impl AuthService {
    pub async fn signup(
        pool: &PgPool,
        req: SignupRequest,
        bcrypt_cost: u32,
    ) -> Result<UserProfile, ApiError> {
        let missing = || ApiError::Validation("Missing username, email, or password".to_string());
        let blank = |v: &Option<String>| v.as_deref().map_or(true, |s| s.trim().is_empty());
        if blank(&req.username) || blank(&req.email) || blank(&req.password) {
            return Err(missing());
        }

        req.validate()
            .map_err(|e| ApiError::Validation(format!("Invalid input: {}", e)))?;

        let (Some(username), Some(email), Some(password)) = (req.username, req.email, req.password)
        else {
            return Err(missing());
        };

        if UserRepository::get_by_username(pool, &username).await?.is_some() {
            return Err(ApiError::Conflict("Username is already taken".to_string()));
        }
        if UserRepository::get_by_email(pool, &email).await?.is_some() {
            return Err(ApiError::Conflict("Email is already in use".to_string()));
        }

        let password_hash = hash_password(password, bcrypt_cost).await?;

        let user = UserRepository::insert(pool, &username, &email, &password_hash)
            .await
            .map_err(Self::map_write_error)?;
        Ok(user.to_profile())
    }

    /// Verify credentials and bind the user to a fresh session
    pub async fn login(
        pool: &PgPool,
        session: &Session,
        req: LoginRequest,
        bcrypt_cost: u32,
    ) -> Result<UserProfile, ApiError> {
        let (Some(username), Some(password)) = (present(req.username), req.password) else {
            return Err(ApiError::InvalidCredentials);
        };

        let Some(user) = UserRepository::get_by_username(pool, &username).await? else {
            let hash = unknown_user_hash(bcrypt_cost).await?;
            verify_password(password, hash.to_string()).await?;
            log::info!("Login failed: unknown user");
            return Err(ApiError::InvalidCredentials);
        };

        if !verify_password(password, user.password_hash.clone()).await? {
            log::info!("Login failed for user {}", user.id);
            return Err(ApiError::InvalidCredentials);
        }

        session.renew();
        session
            .insert(SESSION_USER_KEY, user.id)
            .map_err(|e| ApiError::Internal(format!("Session error: {}", e)))?;

        log::info!("User {} logged in", user.id);
        Ok(user.to_profile())
    }

    pub fn logout(session: &Session) -> Result<(), ApiError> {
        let user_id = session_user_id(session)?.ok_or(ApiError::Unauthorized)?;
        session.purge();
        log::info!("User {} logged out", user_id);
        Ok(())
    }

    /// The session's user, or None for anonymous clients
    pub async fn current_user(pool: &PgPool, session: &Session) -> Result<Option<User>, ApiError> {
        let Some(user_id) = session_user_id(session)? else {
            return Ok(None);
        };

        let user = UserRepository::get_by_id(pool, user_id).await?;
        if user.is_none() {
            log::warn!("Session refers to missing user {}; clearing it", user_id);
            session.purge();
        }
        Ok(user)
    }

    pub async fn require_user(pool: &PgPool, session: &Session) -> Result<User, ApiError> {
        Self::current_user(pool, session)
            .await?
            .ok_or(ApiError::Unauthorized)
    }

    pub async fn update_profile(
        pool: &PgPool,
        user: &User,
        req: UpdateProfileRequest,
        bcrypt_cost: u32,
    ) -> Result<UserProfile, ApiError> {
        if req.username.is_none() && req.email.is_none() && req.password.is_none() {
            return Err(ApiError::Validation("No data provided".to_string()));
        }
        req.validate()
            .map_err(|e| ApiError::Validation(format!("Invalid input: {}", e)))?;

        let username = merge(req.username, &user.username, "username")?;
        let email = merge(req.email, &user.email, "email")?;

        if username != user.username {
            if let Some(other) = UserRepository::get_by_username(pool, &username).await? {
                if other.id != user.id {
                    return Err(ApiError::Conflict("Username is already taken".to_string()));
                }
            }
        }
        if !email.eq_ignore_ascii_case(&user.email) {
            if let Some(other) = UserRepository::get_by_email(pool, &email).await? {
                if other.id != user.id {
                    return Err(ApiError::Conflict("Email is already in use".to_string()));
                }
            }
        }

        let password_hash = match present(req.password) {
            Some(password) => Some(hash_password(password, bcrypt_cost).await?),
            None => None,
        };

        UserRepository::update_profile(pool, user.id, &username, &email, password_hash.as_deref())
            .await
            .map_err(Self::map_write_error)?
            .map(|u| u.to_profile())
            .ok_or(ApiError::Unauthorized)
    }

    /// Unlike student avatars, a failed upload fails the request
    pub async fn update_avatar(
        pool: &PgPool,
        store: &dyn ImageStore,
        user: &User,
        file: FileUpload,
    ) -> Result<UserProfile, ApiError> {
        let url = store.upload(file).await.map_err(|e| {
            log::warn!("Avatar upload failed for user {}: {}", user.id, e);
            ApiError::Upload("Image upload failed".to_string())
        })?;

        UserRepository::update_avatar(pool, user.id, &url)
            .await?
            .map(|u| u.to_profile())
            .ok_or(ApiError::Unauthorized)
    }

    fn map_write_error(err: DbError) -> ApiError {
        match err.constraint() {
            Some(USERNAME_KEY) => ApiError::Conflict("Username is already taken".to_string()),
            Some(EMAIL_KEY) => ApiError::Conflict("Email is already in use".to_string()),
            _ => err.into(),
        }
    }
}

pub fn session_user_id(session: &Session) -> Result<Option<i32>, ApiError> {
    session
        .get::<i32>(SESSION_USER_KEY)
        .map_err(|e| ApiError::Internal(format!("Session error: {}", e)))
}

async fn unknown_user_hash(cost: u32) -> Result<&'static str, ApiError> {
    UNKNOWN_USER_HASH
        .get_or_try_init(|| hash_password("ssis-unknown-user".to_string(), cost))
        .await
        .map(String::as_str)
}

/// bcrypt is CPU-bound, so it runs on the blocking pool
async fn hash_password(password: String, cost: u32) -> Result<String, ApiError> {
    tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
        .await
        .map_err(|e| ApiError::Internal(format!("Hashing task failed: {}", e)))?
        .map_err(|e| ApiError::Internal(format!("Password hashing failed: {}", e)))
}

async fn verify_password(password: String, hash: String) -> Result<bool, ApiError> {
    let verified = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
        .await
        .map_err(|e| ApiError::Internal(format!("Hashing task failed: {}", e)))?;

    // A malformed stored hash is treated like a wrong password
    Ok(verified.unwrap_or(false))
}
