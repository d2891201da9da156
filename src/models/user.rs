// src/models/user.rs
// DOCUMENTATION: Application users (authentication only)
// PURPOSE: user_table rows, the public projection, and auth payloads

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row of user_table, including the password hash
/// Never serialized; use `to_profile` for responses
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub avatar_url: Option<String>,
}

/// Public projection of a user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub avatar_url: Option<String>,
}

impl User {
    pub fn to_profile(&self) -> UserProfile {
        UserProfile {
            id: self.id,
            username: self.username.clone(),
            email: self.email.clone(),
            avatar_url: self.avatar_url.clone(),
        }
    }
}

/// Body of POST /auth/signup
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct SignupRequest {
    #[validate(length(min = 1, max = 80))]
    pub username: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(min = 1))]
    pub password: Option<String>,
}

/// Body of POST /auth/login
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Body of PUT /users/update; omitted fields keep their current value
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 80))]
    pub username: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(min = 1))]
    pub password: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_never_exposes_hash() {
        let user = User {
            id: 7,
            username: "admin".into(),
            email: "admin@example.com".into(),
            password_hash: "$2b$12$abcdefghijklmnopqrstuv".into(),
            avatar_url: None,
        };

        let json = serde_json::to_value(user.to_profile()).unwrap();
        assert_eq!(json["username"], "admin");
        assert!(json.get("password_hash").is_none());
        assert!(!json.to_string().contains("$2b$"));
    }

    #[test]
    fn test_signup_email_validation() {
        let req = SignupRequest {
            username: Some("admin".into()),
            email: Some("not-an-email".into()),
            password: Some("secret".into()),
        };
        assert!(req.validate().is_err());

        let req = SignupRequest {
            email: Some("admin@example.com".into()),
            ..req
        };
        assert!(req.validate().is_ok());
    }
}
