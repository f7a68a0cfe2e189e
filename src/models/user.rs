// src/models/user.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::{error::AppError, utils::json::non_empty_string};

/// Represents the 'users' table in the database.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: i64,

    /// Unique username.
    pub username: String,

    /// Unique email address.
    pub email: String,

    /// Argon2 password hash.
    /// Skipped during serialization to prevent leaking sensitive data.
    #[serde(skip)]
    pub password: String,

    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Registration body as sent by the client.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(default, deserialize_with = "non_empty_string")]
    pub username: Option<String>,
    #[serde(default, deserialize_with = "non_empty_string")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "non_empty_string")]
    pub password: Option<String>,
}

/// A registration with every field present, ready for validation.
#[derive(Debug, Validate)]
pub struct NewUser {
    #[validate(length(max = 150, message = "Username must be at most 150 characters."))]
    pub username: String,
    #[validate(length(max = 254, message = "Email must be at most 254 characters."))]
    pub email: String,
    #[validate(length(max = 128, message = "Password must be at most 128 characters."))]
    pub password: String,
}

impl RegisterRequest {
    pub fn into_new_user(self) -> Result<NewUser, AppError> {
        match (self.username, self.email, self.password) {
            (Some(username), Some(email), Some(password)) => Ok(NewUser {
                username,
                email,
                password,
            }),
            _ => Err(AppError::BadRequest("Missing required fields".to_string())),
        }
    }
}

/// DTO for user login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default, deserialize_with = "non_empty_string")]
    pub username: Option<String>,
    #[serde(default, deserialize_with = "non_empty_string")]
    pub password: Option<String>,
}

impl LoginRequest {
    /// Returns `(username, password)` when both are present.
    pub fn credentials(self) -> Result<(String, String), AppError> {
        match (self.username, self.password) {
            (Some(username), Some(password)) => Ok((username, password)),
            _ => Err(AppError::BadRequest(
                "Missing username or password".to_string(),
            )),
        }
    }
}
