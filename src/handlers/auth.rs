// src/handlers/auth.rs

use std::sync::Arc;

use axum::{Json, body::Bytes, extract::State, http::StatusCode, response::IntoResponse};
use axum_extra::extract::cookie::CookieJar;
use chrono::Utc;
use serde_json::json;
use sqlx::SqlitePool;
use validator::Validate;

use crate::{
    error::AppError,
    models::user::{LoginRequest, RegisterRequest, User},
    utils::{
        hash::spawn_hash_password,
        json::parse_body,
        session::{AuthBackend, SESSION_COOKIE, removal_cookie, session_cookie},
    },
};

/// Registers a new user.
///
/// Checks run in order: well-formed JSON, required fields, field limits,
/// username taken, email taken. The password is stored as an Argon2 hash.
pub async fn register(
    State(pool): State<SqlitePool>,
    body: Bytes,
) -> Result<impl IntoResponse, AppError> {
    let payload: RegisterRequest = parse_body(&body)?;
    let new_user = payload.into_new_user()?;

    if let Err(validation_errors) = new_user.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let username_taken: Option<i64> = sqlx::query_scalar("SELECT id FROM users WHERE username = ?")
        .bind(&new_user.username)
        .fetch_optional(&pool)
        .await?;
    if username_taken.is_some() {
        return Err(AppError::BadRequest("Username already exists".to_string()));
    }

    let email_taken: Option<i64> = sqlx::query_scalar("SELECT id FROM users WHERE email = ?")
        .bind(&new_user.email)
        .fetch_optional(&pool)
        .await?;
    if email_taken.is_some() {
        return Err(AppError::BadRequest("Email already exists".to_string()));
    }

    let hashed_password = spawn_hash_password(new_user.password.clone()).await?;

    let user = sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (username, email, password, created_at)
        VALUES (?, ?, ?, ?)
        RETURNING id, username, email, password, created_at
        "#,
    )
    .bind(&new_user.username)
    .bind(&new_user.email)
    .bind(&hashed_password)
    .bind(Utc::now())
    .fetch_one(&pool)
    .await
    .map_err(|e| {
        // Lost a race with a concurrent registration.
        if let sqlx::Error::Database(db_err) = &e {
            if db_err.is_unique_violation() {
                let message = if db_err.message().contains("users.email") {
                    "Email already exists"
                } else {
                    "Username already exists"
                };
                return AppError::BadRequest(message.to_string());
            }
        }
        AppError::Failed("Failed to create user", e.to_string())
    })?;

    tracing::info!(user_id = user.id, username = %user.username, "user registered");

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "User created successfully",
            "user_id": user.id,
        })),
    ))
}

/// Authenticates a user and starts a session.
///
/// The session key travels back in the `sessionid` cookie.
pub async fn login(
    State(auth): State<Arc<dyn AuthBackend>>,
    jar: CookieJar,
    body: Bytes,
) -> Result<impl IntoResponse, AppError> {
    let payload: LoginRequest = parse_body(&body)?;
    let (username, password) = payload.credentials()?;

    let user = auth
        .verify_credentials(&username, &password)
        .await?
        .ok_or_else(|| AppError::AuthError("Invalid credentials".to_string()))?;

    let session = auth.start_session(&user).await?;

    tracing::info!(user_id = user.id, "user logged in");

    Ok((
        jar.add(session_cookie(&session)),
        Json(json!({
            "message": "Login successful",
            "user_id": user.id,
            "username": user.username,
        })),
    ))
}

/// Ends the current session, if any, and clears the cookie.
pub async fn logout(
    State(auth): State<Arc<dyn AuthBackend>>,
    jar: CookieJar,
) -> Result<impl IntoResponse, AppError> {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        auth.end_session(cookie.value()).await?;
    }

    Ok((
        jar.remove(removal_cookie()),
        Json(json!({ "message": "Logout successful" })),
    ))
}
