// src/utils/session.rs

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use chrono::{DateTime, TimeDelta, Utc};
use sqlx::{FromRow, SqlitePool};
use uuid::Uuid;

use crate::{
    config::DEFAULT_SESSION_TTL_SECONDS,
    error::AppError,
    utils::hash::{spawn_hash_password, spawn_verify_password},
};

/// Name of the cookie carrying the session key.
pub const SESSION_COOKIE: &str = "sessionid";

/// The authenticated user attached to a request by [`login_required`].
#[derive(Debug, Clone, FromRow)]
pub struct SessionUser {
    pub id: i64,
    pub username: String,
}

/// A freshly started login session.
#[derive(Debug, Clone)]
pub struct Session {
    pub key: String,
    pub user_id: i64,
    pub expires_at: DateTime<Utc>,
}

/// Everything handlers need from the authentication system.
#[async_trait]
pub trait AuthBackend: Send + Sync {
    /// Returns the user when `username`/`password` match, `None` otherwise.
    async fn verify_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<SessionUser>, AppError>;

    async fn start_session(&self, user: &SessionUser) -> Result<Session, AppError>;

    /// Resolves a session key to its user, ignoring unknown and expired keys.
    async fn current_user(&self, session_key: &str) -> Result<Option<SessionUser>, AppError>;

    async fn end_session(&self, session_key: &str) -> Result<(), AppError>;
}

/// Database-backed sessions stored in the `sessions` table.
#[derive(Clone)]
pub struct SessionAuth {
    pool: SqlitePool,
    ttl: TimeDelta,
}

impl SessionAuth {
    pub fn new(pool: SqlitePool, ttl_seconds: i64) -> Self {
        let ttl = TimeDelta::try_seconds(ttl_seconds)
            .unwrap_or_else(|| TimeDelta::seconds(DEFAULT_SESSION_TTL_SECONDS));
        Self { pool, ttl }
    }

    /// Deletes every expired session. Returns how many were removed.
    pub async fn clear_expired(&self) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM sessions WHERE expires_at <= ?")
            .bind(Utc::now().timestamp())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}

#[async_trait]
impl AuthBackend for SessionAuth {
    async fn verify_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<SessionUser>, AppError> {
        let row = sqlx::query_as::<_, (i64, String, String)>(
            "SELECT id, username, password FROM users WHERE username = ?",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Login DB error: {:?}", e);
            AppError::from(e)
        })?;

        let Some((id, username, password_hash)) = row else {
            // Unknown usernames pay the same hashing cost as wrong passwords.
            spawn_hash_password(password.to_owned()).await?;
            return Ok(None);
        };

        if !spawn_verify_password(password.to_owned(), password_hash).await? {
            return Ok(None);
        }

        Ok(Some(SessionUser { id, username }))
    }

    async fn start_session(&self, user: &SessionUser) -> Result<Session, AppError> {
        let key = Uuid::new_v4().simple().to_string();
        let now = Utc::now();
        let expires_at = now + self.ttl;

        sqlx::query(
            "INSERT INTO sessions (session_key, user_id, created_at, expires_at) VALUES (?, ?, ?, ?)",
        )
        .bind(&key)
        .bind(user.id)
        .bind(now)
        .bind(expires_at.timestamp())
        .execute(&self.pool)
        .await?;

        tracing::debug!(user_id = user.id, "session started");

        Ok(Session {
            key,
            user_id: user.id,
            expires_at,
        })
    }

    async fn current_user(&self, session_key: &str) -> Result<Option<SessionUser>, AppError> {
        let user = sqlx::query_as::<_, SessionUser>(
            r#"
            SELECT u.id, u.username
            FROM sessions s
            JOIN users u ON u.id = s.user_id
            WHERE s.session_key = ? AND s.expires_at > ?
            "#,
        )
        .bind(session_key)
        .bind(Utc::now().timestamp())
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn end_session(&self, session_key: &str) -> Result<(), AppError> {
        sqlx::query("DELETE FROM sessions WHERE session_key = ?")
            .bind(session_key)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

/// Cookie handed out on login. Its `Max-Age` ends with the server-side row.
pub fn session_cookie(session: &Session) -> Cookie<'static> {
    let remaining = (session.expires_at - Utc::now()).num_seconds().max(0);

    Cookie::build((SESSION_COOKIE, session.key.clone()))
        .http_only(true)
        .path("/")
        .same_site(SameSite::Lax)
        .max_age(time::Duration::seconds(remaining))
        .build()
}

/// Cookie used to remove the session cookie on logout.
pub fn removal_cookie() -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, "")).path("/").build()
}

/// Axum Middleware: Login required.
///
/// Resolves the `sessionid` cookie through the [`AuthBackend`] and injects the
/// [`SessionUser`] into request extensions. Runs before the handler touches
/// the body; anonymous requests get 401.
pub async fn login_required(
    State(auth): State<Arc<dyn AuthBackend>>,
    jar: CookieJar,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let unauthenticated = || AppError::AuthError("Authentication required".to_string());

    let session_key = jar
        .get(SESSION_COOKIE)
        .map(|cookie| cookie.value().to_owned())
        .ok_or_else(unauthenticated)?;

    let user = auth
        .current_user(&session_key)
        .await?
        .ok_or_else(unauthenticated)?;

    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}
