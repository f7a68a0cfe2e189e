use axum::{
    Extension, Json,
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;
use sqlx::SqlitePool;
use validator::Validate;

use crate::{
    error::AppError,
    models::{comment::CreateCommentRequest, post::parse_post_id},
    utils::{json::parse_body, session::SessionUser},
};

/// Create a new comment on a post.
///
/// The post must exist before the body is even looked at.
pub async fn create_comment(
    State(pool): State<SqlitePool>,
    Extension(user): Extension<SessionUser>,
    Path(post_id): Path<String>,
    body: Bytes,
) -> Result<impl IntoResponse, AppError> {
    let post_id = parse_post_id(&post_id)?;

    let post: Option<i64> = sqlx::query_scalar("SELECT id FROM posts WHERE id = ?")
        .bind(post_id)
        .fetch_optional(&pool)
        .await?;
    if post.is_none() {
        return Err(AppError::NotFound("Post not found".to_string()));
    }

    let payload: CreateCommentRequest = parse_body(&body)?;
    let new_comment = payload.into_new_comment()?;
    new_comment
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let created_at = Utc::now();

    let comment_id: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO comments (post_id, user_id, text, created_at)
        VALUES (?, ?, ?, ?)
        RETURNING id
        "#,
    )
    .bind(post_id)
    .bind(user.id)
    .bind(&new_comment.text)
    .bind(created_at)
    .fetch_one(&pool)
    .await
    .map_err(|e| AppError::Failed("Failed to add comment", e.to_string()))?;

    tracing::info!(comment_id, post_id, user_id = user.id, "comment added");

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "message": "Comment added successfully",
            "comment_id": comment_id,
            "text": new_comment.text,
            "user": user.username,
            "user_id": user.id,
            "created_at": created_at,
        })),
    ))
}
