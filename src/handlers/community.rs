use axum::{
    Extension, Json,
    body::Bytes,
    extract::{Path, Query, State, rejection::QueryRejection},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;
use serde_json::json;
use sqlx::SqlitePool;
use validator::Validate;

use crate::{
    error::AppError,
    models::{
        comment::CommentResponse,
        post::{CreatePostRequest, PostDetail, PostSummary, parse_post_id},
    },
    utils::{
        json::parse_body,
        pagination::{PageParams, Paginator},
        session::SessionUser,
    },
};

/// Create a new post owned by the logged-in user.
pub async fn create_post(
    State(pool): State<SqlitePool>,
    Extension(user): Extension<SessionUser>,
    body: Bytes,
) -> Result<impl IntoResponse, AppError> {
    let payload: CreatePostRequest = parse_body(&body)?;
    let new_post = payload.into_new_post()?;

    if let Err(validation_errors) = new_post.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let created_at = Utc::now();

    let post_id: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO posts (user_id, title, content, created_at)
        VALUES (?, ?, ?, ?)
        RETURNING id
        "#,
    )
    .bind(user.id)
    .bind(&new_post.title)
    .bind(&new_post.content)
    .bind(created_at)
    .fetch_one(&pool)
    .await
    .map_err(|e| AppError::Failed("Failed to create post", e.to_string()))?;

    tracing::info!(post_id, user_id = user.id, "post created");

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Post created successfully",
            "post_id": post_id,
            "title": new_post.title,
            "created_at": created_at,
        })),
    ))
}

/// List posts, newest first, one page at a time.
/// Content is cut down to a preview.
pub async fn list_posts(
    State(pool): State<SqlitePool>,
    params: Result<Query<PageParams>, QueryRejection>,
) -> Result<impl IntoResponse, AppError> {
    // Repeated keys or bad percent-encoding never reach `PageParams`.
    let Query(params) = params.map_err(|e| {
        tracing::debug!("Rejected post listing query: {}", e);
        AppError::BadRequest("Invalid page or per_page parameter".to_string())
    })?;
    let (page_number, per_page) = params.resolve()?;

    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM posts")
        .fetch_one(&pool)
        .await?;

    let page = Paginator::new(total, per_page).page(page_number)?;

    let posts = sqlx::query_as::<_, PostSummary>(
        r#"
        SELECT
            p.id, p.title, p.content,
            u.username AS author,
            p.user_id AS author_id,
            p.created_at,
            (SELECT COUNT(*) FROM post_likes pl WHERE pl.post_id = p.id) AS total_likes,
            (SELECT COUNT(*) FROM comments c WHERE c.post_id = p.id) AS comment_count
        FROM posts p
        JOIN users u ON u.id = p.user_id
        ORDER BY p.created_at DESC, p.id DESC
        LIMIT ? OFFSET ?
        "#,
    )
    .bind(page.limit())
    .bind(page.offset())
    .fetch_all(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to list posts: {:?}", e);
        AppError::from(e)
    })?;

    let posts: Vec<PostSummary> = posts.into_iter().map(PostSummary::into_preview).collect();

    Ok(Json(json!({
        "posts": posts,
        "pagination": page.meta(),
    })))
}

/// Get a single post with its full content and every comment.
pub async fn get_post(
    State(pool): State<SqlitePool>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_post_id(&id)?;

    let mut post = sqlx::query_as::<_, PostDetail>(
        r#"
        SELECT
            p.id, p.title, p.content,
            u.username AS author,
            p.user_id AS author_id,
            p.created_at,
            (SELECT COUNT(*) FROM post_likes pl WHERE pl.post_id = p.id) AS total_likes,
            (SELECT COUNT(*) FROM comments c WHERE c.post_id = p.id) AS total_comments
        FROM posts p
        JOIN users u ON u.id = p.user_id
        WHERE p.id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(&pool)
    .await?
    .ok_or(AppError::NotFound("Post not found".to_string()))?;

    post.comments = sqlx::query_as::<_, CommentResponse>(
        r#"
        SELECT c.id, c.text, u.username AS user, c.user_id, c.created_at
        FROM comments c
        JOIN users u ON u.id = c.user_id
        WHERE c.post_id = ?
        ORDER BY c.created_at ASC, c.id ASC
        "#,
    )
    .bind(id)
    .fetch_all(&pool)
    .await?;

    Ok(Json(json!({ "post": post })))
}
