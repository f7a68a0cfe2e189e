use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::{
    error::AppError,
    models::comment::CommentResponse,
    utils::json::non_empty_string,
};

/// Number of characters kept in a listing preview.
pub const PREVIEW_CHARS: usize = 200;

/// A row of the post listing, joined with its author and counts.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PostSummary {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub author: String,
    pub author_id: i64,
    pub created_at: DateTime<Utc>,
    pub total_likes: i64,
    pub comment_count: i64,
}

impl PostSummary {
    /// Replaces the full content by its listing preview.
    pub fn into_preview(mut self) -> Self {
        self.content = preview(&self.content);
        self
    }
}

/// A single post with full content and its comments in creation order.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PostDetail {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub author: String,
    pub author_id: i64,
    pub created_at: DateTime<Utc>,
    pub total_likes: i64,
    pub total_comments: i64,

    /// Filled by a second query; not a column.
    #[sqlx(skip)]
    pub comments: Vec<CommentResponse>,
}

/// Body of `POST /create-post/`.
#[derive(Debug, Deserialize)]
pub struct CreatePostRequest {
    #[serde(default, deserialize_with = "non_empty_string")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "non_empty_string")]
    pub content: Option<String>,
}

#[derive(Debug, Validate)]
pub struct NewPost {
    #[validate(length(max = 200, message = "Title must be at most 200 characters"))]
    pub title: String,
    pub content: String,
}

impl CreatePostRequest {
    pub fn into_new_post(self) -> Result<NewPost, AppError> {
        match (self.title, self.content) {
            (Some(title), Some(content)) => Ok(NewPost { title, content }),
            _ => Err(AppError::BadRequest("Missing title or content".to_string())),
        }
    }
}

/// First [`PREVIEW_CHARS`] characters of `content`, with `...` appended
/// whenever anything was cut. Counts characters, not bytes.
pub fn preview(content: &str) -> String {
    match content.char_indices().nth(PREVIEW_CHARS) {
        Some((cut, _)) => format!("{}...", &content[..cut]),
        None => content.to_string(),
    }
}

/// Post ids arrive as raw path segments; anything that is not an integer
/// cannot name a post.
pub fn parse_post_id(raw: &str) -> Result<i64, AppError> {
    raw.parse::<i64>()
        .map_err(|_| AppError::NotFound("Post not found".to_string()))
}
