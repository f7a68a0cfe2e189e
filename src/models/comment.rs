use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::{error::AppError, utils::json::non_empty_string};

/// DTO for displaying a comment with its author.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct CommentResponse {
    pub id: i64,
    pub text: String,
    /// Commenter username.
    pub user: String,
    pub user_id: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Body of `POST /post/{id}/comment/`.
#[derive(Debug, Deserialize)]
pub struct CreateCommentRequest {
    #[serde(default, deserialize_with = "non_empty_string")]
    pub text: Option<String>,
}

#[derive(Debug, Validate)]
pub struct NewComment {
    #[validate(length(max = 1000, message = "Comment must be at most 1000 characters"))]
    pub text: String,
}

impl CreateCommentRequest {
    pub fn into_new_comment(self) -> Result<NewComment, AppError> {
        self.text
            .map(|text| NewComment { text })
            .ok_or_else(|| AppError::BadRequest("Comment text is required".to_string()))
    }
}
