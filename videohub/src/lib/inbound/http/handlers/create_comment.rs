use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use axum::Json;
use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use super::json_body;
use super::ApiError;
use super::ApiSuccess;
use super::FieldErrors;
use crate::domain::comment::models::Comment;
use crate::domain::comment::models::CommentContent;
use crate::domain::comment::models::CreateCommentCommand;
use crate::domain::comment::ports::CommentServicePort;
use crate::domain::user::models::UserId;
use crate::domain::video::models::VideoId;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;

pub async fn create_comment(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    payload: Result<Json<CreateCommentRequest>, JsonRejection>,
) -> Result<ApiSuccess<CommentData>, ApiError> {
    let command = json_body(payload)?.try_into_command(auth_user.user_id)?;

    state
        .comment_service
        .create_comment(command)
        .await
        .map_err(ApiError::from)
        .map(|ref comment| ApiSuccess::new(StatusCode::CREATED, comment.into()))
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CreateCommentRequest {
    video_id: Option<String>,
    content: Option<String>,
}

impl CreateCommentRequest {
    fn try_into_command(self, author: UserId) -> Result<CreateCommentCommand, ApiError> {
        let mut errors = FieldErrors::default();
        let video_id = errors.required("video_id", self.video_id, |id| {
            VideoId::from_string(&id)
        });
        let content = errors.required("content", self.content, CommentContent::new);

        match (video_id, content) {
            (Some(video_id), Some(content)) if errors.is_empty() => Ok(CreateCommentCommand {
                author,
                video_id,
                content,
            }),
            _ => Err(errors.into()),
        }
    }
}

/// Comment as returned by the comment endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommentData {
    pub id: String,
    pub user_id: String,
    pub video_id: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

impl From<&Comment> for CommentData {
    fn from(comment: &Comment) -> Self {
        Self {
            id: comment.id.to_string(),
            user_id: comment.user_id.to_string(),
            video_id: comment.video_id.to_string(),
            content: comment.content.as_str().to_string(),
            created_at: comment.created_at,
            modified_at: comment.modified_at,
        }
    }
}
