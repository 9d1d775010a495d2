use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;

use super::create_comment::CommentData;
use super::ApiError;
use super::ApiSuccess;
use crate::domain::comment::ports::CommentServicePort;
use crate::domain::video::models::VideoId;
use crate::inbound::http::router::AppState;

pub async fn list_comments(
    State(state): State<AppState>,
    Path(video_id): Path<String>,
) -> Result<ApiSuccess<Vec<CommentData>>, ApiError> {
    let video_id =
        VideoId::from_string(&video_id).map_err(|e| ApiError::BadRequest(e.to_string()))?;

    state
        .comment_service
        .list_comments(&video_id)
        .await
        .map_err(ApiError::from)
        .map(|comments| {
            ApiSuccess::new(StatusCode::OK, comments.iter().map(CommentData::from).collect())
        })
}
