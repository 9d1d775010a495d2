use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;

use super::ApiError;
use crate::domain::comment::models::CommentId;
use crate::domain::comment::ports::CommentServicePort;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;

pub async fn delete_comment(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    Path(comment_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let comment_id =
        CommentId::from_string(&comment_id).map_err(|e| ApiError::BadRequest(e.to_string()))?;

    state
        .comment_service
        .delete_comment(&comment_id, &auth_user.user_id)
        .await
        .map_err(ApiError::from)
        .map(|_| StatusCode::NO_CONTENT)
}
