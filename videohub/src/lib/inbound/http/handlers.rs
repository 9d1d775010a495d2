use std::collections::BTreeMap;
use std::fmt::Display;

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use serde::Serialize;
use serde_json::json;

use crate::comment::errors::CommentError;
use crate::user::errors::UserError;
use crate::video::errors::VideoError;

pub mod create_comment;
pub mod delete_comment;
pub mod get_video;
pub mod get_videos_by_ids;
pub mod health;
pub mod list_comments;
pub mod list_videos;
pub mod login;
pub mod logout;
pub mod mypage;
pub mod record_interaction;
pub mod register;
pub mod search_videos;
pub mod upload_video;

#[derive(Debug, Clone)]
pub struct ApiSuccess<T: Serialize>(StatusCode, Json<T>);

impl<T> PartialEq for ApiSuccess<T>
where
    T: Serialize + PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0 && self.1 .0 == other.1 .0
    }
}

impl<T: Serialize> ApiSuccess<T> {
    pub fn new(status: StatusCode, data: T) -> Self {
        ApiSuccess(status, Json(data))
    }

    pub fn status(&self) -> StatusCode {
        self.0
    }
}

impl<T: Serialize> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        (self.0, self.1).into_response()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Per-field validation messages
    Validation(BTreeMap<String, String>),
    BadRequest(String),
    Unauthorized(String),
    Forbidden(String),
    NotFound(String),
    Conflict(String),
    PayloadTooLarge(String),
    /// Carries the client-facing message only
    InternalServerError(String),
}

impl ApiError {
    /// Log `err` server-side and answer with a stable `message`.
    pub fn internal(message: &str, err: impl Display) -> Self {
        tracing::error!(error = %err, "{}", message);
        ApiError::InternalServerError(message.to_string())
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(e: anyhow::Error) -> Self {
        Self::internal("Internal server error", e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Validation(details) => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(json!({
                        "error": "Validation failed",
                        "details": details,
                    })),
                )
                    .into_response();
            }
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ApiError::PayloadTooLarge(msg) => (StatusCode::PAYLOAD_TOO_LARGE, msg),
            ApiError::InternalServerError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

impl From<UserError> for ApiError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::InvalidUserId(_)
            | UserError::InvalidName(_)
            | UserError::InvalidEmail(_)
            | UserError::InvalidPassword(_) => ApiError::BadRequest(err.to_string()),
            UserError::NotFound(_) => ApiError::NotFound("User not found".to_string()),
            UserError::EmailAlreadyExists(_) => {
                ApiError::Conflict("Email already registered".to_string())
            }
            UserError::InvalidCredentials => {
                ApiError::Unauthorized("Invalid email or password".to_string())
            }
            UserError::Hashing(_)
            | UserError::Token(_)
            | UserError::DatabaseError(_)
            | UserError::Unknown(_) => ApiError::internal("Internal server error", err),
        }
    }
}

impl From<CommentError> for ApiError {
    fn from(err: CommentError) -> Self {
        match err {
            CommentError::InvalidCommentId(_)
            | CommentError::InvalidVideoId(_)
            | CommentError::InvalidContent(_) => ApiError::BadRequest(err.to_string()),
            CommentError::NotFound(_) => ApiError::NotFound("Comment not found".to_string()),
            CommentError::VideoNotFound(_) => ApiError::NotFound("Video not found".to_string()),
            CommentError::NotAuthor(_) => {
                ApiError::Forbidden("Only the author can delete this comment".to_string())
            }
            CommentError::DatabaseError(_) | CommentError::Unknown(_) => {
                ApiError::internal("Internal server error", err)
            }
        }
    }
}

impl From<VideoError> for ApiError {
    fn from(err: VideoError) -> Self {
        match err {
            VideoError::InvalidVideoId(_)
            | VideoError::InvalidTitle(_)
            | VideoError::InvalidQuery(_)
            | VideoError::InvalidEvent(_)
            | VideoError::EmptyIdList => ApiError::BadRequest(err.to_string()),
            VideoError::NotFound(_) => ApiError::NotFound("Video not found".to_string()),
            VideoError::Storage(_) | VideoError::DatabaseError(_) | VideoError::Unknown(_) => {
                ApiError::internal("Internal server error", err)
            }
        }
    }
}

/// Unwrap a JSON body, answering 400 for anything that does not decode.
pub(crate) fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload.map(|Json(body)| body).map_err(|rejection| {
        tracing::debug!(reason = %rejection.body_text(), "Rejected request payload");
        ApiError::BadRequest("Invalid request payload".to_string())
    })
}

/// Collects per-field validation failures so they are reported together.
#[derive(Debug, Default)]
pub(crate) struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    /// Parse a required field, recording "is required" when it is absent.
    pub fn required<T, E: Display>(
        &mut self,
        field: &str,
        value: Option<String>,
        parse: impl FnOnce(String) -> Result<T, E>,
    ) -> Option<T> {
        match value {
            Some(value) => self.check(field, parse(value)),
            None => {
                self.add(field, "is required");
                None
            }
        }
    }

    pub fn check<T, E: Display>(&mut self, field: &str, result: Result<T, E>) -> Option<T> {
        result
            .map_err(|e| self.add(field, e.to_string()))
            .ok()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0.entry(field.to_string()).or_insert_with(|| message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<FieldErrors> for ApiError {
    fn from(errors: FieldErrors) -> Self {
        ApiError::Validation(errors.0)
    }
}
