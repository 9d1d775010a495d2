use thiserror::Error;

use crate::video::errors::VideoError;
use crate::video::errors::VideoIdError;

/// Error for CommentId parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CommentIdError {
    #[error("Invalid UUID format: {0}")]
    InvalidFormat(String),
}

/// Error for CommentContent validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CommentContentError {
    #[error("is required")]
    Empty,

    #[error("must be at most {max} characters, got {actual}")]
    TooLong { max: usize, actual: usize },
}

/// Top-level error for all comment-related operations
#[derive(Debug, Clone, Error)]
pub enum CommentError {
    #[error("Invalid comment ID: {0}")]
    InvalidCommentId(#[from] CommentIdError),

    #[error("Invalid video ID: {0}")]
    InvalidVideoId(#[from] VideoIdError),

    #[error("Invalid content: {0}")]
    InvalidContent(#[from] CommentContentError),

    #[error("Comment not found: {0}")]
    NotFound(String),

    #[error("Video not found: {0}")]
    VideoNotFound(String),

    #[error("Only the author can delete comment {0}")]
    NotAuthor(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<VideoError> for CommentError {
    fn from(err: VideoError) -> Self {
        match err {
            VideoError::NotFound(id) => CommentError::VideoNotFound(id),
            VideoError::DatabaseError(msg) => CommentError::DatabaseError(msg),
            other => CommentError::Unknown(other.to_string()),
        }
    }
}

impl From<anyhow::Error> for CommentError {
    fn from(err: anyhow::Error) -> Self {
        CommentError::Unknown(err.to_string())
    }
}
