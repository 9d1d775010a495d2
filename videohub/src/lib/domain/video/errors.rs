use thiserror::Error;

/// Error for VideoId parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum VideoIdError {
    #[error("Invalid UUID format: {0}")]
    InvalidFormat(String),
}

/// Error for VideoTitle validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum VideoTitleError {
    #[error("is required")]
    Empty,

    #[error("must be at most {max} characters, got {actual}")]
    TooLong { max: usize, actual: usize },
}

/// Error for genre validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum VideoGenreError {
    #[error("must be at most {max} characters, got {actual}")]
    TooLong { max: usize, actual: usize },
}

/// Error for SearchQuery validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SearchQueryError {
    #[error("Search query is required")]
    Empty,

    #[error("Search query must be at most {max} characters")]
    TooLong { max: usize },
}

/// Error for uploaded media validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MediaError {
    #[error("is required")]
    Missing,

    #[error("is empty")]
    Empty,

    #[error("has unsupported file extension '{extension}' (allowed: {allowed})")]
    UnsupportedExtension { extension: String, allowed: String },
}

/// Error for object storage operations
#[derive(Debug, Clone, Error)]
pub enum StorageError {
    #[error("Failed to upload object {key}: {reason}")]
    PutFailed { key: String, reason: String },

    #[error("Failed to presign object {key}: {reason}")]
    PresignFailed { key: String, reason: String },

    #[error("Failed to delete object {key}: {reason}")]
    DeleteFailed { key: String, reason: String },

    #[error("Storage operation {operation} timed out after {after_secs}s")]
    Timeout {
        operation: &'static str,
        after_secs: u64,
    },
}

/// Top-level error for all video-related operations
#[derive(Debug, Clone, Error)]
pub enum VideoError {
    #[error("Invalid video ID: {0}")]
    InvalidVideoId(#[from] VideoIdError),

    #[error("Invalid title: {0}")]
    InvalidTitle(#[from] VideoTitleError),

    #[error("{0}")]
    InvalidQuery(#[from] SearchQueryError),

    #[error("Invalid interaction event: {0}")]
    InvalidEvent(String),

    #[error("Video ID list cannot be empty")]
    EmptyIdList,

    #[error("Video not found: {0}")]
    NotFound(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<anyhow::Error> for VideoError {
    fn from(err: anyhow::Error) -> Self {
        VideoError::Unknown(err.to_string())
    }
}
