use std::fmt;

use chrono::DateTime;
use chrono::Utc;
use uuid::Uuid;

use crate::comment::errors::CommentContentError;
use crate::comment::errors::CommentIdError;
use crate::domain::lifecycle::Lifecycle;
use crate::domain::user::models::UserId;
use crate::domain::video::models::VideoId;

/// Comment aggregate entity.
#[derive(Debug, Clone, PartialEq)]
pub struct Comment {
    pub id: CommentId,
    pub user_id: UserId,
    pub video_id: VideoId,
    pub content: CommentContent,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
    pub lifecycle: Lifecycle,
}

/// Comment unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CommentId(pub Uuid);

impl CommentId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a comment ID from string.
    ///
    /// # Errors
    /// * `InvalidFormat` - String is not a valid UUID
    pub fn from_string(s: &str) -> Result<Self, CommentIdError> {
        Uuid::parse_str(s)
            .map(CommentId)
            .map_err(|e| CommentIdError::InvalidFormat(e.to_string()))
    }
}

impl Default for CommentId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CommentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Comment body: trimmed, 1 to 255 characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentContent(String);

impl CommentContent {
    const MAX_LENGTH: usize = 255;

    pub fn new(content: String) -> Result<Self, CommentContentError> {
        let content = content.trim();
        let length = content.chars().count();

        if length == 0 {
            Err(CommentContentError::Empty)
        } else if length > Self::MAX_LENGTH {
            Err(CommentContentError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            })
        } else {
            Ok(Self(content.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Command to post a comment on a video
#[derive(Debug)]
pub struct CreateCommentCommand {
    pub author: UserId,
    pub video_id: VideoId,
    pub content: CommentContent,
}
