use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;

use crate::comment::errors::CommentError;
use crate::domain::comment::models::Comment;
use crate::domain::comment::models::CommentId;
use crate::domain::comment::models::CreateCommentCommand;
use crate::domain::user::models::UserId;
use crate::domain::video::models::VideoId;

/// Port for comment domain service operations.
#[async_trait]
pub trait CommentServicePort: Send + Sync + 'static {
    /// Post a comment on an active video.
    ///
    /// # Errors
    /// * `VideoNotFound` - Video does not exist or has been deleted
    /// * `DatabaseError` - Database operation failed
    async fn create_comment(&self, command: CreateCommentCommand) -> Result<Comment, CommentError>;

    /// Active comments on a video, oldest first.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn list_comments(&self, video_id: &VideoId) -> Result<Vec<Comment>, CommentError>;

    /// Soft-delete a comment on behalf of `requester`.
    ///
    /// # Errors
    /// * `NotFound` - Comment does not exist or is already deleted
    /// * `NotAuthor` - Requester did not write the comment
    /// * `DatabaseError` - Database operation failed
    async fn delete_comment(&self, id: &CommentId, requester: &UserId)
        -> Result<(), CommentError>;
}

/// Persistence operations for comment aggregate.
#[async_trait]
pub trait CommentRepository: Send + Sync + 'static {
    /// Persist a new comment.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn create(&self, comment: Comment) -> Result<Comment, CommentError>;

    /// Retrieve an active comment by identifier.
    ///
    /// # Returns
    /// Optional comment (None if not found or deleted)
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_id(&self, id: &CommentId) -> Result<Option<Comment>, CommentError>;

    /// Active comments on a video, ordered by creation time ascending.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn list_by_video(&self, video_id: &VideoId) -> Result<Vec<Comment>, CommentError>;

    /// Mark an active comment as deleted.
    ///
    /// # Errors
    /// * `NotFound` - No active comment with this id
    /// * `DatabaseError` - Database operation failed
    async fn soft_delete(&self, id: &CommentId, at: DateTime<Utc>) -> Result<(), CommentError>;
}
