use std::time::Duration;

use async_trait::async_trait;

use crate::domain::video::models::Interaction;
use crate::domain::video::models::ObjectKey;
use crate::domain::video::models::Page;
use crate::domain::video::models::PresignedVideo;
use crate::domain::video::models::RecordInteractionCommand;
use crate::domain::video::models::SearchQuery;
use crate::domain::video::models::UploadVideoCommand;
use crate::domain::video::models::UploadedVideo;
use crate::domain::video::models::Video;
use crate::domain::video::models::VideoFile;
use crate::domain::video::models::VideoId;
use crate::video::errors::StorageError;
use crate::video::errors::VideoError;

/// Port for video domain service operations.
///
/// Every returned video carries presigned URLs for its files.
#[async_trait]
pub trait VideoServicePort: Send + Sync + 'static {
    /// List active videos, newest first.
    ///
    /// # Errors
    /// * `Storage` - Presigning failed or timed out
    /// * `DatabaseError` - Database operation failed
    async fn list_videos(&self, page: Page) -> Result<Vec<PresignedVideo>, VideoError>;

    /// Search active videos by title or description.
    ///
    /// # Errors
    /// * `Storage` - Presigning failed or timed out
    /// * `DatabaseError` - Database operation failed
    async fn search_videos(
        &self,
        query: &SearchQuery,
        page: Page,
    ) -> Result<Vec<PresignedVideo>, VideoError>;

    /// Retrieve a single active video.
    ///
    /// # Errors
    /// * `NotFound` - Video does not exist or has been deleted
    /// * `Storage` - Presigning failed or timed out
    /// * `DatabaseError` - Database operation failed
    async fn get_video(&self, id: &VideoId) -> Result<PresignedVideo, VideoError>;

    /// Retrieve several active videos, in the order requested.
    ///
    /// Unknown ids are skipped without error.
    ///
    /// # Errors
    /// * `EmptyIdList` - No ids were given
    /// * `Storage` - Presigning failed or timed out
    /// * `DatabaseError` - Database operation failed
    async fn get_videos_by_ids(&self, ids: &[VideoId]) -> Result<Vec<PresignedVideo>, VideoError>;

    /// Record a viewer interaction with a video.
    ///
    /// # Errors
    /// * `NotFound` - Video does not exist or has been deleted
    /// * `DatabaseError` - Database operation failed
    async fn record_interaction(
        &self,
        command: RecordInteractionCommand,
    ) -> Result<Interaction, VideoError>;

    /// Store the media files and create the catalogue entry.
    ///
    /// Objects already stored are removed if a later step fails.
    ///
    /// # Errors
    /// * `Storage` - Upload failed or timed out
    /// * `DatabaseError` - Database operation failed
    async fn upload_video(&self, command: UploadVideoCommand) -> Result<UploadedVideo, VideoError>;
}

/// Persistence operations for video aggregate.
#[async_trait]
pub trait VideoRepository: Send + Sync + 'static {
    /// Active videos with their active files, newest first.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn list(&self, page: Page) -> Result<Vec<Video>, VideoError>;

    /// Active videos whose title or description contains the query.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn search(&self, query: &SearchQuery, page: Page) -> Result<Vec<Video>, VideoError>;

    /// Retrieve an active video by identifier.
    ///
    /// # Returns
    /// Optional video entity (None if not found or deleted)
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_id(&self, id: &VideoId) -> Result<Option<Video>, VideoError>;

    /// Retrieve multiple active videos by identifiers.
    ///
    /// # Returns
    /// Vector of found videos (missing IDs are skipped without error)
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_ids(&self, ids: &[VideoId]) -> Result<Vec<Video>, VideoError>;

    /// Insert the video and its file in one transaction.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed (nothing was written)
    async fn create_with_file(&self, video: Video, file: VideoFile) -> Result<Video, VideoError>;

    /// Append an interaction record.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn record_interaction(&self, interaction: Interaction) -> Result<(), VideoError>;
}

/// S3-compatible object storage.
#[async_trait]
pub trait ObjectStorage: Send + Sync + 'static {
    /// Store an object.
    ///
    /// # Returns
    /// Addressable URL of the stored object
    ///
    /// # Errors
    /// * `PutFailed` - Upload rejected or connection failed
    async fn put_object(
        &self,
        key: &ObjectKey,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, StorageError>;

    /// Produce a time-limited GET URL for an object.
    ///
    /// # Errors
    /// * `PresignFailed` - URL could not be signed
    async fn presign_get(&self, key: &ObjectKey, expires_in: Duration)
        -> Result<String, StorageError>;

    /// Remove an object.
    ///
    /// # Errors
    /// * `DeleteFailed` - Deletion rejected or connection failed
    async fn delete_object(&self, key: &ObjectKey) -> Result<(), StorageError>;
}
