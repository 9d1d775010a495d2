use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::lifecycle::Lifecycle;
use crate::domain::video::models::Interaction;
use crate::domain::video::models::MediaKind;
use crate::domain::video::models::ObjectKey;
use crate::domain::video::models::Page;
use crate::domain::video::models::PresignedFile;
use crate::domain::video::models::PresignedVideo;
use crate::domain::video::models::RecordInteractionCommand;
use crate::domain::video::models::SearchQuery;
use crate::domain::video::models::UploadVideoCommand;
use crate::domain::video::models::UploadedVideo;
use crate::domain::video::models::Video;
use crate::domain::video::models::VideoFile;
use crate::domain::video::models::VideoFileId;
use crate::domain::video::models::VideoFileStatus;
use crate::domain::video::models::VideoId;
use crate::video::errors::StorageError;
use crate::video::errors::VideoError;
use crate::video::ports::ObjectStorage;
use crate::video::ports::VideoRepository;
use crate::video::ports::VideoServicePort;

/// Domain service implementation for video operations.
///
/// Every object-storage call is bounded by `storage_timeout`.
pub struct VideoService<VR, OS>
where
    VR: VideoRepository,
    OS: ObjectStorage,
{
    repository: Arc<VR>,
    storage: Arc<OS>,
    storage_timeout: Duration,
    presign_expiry: Duration,
}

impl<VR, OS> VideoService<VR, OS>
where
    VR: VideoRepository,
    OS: ObjectStorage,
{
    /// Create a new video service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - Video persistence implementation
    /// * `storage` - Object storage implementation
    /// * `storage_timeout` - Deadline applied to each storage call
    /// * `presign_expiry` - Lifetime of presigned URLs
    pub fn new(
        repository: Arc<VR>,
        storage: Arc<OS>,
        storage_timeout: Duration,
        presign_expiry: Duration,
    ) -> Self {
        Self {
            repository,
            storage,
            storage_timeout,
            presign_expiry,
        }
    }

    async fn with_timeout<T, F>(&self, operation: &'static str, call: F) -> Result<T, StorageError>
    where
        F: Future<Output = Result<T, StorageError>>,
    {
        tokio::time::timeout(self.storage_timeout, call)
            .await
            .map_err(|_| StorageError::Timeout {
                operation,
                after_secs: self.storage_timeout.as_secs(),
            })?
    }

    async fn presign_key(&self, key: &ObjectKey) -> Result<String, StorageError> {
        self.with_timeout(
            "presign_get",
            self.storage.presign_get(key, self.presign_expiry),
        )
        .await
    }

    async fn presign(&self, video: Video) -> Result<PresignedVideo, VideoError> {
        let mut files = Vec::with_capacity(video.files.len());

        for file in &video.files {
            let file_url = self.presign_key(&file.file_key).await?;
            let thumbnail_url = match &file.thumbnail_key {
                Some(key) => Some(self.presign_key(key).await?),
                None => None,
            };

            files.push(PresignedFile {
                file: file.clone(),
                file_url,
                thumbnail_url,
            });
        }

        Ok(PresignedVideo { video, files })
    }

    async fn presign_all(&self, videos: Vec<Video>) -> Result<Vec<PresignedVideo>, VideoError> {
        let mut presigned = Vec::with_capacity(videos.len());
        for video in videos {
            presigned.push(self.presign(video).await?);
        }
        Ok(presigned)
    }

    /// Best-effort removal of objects stored by a failed upload.
    async fn discard_objects(&self, keys: &[&ObjectKey]) {
        for key in keys {
            match self
                .with_timeout("delete_object", self.storage.delete_object(key))
                .await
            {
                Ok(()) => tracing::info!(key = %key, "Discarded object from failed upload"),
                Err(e) => tracing::warn!(key = %key, error = %e, "Failed to discard object"),
            }
        }
    }
}

#[async_trait]
impl<VR, OS> VideoServicePort for VideoService<VR, OS>
where
    VR: VideoRepository,
    OS: ObjectStorage,
{
    async fn list_videos(&self, page: Page) -> Result<Vec<PresignedVideo>, VideoError> {
        let videos = self.repository.list(page).await?;
        self.presign_all(videos).await
    }

    async fn search_videos(
        &self,
        query: &SearchQuery,
        page: Page,
    ) -> Result<Vec<PresignedVideo>, VideoError> {
        let videos = self.repository.search(query, page).await?;
        tracing::debug!(query = query.as_str(), results = videos.len(), "Video search");
        self.presign_all(videos).await
    }

    async fn get_video(&self, id: &VideoId) -> Result<PresignedVideo, VideoError> {
        let video = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or(VideoError::NotFound(id.to_string()))?;

        self.presign(video).await
    }

    async fn get_videos_by_ids(&self, ids: &[VideoId]) -> Result<Vec<PresignedVideo>, VideoError> {
        if ids.is_empty() {
            return Err(VideoError::EmptyIdList);
        }

        let mut found = self.repository.find_by_ids(ids).await?;

        // Keep the caller's ordering; recommendations are ranked.
        let mut ordered = Vec::with_capacity(found.len());
        for id in ids {
            if let Some(position) = found.iter().position(|v| v.id == *id) {
                ordered.push(found.swap_remove(position));
            }
        }

        self.presign_all(ordered).await
    }

    async fn record_interaction(
        &self,
        command: RecordInteractionCommand,
    ) -> Result<Interaction, VideoError> {
        if self.repository.find_by_id(&command.video_id).await?.is_none() {
            return Err(VideoError::NotFound(command.video_id.to_string()));
        }

        let interaction = Interaction {
            id: Uuid::new_v4(),
            user_id: command.user_id,
            video_id: command.video_id,
            event: command.event,
            created_at: Utc::now(),
        };

        self.repository
            .record_interaction(interaction.clone())
            .await?;

        tracing::debug!(
            user_id = %interaction.user_id,
            video_id = %interaction.video_id,
            event = interaction.event.as_str(),
            "Interaction recorded"
        );

        Ok(interaction)
    }

    async fn upload_video(&self, command: UploadVideoCommand) -> Result<UploadedVideo, VideoError> {
        let UploadVideoCommand {
            owner,
            title,
            description,
            genre,
            duration_secs,
            video: video_media,
            thumbnail: thumbnail_media,
        } = command;

        let video_key = ObjectKey::generate(MediaKind::Video, video_media.extension());
        let thumbnail_key = ObjectKey::generate(MediaKind::Thumbnail, thumbnail_media.extension());
        let file_size = video_media.len() as i64;
        let format = video_media.content_type().to_string();
        let thumbnail_content_type = thumbnail_media.content_type().to_string();

        let video_url = self
            .with_timeout(
                "put_object",
                self.storage
                    .put_object(&video_key, video_media.into_bytes(), &format),
            )
            .await?;

        let thumbnail_url = match self
            .with_timeout(
                "put_object",
                self.storage.put_object(
                    &thumbnail_key,
                    thumbnail_media.into_bytes(),
                    &thumbnail_content_type,
                ),
            )
            .await
        {
            Ok(url) => url,
            Err(e) => {
                self.discard_objects(&[&video_key]).await;
                return Err(e.into());
            }
        };

        let now = Utc::now();
        let video_id = VideoId::new();
        let video = Video {
            id: video_id,
            user_id: owner,
            title,
            description,
            genre,
            view_count: 0,
            rating: 0.0,
            posted_at: now,
            created_at: now,
            modified_at: now,
            lifecycle: Lifecycle::Active,
            files: Vec::new(),
        };
        let file = VideoFile {
            id: VideoFileId::new(),
            video_id,
            file_key: video_key.clone(),
            thumbnail_key: Some(thumbnail_key.clone()),
            duration_secs,
            file_size,
            format,
            status: VideoFileStatus::Pending,
            created_at: now,
            modified_at: now,
            lifecycle: Lifecycle::Active,
        };

        let video = match self.repository.create_with_file(video, file).await {
            Ok(video) => video,
            Err(e) => {
                self.discard_objects(&[&video_key, &thumbnail_key]).await;
                return Err(e);
            }
        };

        tracing::info!(
            video_id = %video.id,
            user_id = %video.user_id,
            file_size,
            "Video uploaded"
        );

        Ok(UploadedVideo {
            video,
            video_url,
            thumbnail_url,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use mockall::mock;

    use super::*;
    use crate::domain::user::models::UserId;
    use crate::domain::video::models::MediaFile;
    use crate::domain::video::models::VideoTitle;

    mock! {
        pub TestVideoRepository {}

        #[async_trait]
        impl VideoRepository for TestVideoRepository {
            async fn list(&self, page: Page) -> Result<Vec<Video>, VideoError>;
            async fn search(&self, query: &SearchQuery, page: Page) -> Result<Vec<Video>, VideoError>;
            async fn find_by_id(&self, id: &VideoId) -> Result<Option<Video>, VideoError>;
            async fn find_by_ids(&self, ids: &[VideoId]) -> Result<Vec<Video>, VideoError>;
            async fn create_with_file(&self, video: Video, file: VideoFile) -> Result<Video, VideoError>;
            async fn record_interaction(&self, interaction: Interaction) -> Result<(), VideoError>;
        }
    }

    mock! {
        pub TestObjectStorage {}

        #[async_trait]
        impl ObjectStorage for TestObjectStorage {
            async fn put_object(&self, key: &ObjectKey, bytes: Vec<u8>, content_type: &str) -> Result<String, StorageError>;
            async fn presign_get(&self, key: &ObjectKey, expires_in: Duration) -> Result<String, StorageError>;
            async fn delete_object(&self, key: &ObjectKey) -> Result<(), StorageError>;
        }
    }

    /// Storage that never answers, for timeout tests.
    struct StalledStorage;

    #[async_trait]
    impl ObjectStorage for StalledStorage {
        async fn put_object(
            &self,
            _key: &ObjectKey,
            _bytes: Vec<u8>,
            _content_type: &str,
        ) -> Result<String, StorageError> {
            std::future::pending().await
        }

        async fn presign_get(
            &self,
            _key: &ObjectKey,
            _expires_in: Duration,
        ) -> Result<String, StorageError> {
            std::future::pending().await
        }

        async fn delete_object(&self, _key: &ObjectKey) -> Result<(), StorageError> {
            std::future::pending().await
        }
    }

    fn service<OS: ObjectStorage>(
        repository: MockTestVideoRepository,
        storage: OS,
    ) -> VideoService<MockTestVideoRepository, OS> {
        VideoService::new(
            Arc::new(repository),
            Arc::new(storage),
            Duration::from_secs(30),
            Duration::from_secs(900),
        )
    }

    fn video_with_file(id: VideoId) -> Video {
        let now = Utc::now();
        Video {
            id,
            user_id: UserId::new(),
            title: VideoTitle::new("Clip".to_string()).unwrap(),
            description: String::new(),
            genre: None,
            view_count: 0,
            rating: 0.0,
            posted_at: now,
            created_at: now,
            modified_at: now,
            lifecycle: Lifecycle::Active,
            files: vec![VideoFile {
                id: VideoFileId::new(),
                video_id: id,
                file_key: ObjectKey::from_stored(format!("movies/{}.mp4", id)),
                thumbnail_key: Some(ObjectKey::from_stored(format!("thumbnails/{}.jpg", id))),
                duration_secs: 10,
                file_size: 3,
                format: "video/mp4".to_string(),
                status: VideoFileStatus::Pending,
                created_at: now,
                modified_at: now,
                lifecycle: Lifecycle::Active,
            }],
        }
    }

    fn upload_command() -> UploadVideoCommand {
        UploadVideoCommand {
            owner: UserId::new(),
            title: VideoTitle::new("Clip".to_string()).unwrap(),
            description: "desc".to_string(),
            genre: None,
            duration_secs: 10,
            video: MediaFile::new(MediaKind::Video, "clip.mp4", None, vec![1, 2, 3]).unwrap(),
            thumbnail: MediaFile::new(MediaKind::Thumbnail, "thumb.jpg", None, vec![4]).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_get_video_presigns_files() {
        let mut repository = MockTestVideoRepository::new();
        let mut storage = MockTestObjectStorage::new();
        let id = VideoId::new();

        repository
            .expect_find_by_id()
            .times(1)
            .returning(move |_| Ok(Some(video_with_file(id))));
        storage
            .expect_presign_get()
            .times(2)
            .returning(|key, _| Ok(format!("https://signed.example/{}", key)));

        let presigned = service(repository, storage).get_video(&id).await.unwrap();

        assert_eq!(presigned.files.len(), 1);
        assert_eq!(
            presigned.files[0].file_url,
            format!("https://signed.example/movies/{}.mp4", id)
        );
        assert_eq!(
            presigned.files[0].thumbnail_url.as_deref(),
            Some(format!("https://signed.example/thumbnails/{}.jpg", id).as_str())
        );
    }

    #[tokio::test]
    async fn test_get_video_not_found() {
        let mut repository = MockTestVideoRepository::new();
        repository
            .expect_find_by_id()
            .times(1)
            .returning(|_| Ok(None));

        let result = service(repository, MockTestObjectStorage::new())
            .get_video(&VideoId::new())
            .await;

        assert!(matches!(result, Err(VideoError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_get_videos_by_ids_rejects_empty() {
        let result = service(MockTestVideoRepository::new(), MockTestObjectStorage::new())
            .get_videos_by_ids(&[])
            .await;

        assert!(matches!(result, Err(VideoError::EmptyIdList)));
    }

    #[tokio::test]
    async fn test_get_videos_by_ids_keeps_requested_order() {
        let mut repository = MockTestVideoRepository::new();
        let mut storage = MockTestObjectStorage::new();
        let first = VideoId::new();
        let second = VideoId::new();

        repository
            .expect_find_by_ids()
            .times(1)
            .returning(move |_| Ok(vec![video_with_file(second), video_with_file(first)]));
        storage
            .expect_presign_get()
            .returning(|key, _| Ok(key.to_string()));

        let videos = service(repository, storage)
            .get_videos_by_ids(&[first, VideoId::new(), second])
            .await
            .unwrap();

        let ids: Vec<VideoId> = videos.iter().map(|v| v.video.id).collect();
        assert_eq!(ids, vec![first, second]);
    }

    #[tokio::test]
    async fn test_record_interaction_unknown_video() {
        let mut repository = MockTestVideoRepository::new();
        repository
            .expect_find_by_id()
            .times(1)
            .returning(|_| Ok(None));
        repository.expect_record_interaction().times(0);

        let result = service(repository, MockTestObjectStorage::new())
            .record_interaction(RecordInteractionCommand {
                user_id: UserId::new(),
                video_id: VideoId::new(),
                event: crate::domain::video::models::InteractionEvent::Play,
            })
            .await;

        assert!(matches!(result, Err(VideoError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_upload_video_success() {
        let mut repository = MockTestVideoRepository::new();
        let mut storage = MockTestObjectStorage::new();

        storage
            .expect_put_object()
            .times(2)
            .returning(|key, _, _| Ok(format!("http://minio:9000/videohub/{}", key)));
        repository
            .expect_create_with_file()
            .withf(|video, file| {
                file.video_id == video.id
                    && file.file_key.as_str().starts_with("movies/")
                    && file.file_size == 3
                    && file.format == "video/mp4"
                    && file.status == VideoFileStatus::Pending
            })
            .times(1)
            .returning(|mut video, file| {
                video.files.push(file);
                Ok(video)
            });

        let uploaded = service(repository, storage)
            .upload_video(upload_command())
            .await
            .unwrap();

        assert!(uploaded.video_url.contains("/movies/"));
        assert!(uploaded.thumbnail_url.contains("/thumbnails/"));
        assert_eq!(uploaded.video.files.len(), 1);
    }

    #[tokio::test]
    async fn test_upload_video_database_failure_discards_objects() {
        let mut repository = MockTestVideoRepository::new();
        let mut storage = MockTestObjectStorage::new();
        let deleted = Arc::new(Mutex::new(Vec::new()));

        storage
            .expect_put_object()
            .times(2)
            .returning(|key, _, _| Ok(key.to_string()));
        let recorder = Arc::clone(&deleted);
        storage.expect_delete_object().times(2).returning(move |key| {
            recorder.lock().unwrap().push(key.to_string());
            Ok(())
        });
        repository
            .expect_create_with_file()
            .times(1)
            .returning(|_, _| Err(VideoError::DatabaseError("connection reset".to_string())));

        let result = service(repository, storage)
            .upload_video(upload_command())
            .await;

        assert!(matches!(result, Err(VideoError::DatabaseError(_))));
        let deleted = deleted.lock().unwrap();
        assert!(deleted[0].starts_with("movies/"));
        assert!(deleted[1].starts_with("thumbnails/"));
    }

    #[tokio::test]
    async fn test_upload_video_thumbnail_failure_discards_video() {
        let mut repository = MockTestVideoRepository::new();
        let mut storage = MockTestObjectStorage::new();

        storage
            .expect_put_object()
            .times(2)
            .returning(|key, _, _| {
                if key.as_str().starts_with("thumbnails/") {
                    Err(StorageError::PutFailed {
                        key: key.to_string(),
                        reason: "denied".to_string(),
                    })
                } else {
                    Ok(key.to_string())
                }
            });
        storage
            .expect_delete_object()
            .withf(|key| key.as_str().starts_with("movies/"))
            .times(1)
            .returning(|_| Ok(()));
        repository.expect_create_with_file().times(0);

        let result = service(repository, storage)
            .upload_video(upload_command())
            .await;

        assert!(matches!(
            result,
            Err(VideoError::Storage(StorageError::PutFailed { .. }))
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_storage_calls_time_out() {
        let mut repository = MockTestVideoRepository::new();
        repository
            .expect_find_by_id()
            .times(1)
            .returning(|id| Ok(Some(video_with_file(*id))));

        let result = service(repository, StalledStorage)
            .get_video(&VideoId::new())
            .await;

        assert!(matches!(
            result,
            Err(VideoError::Storage(StorageError::Timeout {
                operation: "presign_get",
                after_secs: 30
            }))
        ));
    }
}
