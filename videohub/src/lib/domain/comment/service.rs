use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use crate::comment::errors::CommentError;
use crate::comment::ports::CommentRepository;
use crate::comment::ports::CommentServicePort;
use crate::domain::comment::models::Comment;
use crate::domain::comment::models::CommentId;
use crate::domain::comment::models::CreateCommentCommand;
use crate::domain::lifecycle::Lifecycle;
use crate::domain::user::models::UserId;
use crate::domain::video::models::VideoId;
use crate::video::ports::VideoRepository;

/// Domain service implementation for comment operations.
pub struct CommentService<CR, VR>
where
    CR: CommentRepository,
    VR: VideoRepository,
{
    repository: Arc<CR>,
    videos: Arc<VR>,
}

impl<CR, VR> CommentService<CR, VR>
where
    CR: CommentRepository,
    VR: VideoRepository,
{
    /// Create a new comment service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - Comment persistence implementation
    /// * `videos` - Video lookup, used to reject comments on unknown videos
    pub fn new(repository: Arc<CR>, videos: Arc<VR>) -> Self {
        Self { repository, videos }
    }
}

#[async_trait]
impl<CR, VR> CommentServicePort for CommentService<CR, VR>
where
    CR: CommentRepository,
    VR: VideoRepository,
{
    async fn create_comment(&self, command: CreateCommentCommand) -> Result<Comment, CommentError> {
        if self.videos.find_by_id(&command.video_id).await?.is_none() {
            return Err(CommentError::VideoNotFound(command.video_id.to_string()));
        }

        let now = Utc::now();
        let comment = Comment {
            id: CommentId::new(),
            user_id: command.author,
            video_id: command.video_id,
            content: command.content,
            created_at: now,
            modified_at: now,
            lifecycle: Lifecycle::Active,
        };

        let created = self.repository.create(comment).await?;
        tracing::info!(
            comment_id = %created.id,
            video_id = %created.video_id,
            user_id = %created.user_id,
            "Comment created"
        );

        Ok(created)
    }

    async fn list_comments(&self, video_id: &VideoId) -> Result<Vec<Comment>, CommentError> {
        self.repository.list_by_video(video_id).await
    }

    async fn delete_comment(
        &self,
        id: &CommentId,
        requester: &UserId,
    ) -> Result<(), CommentError> {
        let comment = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or(CommentError::NotFound(id.to_string()))?;

        if comment.user_id != *requester {
            tracing::warn!(
                comment_id = %id,
                user_id = %requester,
                "Rejected comment deletion by non-author"
            );
            return Err(CommentError::NotAuthor(id.to_string()));
        }

        self.repository.soft_delete(id, Utc::now()).await?;
        tracing::info!(comment_id = %id, user_id = %requester, "Comment deleted");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::DateTime;
    use mockall::mock;

    use super::*;
    use crate::domain::comment::models::CommentContent;
    use crate::domain::video::models::Interaction;
    use crate::domain::video::models::Page;
    use crate::domain::video::models::SearchQuery;
    use crate::domain::video::models::Video;
    use crate::domain::video::models::VideoFile;
    use crate::domain::video::models::VideoTitle;
    use crate::video::errors::VideoError;

    mock! {
        pub TestCommentRepository {}

        #[async_trait]
        impl CommentRepository for TestCommentRepository {
            async fn create(&self, comment: Comment) -> Result<Comment, CommentError>;
            async fn find_by_id(&self, id: &CommentId) -> Result<Option<Comment>, CommentError>;
            async fn list_by_video(&self, video_id: &VideoId) -> Result<Vec<Comment>, CommentError>;
            async fn soft_delete(&self, id: &CommentId, at: DateTime<Utc>) -> Result<(), CommentError>;
        }
    }

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

    fn video(id: VideoId) -> Video {
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
            files: Vec::new(),
        }
    }

    fn comment(author: UserId) -> Comment {
        Comment {
            id: CommentId::new(),
            user_id: author,
            video_id: VideoId::new(),
            content: CommentContent::new("nice".to_string()).unwrap(),
            created_at: Utc::now(),
            modified_at: Utc::now(),
            lifecycle: Lifecycle::Active,
        }
    }

    #[tokio::test]
    async fn test_create_comment_success() {
        let mut repository = MockTestCommentRepository::new();
        let mut videos = MockTestVideoRepository::new();
        let video_id = VideoId::new();
        let author = UserId::new();

        videos
            .expect_find_by_id()
            .times(1)
            .returning(move |_| Ok(Some(video(video_id))));
        repository
            .expect_create()
            .withf(move |c| c.user_id == author && c.content.as_str() == "nice")
            .times(1)
            .returning(Ok);

        let service = CommentService::new(Arc::new(repository), Arc::new(videos));

        let created = service
            .create_comment(CreateCommentCommand {
                author,
                video_id,
                content: CommentContent::new("nice".to_string()).unwrap(),
            })
            .await
            .unwrap();

        assert_eq!(created.video_id, video_id);
        assert!(created.lifecycle.is_active());
    }

    #[tokio::test]
    async fn test_create_comment_unknown_video() {
        let mut repository = MockTestCommentRepository::new();
        let mut videos = MockTestVideoRepository::new();

        videos.expect_find_by_id().times(1).returning(|_| Ok(None));
        repository.expect_create().times(0);

        let service = CommentService::new(Arc::new(repository), Arc::new(videos));

        let result = service
            .create_comment(CreateCommentCommand {
                author: UserId::new(),
                video_id: VideoId::new(),
                content: CommentContent::new("nice".to_string()).unwrap(),
            })
            .await;

        assert!(matches!(result, Err(CommentError::VideoNotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_comment_by_author() {
        let mut repository = MockTestCommentRepository::new();
        let author = UserId::new();
        let existing = comment(author);
        let comment_id = existing.id;

        repository
            .expect_find_by_id()
            .times(1)
            .returning(move |_| Ok(Some(existing.clone())));
        repository
            .expect_soft_delete()
            .withf(move |id, _| *id == comment_id)
            .times(1)
            .returning(|_, _| Ok(()));

        let service = CommentService::new(
            Arc::new(repository),
            Arc::new(MockTestVideoRepository::new()),
        );

        assert!(service.delete_comment(&comment_id, &author).await.is_ok());
    }

    #[tokio::test]
    async fn test_delete_comment_by_other_user() {
        let mut repository = MockTestCommentRepository::new();
        let existing = comment(UserId::new());
        let comment_id = existing.id;

        repository
            .expect_find_by_id()
            .times(1)
            .returning(move |_| Ok(Some(existing.clone())));
        repository.expect_soft_delete().times(0);

        let service = CommentService::new(
            Arc::new(repository),
            Arc::new(MockTestVideoRepository::new()),
        );

        let result = service.delete_comment(&comment_id, &UserId::new()).await;
        assert!(matches!(result, Err(CommentError::NotAuthor(_))));
    }

    #[tokio::test]
    async fn test_delete_comment_not_found() {
        let mut repository = MockTestCommentRepository::new();
        repository
            .expect_find_by_id()
            .times(1)
            .returning(|_| Ok(None));

        let service = CommentService::new(
            Arc::new(repository),
            Arc::new(MockTestVideoRepository::new()),
        );

        let result = service
            .delete_comment(&CommentId::new(), &UserId::new())
            .await;
        assert!(matches!(result, Err(CommentError::NotFound(_))));
    }
}
