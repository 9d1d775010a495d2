use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::comment::errors::CommentError;
use crate::domain::comment::models::Comment;
use crate::domain::comment::models::CommentContent;
use crate::domain::comment::models::CommentId;
use crate::domain::comment::ports::CommentRepository;
use crate::domain::lifecycle::Lifecycle;
use crate::domain::user::models::UserId;
use crate::domain::video::models::VideoId;

pub struct PostgresCommentRepository {
    pool: PgPool,
}

impl PostgresCommentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct CommentRow {
    id: Uuid,
    user_id: Uuid,
    video_id: Uuid,
    content: String,
    created_at: DateTime<Utc>,
    modified_at: DateTime<Utc>,
    deleted_at: Option<DateTime<Utc>>,
}

impl TryFrom<CommentRow> for Comment {
    type Error = CommentError;

    fn try_from(row: CommentRow) -> Result<Self, Self::Error> {
        Ok(Comment {
            id: CommentId(row.id),
            user_id: UserId(row.user_id),
            video_id: VideoId(row.video_id),
            content: CommentContent::new(row.content)?,
            created_at: row.created_at,
            modified_at: row.modified_at,
            lifecycle: Lifecycle::from_deleted_at(row.deleted_at),
        })
    }
}

#[async_trait]
impl CommentRepository for PostgresCommentRepository {
    async fn create(&self, comment: Comment) -> Result<Comment, CommentError> {
        sqlx::query(
            r#"
            INSERT INTO comments (id, user_id, video_id, content, created_at, modified_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(comment.id.0)
        .bind(comment.user_id.0)
        .bind(comment.video_id.0)
        .bind(comment.content.as_str())
        .bind(comment.created_at)
        .bind(comment.modified_at)
        .execute(&self.pool)
        .await
        .map_err(|e| CommentError::DatabaseError(e.to_string()))?;

        Ok(comment)
    }

    async fn find_by_id(&self, id: &CommentId) -> Result<Option<Comment>, CommentError> {
        let row = sqlx::query_as::<_, CommentRow>(
            r#"
            SELECT id, user_id, video_id, content, created_at, modified_at, deleted_at
            FROM comments
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| CommentError::DatabaseError(e.to_string()))?;

        row.map(Comment::try_from).transpose()
    }

    async fn list_by_video(&self, video_id: &VideoId) -> Result<Vec<Comment>, CommentError> {
        let rows = sqlx::query_as::<_, CommentRow>(
            r#"
            SELECT id, user_id, video_id, content, created_at, modified_at, deleted_at
            FROM comments
            WHERE video_id = $1 AND deleted_at IS NULL
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(video_id.0)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| CommentError::DatabaseError(e.to_string()))?;

        rows.into_iter().map(Comment::try_from).collect()
    }

    async fn soft_delete(&self, id: &CommentId, at: DateTime<Utc>) -> Result<(), CommentError> {
        let result = sqlx::query(
            r#"
            UPDATE comments
            SET deleted_at = $2, modified_at = $2
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(id.0)
        .bind(at)
        .execute(&self.pool)
        .await
        .map_err(|e| CommentError::DatabaseError(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(CommentError::NotFound(id.to_string()));
        }

        Ok(())
    }
}
