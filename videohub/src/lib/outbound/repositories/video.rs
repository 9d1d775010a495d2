use std::collections::HashMap;

use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::lifecycle::Lifecycle;
use crate::domain::user::models::UserId;
use crate::domain::video::models::Interaction;
use crate::domain::video::models::ObjectKey;
use crate::domain::video::models::Page;
use crate::domain::video::models::SearchQuery;
use crate::domain::video::models::Video;
use crate::domain::video::models::VideoFile;
use crate::domain::video::models::VideoFileId;
use crate::domain::video::models::VideoId;
use crate::domain::video::models::VideoTitle;
use crate::domain::video::ports::VideoRepository;
use crate::video::errors::VideoError;

const VIDEO_COLUMNS: &str = "id, user_id, title, description, genre, view_count, rating, \
                             posted_at, created_at, modified_at, deleted_at";

pub struct PostgresVideoRepository {
    pool: PgPool,
}

impl PostgresVideoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Load the active files of `rows` and assemble the aggregates, keeping row order.
    async fn with_files(&self, rows: Vec<VideoRow>) -> Result<Vec<Video>, VideoError> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<Uuid> = rows.iter().map(|r| r.id).collect();
        let file_rows = sqlx::query_as::<_, VideoFileRow>(
            r#"
            SELECT id, video_id, file_key, thumbnail_key, duration_secs, file_size, format,
                   status, created_at, modified_at, deleted_at
            FROM video_files
            WHERE video_id = ANY($1) AND deleted_at IS NULL
            ORDER BY created_at ASC
            "#,
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| VideoError::DatabaseError(e.to_string()))?;

        let mut files: HashMap<Uuid, Vec<VideoFile>> = HashMap::new();
        for row in file_rows {
            let video_id = row.video_id;
            files
                .entry(video_id)
                .or_default()
                .push(VideoFile::try_from(row)?);
        }

        rows.into_iter()
            .map(|row| {
                let attached = files.remove(&row.id).unwrap_or_default();
                row.into_video(attached)
            })
            .collect()
    }
}

#[derive(sqlx::FromRow)]
struct VideoRow {
    id: Uuid,
    user_id: Uuid,
    title: String,
    description: String,
    genre: Option<String>,
    view_count: i64,
    rating: f64,
    posted_at: DateTime<Utc>,
    created_at: DateTime<Utc>,
    modified_at: DateTime<Utc>,
    deleted_at: Option<DateTime<Utc>>,
}

impl VideoRow {
    fn into_video(self, files: Vec<VideoFile>) -> Result<Video, VideoError> {
        Ok(Video {
            id: VideoId(self.id),
            user_id: UserId(self.user_id),
            title: VideoTitle::new(self.title)?,
            description: self.description,
            genre: self.genre,
            view_count: self.view_count,
            rating: self.rating,
            posted_at: self.posted_at,
            created_at: self.created_at,
            modified_at: self.modified_at,
            lifecycle: Lifecycle::from_deleted_at(self.deleted_at),
            files,
        })
    }
}

#[derive(sqlx::FromRow)]
struct VideoFileRow {
    id: Uuid,
    video_id: Uuid,
    file_key: String,
    thumbnail_key: Option<String>,
    duration_secs: i32,
    file_size: i64,
    format: String,
    status: String,
    created_at: DateTime<Utc>,
    modified_at: DateTime<Utc>,
    deleted_at: Option<DateTime<Utc>>,
}

impl TryFrom<VideoFileRow> for VideoFile {
    type Error = VideoError;

    fn try_from(row: VideoFileRow) -> Result<Self, Self::Error> {
        Ok(VideoFile {
            id: VideoFileId(row.id),
            video_id: VideoId(row.video_id),
            file_key: ObjectKey::from_stored(row.file_key),
            thumbnail_key: row.thumbnail_key.map(ObjectKey::from_stored),
            duration_secs: row.duration_secs,
            file_size: row.file_size,
            format: row.format,
            status: row.status.parse().map_err(VideoError::DatabaseError)?,
            created_at: row.created_at,
            modified_at: row.modified_at,
            lifecycle: Lifecycle::from_deleted_at(row.deleted_at),
        })
    }
}

#[async_trait]
impl VideoRepository for PostgresVideoRepository {
    async fn list(&self, page: Page) -> Result<Vec<Video>, VideoError> {
        let sql = format!(
            "SELECT {VIDEO_COLUMNS} FROM videos \
             WHERE deleted_at IS NULL \
             ORDER BY posted_at DESC, id ASC \
             LIMIT $1 OFFSET $2"
        );

        let rows = sqlx::query_as::<_, VideoRow>(&sql)
            .bind(page.limit)
            .bind(page.offset)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| VideoError::DatabaseError(e.to_string()))?;

        self.with_files(rows).await
    }

    async fn search(&self, query: &SearchQuery, page: Page) -> Result<Vec<Video>, VideoError> {
        let sql = format!(
            r"SELECT {VIDEO_COLUMNS} FROM videos
             WHERE deleted_at IS NULL
               AND (LOWER(title) LIKE $1 ESCAPE '\' OR LOWER(description) LIKE $1 ESCAPE '\')
             ORDER BY posted_at DESC, id ASC
             LIMIT $2 OFFSET $3"
        );

        let rows = sqlx::query_as::<_, VideoRow>(&sql)
            .bind(query.like_pattern())
            .bind(page.limit)
            .bind(page.offset)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| VideoError::DatabaseError(e.to_string()))?;

        self.with_files(rows).await
    }

    async fn find_by_id(&self, id: &VideoId) -> Result<Option<Video>, VideoError> {
        let sql = format!("SELECT {VIDEO_COLUMNS} FROM videos WHERE id = $1 AND deleted_at IS NULL");

        let row = sqlx::query_as::<_, VideoRow>(&sql)
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| VideoError::DatabaseError(e.to_string()))?;

        match row {
            Some(row) => Ok(self.with_files(vec![row]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn find_by_ids(&self, ids: &[VideoId]) -> Result<Vec<Video>, VideoError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let uuids: Vec<Uuid> = ids.iter().map(|id| id.0).collect();
        let sql = format!(
            "SELECT {VIDEO_COLUMNS} FROM videos WHERE id = ANY($1) AND deleted_at IS NULL"
        );

        let rows = sqlx::query_as::<_, VideoRow>(&sql)
            .bind(&uuids)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| VideoError::DatabaseError(e.to_string()))?;

        self.with_files(rows).await
    }

    async fn create_with_file(&self, video: Video, file: VideoFile) -> Result<Video, VideoError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| VideoError::DatabaseError(e.to_string()))?;

        sqlx::query(
            r#"
            INSERT INTO videos (id, user_id, title, description, genre, view_count, rating,
                                posted_at, created_at, modified_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(video.id.0)
        .bind(video.user_id.0)
        .bind(video.title.as_str())
        .bind(&video.description)
        .bind(&video.genre)
        .bind(video.view_count)
        .bind(video.rating)
        .bind(video.posted_at)
        .bind(video.created_at)
        .bind(video.modified_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| VideoError::DatabaseError(e.to_string()))?;

        sqlx::query(
            r#"
            INSERT INTO video_files (id, video_id, file_key, thumbnail_key, duration_secs,
                                     file_size, format, status, created_at, modified_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(file.id.0)
        .bind(file.video_id.0)
        .bind(file.file_key.as_str())
        .bind(file.thumbnail_key.as_ref().map(ObjectKey::as_str))
        .bind(file.duration_secs)
        .bind(file.file_size)
        .bind(&file.format)
        .bind(file.status.as_str())
        .bind(file.created_at)
        .bind(file.modified_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| VideoError::DatabaseError(e.to_string()))?;

        tx.commit()
            .await
            .map_err(|e| VideoError::DatabaseError(e.to_string()))?;

        Ok(Video {
            files: vec![file],
            ..video
        })
    }

    async fn record_interaction(&self, interaction: Interaction) -> Result<(), VideoError> {
        sqlx::query(
            r#"
            INSERT INTO user_video_interactions (id, user_id, video_id, event_type, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(interaction.id)
        .bind(interaction.user_id.0)
        .bind(interaction.video_id.0)
        .bind(interaction.event.as_str())
        .bind(interaction.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| VideoError::DatabaseError(e.to_string()))?;

        Ok(())
    }
}
