use axum::extract::rejection::QueryRejection;
use axum::extract::Query;
use axum::extract::State;
use axum::http::StatusCode;
use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::video::models::Page;
use crate::domain::video::models::PresignedFile;
use crate::domain::video::models::PresignedVideo;
use crate::domain::video::ports::VideoServicePort;
use crate::inbound::http::router::AppState;

pub async fn list_videos(
    State(state): State<AppState>,
    params: Result<Query<PageParams>, QueryRejection>,
) -> Result<ApiSuccess<Vec<VideoData>>, ApiError> {
    let page = page_params(params)?.page();

    state
        .video_service
        .list_videos(page)
        .await
        .map_err(ApiError::from)
        .map(|videos| ApiSuccess::new(StatusCode::OK, videos.iter().map(VideoData::from).collect()))
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PageParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl PageParams {
    pub fn page(&self) -> Page {
        Page::new(self.limit, self.offset)
    }
}

pub(crate) fn page_params<T>(params: Result<Query<T>, QueryRejection>) -> Result<T, ApiError> {
    params
        .map(|Query(params)| params)
        .map_err(|e| ApiError::BadRequest(format!("Invalid query parameters: {}", e.body_text())))
}

/// Video with presigned URLs, shared by every catalogue endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VideoData {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub description: String,
    pub genre: Option<String>,
    pub view_count: i64,
    pub rating: f64,
    pub posted_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
    pub files: Vec<VideoFileData>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VideoFileData {
    pub id: String,
    pub file_url: String,
    pub thumbnail_url: Option<String>,
    pub duration_secs: i32,
    pub file_size: i64,
    pub format: String,
    pub status: &'static str,
}

impl From<&PresignedVideo> for VideoData {
    fn from(presigned: &PresignedVideo) -> Self {
        let video = &presigned.video;
        Self {
            id: video.id.to_string(),
            user_id: video.user_id.to_string(),
            title: video.title.as_str().to_string(),
            description: video.description.clone(),
            genre: video.genre.clone(),
            view_count: video.view_count,
            rating: video.rating,
            posted_at: video.posted_at,
            created_at: video.created_at,
            modified_at: video.modified_at,
            files: presigned.files.iter().map(VideoFileData::from).collect(),
        }
    }
}

impl From<&PresignedFile> for VideoFileData {
    fn from(presigned: &PresignedFile) -> Self {
        Self {
            id: presigned.file.id.to_string(),
            file_url: presigned.file_url.clone(),
            thumbnail_url: presigned.thumbnail_url.clone(),
            duration_secs: presigned.file.duration_secs,
            file_size: presigned.file.file_size,
            format: presigned.file.format.clone(),
            status: presigned.file.status.as_str(),
        }
    }
}
