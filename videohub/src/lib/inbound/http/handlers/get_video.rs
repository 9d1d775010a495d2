use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;

use super::list_videos::VideoData;
use super::ApiError;
use super::ApiSuccess;
use crate::domain::video::models::VideoId;
use crate::domain::video::ports::VideoServicePort;
use crate::inbound::http::router::AppState;

pub async fn get_video(
    State(state): State<AppState>,
    Path(video_id): Path<String>,
) -> Result<ApiSuccess<VideoData>, ApiError> {
    let video_id =
        VideoId::from_string(&video_id).map_err(|e| ApiError::BadRequest(e.to_string()))?;

    state
        .video_service
        .get_video(&video_id)
        .await
        .map_err(ApiError::from)
        .map(|ref video| ApiSuccess::new(StatusCode::OK, video.into()))
}
