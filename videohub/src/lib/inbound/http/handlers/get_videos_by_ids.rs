use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use super::json_body;
use super::list_videos::VideoData;
use super::ApiError;
use super::ApiSuccess;
use crate::domain::video::models::VideoId;
use crate::domain::video::ports::VideoServicePort;
use crate::inbound::http::router::AppState;

/// Resolve a ranked id list, typically produced by the recommender.
pub async fn get_videos_by_ids(
    State(state): State<AppState>,
    payload: Result<Json<GetVideosByIdsRequest>, JsonRejection>,
) -> Result<ApiSuccess<Vec<VideoData>>, ApiError> {
    let ids = json_body(payload)?
        .video_ids
        .iter()
        .map(|raw| {
            VideoId::from_external(raw)
                .map_err(|_| ApiError::BadRequest(format!("Invalid video ID: {}", raw)))
        })
        .collect::<Result<Vec<_>, _>>()?;

    state
        .video_service
        .get_videos_by_ids(&ids)
        .await
        .map_err(ApiError::from)
        .map(|videos| ApiSuccess::new(StatusCode::OK, videos.iter().map(VideoData::from).collect()))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GetVideosByIdsRequest {
    #[serde(rename = "videoIds", default)]
    video_ids: Vec<String>,
}
