use axum::extract::rejection::QueryRejection;
use axum::extract::Query;
use axum::extract::State;
use axum::http::StatusCode;
use serde::Deserialize;

use super::list_videos::page_params;
use super::list_videos::VideoData;
use super::ApiError;
use super::ApiSuccess;
use crate::domain::video::models::Page;
use crate::domain::video::models::SearchQuery;
use crate::domain::video::ports::VideoServicePort;
use crate::inbound::http::router::AppState;
use crate::video::errors::VideoError;

pub async fn search_videos(
    State(state): State<AppState>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> Result<ApiSuccess<Vec<VideoData>>, ApiError> {
    let params = page_params(params)?;
    let query = SearchQuery::new(params.query.unwrap_or_default()).map_err(VideoError::from)?;
    let page = Page::new(params.limit, params.offset);

    state
        .video_service
        .search_videos(&query, page)
        .await
        .map_err(ApiError::from)
        .map(|videos| ApiSuccess::new(StatusCode::OK, videos.iter().map(VideoData::from).collect()))
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SearchParams {
    query: Option<String>,
    limit: Option<i64>,
    offset: Option<i64>,
}
