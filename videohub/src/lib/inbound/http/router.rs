use std::sync::Arc;
use std::time::Duration;

use auth::Authenticator;
use axum::body::Body;
use axum::extract::DefaultBodyLimit;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::delete;
use axum::routing::get;
use axum::routing::post;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::create_comment::create_comment;
use super::handlers::delete_comment::delete_comment;
use super::handlers::get_video::get_video;
use super::handlers::get_videos_by_ids::get_videos_by_ids;
use super::handlers::health::health;
use super::handlers::list_comments::list_comments;
use super::handlers::list_videos::list_videos;
use super::handlers::login::login;
use super::handlers::logout::logout;
use super::handlers::mypage::mypage;
use super::handlers::record_interaction::record_interaction;
use super::handlers::register::register;
use super::handlers::search_videos::search_videos;
use super::handlers::upload_video::upload_video;
use super::middleware::authenticate as auth_middleware;
use crate::domain::comment::ports::CommentServicePort;
use crate::domain::user::ports::UserServicePort;
use crate::domain::video::ports::VideoServicePort;

/// Shared handler state. Services sit behind their ports so the router
/// can be driven by any adapter set.
#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<dyn UserServicePort>,
    pub comment_service: Arc<dyn CommentServicePort>,
    pub video_service: Arc<dyn VideoServicePort>,
    pub authenticator: Arc<Authenticator>,
}

pub fn create_router(state: AppState, max_upload_bytes: usize) -> Router {
    let public_routes = Router::new()
        .route("/api/v1/health", get(health))
        .route("/api/v1/users/register", post(register))
        .route("/api/v1/users/login", post(login))
        .route("/api/v1/users/logout", post(logout))
        .route("/api/v1/videos/list", get(list_videos))
        .route("/api/v1/videos/search", get(search_videos))
        .route("/api/v1/videos/get_videos_by_ids", post(get_videos_by_ids))
        .route("/api/v1/videos/:video_id", get(get_video))
        .route("/api/v1/videos/:video_id/comments", get(list_comments));

    let protected_routes = Router::new()
        .route("/api/v1/users/mypage", get(mypage))
        .route("/api/v1/comments", post(create_comment))
        .route("/api/v1/comments/:comment_id", delete(delete_comment))
        .route(
            "/api/v1/videos/create_user_video_interactions",
            post(record_interaction),
        )
        .route(
            "/api/v1/videoupload/upload",
            post(upload_video).layer(DefaultBodyLimit::max(max_upload_bytes)),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    // Header values are left out of the span: they carry bearer tokens.
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(trace_layer)
        .layer(CorsLayer::permissive())
        .with_state(state)
}
