use axum::http::header;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::Serialize;

use super::ApiSuccess;

/// Expires any cookie-held token on the client.
const CLEAR_TOKEN_COOKIE: &str = "token=; Max-Age=0; Path=/; HttpOnly";

/// Tokens are not tracked server-side, so logging out only tells the
/// client to forget its token.
pub async fn logout() -> impl IntoResponse {
    (
        [(header::SET_COOKIE, CLEAR_TOKEN_COOKIE)],
        ApiSuccess::new(
            StatusCode::OK,
            LogoutResponseData {
                message: "Logged out successfully".to_string(),
            },
        ),
    )
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogoutResponseData {
    pub message: String,
}
