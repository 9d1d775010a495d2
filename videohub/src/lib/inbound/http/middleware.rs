use auth::JwtError;
use axum::extract::Request;
use axum::extract::State;
use axum::http::StatusCode;
use axum::http::{self};
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use serde_json::json;

use crate::domain::user::models::UserId;
use crate::inbound::http::router::AppState;

/// Identity of the caller, inserted into request extensions once the
/// bearer token has been verified.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: UserId,
    pub mail: String,
}

/// Middleware that validates bearer tokens and adds user info to request extensions
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, Response> {
    let token = extract_token_from_header(&req)?;

    let claims = state.authenticator.validate_token(token).map_err(|e| {
        tracing::warn!(error = %e, "Token validation failed");
        match e {
            JwtError::InvalidSignature | JwtError::Expired => {
                reject(StatusCode::UNAUTHORIZED, "Invalid or expired token")
            }
            _ => reject(StatusCode::BAD_REQUEST, "Malformed token"),
        }
    })?;

    let user_id = UserId::from_string(&claims.user_id).map_err(|e| {
        tracing::warn!(error = %e, "Token carries a malformed user_id claim");
        reject(StatusCode::BAD_REQUEST, "Malformed token")
    })?;

    req.extensions_mut().insert(AuthenticatedUser {
        user_id,
        mail: claims.mail,
    });

    Ok(next.run(req).await)
}

fn extract_token_from_header(req: &Request) -> Result<&str, Response> {
    let auth_header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .ok_or_else(|| reject(StatusCode::UNAUTHORIZED, "Missing Authorization header"))?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| reject(StatusCode::BAD_REQUEST, "Invalid Authorization header"))?;

    let token = auth_str.strip_prefix("Bearer ").ok_or_else(|| {
        reject(
            StatusCode::UNAUTHORIZED,
            "Invalid Authorization header format. Expected: Bearer <token>",
        )
    })?;

    if token.trim().is_empty() {
        return Err(reject(StatusCode::BAD_REQUEST, "Missing bearer token"));
    }

    Ok(token.trim())
}

fn reject(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use auth::Authenticator;
    use auth::KeyRing;
    use axum::body::Body;
    use axum::http::HeaderValue;
    use axum::middleware;
    use axum::routing::get;
    use axum::Extension;
    use axum::Router;
    use chrono::Duration;
    use chrono::Utc;
    use tower::ServiceExt;

    use super::*;
    use crate::inbound::http::router::test_support::state_with_authenticator;

    const SECRET: &str = "an-hs256-secret-of-at-least-32-bytes!";

    fn authenticator(kid: &str) -> Authenticator {
        Authenticator::new(KeyRing::single(kid, SECRET).unwrap(), Duration::hours(1))
    }

    async fn whoami(Extension(user): Extension<AuthenticatedUser>) -> String {
        format!("{} {}", user.user_id, user.mail)
    }

    fn app() -> Router {
        let state = state_with_authenticator(Arc::new(authenticator("primary")));
        Router::new()
            .route("/whoami", get(whoami))
            .route_layer(middleware::from_fn_with_state(state.clone(), authenticate))
            .with_state(state)
    }

    async fn status_for(header: Option<HeaderValue>) -> StatusCode {
        let mut request = axum::http::Request::builder().uri("/whoami");
        if let Some(value) = header {
            request = request.header(axum::http::header::AUTHORIZATION, value);
        }

        app()
            .oneshot(request.body(Body::empty()).unwrap())
            .await
            .unwrap()
            .status()
    }

    fn bearer(token: &str) -> Option<HeaderValue> {
        Some(HeaderValue::from_str(&format!("Bearer {}", token)).unwrap())
    }

    #[tokio::test]
    async fn test_valid_token_is_forwarded() {
        let user_id = UserId::new();
        let token = authenticator("primary")
            .issue_token(user_id, "a@x.com")
            .unwrap();

        assert_eq!(status_for(bearer(&token)).await, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_missing_header_is_unauthorized() {
        assert_eq!(status_for(None).await, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_non_bearer_scheme_is_unauthorized() {
        let header = Some(HeaderValue::from_static("Basic dXNlcjpwYXNz"));
        assert_eq!(status_for(header).await, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_non_ascii_header_is_bad_request() {
        let header = Some(HeaderValue::from_bytes(b"Bearer \xfftoken").unwrap());
        assert_eq!(status_for(header).await, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_empty_bearer_is_bad_request() {
        let header = Some(HeaderValue::from_static("Bearer "));
        assert_eq!(status_for(header).await, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_garbage_token_is_bad_request() {
        assert_eq!(status_for(bearer("not.a.jwt")).await, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_token_from_unknown_key_is_unauthorized() {
        let token = authenticator("retired")
            .issue_token(UserId::new(), "a@x.com")
            .unwrap();

        assert_eq!(status_for(bearer(&token)).await, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_expired_token_is_unauthorized() {
        let token = authenticator("primary")
            .issue_token_at(UserId::new(), "a@x.com", Utc::now() - Duration::hours(2))
            .unwrap();

        assert_eq!(status_for(bearer(&token)).await, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_non_uuid_subject_is_bad_request() {
        let token = authenticator("primary")
            .issue_token("user-42", "a@x.com")
            .unwrap();

        assert_eq!(status_for(bearer(&token)).await, StatusCode::BAD_REQUEST);
    }
}
