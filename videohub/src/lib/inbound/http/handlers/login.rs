use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use super::json_body;
use super::ApiError;
use super::ApiSuccess;
use super::FieldErrors;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::LoginCommand;
use crate::domain::user::ports::UserServicePort;
use crate::inbound::http::router::AppState;
use crate::user::errors::UserError;

pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<ApiSuccess<LoginResponseData>, ApiError> {
    let body = json_body(payload)?;

    let mut errors = FieldErrors::default();
    let mail = errors.required("mail", body.mail, Ok::<_, UserError>);
    let pass = errors.required("pass", body.pass, Ok::<_, UserError>);
    let (Some(mail), Some(pass)) = (mail, pass) else {
        return Err(errors.into());
    };

    // An address that cannot be valid cannot belong to an account.
    let email = EmailAddress::new(mail).map_err(|_| UserError::InvalidCredentials)?;

    let session = state
        .user_service
        .login(LoginCommand {
            email,
            password: pass,
        })
        .await?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        LoginResponseData {
            token: session.token,
        },
    ))
}

/// HTTP request body for login (raw JSON)
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    mail: Option<String>,
    pass: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginResponseData {
    pub token: String,
}
