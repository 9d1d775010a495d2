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
use crate::domain::user::models::Password;
use crate::domain::user::models::RegisterUserCommand;
use crate::domain::user::models::UserName;
use crate::domain::user::ports::UserServicePort;
use crate::inbound::http::router::AppState;
use crate::user::errors::UserError;

pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<ApiSuccess<RegisterResponseData>, ApiError> {
    let command = json_body(payload)?.try_into_command()?;
    let email = command.email.clone();

    let session = state
        .user_service
        .register(command)
        .await
        .map_err(|e| match e {
            UserError::EmailAlreadyExists(_) => {
                tracing::info!(email = %email, "Registration rejected: email already registered");
                ApiError::from(e)
            }
            e if e.is_internal() => ApiError::internal("Failed to register user", e),
            e => ApiError::from(e),
        })?;

    Ok(ApiSuccess::new(
        StatusCode::CREATED,
        RegisterResponseData {
            message: "User registered successfully".to_string(),
            token: session.token,
        },
    ))
}

/// HTTP request body for registration (raw JSON)
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RegisterRequest {
    name: Option<String>,
    mail: Option<String>,
    pass: Option<String>,
}

impl RegisterRequest {
    fn try_into_command(self) -> Result<RegisterUserCommand, ApiError> {
        let mut errors = FieldErrors::default();
        let name = errors.required("name", self.name, UserName::new);
        let email = errors.required("mail", self.mail, EmailAddress::new);
        let password = errors.required("pass", self.pass, Password::new);

        match (name, email, password) {
            (Some(name), Some(email), Some(password)) if errors.is_empty() => {
                Ok(RegisterUserCommand::new(name, email, password))
            }
            _ => Err(errors.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegisterResponseData {
    pub message: String,
    pub token: String,
}
