use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use axum::Json;
use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use super::json_body;
use super::ApiError;
use super::ApiSuccess;
use super::FieldErrors;
use crate::domain::video::models::Interaction;
use crate::domain::video::models::InteractionEvent;
use crate::domain::video::models::RecordInteractionCommand;
use crate::domain::video::models::VideoId;
use crate::domain::video::ports::VideoServicePort;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;

pub async fn record_interaction(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    payload: Result<Json<RecordInteractionRequest>, JsonRejection>,
) -> Result<ApiSuccess<InteractionData>, ApiError> {
    let body = json_body(payload)?;

    let mut errors = FieldErrors::default();
    let video_id = errors.required("video_id", body.video_id, |id| VideoId::from_string(&id));
    let event = errors.required("event_type", body.event_type, |event| {
        event.parse::<InteractionEvent>()
    });
    let (Some(video_id), Some(event)) = (video_id, event) else {
        return Err(errors.into());
    };

    state
        .video_service
        .record_interaction(RecordInteractionCommand {
            user_id: auth_user.user_id,
            video_id,
            event,
        })
        .await
        .map_err(ApiError::from)
        .map(|ref interaction| ApiSuccess::new(StatusCode::CREATED, interaction.into()))
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RecordInteractionRequest {
    video_id: Option<String>,
    event_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InteractionData {
    pub id: String,
    pub user_id: String,
    pub video_id: String,
    pub event_type: &'static str,
    pub created_at: DateTime<Utc>,
}

impl From<&Interaction> for InteractionData {
    fn from(interaction: &Interaction) -> Self {
        Self {
            id: interaction.id.to_string(),
            user_id: interaction.user_id.to_string(),
            video_id: interaction.video_id.to_string(),
            event_type: interaction.event.as_str(),
            created_at: interaction.created_at,
        }
    }
}
