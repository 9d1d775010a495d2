use axum::extract::multipart::MultipartError;
use axum::extract::multipart::MultipartRejection;
use axum::extract::Multipart;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use super::FieldErrors;
use crate::domain::user::models::UserId;
use crate::domain::video::models::parse_genre;
use crate::domain::video::models::MediaFile;
use crate::domain::video::models::MediaKind;
use crate::domain::video::models::UploadVideoCommand;
use crate::domain::video::models::VideoTitle;
use crate::domain::video::ports::VideoServicePort;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;
use crate::video::errors::MediaError;

/// Accepts a `multipart/form-data` upload of a video and its thumbnail.
///
/// Text fields: `title` (required), `description`, `genre`, `duration`
/// (seconds). File fields: `file` and `thumbnail`, both required.
pub async fn upload_video(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<ApiSuccess<UploadVideoResponseData>, ApiError> {
    let multipart = multipart.map_err(|e| {
        tracing::debug!(reason = %e.body_text(), "Rejected upload request");
        ApiError::BadRequest("Expected multipart/form-data".to_string())
    })?;

    let command = UploadForm::read(multipart)
        .await?
        .try_into_command(auth_user.user_id)?;

    tracing::info!(
        user_id = %auth_user.user_id,
        title = command.title.as_str(),
        video_bytes = command.video.len(),
        thumbnail_bytes = command.thumbnail.len(),
        "Video upload received"
    );

    let uploaded = state
        .video_service
        .upload_video(command)
        .await
        .map_err(|e| ApiError::internal("Failed to upload video", e))?;

    Ok(ApiSuccess::new(
        StatusCode::CREATED,
        UploadVideoResponseData {
            video_id: uploaded.video.id.to_string(),
            video_url: uploaded.video_url,
            thumbnail_url: uploaded.thumbnail_url,
        },
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadVideoResponseData {
    pub video_id: String,
    pub video_url: String,
    pub thumbnail_url: String,
}

#[derive(Debug, Default)]
struct UploadForm {
    title: Option<String>,
    description: Option<String>,
    genre: Option<String>,
    duration: Option<String>,
    file: Option<UploadedPart>,
    thumbnail: Option<UploadedPart>,
}

#[derive(Debug)]
struct UploadedPart {
    file_name: String,
    content_type: Option<String>,
    bytes: Vec<u8>,
}

impl UploadForm {
    async fn read(mut multipart: Multipart) -> Result<Self, ApiError> {
        let mut form = UploadForm::default();

        while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
            let name = field.name().unwrap_or_default().to_string();

            match name.as_str() {
                "file" | "thumbnail" => {
                    let file_name = field.file_name().unwrap_or_default().to_string();
                    let content_type = field.content_type().map(str::to_string);
                    let bytes = field.bytes().await.map_err(multipart_error)?.to_vec();
                    let part = Some(UploadedPart {
                        file_name,
                        content_type,
                        bytes,
                    });

                    if name == "file" {
                        form.file = part;
                    } else {
                        form.thumbnail = part;
                    }
                }
                "title" | "description" | "genre" | "duration" => {
                    let value = Some(field.text().await.map_err(multipart_error)?);
                    match name.as_str() {
                        "title" => form.title = value,
                        "description" => form.description = value,
                        "genre" => form.genre = value,
                        _ => form.duration = value,
                    }
                }
                other => tracing::debug!(field = other, "Ignoring unknown upload field"),
            }
        }

        Ok(form)
    }

    fn try_into_command(self, owner: UserId) -> Result<UploadVideoCommand, ApiError> {
        let mut errors = FieldErrors::default();

        let title = errors.required("title", self.title, VideoTitle::new);
        let duration_secs = match self.duration.as_deref().map(str::trim) {
            None | Some("") => Some(0),
            Some(raw) => errors.check(
                "duration",
                raw.parse::<i32>()
                    .ok()
                    .filter(|secs| *secs >= 0)
                    .ok_or("must be a non-negative integer"),
            ),
        };
        let genre = errors.check("genre", parse_genre(self.genre));
        let video = errors.check("file", media(MediaKind::Video, self.file));
        let thumbnail = errors.check("thumbnail", media(MediaKind::Thumbnail, self.thumbnail));

        match (title, genre, duration_secs, video, thumbnail) {
            (Some(title), Some(genre), Some(duration_secs), Some(video), Some(thumbnail))
                if errors.is_empty() =>
            {
                Ok(UploadVideoCommand {
                    owner,
                    title,
                    description: self
                        .description
                        .map(|d| d.trim().to_string())
                        .unwrap_or_default(),
                    genre,
                    duration_secs,
                    video,
                    thumbnail,
                })
            }
            _ => Err(errors.into()),
        }
    }
}

fn media(kind: MediaKind, part: Option<UploadedPart>) -> Result<MediaFile, MediaError> {
    let part = part.ok_or(MediaError::Missing)?;
    MediaFile::new(
        kind,
        &part.file_name,
        part.content_type.as_deref(),
        part.bytes,
    )
}

fn multipart_error(err: MultipartError) -> ApiError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge("Upload exceeds the maximum allowed size".to_string())
    } else {
        tracing::debug!(reason = %err.body_text(), "Malformed multipart body");
        ApiError::BadRequest("Invalid multipart form data".to_string())
    }
}
