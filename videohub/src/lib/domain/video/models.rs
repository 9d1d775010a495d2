use std::fmt;
use std::str::FromStr;

use chrono::DateTime;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::lifecycle::Lifecycle;
use crate::domain::user::models::UserId;
use crate::video::errors::MediaError;
use crate::video::errors::SearchQueryError;
use crate::video::errors::VideoGenreError;
use crate::video::errors::VideoError;
use crate::video::errors::VideoIdError;
use crate::video::errors::VideoTitleError;

/// Video aggregate: catalogue metadata plus its stored files.
#[derive(Debug, Clone, PartialEq)]
pub struct Video {
    pub id: VideoId,
    pub user_id: UserId,
    pub title: VideoTitle,
    pub description: String,
    pub genre: Option<String>,
    pub view_count: i64,
    pub rating: f64,
    pub posted_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
    pub lifecycle: Lifecycle,
    pub files: Vec<VideoFile>,
}

/// A stored rendition of a video and its thumbnail.
///
/// Holds object keys, not URLs; URLs are presigned on read.
#[derive(Debug, Clone, PartialEq)]
pub struct VideoFile {
    pub id: VideoFileId,
    pub video_id: VideoId,
    pub file_key: ObjectKey,
    pub thumbnail_key: Option<ObjectKey>,
    pub duration_secs: i32,
    pub file_size: i64,
    pub format: String,
    pub status: VideoFileStatus,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
    pub lifecycle: Lifecycle,
}

/// Video unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VideoId(pub Uuid);

impl VideoId {
    /// Prefix used by the recommendation service for video ids.
    const EXTERNAL_PREFIX: &'static str = "video_";

    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a video ID from string.
    ///
    /// # Errors
    /// * `InvalidFormat` - String is not a valid UUID
    pub fn from_string(s: &str) -> Result<Self, VideoIdError> {
        Uuid::parse_str(s)
            .map(VideoId)
            .map_err(|e| VideoIdError::InvalidFormat(e.to_string()))
    }

    /// Parse an id that may carry the recommender's `video_` prefix.
    pub fn from_external(s: &str) -> Result<Self, VideoIdError> {
        Self::from_string(s.strip_prefix(Self::EXTERNAL_PREFIX).unwrap_or(s))
    }
}

impl Default for VideoId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VideoFileId(pub Uuid);

impl VideoFileId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for VideoFileId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for VideoFileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Video title value type
///
/// Trimmed, non-empty, at most 255 characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoTitle(String);

impl VideoTitle {
    const MAX_LENGTH: usize = 255;

    /// # Errors
    /// * `Empty` - Title is blank
    /// * `TooLong` - Title longer than 255 characters
    pub fn new(title: String) -> Result<Self, VideoTitleError> {
        let title = title.trim();
        let length = title.chars().count();

        if length == 0 {
            Err(VideoTitleError::Empty)
        } else if length > Self::MAX_LENGTH {
            Err(VideoTitleError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            })
        } else {
            Ok(Self(title.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Longest genre the `videos.genre` column holds.
pub const MAX_GENRE_LENGTH: usize = 255;

/// Trim an optional genre; blank becomes `None`.
///
/// # Errors
/// * `TooLong` - Genre longer than [`MAX_GENRE_LENGTH`] characters
pub fn parse_genre(genre: Option<String>) -> Result<Option<String>, VideoGenreError> {
    let Some(genre) = genre.map(|g| g.trim().to_string()).filter(|g| !g.is_empty()) else {
        return Ok(None);
    };

    let length = genre.chars().count();
    if length > MAX_GENRE_LENGTH {
        return Err(VideoGenreError::TooLong {
            max: MAX_GENRE_LENGTH,
            actual: length,
        });
    }
    Ok(Some(genre))
}

/// Free-text catalogue search term.
///
/// Matched case-insensitively as a literal substring of title or description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery(String);

impl SearchQuery {
    const MAX_LENGTH: usize = 255;

    /// # Errors
    /// * `Empty` - Query is blank
    /// * `TooLong` - Query longer than 255 characters
    pub fn new(query: String) -> Result<Self, SearchQueryError> {
        let query = query.trim();

        if query.is_empty() {
            Err(SearchQueryError::Empty)
        } else if query.chars().count() > Self::MAX_LENGTH {
            Err(SearchQueryError::TooLong {
                max: Self::MAX_LENGTH,
            })
        } else {
            Ok(Self(query.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Lower-cased `LIKE` pattern with `%`, `_` and `\` escaped.
    pub fn like_pattern(&self) -> String {
        let mut pattern = String::with_capacity(self.0.len() + 2);
        pattern.push('%');
        for c in self.0.to_lowercase().chars() {
            if matches!(c, '%' | '_' | '\\') {
                pattern.push('\\');
            }
            pattern.push(c);
        }
        pattern.push('%');
        pattern
    }
}

/// Limit/offset window over a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub limit: i64,
    pub offset: i64,
}

impl Page {
    pub const DEFAULT_LIMIT: i64 = 50;
    pub const MAX_LIMIT: i64 = 100;

    /// Clamp `limit` to 1..=100 (default 50) and `offset` to >= 0.
    pub fn new(limit: Option<i64>, offset: Option<i64>) -> Self {
        Self {
            limit: limit
                .unwrap_or(Self::DEFAULT_LIMIT)
                .clamp(1, Self::MAX_LIMIT),
            offset: offset.unwrap_or(0).max(0),
        }
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// Processing state of an uploaded file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VideoFileStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl VideoFileStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            VideoFileStatus::Pending => "pending",
            VideoFileStatus::Processing => "processing",
            VideoFileStatus::Completed => "completed",
            VideoFileStatus::Failed => "failed",
        }
    }
}

impl FromStr for VideoFileStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(VideoFileStatus::Pending),
            "processing" => Ok(VideoFileStatus::Processing),
            "completed" => Ok(VideoFileStatus::Completed),
            "failed" => Ok(VideoFileStatus::Failed),
            other => Err(format!("unknown video file status: {}", other)),
        }
    }
}

/// Viewer interaction recorded for the recommender.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionEvent {
    Play,
    Pause,
    Complete,
    Like,
    Dislike,
}

impl InteractionEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            InteractionEvent::Play => "play",
            InteractionEvent::Pause => "pause",
            InteractionEvent::Complete => "complete",
            InteractionEvent::Like => "like",
            InteractionEvent::Dislike => "dislike",
        }
    }
}

impl FromStr for InteractionEvent {
    type Err = VideoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "play" => Ok(InteractionEvent::Play),
            "pause" => Ok(InteractionEvent::Pause),
            "complete" => Ok(InteractionEvent::Complete),
            "like" => Ok(InteractionEvent::Like),
            "dislike" => Ok(InteractionEvent::Dislike),
            other => Err(VideoError::InvalidEvent(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Interaction {
    pub id: Uuid,
    pub user_id: UserId,
    pub video_id: VideoId,
    pub event: InteractionEvent,
    pub created_at: DateTime<Utc>,
}

/// Which kind of media an upload carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Video,
    Thumbnail,
}

impl MediaKind {
    const VIDEO_EXTENSIONS: &'static [&'static str] = &[
        "mp4", "avi", "mov", "wmv", "flv", "mkv", "webm", "mpeg", "mpg", "3gp", "m4v",
    ];
    const THUMBNAIL_EXTENSIONS: &'static [&'static str] = &[
        "jpg", "jpeg", "png", "gif", "bmp", "tiff", "webp", "ico", "svg",
    ];

    pub fn allowed_extensions(&self) -> &'static [&'static str] {
        match self {
            MediaKind::Video => Self::VIDEO_EXTENSIONS,
            MediaKind::Thumbnail => Self::THUMBNAIL_EXTENSIONS,
        }
    }

    fn content_type_prefix(&self) -> &'static str {
        match self {
            MediaKind::Video => "video/",
            MediaKind::Thumbnail => "image/",
        }
    }

    fn key_prefix(&self) -> &'static str {
        match self {
            MediaKind::Video => "movies",
            MediaKind::Thumbnail => "thumbnails",
        }
    }
}

/// Location of an object inside the storage bucket.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectKey(String);

impl ObjectKey {
    /// Fresh key `<movies|thumbnails>/<uuid>.<ext>` for new media.
    pub fn generate(kind: MediaKind, extension: &str) -> Self {
        Self(format!(
            "{}/{}.{}",
            kind.key_prefix(),
            Uuid::new_v4(),
            extension
        ))
    }

    /// Wrap a key read back from storage metadata.
    pub fn from_stored(key: String) -> Self {
        Self(key)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Longest content type the `video_files.format` column holds.
pub const MAX_CONTENT_TYPE_LENGTH: usize = 100;

/// An uploaded file whose extension has been checked against its kind.
#[derive(Clone, PartialEq, Eq)]
pub struct MediaFile {
    kind: MediaKind,
    file_name: String,
    extension: String,
    content_type: String,
    bytes: Vec<u8>,
}

impl MediaFile {
    /// # Errors
    /// * `UnsupportedExtension` - Extension not allowed for `kind`
    /// * `Empty` - File has no content
    pub fn new(
        kind: MediaKind,
        file_name: &str,
        content_type: Option<&str>,
        bytes: Vec<u8>,
    ) -> Result<Self, MediaError> {
        let extension = file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_lowercase())
            .unwrap_or_default();

        if !kind.allowed_extensions().contains(&extension.as_str()) {
            return Err(MediaError::UnsupportedExtension {
                extension,
                allowed: kind.allowed_extensions().join(", "),
            });
        }
        if bytes.is_empty() {
            return Err(MediaError::Empty);
        }

        // A declared type is kept only when it names this kind of media and
        // fits `video_files.format`.
        let content_type = content_type
            .map(str::trim)
            .filter(|ct| {
                ct.len() <= MAX_CONTENT_TYPE_LENGTH
                    && ct.starts_with(kind.content_type_prefix())
                    && ct.len() > kind.content_type_prefix().len()
                    && ct.chars().all(|c| c.is_ascii_graphic() || c == ' ')
            })
            .map(str::to_string)
            .unwrap_or_else(|| guess_content_type(&extension).to_string());

        Ok(Self {
            kind,
            file_name: file_name.to_string(),
            extension,
            content_type,
            bytes,
        })
    }

    pub fn kind(&self) -> MediaKind {
        self.kind
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

impl fmt::Debug for MediaFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MediaFile")
            .field("kind", &self.kind)
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

fn guess_content_type(extension: &str) -> &'static str {
    match extension {
        "mp4" | "m4v" => "video/mp4",
        "avi" => "video/x-msvideo",
        "mov" => "video/quicktime",
        "wmv" => "video/x-ms-wmv",
        "flv" => "video/x-flv",
        "mkv" => "video/x-matroska",
        "webm" => "video/webm",
        "mpeg" | "mpg" => "video/mpeg",
        "3gp" => "video/3gpp",
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "bmp" => "image/bmp",
        "tiff" => "image/tiff",
        "webp" => "image/webp",
        "ico" => "image/x-icon",
        "svg" => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

/// Command to upload a video and its thumbnail.
#[derive(Debug)]
pub struct UploadVideoCommand {
    pub owner: UserId,
    pub title: VideoTitle,
    pub description: String,
    pub genre: Option<String>,
    pub duration_secs: i32,
    pub video: MediaFile,
    pub thumbnail: MediaFile,
}

#[derive(Debug, Clone, Copy)]
pub struct RecordInteractionCommand {
    pub user_id: UserId,
    pub video_id: VideoId,
    pub event: InteractionEvent,
}

/// A video with time-limited URLs for each of its files.
#[derive(Debug, Clone)]
pub struct PresignedVideo {
    pub video: Video,
    pub files: Vec<PresignedFile>,
}

#[derive(Debug, Clone)]
pub struct PresignedFile {
    pub file: VideoFile,
    pub file_url: String,
    pub thumbnail_url: Option<String>,
}

/// Result of a completed upload.
#[derive(Debug, Clone)]
pub struct UploadedVideo {
    pub video: Video,
    pub video_url: String,
    pub thumbnail_url: String,
}
