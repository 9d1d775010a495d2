use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

/// Identity claims carried by a session token.
///
/// `user_id` and `mail` identify the caller; `iat` and `exp` are Unix
/// timestamps bounding the token's validity window.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Identifier of the authenticated user
    pub user_id: String,

    /// Email address of the authenticated user
    pub mail: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Create claims for a user with an explicit issuance instant.
    pub fn issued_at(
        user_id: impl ToString,
        mail: impl ToString,
        now: DateTime<Utc>,
        validity: Duration,
    ) -> Self {
        Self {
            user_id: user_id.to_string(),
            mail: mail.to_string(),
            iat: now.timestamp(),
            exp: (now + validity).timestamp(),
        }
    }
}
