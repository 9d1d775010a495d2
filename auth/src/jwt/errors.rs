use thiserror::Error;

/// Error type for JWT operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum JwtError {
    #[error("Failed to encode token: {0}")]
    EncodingFailed(String),

    /// Token could not be parsed: bad encoding, missing `kid`, or claims
    /// that do not match the expected shape.
    #[error("Token is malformed: {0}")]
    Malformed(String),

    /// Signature mismatch, unknown key id, or a disallowed algorithm.
    #[error("Token signature is invalid")]
    InvalidSignature,

    #[error("Token is expired")]
    Expired,

    #[error("Invalid signing key configuration: {0}")]
    InvalidKey(String),
}
