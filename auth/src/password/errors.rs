use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PasswordError {
    /// The hasher could not produce a digest.
    #[error("Password hashing failed: {0}")]
    HashingFailed(String),

    /// The stored digest is not a valid PHC string.
    #[error("Password verification failed: {0}")]
    VerificationFailed(String),
}
