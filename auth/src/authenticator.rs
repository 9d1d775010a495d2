use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;

use crate::jwt::Claims;
use crate::jwt::JwtError;
use crate::jwt::JwtHandler;
use crate::jwt::KeyRing;
use crate::password::PasswordError;
use crate::password::PasswordHasher;

/// Password checks and session tokens behind one handle.
///
/// Cheap to share: wrap in an `Arc` and hand it to every component that
/// issues or verifies tokens.
#[derive(Debug, Clone)]
pub struct Authenticator {
    hasher: PasswordHasher,
    tokens: JwtHandler,
    token_validity: Duration,
}

#[derive(Debug, thiserror::Error)]
pub enum AuthenticationError {
    /// The password does not match the stored digest.
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Password error: {0}")]
    Password(#[from] PasswordError),

    #[error("Token error: {0}")]
    Token(#[from] JwtError),
}

impl Authenticator {
    /// Tokens issued by this authenticator expire `token_validity` after
    /// issuance.
    pub fn new(keys: KeyRing, token_validity: Duration) -> Self {
        Self {
            hasher: PasswordHasher::new(),
            tokens: JwtHandler::new(keys),
            token_validity,
        }
    }

    pub fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        self.hasher.hash(password)
    }

    /// Spend one password verification on a fixed digest.
    ///
    /// Called when no account matches the login email.
    pub fn verify_dummy_password(&self, password: &str) -> Result<(), PasswordError> {
        self.hasher.verify_dummy(password)
    }

    /// Check `password` against `stored_hash` and, on a match, issue a token
    /// carrying `user_id` and `mail`.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Password does not match
    /// * `Password` - `stored_hash` is not a PHC string
    /// * `Token` - Signing failed
    pub fn authenticate(
        &self,
        password: &str,
        stored_hash: &str,
        user_id: impl ToString,
        mail: impl ToString,
    ) -> Result<String, AuthenticationError> {
        if !self.hasher.verify(password, stored_hash)? {
            return Err(AuthenticationError::InvalidCredentials);
        }

        Ok(self.issue_token(user_id, mail)?)
    }

    /// Issue a token for a caller whose identity is already established.
    pub fn issue_token(&self, user_id: impl ToString, mail: impl ToString) -> Result<String, JwtError> {
        self.issue_token_at(user_id, mail, Utc::now())
    }

    /// Issue a token as if the current time were `now`.
    pub fn issue_token_at(
        &self,
        user_id: impl ToString,
        mail: impl ToString,
        now: DateTime<Utc>,
    ) -> Result<String, JwtError> {
        let claims = Claims::issued_at(user_id, mail, now, self.token_validity);
        self.tokens.encode(&claims)
    }

    /// Verify a token's signature and expiry and return its claims.
    ///
    /// See [`JwtHandler::decode`] for the error cases.
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        self.tokens.decode(token)
    }
}
