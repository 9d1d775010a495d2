use std::sync::OnceLock;

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::PasswordHash;
use argon2::password_hash::PasswordHasher as _;
use argon2::password_hash::PasswordVerifier;
use argon2::password_hash::SaltString;
use argon2::Argon2;

use super::errors::PasswordError;

/// Plaintext behind the digest used by [`PasswordHasher::verify_dummy`].
const DUMMY_PASSWORD: &str = "videohub-dummy-password";

static DUMMY_HASH: OnceLock<Result<String, PasswordError>> = OnceLock::new();

/// Argon2id with default parameters and a fresh random salt per digest.
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher;

impl PasswordHasher {
    pub fn new() -> Self {
        Self
    }

    /// Digest `password` into a PHC string (algorithm, parameters, salt and
    /// hash in one value).
    pub fn hash(&self, password: &str) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);

        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|digest| digest.to_string())
            .map_err(|e| PasswordError::HashingFailed(e.to_string()))
    }

    /// `Ok(false)` on a mismatch. An error means `digest` itself is unusable.
    pub fn verify(&self, password: &str, digest: &str) -> Result<bool, PasswordError> {
        let parsed = PasswordHash::new(digest).map_err(|e| {
            PasswordError::VerificationFailed(format!("Invalid password hash: {}", e))
        })?;

        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    }

    /// Run a full verification against a fixed digest and discard the result.
    ///
    /// Lets a caller spend the same work on an unknown account as on a wrong
    /// password, so the two cases cannot be told apart by response time.
    ///
    /// # Errors
    /// * `HashingFailed` - The fixed digest could not be produced
    pub fn verify_dummy(&self, password: &str) -> Result<(), PasswordError> {
        let hash = DUMMY_HASH
            .get_or_init(|| self.hash(DUMMY_PASSWORD))
            .as_deref()
            .map_err(Clone::clone)?;

        self.verify(password, hash)?;
        Ok(())
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}
