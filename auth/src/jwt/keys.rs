use std::collections::HashMap;
use std::fmt;

use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;

use super::errors::JwtError;

/// Minimum secret length for HS256 keys, in bytes.
pub const MIN_SECRET_LEN: usize = 32;

/// Set of HMAC keys addressed by key id (`kid`).
///
/// Exactly one key is active and used for signing. Every key in the ring is
/// accepted for verification, so a previous key can stay listed after a
/// rotation until the tokens it signed have expired.
#[derive(Clone)]
pub struct KeyRing {
    active_kid: String,
    encoding_key: EncodingKey,
    decoding_keys: HashMap<String, DecodingKey>,
}

impl KeyRing {
    /// Build a key ring from a map of `kid -> secret`.
    ///
    /// # Arguments
    /// * `active_kid` - Id of the key used to sign new tokens
    /// * `secrets` - All keys accepted for verification, including the active one
    ///
    /// # Errors
    /// * `InvalidKey` - The active key is missing, a key id is empty, or a secret
    ///   is shorter than [`MIN_SECRET_LEN`] bytes
    pub fn new<K, S>(
        active_kid: impl Into<String>,
        secrets: impl IntoIterator<Item = (K, S)>,
    ) -> Result<Self, JwtError>
    where
        K: Into<String>,
        S: AsRef<[u8]>,
    {
        let active_kid = active_kid.into();
        let mut encoding_key = None;
        let mut decoding_keys = HashMap::new();

        for (kid, secret) in secrets {
            let kid = kid.into();
            let secret = secret.as_ref();

            if kid.trim().is_empty() {
                return Err(JwtError::InvalidKey("key id cannot be empty".to_string()));
            }
            if secret.len() < MIN_SECRET_LEN {
                return Err(JwtError::InvalidKey(format!(
                    "secret for key '{}' must be at least {} bytes",
                    kid, MIN_SECRET_LEN
                )));
            }

            if kid == active_kid {
                encoding_key = Some(EncodingKey::from_secret(secret));
            }
            decoding_keys.insert(kid, DecodingKey::from_secret(secret));
        }

        let encoding_key = encoding_key.ok_or_else(|| {
            JwtError::InvalidKey(format!("active key '{}' is not in the key ring", active_kid))
        })?;

        Ok(Self {
            active_kid,
            encoding_key,
            decoding_keys,
        })
    }

    /// Build a key ring holding a single active key.
    pub fn single(kid: impl Into<String>, secret: impl AsRef<[u8]>) -> Result<Self, JwtError> {
        let kid = kid.into();
        Self::new(kid.clone(), [(kid, secret)])
    }

    pub fn active_kid(&self) -> &str {
        &self.active_kid
    }

    pub(crate) fn encoding_key(&self) -> &EncodingKey {
        &self.encoding_key
    }

    pub(crate) fn decoding_key(&self, kid: &str) -> Option<&DecodingKey> {
        self.decoding_keys.get(kid)
    }

    /// Ids of every key accepted for verification, sorted.
    pub fn kids(&self) -> Vec<&str> {
        let mut kids: Vec<&str> = self.decoding_keys.keys().map(String::as_str).collect();
        kids.sort_unstable();
        kids
    }
}

// Secrets stay out of logs.
impl fmt::Debug for KeyRing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyRing")
            .field("active_kid", &self.active_kid)
            .field("kids", &self.kids())
            .finish()
    }
}
