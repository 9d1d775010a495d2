use jsonwebtoken::decode;
use jsonwebtoken::decode_header;
use jsonwebtoken::encode;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::Algorithm;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::errors::JwtError;
use super::keys::KeyRing;

/// JWT token handler for encoding and decoding tokens.
///
/// Signs with the key ring's active key and stamps its id into the `kid`
/// header. Decoding selects the verification key by `kid`. Only HS256
/// (HMAC with SHA-256) is accepted.
#[derive(Debug, Clone)]
pub struct JwtHandler {
    keys: KeyRing,
    algorithm: Algorithm,
}

impl JwtHandler {
    /// Create a new JWT handler over a key ring.
    ///
    /// # Arguments
    /// * `keys` - Signing and verification keys
    ///
    /// # Returns
    /// JwtHandler instance configured with HS256 algorithm
    pub fn new(keys: KeyRing) -> Self {
        Self {
            keys,
            algorithm: Algorithm::HS256,
        }
    }

    /// Encode claims into a JWT token.
    ///
    /// # Arguments
    /// * `claims` - Claims to encode (must implement Serialize)
    ///
    /// # Returns
    /// JWT token string
    ///
    /// # Errors
    /// * `EncodingFailed` - Token encoding failed
    pub fn encode<T: Serialize>(&self, claims: &T) -> Result<String, JwtError> {
        let mut header = Header::new(self.algorithm);
        header.kid = Some(self.keys.active_kid().to_string());

        encode(&header, claims, self.keys.encoding_key())
            .map_err(|e| JwtError::EncodingFailed(e.to_string()))
    }

    /// Decode and validate a JWT token.
    ///
    /// `exp` is required and checked without leeway.
    ///
    /// # Arguments
    /// * `token` - JWT token string to decode
    ///
    /// # Returns
    /// Decoded claims
    ///
    /// # Errors
    /// * `Malformed` - Token or its claims cannot be parsed, or `kid` is missing
    /// * `InvalidSignature` - Unknown `kid`, wrong algorithm, or signature mismatch
    /// * `Expired` - Token has expired
    pub fn decode<T: DeserializeOwned>(&self, token: &str) -> Result<T, JwtError> {
        let header = decode_header(token).map_err(|e| JwtError::Malformed(e.to_string()))?;

        if header.alg != self.algorithm {
            return Err(JwtError::InvalidSignature);
        }

        let kid = header
            .kid
            .ok_or_else(|| JwtError::Malformed("missing key id".to_string()))?;
        let key = self
            .keys
            .decoding_key(&kid)
            .ok_or(JwtError::InvalidSignature)?;

        let mut validation = Validation::new(self.algorithm);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        let token_data = decode::<T>(token, key, &validation).map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => JwtError::Expired,
            ErrorKind::InvalidSignature
            | ErrorKind::InvalidAlgorithm
            | ErrorKind::InvalidAlgorithmName
            | ErrorKind::InvalidKeyFormat => JwtError::InvalidSignature,
            _ => JwtError::Malformed(e.to_string()),
        })?;

        Ok(token_data.claims)
    }
}
