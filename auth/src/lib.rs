//! Credentials and session tokens for VideoHub.
//!
//! - [`PasswordHasher`]: Argon2id digests in PHC format
//! - [`KeyRing`] and [`JwtHandler`]: HS256 tokens addressed by `kid`
//! - [`Authenticator`]: both of the above behind one shared handle
//!
//! ```
//! use auth::{Authenticator, KeyRing};
//! use chrono::Duration;
//!
//! let keys = KeyRing::single("primary", "secret_key_at_least_32_bytes_long!").unwrap();
//! let auth = Authenticator::new(keys, Duration::hours(24));
//!
//! let hash = auth.hash_password("password123").unwrap();
//! let token = auth
//!     .authenticate("password123", &hash, "user123", "alice@example.com")
//!     .unwrap();
//!
//! let claims = auth.validate_token(&token).unwrap();
//! assert_eq!(claims.user_id, "user123");
//! ```

pub mod authenticator;
pub mod jwt;
pub mod password;

pub use authenticator::AuthenticationError;
pub use authenticator::Authenticator;
pub use jwt::Claims;
pub use jwt::JwtError;
pub use jwt::JwtHandler;
pub use jwt::KeyRing;
pub use password::PasswordError;
pub use password::PasswordHasher;
