use std::collections::HashMap;
use std::env;
use std::time::Duration;

use auth::KeyRing;
use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

/// Service configuration loaded from layered sources.
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub jwt: JwtConfig,
    pub storage: StorageConfig,
}

/// PostgreSQL connection settings.
#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

/// HTTP listener settings.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub http_port: u16,
    /// Upper bound on the upload request body, in bytes
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

/// Token signing settings.
///
/// `keys` maps key id to secret. `active_key` selects the key used to sign
/// new tokens; every listed key is accepted for verification.
#[derive(Clone, Deserialize)]
pub struct JwtConfig {
    pub active_key: String,
    #[serde(default)]
    pub keys: HashMap<String, String>,
    pub expiration_hours: i64,
}

/// Object storage settings.
///
/// `endpoint` points at an S3-compatible server such as MinIO; when it is
/// unset the regional AWS endpoint is used.
#[derive(Clone, Deserialize)]
pub struct StorageConfig {
    pub bucket: String,
    pub region: String,
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default)]
    pub access_key_id: Option<String>,
    #[serde(default)]
    pub secret_access_key: Option<String>,
    #[serde(default = "default_presign_expiry_secs")]
    pub presign_expiry_secs: u64,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_max_connections() -> u32 {
    5
}

fn default_max_upload_bytes() -> usize {
    500 * 1024 * 1024
}

fn default_presign_expiry_secs() -> u64 {
    15 * 60
}

fn default_request_timeout_secs() -> u64 {
    30
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (VIDEOHUB_DATABASE__URL, VIDEOHUB_JWT__KEYS__PRIMARY, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let configuration = ConfigBuilder::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Example: VIDEOHUB_STORAGE__BUCKET=media overrides storage.bucket
            .add_source(
                Environment::with_prefix("VIDEOHUB")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        configuration.try_deserialize()
    }
}

impl JwtConfig {
    /// Build the signing key ring.
    ///
    /// Key ids are lowercased: environment sources deliver map keys in lower
    /// case, so `VIDEOHUB_JWT__KEYS__PRIMARY2024` is the kid `primary2024`
    /// whatever the case of `active_key`.
    ///
    /// # Errors
    /// * `JwtError::InvalidKey` - Active key missing or a secret too short
    pub fn key_ring(&self) -> Result<KeyRing, auth::JwtError> {
        KeyRing::new(
            self.active_key.to_lowercase(),
            self.keys
                .iter()
                .map(|(kid, secret)| (kid.to_lowercase(), secret.as_bytes())),
        )
    }

    pub fn token_validity(&self) -> chrono::Duration {
        chrono::Duration::hours(self.expiration_hours)
    }
}

impl StorageConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn presign_expiry(&self) -> Duration {
        Duration::from_secs(self.presign_expiry_secs)
    }
}

// Key material and credentials are never printed.
impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut kids: Vec<&String> = self.keys.keys().collect();
        kids.sort();
        f.debug_struct("JwtConfig")
            .field("active_key", &self.active_key)
            .field("keys", &kids)
            .field("expiration_hours", &self.expiration_hours)
            .finish()
    }
}

impl std::fmt::Debug for StorageConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageConfig")
            .field("bucket", &self.bucket)
            .field("region", &self.region)
            .field("endpoint", &self.endpoint)
            .field("static_credentials", &self.access_key_id.is_some())
            .field("presign_expiry_secs", &self.presign_expiry_secs)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jwt_config(keys: &[(&str, &str)], active: &str) -> JwtConfig {
        JwtConfig {
            active_key: active.to_string(),
            keys: keys
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            expiration_hours: 24,
        }
    }

    #[test]
    fn test_key_ring_from_config() {
        let config = jwt_config(
            &[
                ("old", "old-secret-key-at-least-32-bytes-long"),
                ("new", "new-secret-key-at-least-32-bytes-long"),
            ],
            "new",
        );

        let ring = config.key_ring().expect("valid key ring");
        assert_eq!(ring.active_kid(), "new");
        assert_eq!(ring.kids(), vec!["new", "old"]);
        assert_eq!(config.token_validity(), chrono::Duration::hours(24));
    }

    #[test]
    fn test_key_ring_matches_active_key_case_insensitively() {
        let config = jwt_config(
            &[("primary2024", "env-secret-key-at-least-32-bytes-long")],
            "Primary2024",
        );

        let ring = config.key_ring().expect("valid key ring");
        assert_eq!(ring.active_kid(), "primary2024");
        assert_eq!(ring.kids(), vec!["primary2024"]);
    }

    #[test]
    fn test_key_ring_without_active_secret_fails() {
        let config = jwt_config(&[], "primary");
        assert!(config.key_ring().is_err());
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let config = jwt_config(&[("primary", "super-secret-key-at-least-32-bytes")], "primary");
        let debug = format!("{:?}", config);

        assert!(debug.contains("primary"));
        assert!(!debug.contains("super-secret"));
    }
}
