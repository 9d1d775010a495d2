use std::time::Duration;

use async_trait::async_trait;
use aws_sdk_s3::config::Credentials;
use aws_sdk_s3::config::Region;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;

use crate::config::StorageConfig;
use crate::domain::video::models::ObjectKey;
use crate::domain::video::ports::ObjectStorage;
use crate::video::errors::StorageError;

/// Object storage backed by S3 or an S3-compatible server.
///
/// With a custom endpoint (MinIO) requests use path-style addressing and
/// object URLs take the form `{endpoint}/{bucket}/{key}`.
pub struct S3ObjectStorage {
    client: Client,
    bucket: String,
    base_url: String,
}

impl S3ObjectStorage {
    /// Build a client from storage settings.
    ///
    /// Static credentials from the config take precedence over the
    /// default AWS provider chain.
    pub async fn new(config: &StorageConfig) -> Self {
        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(Region::new(config.region.clone()));

        if let Some(ref endpoint) = config.endpoint {
            loader = loader.endpoint_url(endpoint);
        }

        let sdk_config = loader.load().await;
        let mut s3_config = aws_sdk_s3::config::Builder::from(&sdk_config)
            .force_path_style(config.endpoint.is_some());

        if let (Some(access_key_id), Some(secret_access_key)) =
            (&config.access_key_id, &config.secret_access_key)
        {
            s3_config = s3_config.credentials_provider(Credentials::new(
                access_key_id,
                secret_access_key,
                None,
                None,
                "videohub-config",
            ));
        }

        let client = Client::from_conf(s3_config.build());

        Self::with_client(client, config)
    }

    pub fn with_client(client: Client, config: &StorageConfig) -> Self {
        Self {
            client,
            bucket: config.bucket.clone(),
            base_url: base_url(config),
        }
    }

    fn object_url(&self, key: &ObjectKey) -> String {
        format!("{}/{}", self.base_url, key)
    }
}

fn base_url(config: &StorageConfig) -> String {
    match &config.endpoint {
        Some(endpoint) => format!("{}/{}", endpoint.trim_end_matches('/'), config.bucket),
        None => format!(
            "https://{}.s3.{}.amazonaws.com",
            config.bucket, config.region
        ),
    }
}

#[async_trait]
impl ObjectStorage for S3ObjectStorage {
    async fn put_object(
        &self,
        key: &ObjectKey,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, StorageError> {
        let size = bytes.len();

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key.as_str())
            .content_type(content_type)
            .body(ByteStream::from(bytes))
            .send()
            .await
            .map_err(|e| StorageError::PutFailed {
                key: key.to_string(),
                reason: DisplayErrorContext(&e).to_string(),
            })?;

        tracing::debug!(bucket = %self.bucket, key = %key, size, "Object stored");

        Ok(self.object_url(key))
    }

    async fn presign_get(
        &self,
        key: &ObjectKey,
        expires_in: Duration,
    ) -> Result<String, StorageError> {
        let presigning = PresigningConfig::expires_in(expires_in).map_err(|e| {
            StorageError::PresignFailed {
                key: key.to_string(),
                reason: e.to_string(),
            }
        })?;

        let request = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key.as_str())
            .presigned(presigning)
            .await
            .map_err(|e| StorageError::PresignFailed {
                key: key.to_string(),
                reason: DisplayErrorContext(&e).to_string(),
            })?;

        Ok(request.uri().to_string())
    }

    async fn delete_object(&self, key: &ObjectKey) -> Result<(), StorageError> {
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key.as_str())
            .send()
            .await
            .map_err(|e| StorageError::DeleteFailed {
                key: key.to_string(),
                reason: DisplayErrorContext(&e).to_string(),
            })?;

        Ok(())
    }
}
