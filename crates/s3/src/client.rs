//! S3 store implementation
//!
//! Wraps aws-sdk-s3 and implements the BlobStore trait from blob-core for
//! the single configured bucket.

use std::time::Duration;

use async_trait::async_trait;
use aws_sdk_s3::config::http::HttpResponse;
use aws_sdk_s3::error::{ProvideErrorMetadata, SdkError};
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::{ServerSideEncryption, StorageClass};
use aws_smithy_types::error::display::DisplayErrorContext;
use aws_smithy_types::retry::RetryConfig;
use aws_smithy_types::timeout::TimeoutConfig;

use blob_core::{BlobStore, BucketConfig, CredentialsSource, Error, ObjectKey, Result};

/// Error codes S3-compatible backends use for a missing object
const NOT_FOUND_CODES: &[&str] = &["NoSuchKey", "NotFound"];

/// Error codes for rejected credentials or permissions
const AUTH_CODES: &[&str] = &[
    "AccessDenied",
    "InvalidAccessKeyId",
    "SignatureDoesNotMatch",
    "ExpiredToken",
    "InvalidToken",
];

/// S3 store bound to one bucket
pub struct S3Store {
    inner: aws_sdk_s3::Client,
    config: BucketConfig,
}

impl S3Store {
    /// Create a new S3 store from a bucket configuration
    pub async fn new(config: &BucketConfig) -> Result<Self> {
        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(aws_config::Region::new(config.region.clone()));

        match config.credentials_source {
            CredentialsSource::Static => {
                let (access_key, secret_key) = match (
                    config.access_key_id.clone(),
                    config.secret_access_key.clone(),
                ) {
                    (Some(access_key), Some(secret_key)) => (access_key, secret_key),
                    _ => {
                        return Err(Error::Config(
                            "Static credentials require access_key_id and secret_access_key"
                                .into(),
                        ));
                    }
                };
                let credentials = aws_credential_types::Credentials::new(
                    access_key,
                    secret_key,
                    config.session_token.clone(),
                    None, // expiry
                    "blobcli-static-credentials",
                );
                loader = loader.credentials_provider(credentials);
            }
            CredentialsSource::EnvOrProfile => {}
            CredentialsSource::None => {
                loader = loader.no_credentials();
            }
        }

        if let Some(endpoint) = config.endpoint_url() {
            loader = loader.endpoint_url(endpoint);
        }

        let retry = config.retry_config();
        loader = loader.retry_config(
            RetryConfig::standard()
                .with_max_attempts(retry.max_attempts)
                .with_initial_backoff(Duration::from_millis(retry.initial_backoff_ms))
                .with_max_backoff(Duration::from_millis(retry.max_backoff_ms)),
        );

        let timeout = config.timeout_config();
        loader = loader.timeout_config(
            TimeoutConfig::builder()
                .connect_timeout(Duration::from_millis(timeout.connect_ms))
                .read_timeout(Duration::from_millis(timeout.read_ms))
                .build(),
        );

        let sdk_config = loader.load().await;

        let s3_config = aws_sdk_s3::config::Builder::from(&sdk_config)
            .force_path_style(config.force_path_style)
            .build();

        tracing::debug!(
            bucket = %config.bucket_name,
            endpoint = ?config.endpoint_url(),
            region = %config.region,
            "Created S3 store"
        );

        Ok(Self {
            inner: aws_sdk_s3::Client::from_conf(s3_config),
            config: config.clone(),
        })
    }

    pub fn bucket(&self) -> &str {
        &self.config.bucket_name
    }
}

#[async_trait]
impl BlobStore for S3Store {
    async fn put(
        &self,
        key: &ObjectKey,
        data: Vec<u8>,
        content_type: Option<String>,
    ) -> Result<()> {
        let mut request = self
            .inner
            .put_object()
            .bucket(self.bucket())
            .key(key.as_str())
            .body(ByteStream::from(data));

        if let Some(ct) = content_type {
            request = request.content_type(ct);
        }

        if let Some(sse) = &self.config.server_side_encryption {
            request = request.server_side_encryption(ServerSideEncryption::from(sse.as_str()));
        }

        if let Some(kms_key) = &self.config.sse_kms_key_id {
            request = request.ssekms_key_id(kms_key);
        }

        if let Some(sc) = &self.config.storage_class {
            request = request.storage_class(StorageClass::from(sc.as_str()));
        }

        request.send().await.map_err(map_sdk_error)?;
        Ok(())
    }

    async fn get(&self, key: &ObjectKey) -> Result<Vec<u8>> {
        let response = self
            .inner
            .get_object()
            .bucket(self.bucket())
            .key(key.as_str())
            .send()
            .await
            .map_err(map_sdk_error)?;

        let data = response
            .body
            .collect()
            .await
            .map_err(|e| Error::Backend {
                code: None,
                message: format!("Failed to read object body: {e}"),
            })?
            .into_bytes()
            .to_vec();

        Ok(data)
    }

    async fn head(&self, key: &ObjectKey) -> Result<bool> {
        match self
            .inner
            .head_object()
            .bucket(self.bucket())
            .key(key.as_str())
            .send()
            .await
        {
            Ok(_) => Ok(true),
            Err(e) => match map_sdk_error(e) {
                Error::NotFound { .. } => Ok(false),
                other => Err(other),
            },
        }
    }

    async fn delete(&self, key: &ObjectKey) -> Result<()> {
        self.inner
            .delete_object()
            .bucket(self.bucket())
            .key(key.as_str())
            .send()
            .await
            .map_err(map_sdk_error)?;

        Ok(())
    }
}

/// Translate an SDK failure, keeping the backend's native error code
fn map_sdk_error<E>(err: SdkError<E, HttpResponse>) -> Error
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
{
    let status = err.raw_response().map(|r| r.status().as_u16());
    let code = err.code().map(str::to_string);
    let message = err
        .message()
        .map(str::to_string)
        .unwrap_or_else(|| DisplayErrorContext(&err).to_string());

    classify_error(code.as_deref(), status, message)
}

fn classify_error(code: Option<&str>, status: Option<u16>, message: String) -> Error {
    match code {
        Some(code) if NOT_FOUND_CODES.contains(&code) => Error::NotFound {
            code: code.to_string(),
            message,
        },
        Some(code) if AUTH_CODES.contains(&code) => Error::Auth(format!("{code}: {message}")),
        Some(code) => Error::Backend {
            code: Some(code.to_string()),
            message,
        },
        // Responses without a body (HEAD) only carry the status
        None => match status {
            Some(404) => Error::NotFound {
                code: "NotFound".to_string(),
                message,
            },
            Some(403) => Error::Auth(format!("AccessDenied: {message}")),
            _ => Error::Backend {
                code: None,
                message,
            },
        },
    }
}
