//! Blob lifecycle operations
//!
//! `BlobClient` runs one of `put`, `get`, `exists` or `delete` against a
//! [`BlobStore`] and turns the outcome into exactly one [`OperationResult`].
//!
//! Absence is reported differently per operation:
//! - `exists` normalizes it to [`ExitCode::NotFound`] with a fixed message.
//! - `get` passes the backend error through as a general failure, so the
//!   message carries the native marker (e.g. `NoSuchKey`).
//! - `delete` treats it as success.

use std::path::Path;

use crate::config::BucketConfig;
use crate::error::Error;
use crate::exit_code::ExitCode;
use crate::key::ObjectKey;
use crate::traits::BlobStore;

/// The four blob operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Put,
    Get,
    Exists,
    Delete,
}

impl Operation {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Put => "put",
            Self::Get => "get",
            Self::Exists => "exists",
            Self::Delete => "delete",
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of one invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationResult {
    pub operation: Operation,
    pub bucket: String,
    pub key: String,
    pub exit_code: ExitCode,
    pub message: String,
    /// Bytes moved by `put` or `get`
    pub payload_bytes: Option<u64>,
}

impl OperationResult {
    pub fn is_success(&self) -> bool {
        self.exit_code.is_success()
    }
}

/// Executes blob operations against one configured bucket
pub struct BlobClient<'a, S: BlobStore + ?Sized> {
    store: &'a S,
    config: &'a BucketConfig,
}

impl<'a, S: BlobStore + ?Sized> BlobClient<'a, S> {
    pub fn new(store: &'a S, config: &'a BucketConfig) -> Self {
        Self { store, config }
    }

    pub fn bucket(&self) -> &str {
        &self.config.bucket_name
    }

    /// Upload the full content of `local` under `key`
    pub async fn put(&self, local: &Path, key: &ObjectKey) -> OperationResult {
        let data = match tokio::fs::read(local).await {
            Ok(data) => data,
            Err(e) => {
                let message = format!("Failed to read '{}': {e}", local.display());
                return self.failure(Operation::Put, key, Error::Io(e), message);
            }
        };

        let size = data.len() as u64;
        let content_type = mime_guess::from_path(local)
            .first()
            .map(|m| m.essence_str().to_string());

        tracing::debug!(key = %key, bucket = self.bucket(), size, "Uploading object");

        match self.store.put(key, data, content_type).await {
            Ok(()) => OperationResult {
                payload_bytes: Some(size),
                ..self.success(
                    Operation::Put,
                    key,
                    format!(
                        "Uploaded '{}' to '{key}' in bucket '{}' ({})",
                        local.display(),
                        self.bucket(),
                        humansize::format_size(size, humansize::BINARY)
                    ),
                )
            },
            Err(e) => {
                let message = format!(
                    "Failed to upload '{}' to '{key}' in bucket '{}': {e}",
                    local.display(),
                    self.bucket()
                );
                self.failure(Operation::Put, key, e, message)
            }
        }
    }

    /// Check whether `key` is present in the bucket
    pub async fn exists(&self, key: &ObjectKey) -> OperationResult {
        match self.store.head(key).await {
            Ok(true) => self.success(
                Operation::Exists,
                key,
                format!("File '{key}' exists in bucket '{}'", self.bucket()),
            ),
            Ok(false) => OperationResult {
                exit_code: ExitCode::NotFound,
                ..self.success(
                    Operation::Exists,
                    key,
                    format!("File '{key}' does not exist in bucket '{}'", self.bucket()),
                )
            },
            Err(e) => {
                let message = format!(
                    "Failed to check '{key}' in bucket '{}': {e}",
                    self.bucket()
                );
                self.failure(Operation::Exists, key, e, message)
            }
        }
    }

    /// Download `key` into `local`, creating or overwriting it
    ///
    /// `local` is only written once the whole object has been fetched.
    pub async fn get(&self, key: &ObjectKey, local: &Path) -> OperationResult {
        let data = match self.store.get(key).await {
            Ok(data) => data,
            Err(e) => {
                let message = format!(
                    "Failed to download '{key}' from bucket '{}': {e}",
                    self.bucket()
                );
                return self.failure(Operation::Get, key, e, message);
            }
        };

        let size = data.len() as u64;
        if let Err(e) = tokio::fs::write(local, &data).await {
            let message = format!("Failed to write '{}': {e}", local.display());
            return self.failure(Operation::Get, key, Error::Io(e), message);
        }

        OperationResult {
            payload_bytes: Some(size),
            ..self.success(
                Operation::Get,
                key,
                format!(
                    "Downloaded '{key}' from bucket '{}' to '{}' ({})",
                    self.bucket(),
                    local.display(),
                    humansize::format_size(size, humansize::BINARY)
                ),
            )
        }
    }

    /// Ensure `key` is absent from the bucket
    pub async fn delete(&self, key: &ObjectKey) -> OperationResult {
        match self.store.delete(key).await {
            Ok(()) => self.success(
                Operation::Delete,
                key,
                format!("Deleted '{key}' from bucket '{}'", self.bucket()),
            ),
            Err(e) if e.is_not_found() => {
                tracing::debug!(key = %key, error = %e, "Object already absent");
                self.success(
                    Operation::Delete,
                    key,
                    format!("File '{key}' is absent from bucket '{}'", self.bucket()),
                )
            }
            Err(e) => {
                let message = format!(
                    "Failed to delete '{key}' from bucket '{}': {e}",
                    self.bucket()
                );
                self.failure(Operation::Delete, key, e, message)
            }
        }
    }

    fn success(&self, operation: Operation, key: &ObjectKey, message: String) -> OperationResult {
        OperationResult {
            operation,
            bucket: self.config.bucket_name.clone(),
            key: key.to_string(),
            exit_code: ExitCode::Success,
            message,
            payload_bytes: None,
        }
    }

    fn failure(
        &self,
        operation: Operation,
        key: &ObjectKey,
        error: Error,
        message: String,
    ) -> OperationResult {
        tracing::debug!(operation = %operation, key = %key, error = %error, "Operation failed");
        OperationResult {
            operation,
            bucket: self.config.bucket_name.clone(),
            key: key.to_string(),
            exit_code: error.exit_code(),
            message,
            payload_bytes: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;
    use crate::traits::MockBlobStore;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use tempfile::TempDir;

    /// Store that behaves like an S3 bucket that reports missing keys on delete
    #[derive(Default)]
    struct MemoryStore {
        objects: Mutex<HashMap<String, Vec<u8>>>,
    }

    fn no_such_key() -> Error {
        Error::NotFound {
            code: "NoSuchKey".into(),
            message: "The specified key does not exist.".into(),
        }
    }

    #[async_trait]
    impl BlobStore for MemoryStore {
        async fn put(&self, key: &ObjectKey, data: Vec<u8>, _: Option<String>) -> Result<()> {
            self.objects
                .lock()
                .unwrap()
                .insert(key.to_string(), data);
            Ok(())
        }

        async fn get(&self, key: &ObjectKey) -> Result<Vec<u8>> {
            self.objects
                .lock()
                .unwrap()
                .get(key.as_str())
                .cloned()
                .ok_or_else(no_such_key)
        }

        async fn head(&self, key: &ObjectKey) -> Result<bool> {
            Ok(self.objects.lock().unwrap().contains_key(key.as_str()))
        }

        async fn delete(&self, key: &ObjectKey) -> Result<()> {
            self.objects
                .lock()
                .unwrap()
                .remove(key.as_str())
                .map(|_| ())
                .ok_or_else(no_such_key)
        }
    }

    fn config() -> BucketConfig {
        BucketConfig::new("test-bucket", "access", "secret")
    }

    fn key(k: &str) -> ObjectKey {
        ObjectKey::new(k).unwrap()
    }

    #[tokio::test]
    async fn test_lifecycle() {
        let temp_dir = TempDir::new().unwrap();
        let local = temp_dir.path().join("local.txt");
        std::fs::write(&local, "hello").unwrap();

        let store = MemoryStore::default();
        let config = config();
        let client = BlobClient::new(&store, &config);
        let key = key("local.txt");

        let result = client.put(&local, &key).await;
        assert_eq!(result.exit_code, ExitCode::Success);
        assert_eq!(result.payload_bytes, Some(5));

        let result = client.exists(&key).await;
        assert_eq!(result.exit_code, ExitCode::Success);
        insta::assert_snapshot!(result.message, @"File 'local.txt' exists in bucket 'test-bucket'");

        let out = temp_dir.path().join("out.txt");
        let result = client.get(&key, &out).await;
        assert_eq!(result.exit_code, ExitCode::Success);
        assert_eq!(std::fs::read_to_string(&out).unwrap(), "hello");

        let result = client.delete(&key).await;
        assert_eq!(result.exit_code, ExitCode::Success);

        let result = client.exists(&key).await;
        assert_eq!(result.exit_code, ExitCode::NotFound);
        assert_eq!(result.exit_code.as_i32(), 3);
        insta::assert_snapshot!(result.message, @"File 'local.txt' does not exist in bucket 'test-bucket'");
    }

    #[tokio::test]
    async fn test_round_trip_binary_content() {
        let temp_dir = TempDir::new().unwrap();
        let local = temp_dir.path().join("blob.bin");
        let content: Vec<u8> = (0..=255u8).cycle().take(4096).collect();
        std::fs::write(&local, &content).unwrap();

        let store = MemoryStore::default();
        let config = config();
        let client = BlobClient::new(&store, &config);
        let key = key("nested/blob.bin");

        assert!(client.put(&local, &key).await.is_success());

        let out = temp_dir.path().join("copy.bin");
        let result = client.get(&key, &out).await;
        assert!(result.is_success());
        assert_eq!(result.payload_bytes, Some(4096));
        assert_eq!(std::fs::read(&out).unwrap(), content);
    }

    #[tokio::test]
    async fn test_put_overwrites() {
        let temp_dir = TempDir::new().unwrap();
        let local = temp_dir.path().join("a.txt");

        let store = MemoryStore::default();
        let config = config();
        let client = BlobClient::new(&store, &config);
        let key = key("a.txt");

        std::fs::write(&local, "first").unwrap();
        assert!(client.put(&local, &key).await.is_success());
        std::fs::write(&local, "second").unwrap();
        assert!(client.put(&local, &key).await.is_success());

        let out = temp_dir.path().join("out.txt");
        assert!(client.get(&key, &out).await.is_success());
        assert_eq!(std::fs::read_to_string(&out).unwrap(), "second");
    }

    #[tokio::test]
    async fn test_get_missing_key_passes_backend_error_through() {
        let temp_dir = TempDir::new().unwrap();
        let out = temp_dir.path().join("out.txt");

        let store = MemoryStore::default();
        let config = config();
        let client = BlobClient::new(&store, &config);

        let result = client.get(&key("missing-key"), &out).await;
        assert_eq!(result.exit_code, ExitCode::GeneralError);
        assert_ne!(result.exit_code, ExitCode::NotFound);
        assert!(result.message.contains("NoSuchKey"));
        assert!(!out.exists(), "no local file on failed download");
    }

    #[tokio::test]
    async fn test_delete_missing_key_is_idempotent() {
        let store = MemoryStore::default();
        let config = config();
        let client = BlobClient::new(&store, &config);
        let key = key("missing-key");

        assert_eq!(client.delete(&key).await.exit_code, ExitCode::Success);
        assert_eq!(client.delete(&key).await.exit_code, ExitCode::Success);
    }

    #[tokio::test]
    async fn test_put_unreadable_local_file() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = MockBlobStore::new();
        store.expect_put().never();

        let config = config();
        let client = BlobClient::new(&store, &config);

        let result = client
            .put(&temp_dir.path().join("absent.txt"), &key("absent.txt"))
            .await;
        assert_eq!(result.exit_code, ExitCode::GeneralError);
        assert!(result.message.contains("Failed to read"));
    }

    #[tokio::test]
    async fn test_put_passes_content_type_and_bytes() {
        let temp_dir = TempDir::new().unwrap();
        let local = temp_dir.path().join("page.html");
        std::fs::write(&local, "<p>hi</p>").unwrap();

        let mut store = MockBlobStore::new();
        store
            .expect_put()
            .withf(|key, data, content_type| {
                key.as_str() == "site/page.html"
                    && data.as_slice() == b"<p>hi</p>"
                    && content_type.as_deref() == Some("text/html")
            })
            .times(1)
            .returning(|_, _, _| Ok(()));

        let config = config();
        let client = BlobClient::new(&store, &config);
        assert!(client.put(&local, &key("site/page.html")).await.is_success());
    }

    #[tokio::test]
    async fn test_put_backend_rejection() {
        let temp_dir = TempDir::new().unwrap();
        let local = temp_dir.path().join("a.txt");
        std::fs::write(&local, "data").unwrap();

        let mut store = MockBlobStore::new();
        store.expect_put().returning(|_, _, _| {
            Err(Error::Backend {
                code: Some("NoSuchBucket".into()),
                message: "The specified bucket does not exist".into(),
            })
        });

        let config = config();
        let client = BlobClient::new(&store, &config);
        let result = client.put(&local, &key("a.txt")).await;
        assert_eq!(result.exit_code, ExitCode::GeneralError);
        assert!(result.message.contains("NoSuchBucket"));
        assert!(result.payload_bytes.is_none());
    }

    #[tokio::test]
    async fn test_exists_auth_failure() {
        let mut store = MockBlobStore::new();
        store
            .expect_head()
            .returning(|_| Err(Error::Auth("AccessDenied: Access Denied".into())));

        let config = config();
        let client = BlobClient::new(&store, &config);
        let result = client.exists(&key("a.txt")).await;
        assert_eq!(result.exit_code, ExitCode::AuthError);
        assert!(result.message.contains("AccessDenied"));
    }

    #[tokio::test]
    async fn test_delete_surfaces_other_errors() {
        let mut store = MockBlobStore::new();
        store.expect_delete().returning(|_| {
            Err(Error::Backend {
                code: None,
                message: "dispatch failure".into(),
            })
        });

        let config = config();
        let client = BlobClient::new(&store, &config);
        let result = client.delete(&key("a.txt")).await;
        assert_eq!(result.exit_code, ExitCode::GeneralError);
        assert!(result.message.contains("dispatch failure"));
    }

    #[tokio::test]
    async fn test_get_unwritable_local_path() {
        let temp_dir = TempDir::new().unwrap();

        let mut store = MockBlobStore::new();
        store.expect_get().returning(|_| Ok(b"content".to_vec()));

        let config = config();
        let client = BlobClient::new(&store, &config);
        // The target is an existing directory, so the write fails
        let result = client.get(&key("a.txt"), temp_dir.path()).await;
        assert_eq!(result.exit_code, ExitCode::GeneralError);
        assert!(result.message.contains("Failed to write"));
    }
}
