//! BlobStore trait definition
//!
//! The storage backend capability that `BlobClient` drives. It decouples the
//! operation contract from the S3 SDK so the contract can be tested against
//! mocks and in-memory stores.

use async_trait::async_trait;

use crate::error::Result;
use crate::key::ObjectKey;

/// Trait for a single-bucket object store
///
/// Implementations report failures with the backend's native error code
/// preserved: a missing object is `Error::NotFound` carrying the code the
/// backend used (`NoSuchKey`, `NotFound`, ...).
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Write `data` under `key`, replacing any existing object
    async fn put(
        &self,
        key: &ObjectKey,
        data: Vec<u8>,
        content_type: Option<String>,
    ) -> Result<()>;

    /// Read the full content of `key`
    async fn get(&self, key: &ObjectKey) -> Result<Vec<u8>>;

    /// Check whether `key` exists without fetching its content
    async fn head(&self, key: &ObjectKey) -> Result<bool>;

    /// Remove `key`
    async fn delete(&self, key: &ObjectKey) -> Result<()>;
}
