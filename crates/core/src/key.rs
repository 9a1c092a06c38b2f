//! Object keys and upload destinations
//!
//! Keys are plain strings inside the configured bucket. The `put` command
//! also accepts `s3://bucket/[key]` destinations for the same bucket.

use std::path::Path;

use crate::error::{Error, Result};

/// URI prefix accepted for upload destinations
const S3_PREFIX: &str = "s3://";

/// A non-empty key naming an object inside the bucket
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectKey(String);

impl ObjectKey {
    /// Create a key, rejecting the empty string
    pub fn new(key: impl Into<String>) -> Result<Self> {
        let key = key.into();
        if key.is_empty() {
            return Err(Error::InvalidKey("Object key cannot be empty".into()));
        }
        Ok(Self(key))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ObjectKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::str::FromStr for ObjectKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

/// Resolve the destination argument of `put` into an object key
///
/// Accepted forms:
/// - a plain key: `reports/a.txt`
/// - `s3://<bucket>/<key>` where `<bucket>` is the configured bucket
/// - `s3://<bucket>/` or `s3://<bucket>/prefix/`, in which case the local
///   file name is appended to the prefix
pub fn resolve_destination(destination: &str, bucket: &str, local: &Path) -> Result<ObjectKey> {
    if destination.is_empty() {
        return Err(Error::InvalidDestination("Destination cannot be empty".into()));
    }

    let Some(rest) = destination.strip_prefix(S3_PREFIX) else {
        return ObjectKey::new(destination);
    };

    let (uri_bucket, prefix) = rest.split_once('/').unwrap_or((rest, ""));

    if uri_bucket.is_empty() {
        return Err(Error::InvalidDestination(format!(
            "'{destination}' does not name a bucket. Expected: s3://{bucket}/[key]"
        )));
    }

    if uri_bucket != bucket {
        return Err(Error::InvalidDestination(format!(
            "'{destination}' targets bucket '{uri_bucket}' but the configured bucket is '{bucket}'"
        )));
    }

    if prefix.is_empty() || prefix.ends_with('/') {
        let filename = local
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .ok_or_else(|| {
                Error::InvalidDestination(format!(
                    "Cannot derive a key from '{}'",
                    local.display()
                ))
            })?;
        ObjectKey::new(format!("{prefix}{filename}"))
    } else {
        ObjectKey::new(prefix)
    }
}
