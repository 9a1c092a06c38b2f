//! blob-core: Core library for the blobcli object lifecycle client
//!
//! This crate provides:
//! - Bucket configuration loading
//! - Object keys and upload destination parsing
//! - The BlobStore capability trait
//! - BlobClient, which maps store outcomes to exit codes and messages
//!
//! This crate is independent of any specific S3 SDK.

pub mod client;
pub mod config;
pub mod error;
pub mod exit_code;
pub mod key;
pub mod traits;

pub use client::{BlobClient, Operation, OperationResult};
pub use config::{BucketConfig, ConfigLoader, CredentialsSource, RetryConfig, TimeoutConfig};
pub use error::{Error, Result};
pub use exit_code::ExitCode;
pub use key::{ObjectKey, resolve_destination};
pub use traits::BlobStore;
