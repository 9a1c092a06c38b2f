//! Bucket configuration
//!
//! Every invocation operates on exactly one bucket, described by a
//! configuration file in JSON (default) or TOML (`.toml` extension).
//! The file path comes from `--config`, then `BLOBCLI_CONFIG`, then
//! `~/.config/blobcli/config.json`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Environment variable naming the configuration file
pub const CONFIG_ENV: &str = "BLOBCLI_CONFIG";

/// Default configuration file name inside the config directory
const DEFAULT_CONFIG_FILE: &str = "config.json";

/// Where the backend credentials come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CredentialsSource {
    /// `access_key_id` / `secret_access_key` from this file
    #[default]
    Static,
    /// AWS default provider chain (environment, profile, instance metadata)
    EnvOrProfile,
    /// Anonymous, unsigned requests
    None,
}

/// Retry settings handed to the transport
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of attempts, including the first one
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Initial backoff duration in milliseconds
    #[serde(default = "default_initial_backoff")]
    pub initial_backoff_ms: u64,

    /// Maximum backoff duration in milliseconds
    #[serde(default = "default_max_backoff")]
    pub max_backoff_ms: u64,
}

fn default_max_attempts() -> u32 {
    3
}

fn default_initial_backoff() -> u64 {
    100
}

fn default_max_backoff() -> u64 {
    10000
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            initial_backoff_ms: default_initial_backoff(),
            max_backoff_ms: default_max_backoff(),
        }
    }
}

/// Timeout settings handed to the transport
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeoutConfig {
    /// Connection timeout in milliseconds
    #[serde(default = "default_connect_timeout")]
    pub connect_ms: u64,

    /// Read timeout in milliseconds
    #[serde(default = "default_read_timeout")]
    pub read_ms: u64,
}

fn default_connect_timeout() -> u64 {
    5000
}

fn default_read_timeout() -> u64 {
    30000
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_ms: default_connect_timeout(),
            read_ms: default_read_timeout(),
        }
    }
}

/// Configuration of the single bucket an invocation works against
///
/// Loaded once per process and passed by reference; nothing mutates it
/// after [`ConfigLoader::load`] returns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BucketConfig {
    /// Bucket that all operations target
    pub bucket_name: String,

    /// AWS region
    #[serde(default = "default_region")]
    pub region: String,

    /// Full endpoint URL, overrides `host`/`port`/`use_ssl`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    /// Endpoint host name for S3-compatible servers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,

    /// Endpoint port
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,

    /// Use https when building the endpoint from `host`
    #[serde(default = "default_true")]
    pub use_ssl: bool,

    #[serde(default)]
    pub credentials_source: CredentialsSource,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_key_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret_access_key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_token: Option<String>,

    /// Path-style addressing (`host/bucket/key`)
    #[serde(default = "default_true")]
    pub force_path_style: bool,

    /// Server-side encryption applied to uploads, e.g. `AES256` or `aws:kms`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server_side_encryption: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sse_kms_key_id: Option<String>,

    /// Storage class applied to uploads, e.g. `STANDARD_IA`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_class: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry: Option<RetryConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<TimeoutConfig>,
}

fn default_region() -> String {
    "us-east-1".to_string()
}

fn default_true() -> bool {
    true
}

impl BucketConfig {
    /// Create a configuration with static credentials and defaults elsewhere
    pub fn new(
        bucket_name: impl Into<String>,
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
    ) -> Self {
        Self {
            bucket_name: bucket_name.into(),
            region: default_region(),
            endpoint: None,
            host: None,
            port: None,
            use_ssl: true,
            credentials_source: CredentialsSource::Static,
            access_key_id: Some(access_key_id.into()),
            secret_access_key: Some(secret_access_key.into()),
            session_token: None,
            force_path_style: true,
            server_side_encryption: None,
            sse_kms_key_id: None,
            storage_class: None,
            retry: None,
            timeout: None,
        }
    }

    /// Endpoint URL to send requests to, if one is configured
    ///
    /// Returns None when the SDK should resolve the AWS endpoint itself.
    pub fn endpoint_url(&self) -> Option<String> {
        if let Some(endpoint) = &self.endpoint {
            return Some(endpoint.clone());
        }

        let host = self.host.as_deref()?;
        let scheme = if self.use_ssl { "https" } else { "http" };
        Some(match self.port {
            Some(port) => format!("{scheme}://{host}:{port}"),
            None => format!("{scheme}://{host}"),
        })
    }

    /// Get the effective retry configuration
    pub fn retry_config(&self) -> RetryConfig {
        self.retry.clone().unwrap_or_default()
    }

    /// Get the effective timeout configuration
    pub fn timeout_config(&self) -> TimeoutConfig {
        self.timeout.clone().unwrap_or_default()
    }

    /// Check that the configuration can be used to reach the bucket
    pub fn validate(&self) -> Result<()> {
        if self.bucket_name.trim().is_empty() {
            return Err(Error::Config("bucket_name must not be empty".into()));
        }

        if self.credentials_source == CredentialsSource::Static {
            let has_key = self.access_key_id.as_deref().is_some_and(|k| !k.is_empty());
            let has_secret = self
                .secret_access_key
                .as_deref()
                .is_some_and(|s| !s.is_empty());
            if !has_key || !has_secret {
                return Err(Error::Config(
                    "access_key_id and secret_access_key are required when credentials_source is 'static'".into(),
                ));
            }
        }

        if let Some(endpoint) = self.endpoint_url() {
            url::Url::parse(&endpoint)?;
        }

        if self.sse_kms_key_id.is_some() && self.server_side_encryption.as_deref() != Some("aws:kms")
        {
            return Err(Error::Config(
                "sse_kms_key_id requires server_side_encryption = 'aws:kms'".into(),
            ));
        }

        Ok(())
    }
}

/// Loads and validates the bucket configuration file
#[derive(Debug)]
pub struct ConfigLoader {
    config_path: PathBuf,
}

impl ConfigLoader {
    /// Resolve the configuration path
    ///
    /// An explicit path wins, then [`CONFIG_ENV`], then the per-user default.
    pub fn new(explicit: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = explicit {
            return Ok(Self::with_path(path));
        }

        if let Some(path) = std::env::var_os(CONFIG_ENV).filter(|p| !p.is_empty()) {
            return Ok(Self::with_path(PathBuf::from(path)));
        }

        let config_dir = dirs::config_dir()
            .ok_or_else(|| Error::Config("Could not determine config directory".into()))?;
        Ok(Self::with_path(
            config_dir.join("blobcli").join(DEFAULT_CONFIG_FILE),
        ))
    }

    /// Create a ConfigLoader with a custom path (useful for testing)
    pub fn with_path(path: PathBuf) -> Self {
        Self { config_path: path }
    }

    /// Get the configuration file path
    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Load and validate the configuration
    pub fn load(&self) -> Result<BucketConfig> {
        let content = std::fs::read_to_string(&self.config_path).map_err(|e| {
            Error::Config(format!(
                "Cannot read configuration file {}: {e}",
                self.config_path.display()
            ))
        })?;

        let config: BucketConfig = if self.is_toml() {
            toml::from_str(&content)?
        } else {
            serde_json::from_str(&content)?
        };

        config.validate()?;
        tracing::debug!(
            path = %self.config_path.display(),
            bucket = %config.bucket_name,
            "Loaded bucket configuration"
        );
        Ok(config)
    }

    fn is_toml(&self) -> bool {
        self.config_path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"))
    }
}
