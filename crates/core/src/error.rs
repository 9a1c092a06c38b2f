//! Error types for blob-core
//!
//! Provides a unified error type that can be converted to exit codes.

use thiserror::Error;

use crate::exit_code::ExitCode;

/// Result type alias for blob-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for blob-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration file error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Empty or otherwise unusable object key
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    /// Upload destination that is neither a key nor an s3:// URI for the bucket
    #[error("Invalid destination: {0}")]
    InvalidDestination(String),

    /// Local file IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing error
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Backend rejected credentials or permissions
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Backend reported that the object does not exist
    ///
    /// `code` is the backend's native marker, e.g. `NoSuchKey`.
    #[error("{code}: {message}")]
    NotFound { code: String, message: String },

    /// Any other backend or transport failure, native code passed through
    #[error("{}", backend_display(.code.as_deref(), .message))]
    Backend {
        code: Option<String>,
        message: String,
    },
}

fn backend_display(code: Option<&str>, message: &str) -> String {
    match code {
        Some(code) => format!("{code}: {message}"),
        None => message.to_string(),
    }
}

impl Error {
    /// Get the appropriate exit code for this error
    ///
    /// `NotFound` maps to a general failure here. Only `exists` reports
    /// absence with [`ExitCode::NotFound`], and it never goes through an error.
    pub const fn exit_code(&self) -> ExitCode {
        match self {
            Error::Config(_)
            | Error::InvalidKey(_)
            | Error::InvalidDestination(_)
            | Error::TomlParse(_)
            | Error::Json(_)
            | Error::InvalidUrl(_) => ExitCode::UsageError,
            Error::Auth(_) => ExitCode::AuthError,
            Error::Io(_) | Error::NotFound { .. } | Error::Backend { .. } => {
                ExitCode::GeneralError
            }
        }
    }

    /// Whether the backend reported the object as absent
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }
}
