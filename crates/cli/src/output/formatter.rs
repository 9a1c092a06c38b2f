//! Output formatter for human-readable and JSON output
//!
//! Operation results always go to stdout, failures included, so callers that
//! capture stdout see backend markers such as `NoSuchKey`. Errors raised
//! before an operation runs (arguments, configuration) go to stderr.

use blob_core::OperationResult;
use serde::Serialize;

use super::OutputConfig;

/// JSON shape of one operation result
#[derive(Debug, Serialize)]
struct ResultOutput<'a> {
    operation: &'static str,
    bucket: &'a str,
    key: &'a str,
    exit_code: i32,
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    payload_bytes: Option<u64>,
}

/// Formatter for CLI output
///
/// Handles both human-readable and JSON output formats based on configuration.
/// When JSON mode is enabled, all output is strict JSON without colors or progress.
#[derive(Debug, Clone)]
pub struct Formatter {
    config: OutputConfig,
}

impl Formatter {
    /// Create a new formatter with the given configuration
    pub fn new(config: OutputConfig) -> Self {
        Self { config }
    }

    /// Check if colors are enabled
    pub fn colors_enabled(&self) -> bool {
        !self.config.no_color && !self.config.json
    }

    /// Render an operation result
    ///
    /// Quiet mode hides successful results only.
    pub fn report(&self, result: &OperationResult) {
        if let Some(line) = self.render(result) {
            println!("{line}");
        }
    }

    fn render(&self, result: &OperationResult) -> Option<String> {
        if self.config.quiet && result.is_success() {
            return None;
        }

        if self.config.json {
            let output = ResultOutput {
                operation: result.operation.as_str(),
                bucket: &result.bucket,
                key: &result.key,
                exit_code: result.exit_code.as_i32(),
                message: &result.message,
                payload_bytes: result.payload_bytes,
            };
            return Some(
                serde_json::to_string_pretty(&output)
                    .unwrap_or_else(|_| result.message.clone()),
            );
        }

        Some(result.message.clone())
    }

    /// Output an error message
    ///
    /// Errors are always printed, even in quiet mode.
    pub fn error(&self, message: &str) {
        if self.config.json {
            let error = serde_json::json!({
                "error": message
            });
            eprintln!(
                "{}",
                serde_json::to_string_pretty(&error).unwrap_or_else(|_| message.to_string())
            );
        } else if self.colors_enabled() {
            eprintln!("\x1b[31m✗\x1b[0m {message}");
        } else {
            eprintln!("✗ {message}");
        }
    }
}

impl Default for Formatter {
    fn default() -> Self {
        Self::new(OutputConfig::default())
    }
}
