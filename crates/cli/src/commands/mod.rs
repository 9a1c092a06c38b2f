//! CLI command definitions and execution
//!
//! One subcommand per blob operation. Each command loads the bucket
//! configuration, connects the S3 store and hands the work to
//! [`blob_core::BlobClient`].

use std::path::PathBuf;

use blob_core::{BucketConfig, ConfigLoader, ExitCode};
use blob_s3::S3Store;
use clap::{Parser, Subcommand};

use crate::output::{Formatter, OutputConfig};

mod completions;
mod delete;
mod exists;
mod get;
mod put;

/// blobcli - manage single objects in an S3-compatible bucket
///
/// Exit codes: 0 success, 1 general failure, 2 usage or configuration error,
/// 3 object does not exist (exists only), 4 authentication failure.
#[derive(Parser, Debug)]
#[command(name = "blobcli")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the bucket configuration file (JSON, or TOML with a .toml extension)
    #[arg(short, long, global = true, env = "BLOBCLI_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format: human-readable or JSON
    #[arg(long, global = true, default_value = "false")]
    pub json: bool,

    /// Disable colored output
    #[arg(long, global = true, default_value = "false")]
    pub no_color: bool,

    /// Disable progress spinner
    #[arg(long, global = true, default_value = "false")]
    pub no_progress: bool,

    /// Suppress output of successful operations
    #[arg(short, long, global = true, default_value = "false")]
    pub quiet: bool,

    /// Enable debug logging
    #[arg(long, global = true, default_value = "false")]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Upload a local file, overwriting any existing object
    Put(put::PutArgs),

    /// Check whether an object exists (exit code 3 when it does not)
    Exists(exists::ExistsArgs),

    /// Download an object to a local file
    Get(get::GetArgs),

    /// Delete an object; succeeds when the object is already absent
    Delete(delete::DeleteArgs),

    /// Generate shell completion scripts
    Completions(completions::CompletionsArgs),
}

/// Settings shared by every command of one invocation
#[derive(Debug, Clone)]
pub struct Context {
    pub config_path: Option<PathBuf>,
    pub output: OutputConfig,
}

impl Context {
    fn formatter(&self) -> Formatter {
        Formatter::new(self.output.clone())
    }

    /// Load and validate the bucket configuration
    fn load_config(&self, formatter: &Formatter) -> Result<BucketConfig, ExitCode> {
        let report = |e: blob_core::Error| {
            formatter.error(&e.to_string());
            e.exit_code()
        };

        let loader = ConfigLoader::new(self.config_path.clone()).map_err(report)?;
        tracing::debug!(path = %loader.config_path().display(), "Loading bucket configuration");
        loader.load().map_err(report)
    }

    /// Create the S3 store for the configured bucket
    async fn connect(
        &self,
        config: &BucketConfig,
        formatter: &Formatter,
    ) -> Result<S3Store, ExitCode> {
        S3Store::new(config).await.map_err(|e| {
            formatter.error(&format!("Failed to create S3 client: {e}"));
            e.exit_code()
        })
    }
}

/// Execute the CLI command and return an exit code
pub async fn execute(cli: Cli) -> ExitCode {
    let ctx = Context {
        config_path: cli.config,
        output: OutputConfig {
            json: cli.json,
            no_color: cli.no_color,
            no_progress: cli.no_progress,
            quiet: cli.quiet,
        },
    };

    match cli.command {
        Commands::Put(args) => put::execute(args, &ctx).await,
        Commands::Exists(args) => exists::execute(args, &ctx).await,
        Commands::Get(args) => get::execute(args, &ctx).await,
        Commands::Delete(args) => delete::execute(args, &ctx).await,
        Commands::Completions(args) => completions::execute(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_put() {
        let cli = Cli::try_parse_from([
            "blobcli",
            "-c",
            "/etc/blobcli.json",
            "put",
            "local.txt",
            "s3://bucket/",
        ])
        .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/etc/blobcli.json")));
        match cli.command {
            Commands::Put(args) => {
                assert_eq!(args.local_file, PathBuf::from("local.txt"));
                assert_eq!(args.destination, "s3://bucket/");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_get_argument_order() {
        let cli = Cli::try_parse_from(["blobcli", "get", "remote-key", "out.txt"]).unwrap();
        match cli.command {
            Commands::Get(args) => {
                assert_eq!(args.key.as_str(), "remote-key");
                assert_eq!(args.local_file, PathBuf::from("out.txt"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["blobcli", "exists", "a.txt", "--json", "--quiet"]).unwrap();
        assert!(cli.json);
        assert!(cli.quiet);
    }

    #[test]
    fn test_empty_key_rejected() {
        let err = Cli::try_parse_from(["blobcli", "delete", ""]).unwrap_err();
        assert_eq!(err.exit_code(), ExitCode::UsageError.as_i32());
    }

    #[test]
    fn test_missing_argument_rejected() {
        let err = Cli::try_parse_from(["blobcli", "get", "only-key"]).unwrap_err();
        assert_eq!(err.exit_code(), ExitCode::UsageError.as_i32());
    }

    #[tokio::test]
    async fn test_missing_config_is_usage_error() {
        let temp_dir = tempfile::tempdir().unwrap();
        let cli = Cli::try_parse_from([
            "blobcli",
            "--config",
            temp_dir.path().join("absent.json").to_str().unwrap(),
            "exists",
            "a.txt",
        ])
        .unwrap();
        assert_eq!(execute(cli).await, ExitCode::UsageError);
    }
}
