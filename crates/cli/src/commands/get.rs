//! get command - Download an object
//!
//! Writes the full object content to a local file, creating or overwriting it.
//! A missing object is a general failure carrying the backend's error code.

use std::path::PathBuf;

use blob_core::{BlobClient, ExitCode, ObjectKey};
use clap::Args;

use super::Context;
use crate::output::ProgressBar;

/// Download an object to a local file
#[derive(Args, Debug)]
pub struct GetArgs {
    /// Object key
    pub key: ObjectKey,

    /// Local file to write
    pub local_file: PathBuf,
}

/// Execute the get command
pub async fn execute(args: GetArgs, ctx: &Context) -> ExitCode {
    let formatter = ctx.formatter();

    let config = match ctx.load_config(&formatter) {
        Ok(c) => c,
        Err(code) => return code,
    };

    let store = match ctx.connect(&config, &formatter).await {
        Ok(s) => s,
        Err(code) => return code,
    };

    let client = BlobClient::new(&store, &config);
    let spinner = ProgressBar::spinner(&ctx.output, &format!("Downloading {}", args.key));
    let result = client.get(&args.key, &args.local_file).await;
    spinner.finish_and_clear();

    formatter.report(&result);
    result.exit_code
}
