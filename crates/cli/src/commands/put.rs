//! put command - Upload a local file
//!
//! Reads the whole file and stores it under the destination key,
//! overwriting any existing object.

use std::path::PathBuf;

use blob_core::{BlobClient, ExitCode, resolve_destination};
use clap::Args;

use super::Context;
use crate::output::ProgressBar;

/// Upload a local file
#[derive(Args, Debug)]
pub struct PutArgs {
    /// Local file to upload
    pub local_file: PathBuf,

    /// Destination key, or s3://<bucket>/[key] (a trailing slash appends the file name)
    pub destination: String,
}

/// Execute the put command
pub async fn execute(args: PutArgs, ctx: &Context) -> ExitCode {
    let formatter = ctx.formatter();

    let config = match ctx.load_config(&formatter) {
        Ok(c) => c,
        Err(code) => return code,
    };

    let key = match resolve_destination(&args.destination, &config.bucket_name, &args.local_file)
    {
        Ok(k) => k,
        Err(e) => {
            formatter.error(&e.to_string());
            return e.exit_code();
        }
    };

    let store = match ctx.connect(&config, &formatter).await {
        Ok(s) => s,
        Err(code) => return code,
    };

    let client = BlobClient::new(&store, &config);
    let spinner = ProgressBar::spinner(
        &ctx.output,
        &format!("Uploading {} to {key}", args.local_file.display()),
    );
    let result = client.put(&args.local_file, &key).await;
    spinner.finish_and_clear();

    formatter.report(&result);
    result.exit_code
}
