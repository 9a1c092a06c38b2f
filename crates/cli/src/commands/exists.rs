//! exists command - Check object presence
//!
//! Exit code 0 when the object exists, 3 when it does not.

use blob_core::{BlobClient, ExitCode, ObjectKey};
use clap::Args;

use super::Context;

/// Check whether an object exists
#[derive(Args, Debug)]
pub struct ExistsArgs {
    /// Object key
    pub key: ObjectKey,
}

/// Execute the exists command
pub async fn execute(args: ExistsArgs, ctx: &Context) -> ExitCode {
    let formatter = ctx.formatter();

    let config = match ctx.load_config(&formatter) {
        Ok(c) => c,
        Err(code) => return code,
    };

    let store = match ctx.connect(&config, &formatter).await {
        Ok(s) => s,
        Err(code) => return code,
    };

    let result = BlobClient::new(&store, &config).exists(&args.key).await;
    formatter.report(&result);
    result.exit_code
}
