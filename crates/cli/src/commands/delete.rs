//! delete command - Remove an object
//!
//! Deleting an object that is already absent succeeds.

use blob_core::{BlobClient, ExitCode, ObjectKey};
use clap::Args;

use super::Context;

/// Delete an object
#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Object key
    pub key: ObjectKey,
}

/// Execute the delete command
pub async fn execute(args: DeleteArgs, ctx: &Context) -> ExitCode {
    let formatter = ctx.formatter();

    let config = match ctx.load_config(&formatter) {
        Ok(c) => c,
        Err(code) => return code,
    };

    let store = match ctx.connect(&config, &formatter).await {
        Ok(s) => s,
        Err(code) => return code,
    };

    let result = BlobClient::new(&store, &config).delete(&args.key).await;
    formatter.report(&result);
    result.exit_code
}
