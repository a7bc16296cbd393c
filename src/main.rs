//! Binary entrypoint. All work happens in `interface::cli`.

use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    bookmark_cleaner::interface::cli::run().await
}
