use anyhow::Result;
use clap::Parser;
use netlify_ddns::{config::Args, event_log::FileLog};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging, echoing every event line by default
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let log = Arc::new(FileLog::open(&args.log_file, args.truncate_log)?);

    // Failures are reported through the log file, never the exit status
    netlify_ddns::execute(args, log).await;
    Ok(())
}
