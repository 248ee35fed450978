// src/main.rs
// =============================================================================
// This is the entry point of httpecker.
//
// What happens here:
// 1. Parse command-line arguments into a Config
// 2. Set up logging
// 3. Open the input (a missing file stops us before anything is probed)
// 4. Start the producer and the worker pool on a shared queue
// 5. Wait until every URL has been probed and reported
// 6. Exit with 0, or 1 if something fatal happened
// =============================================================================

mod cli;
mod config;
mod logging;
mod pool;
mod probe;
mod report;

use anyhow::{Context, Result};
use clap::Parser;
use cli::Cli;
use config::Config;
use log::debug;
use pool::WorkerPool;
use report::Reporter;
use std::sync::Arc;

#[tokio::main]
async fn main() {
    let exit_code = match run().await {
        Ok(()) => 0,
        Err(e) => {
            // {:#} prints the whole context chain on one line
            eprintln!("Error: {e:#}");
            1
        }
    };

    std::process::exit(exit_code);
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::from_cli(&cli);

    logging::init_logger(config.verbose);
    debug!("mode: {}", config.mode);
    debug!("threads: {}", config.threads);

    let input = pool::open_input(config.input.as_deref()).await?;
    let client = probe::build_client()?;
    let reporter = Arc::new(Reporter::new(std::io::stdout()));
    let workers = WorkerPool::new(&config, client, reporter);

    let (sender, receiver) = async_channel::unbounded();
    let producer = tokio::spawn(pool::produce(input, sender));

    let processed = workers.run(receiver).await;
    let queued = producer.await.context("Input reader task failed")?;

    debug!("Done: {processed} of {queued} url(s) probed");
    Ok(())
}
