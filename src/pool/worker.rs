// src/pool/worker.rs
// =============================================================================
// This module runs the workers that do the probing.
//
// How it works:
// 1. WorkerPool::run() spawns `threads` tokio tasks
// 2. Each task pulls the next Candidate from the shared queue
// 3. The candidate's URL gets its scheme fixed for the run mode
// 4. One or two probes are sent, and one line is reported
// 5. A task stops when the queue is closed and empty
// 6. run() waits for every task and returns how many URLs were handled
//
// Nothing that goes wrong with one URL can stop a worker: every failure is
// already folded into a ProbeOutcome by the prober. The only reason to stop
// early is a closed output (broken pipe), since nobody reads the results.
//
// Rust concepts:
// - tokio::spawn: Runs a future as an independent task on the runtime
// - Arc: Shared ownership of the Reporter between tasks
// - join_all: Waits for a whole list of futures at once
// =============================================================================

use crate::config::{Config, RunMode};
use crate::pool::Candidate;
use crate::probe::{ensure_scheme, has_scheme, probe, with_scheme, Scheme};
use crate::report::{ProbeReport, Reporter};
use async_channel::Receiver;
use futures::future::join_all;
use log::{debug, error, warn};
use reqwest::Client;
use std::io::{ErrorKind, Write};
use std::sync::Arc;

// A fixed number of workers sharing one client and one reporter
pub struct WorkerPool<W: Write> {
    mode: RunMode,
    threads: usize,
    client: Client,
    reporter: Arc<Reporter<W>>,
}

impl<W> WorkerPool<W>
where
    W: Write + Send + 'static,
{
    pub fn new(config: &Config, client: Client, reporter: Arc<Reporter<W>>) -> Self {
        WorkerPool {
            mode: config.mode,
            threads: config.threads.max(1),
            client,
            reporter,
        }
    }

    // Runs all workers until the queue is closed and drained
    //
    // Returns: the number of candidates that were processed
    pub async fn run(&self, receiver: Receiver<Candidate>) -> usize {
        debug!("Starting {} worker(s) in {} mode", self.threads, self.mode);

        let handles: Vec<_> = (0..self.threads)
            .map(|id| {
                let receiver = receiver.clone();
                let client = self.client.clone();
                let reporter = Arc::clone(&self.reporter);
                let mode = self.mode;
                tokio::spawn(async move { work(id, mode, client, reporter, receiver).await })
            })
            .collect();

        // The workers hold their own clones now
        drop(receiver);

        join_all(handles)
            .await
            .into_iter()
            .map(|joined| match joined {
                Ok(processed) => processed,
                Err(e) => {
                    error!("Worker task failed: {e}");
                    0
                }
            })
            .sum()
    }
}

// The loop a single worker runs
async fn work<W: Write>(
    id: usize,
    mode: RunMode,
    client: Client,
    reporter: Arc<Reporter<W>>,
    receiver: Receiver<Candidate>,
) -> usize {
    let mut processed = 0;

    // recv() fails only once the queue is closed and empty
    while let Ok(candidate) = receiver.recv().await {
        // Another worker found the output closed
        if reporter.is_closed() {
            break;
        }

        let report = probe_candidate(&client, mode, &candidate).await;
        match reporter.emit(&report) {
            Ok(()) => processed += 1,
            Err(e) if e.kind() == ErrorKind::BrokenPipe => {
                debug!("Output closed, worker {id} stopping");
                break;
            }
            Err(e) => {
                error!("Failed writing result for {}: {e}", candidate.raw);
                processed += 1;
            }
        }
    }

    debug!("Worker {id} done after {processed} url(s)");
    processed
}

// Probes one candidate according to the run mode
//
// Mode       | URL probed                          | Columns
// -----------|-------------------------------------|------------------
// Default    | as given (missing scheme added)     | status | raw
// HttpOnly   | forced to http://                   | http | raw
// HttpsOnly  | forced to https://                  | https | raw
// Both       | http://, then the same URL https:// | http | https | raw
pub async fn probe_candidate(client: &Client, mode: RunMode, candidate: &Candidate) -> ProbeReport {
    debug!("Original url: {}", candidate.raw);

    if !has_scheme(&candidate.raw) {
        warn!("Missing \"http://\" in {} ...  adding", candidate.raw);
    }
    let url = ensure_scheme(&candidate.raw);

    match mode {
        RunMode::Default => {
            debug!("Query url default: {url}");
            ProbeReport::single(&candidate.raw, probe(client, &url).await)
        }
        RunMode::HttpOnly => {
            let url = with_scheme(&url, Scheme::Http);
            debug!("Query url {}: {url}", Scheme::Http);
            ProbeReport::single(&candidate.raw, probe(client, &url).await)
        }
        RunMode::HttpsOnly => {
            let url = with_scheme(&url, Scheme::Https);
            debug!("Query url {}: {url}", Scheme::Https);
            ProbeReport::single(&candidate.raw, probe(client, &url).await)
        }
        RunMode::Both => {
            let http_url = with_scheme(&url, Scheme::Http);
            debug!("Query url {}: {http_url}", Scheme::Http);
            let http = probe(client, &http_url).await;

            // Derived from the URL just probed, not from the raw input
            let https_url = with_scheme(&http_url, Scheme::Https);
            debug!("Query url {}: {https_url}", Scheme::Https);
            let https = probe(client, &https_url).await;

            ProbeReport::pair(&candidate.raw, http, https)
        }
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why async_channel instead of tokio::sync::mpsc?
//    - tokio's mpsc has exactly one receiver
//    - async_channel's Receiver can be cloned, one clone per worker
//    - Each message is delivered to exactly one of the clones
//
// 2. How do the workers know when to stop?
//    - recv() returns Err once every Sender is dropped AND the queue is empty
//    - The producer drops the only Sender when it runs out of input
//
// 3. Why is Reporter inside an Arc?
//    - tokio::spawn needs 'static futures, so a plain &Reporter won't do
//    - Arc gives every task its own handle to the same Reporter
// -----------------------------------------------------------------------------
