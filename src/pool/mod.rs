// src/pool/mod.rs
// =============================================================================
// This module wires the input to the probing workers.
//
// Submodules:
// - producer: Reads input lines and pushes them into the shared queue
// - worker: The fixed-size pool of tasks that drain the queue
//
// The shared queue is an unbounded async_channel. The producer owns the only
// Sender, and every worker owns a clone of the Receiver.
// =============================================================================

mod producer;
mod worker;

pub use producer::{open_input, produce, Candidate};
pub use worker::WorkerPool;
