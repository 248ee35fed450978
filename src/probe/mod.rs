// src/probe/mod.rs
// =============================================================================
// This module contains everything needed to probe one URL.
//
// Submodules:
// - scheme: Adds a missing scheme and swaps http:// <-> https://
// - http: Sends the GET request and turns the result into a ProbeOutcome
// =============================================================================

mod http;
mod scheme;

pub use http::{build_client, probe, FailureKind, ProbeOutcome};
pub use scheme::{ensure_scheme, has_scheme, with_scheme, Scheme};
