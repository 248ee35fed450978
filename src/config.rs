// src/config.rs
// =============================================================================
// This module turns the parsed command-line flags into a Config.
//
// The Config is built once in main() and never changes afterwards. The
// producer and the worker pool receive it (or the parts they need) directly,
// there are no global flag variables.
// =============================================================================

use crate::cli::Cli;
use std::fmt;
use std::path::PathBuf;

// Which scheme(s) get probed for every URL
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Probe the URL as written (only a missing scheme is added)
    Default,
    /// Force http:// and probe once
    HttpOnly,
    /// Force https:// and probe once
    HttpsOnly,
    /// Probe over http:// then over https://
    Both,
}

impl RunMode {
    // Picks the mode from the three mode flags
    //
    // --both, or --http-only together with --https-only, selects Both.
    pub fn from_flags(http_only: bool, https_only: bool, both: bool) -> Self {
        match (http_only || both, https_only || both) {
            (true, true) => RunMode::Both,
            (true, false) => RunMode::HttpOnly,
            (false, true) => RunMode::HttpsOnly,
            (false, false) => RunMode::Default,
        }
    }
}

impl fmt::Display for RunMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RunMode::Default => "default",
            RunMode::HttpOnly => "http-only",
            RunMode::HttpsOnly => "https-only",
            RunMode::Both => "both",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub mode: RunMode,
    /// Number of concurrent workers, always at least 1
    pub threads: usize,
    /// Input file, None means standard input
    pub input: Option<PathBuf>,
    pub verbose: bool,
}

impl Config {
    pub fn from_cli(cli: &Cli) -> Self {
        Config {
            mode: RunMode::from_flags(cli.http_only, cli.https_only, cli.both),
            threads: (cli.threads as usize).max(1),
            // `-f ""` means the same as no -f at all
            input: cli
                .filename
                .as_deref()
                .filter(|name| !name.is_empty())
                .map(PathBuf::from),
            verbose: cli.verb,
        }
    }
}
