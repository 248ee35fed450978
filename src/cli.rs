// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// Every flag is optional. With no flags at all, httpecker reads URLs from
// standard input and probes each one exactly as written.
//
// Rust concepts:
// - Derive macros: clap generates the parser from the struct definition
// - Option<T>: A flag that may or may not be given
// =============================================================================

use clap::Parser;

// This struct represents our entire CLI application
#[derive(Parser, Debug)]
#[command(
    name = "httpecker",
    version,
    about = "Checks response for http/https urls",
    long_about = "httpecker reads one URL or bare host per line (from a file or stdin) \
                  and prints the HTTP status code(s) next to each input line. \
                  Unreachable URLs are reported with status 999."
)]
pub struct Cli {
    /// Use http only
    ///
    /// Every URL is rewritten to http:// before probing
    #[arg(long)]
    pub http_only: bool,

    /// Use https only
    ///
    /// Every URL is rewritten to https:// before probing
    #[arg(long)]
    pub https_only: bool,

    /// Use http and https
    ///
    /// Each URL is probed twice, first over http:// then over https://
    #[arg(long)]
    pub both: bool,

    /// File with urls (reads standard input when omitted or empty)
    #[arg(short, long)]
    pub filename: Option<String>,

    /// Number of threads
    ///
    /// How many URLs are probed at the same time
    #[arg(short, long, default_value_t = 5, value_parser = clap::value_parser!(u32).range(1..))]
    pub threads: u32,

    /// Enable debugging
    #[arg(short, long)]
    pub verb: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["httpecker"]).unwrap();
        assert!(!cli.http_only);
        assert!(!cli.https_only);
        assert!(!cli.both);
        assert!(cli.filename.is_none());
        assert_eq!(cli.threads, 5);
        assert!(!cli.verb);
    }

    #[test]
    fn test_short_flags() {
        let cli = Cli::try_parse_from(["httpecker", "-f", "urls.txt", "-t", "20", "-v"]).unwrap();
        assert_eq!(cli.filename, Some("urls.txt".to_string()));
        assert_eq!(cli.threads, 20);
        assert!(cli.verb);
    }

    #[test]
    fn test_long_flags() {
        let cli = Cli::try_parse_from([
            "httpecker",
            "--both",
            "--filename",
            "hosts.txt",
            "--threads",
            "50",
        ])
        .unwrap();
        assert!(cli.both);
        assert_eq!(cli.filename, Some("hosts.txt".to_string()));
        assert_eq!(cli.threads, 50);
    }

    #[test]
    fn test_zero_threads_rejected() {
        assert!(Cli::try_parse_from(["httpecker", "-t", "0"]).is_err());
    }
}
