// src/report.rs
// =============================================================================
// This module turns a probed candidate into one output line and writes it.
//
// Output format (fields separated by " | "):
//   default / --http-only / --https-only:  <status> | <original line>
//   --both:                                <http> | <https> | <original line>
//
// A probe that never got an answer is printed as 999. That number only exists
// here; the rest of the program works with ProbeOutcome.
//
// Rust concepts:
// - Display trait: Lets us use a ProbeReport directly in format!/writeln!
// - Mutex: Several workers write through the same Reporter
// - Generics: Reporter<W> works with stdout in main() and a Vec<u8> in tests
// =============================================================================

use crate::probe::ProbeOutcome;
use std::fmt;
use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

// Status printed for a probe that could not be completed
pub const UNREACHABLE_CODE: u16 = 999;

const SEPARATOR: &str = " | ";

// The status column(s) of one line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcomes {
    /// One probe (default, --http-only, --https-only)
    Single(ProbeOutcome),
    /// Two probes, http first then https (--both)
    Pair { http: ProbeOutcome, https: ProbeOutcome },
}

// Everything needed to print one line of output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeReport {
    /// The input line exactly as it was read (after trimming)
    pub raw: String,
    pub outcomes: Outcomes,
}

impl ProbeReport {
    pub fn single(raw: impl Into<String>, outcome: ProbeOutcome) -> Self {
        ProbeReport {
            raw: raw.into(),
            outcomes: Outcomes::Single(outcome),
        }
    }

    pub fn pair(raw: impl Into<String>, http: ProbeOutcome, https: ProbeOutcome) -> Self {
        ProbeReport {
            raw: raw.into(),
            outcomes: Outcomes::Pair { http, https },
        }
    }
}

// Maps an outcome to the number shown in the output
pub fn status_code(outcome: &ProbeOutcome) -> u16 {
    outcome.status().unwrap_or(UNREACHABLE_CODE)
}

impl fmt::Display for ProbeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.outcomes {
            Outcomes::Single(outcome) => {
                write!(f, "{}{SEPARATOR}{}", status_code(outcome), self.raw)
            }
            Outcomes::Pair { http, https } => write!(
                f,
                "{}{SEPARATOR}{}{SEPARATOR}{}",
                status_code(http),
                status_code(https),
                self.raw
            ),
        }
    }
}

// Writes report lines to an output sink
//
// Each call to emit() writes a whole line while holding the lock, so lines
// from different workers can interleave but never mix.
//
// Once the reader of the output goes away (`httpecker | head`), the
// reporter remembers it so workers can stop instead of probing for nobody.
pub struct Reporter<W: Write> {
    out: Mutex<W>,
    closed: AtomicBool,
}

impl<W: Write> Reporter<W> {
    pub fn new(out: W) -> Self {
        Reporter {
            out: Mutex::new(out),
            closed: AtomicBool::new(false),
        }
    }

    // Writes one report followed by a newline and flushes it
    pub fn emit(&self, report: &ProbeReport) -> io::Result<()> {
        // Keep writing even if another worker panicked while holding the lock
        let mut out = self.out.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let result = writeln!(out, "{report}").and_then(|()| out.flush());
        if let Err(e) = &result {
            if e.kind() == io::ErrorKind::BrokenPipe {
                self.closed.store(true, Ordering::Relaxed);
            }
        }
        result
    }

    // True once a write failed because nobody reads the output anymore
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Relaxed)
    }

    // Gives back the sink (used by tests to read what was written)
    pub fn into_inner(self) -> W {
        self.out
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probe::FailureKind;

    #[test]
    fn test_single_line_format() {
        let report = ProbeReport::single("example.com", ProbeOutcome::Status(200));
        assert_eq!(report.to_string(), "200 | example.com");
    }

    #[test]
    fn test_pair_line_format() {
        let report = ProbeReport::pair(
            "http://example.com",
            ProbeOutcome::Status(301),
            ProbeOutcome::Status(200),
        );
        assert_eq!(report.to_string(), "301 | 200 | http://example.com");
    }

    #[test]
    fn test_unreachable_is_999() {
        let report = ProbeReport::pair(
            "example.com",
            ProbeOutcome::Status(200),
            ProbeOutcome::Unreachable(FailureKind::Tls),
        );
        assert_eq!(report.to_string(), "200 | 999 | example.com");
        assert_eq!(status_code(&ProbeOutcome::Unreachable(FailureKind::Dns)), 999);
    }

    #[test]
    fn test_column_count() {
        let single = ProbeReport::single("a", ProbeOutcome::Status(404)).to_string();
        let pair = ProbeReport::pair(
            "a",
            ProbeOutcome::Status(404),
            ProbeOutcome::Unreachable(FailureKind::Connect),
        )
        .to_string();
        assert_eq!(single.split(SEPARATOR).count(), 2);
        assert_eq!(pair.split(SEPARATOR).count(), 3);
    }

    // A sink whose reader has gone away
    struct ClosedPipe;

    impl Write for ClosedPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::ErrorKind::BrokenPipe.into())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_reporter_marks_closed_on_broken_pipe() {
        let reporter = Reporter::new(ClosedPipe);
        assert!(!reporter.is_closed());

        let error = reporter
            .emit(&ProbeReport::single("a.com", ProbeOutcome::Status(200)))
            .unwrap_err();

        assert_eq!(error.kind(), io::ErrorKind::BrokenPipe);
        assert!(reporter.is_closed());
    }

    #[test]
    fn test_reporter_writes_one_line_per_report() {
        let reporter = Reporter::new(Vec::new());
        reporter
            .emit(&ProbeReport::single("one", ProbeOutcome::Status(200)))
            .unwrap();
        reporter
            .emit(&ProbeReport::single(
                "two",
                ProbeOutcome::Unreachable(FailureKind::Timeout),
            ))
            .unwrap();

        let written = String::from_utf8(reporter.into_inner()).unwrap();
        assert_eq!(written, "200 | one\n999 | two\n");
    }
}
