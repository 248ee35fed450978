// src/pool/producer.rs
// =============================================================================
// This module reads the input and feeds the shared queue.
//
// How it works:
// 1. open_input() picks the source: a file if one was given, stdin otherwise
// 2. produce() reads it line by line
// 3. Every non-empty line becomes a Candidate and is pushed into the queue
// 4. When the input ends the sender is dropped, which closes the queue
//
// The queue is unbounded, so pushing never waits on the workers.
//
// Rust concepts:
// - Trait objects: Box<dyn AsyncBufRead> lets a file and stdin share one type
// - let-else: Skip the rest of the loop body when a pattern doesn't match
// - Cow<str>: from_utf8_lossy only allocates when it had to replace bytes
// =============================================================================

use anyhow::{Context, Result};
use async_channel::Sender;
use log::{debug, trace, warn};
use std::borrow::Cow;
use std::path::Path;
use tokio::fs::File;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

// Where URLs are read from
pub type InputSource = Box<dyn AsyncBufRead + Unpin + Send>;

// One line of input, ready to be probed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// The trimmed input line, printed as-is in the output
    pub raw: String,
}

impl Candidate {
    // Builds a candidate from an input line, None for blank lines
    pub fn from_line(line: &str) -> Option<Self> {
        let raw = line.trim();
        if raw.is_empty() {
            None
        } else {
            Some(Candidate {
                raw: raw.to_string(),
            })
        }
    }
}

// Opens the input source
//
// Parameters:
//   path: file to read, or None for standard input
//
// Returns: an error if the file cannot be opened. Nothing has been probed at
// that point, so the caller can stop right away.
pub async fn open_input(path: Option<&Path>) -> Result<InputSource> {
    match path {
        Some(path) => {
            let file = File::open(path)
                .await
                .with_context(|| format!("Failed opening file: {}", path.display()))?;
            debug!("Reading urls from {}", path.display());
            Ok(Box::new(BufReader::new(file)))
        }
        None => {
            debug!("Reading urls from stdin");
            Ok(Box::new(BufReader::new(tokio::io::stdin())))
        }
    }
}

// Pushes every non-empty line of `reader` into the queue
//
// Lines are read as raw bytes. Bytes that are not valid UTF-8 are replaced
// with U+FFFD and the line is still queued, so one badly encoded line never
// hides the lines after it. A real read error is logged and ends the input
// just like end of file does.
//
// Returns: how many candidates were queued
pub async fn produce<R>(mut reader: R, sender: Sender<Candidate>) -> usize
where
    R: AsyncBufRead + Unpin,
{
    let mut buf = Vec::new();
    let mut queued = 0;

    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf).await {
            Ok(0) => break,
            Ok(_) => {
                let line = String::from_utf8_lossy(&buf);
                if let Cow::Owned(_) = line {
                    warn!("Input line is not valid UTF-8, invalid bytes replaced: {}", line.trim_end());
                }
                let Some(candidate) = Candidate::from_line(&line) else {
                    continue;
                };
                trace!("Queued: {}", candidate.raw);
                if sender.send(candidate).await.is_err() {
                    // Every worker is gone, e.g. after stdout was closed
                    debug!("Queue closed before input was exhausted");
                    break;
                }
                queued += 1;
            }
            Err(e) => {
                warn!("Stopped reading input: {e}");
                break;
            }
        }
    }

    // Last sender gone: workers see the queue as closed once it is drained
    drop(sender);
    debug!("Input exhausted, {queued} url(s) queued");
    queued
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};

    #[test]
    fn test_candidate_from_line() {
        assert_eq!(
            Candidate::from_line("  example.com \r"),
            Some(Candidate {
                raw: "example.com".to_string()
            })
        );
        assert_eq!(Candidate::from_line(""), None);
        assert_eq!(Candidate::from_line("   \t"), None);
    }

    #[tokio::test]
    async fn test_produce_keeps_order_and_skips_blank_lines() {
        let input = Cursor::new("a.com\n\nhttp://b.com\n   \nhttps://c.com/x?y=1".as_bytes().to_vec());
        let (sender, receiver) = async_channel::unbounded();

        let queued = produce(input, sender).await;

        assert_eq!(queued, 3);
        let mut received = Vec::new();
        while let Ok(candidate) = receiver.recv().await {
            received.push(candidate.raw);
        }
        assert_eq!(received, vec!["a.com", "http://b.com", "https://c.com/x?y=1"]);
        assert!(receiver.is_closed());
    }

    #[tokio::test]
    async fn test_produce_keeps_going_after_invalid_utf8() {
        let input = Cursor::new(b"a.com\nb\xe9.com\nc.com\nd.com\n".to_vec());
        let (sender, receiver) = async_channel::unbounded();

        let queued = produce(input, sender).await;

        assert_eq!(queued, 4);
        let mut received = Vec::new();
        while let Ok(candidate) = receiver.recv().await {
            received.push(candidate.raw);
        }
        assert_eq!(received, vec!["a.com", "b\u{FFFD}.com", "c.com", "d.com"]);
    }

    #[tokio::test]
    async fn test_produce_last_line_without_newline() {
        let input = Cursor::new(b"one.com\r\ntwo.com".to_vec());
        let (sender, receiver) = async_channel::unbounded();

        assert_eq!(produce(input, sender).await, 2);
        assert_eq!(receiver.recv().await.unwrap().raw, "one.com");
        assert_eq!(receiver.recv().await.unwrap().raw, "two.com");
    }

    #[tokio::test]
    async fn test_produce_empty_input_closes_queue() {
        let (sender, receiver) = async_channel::unbounded();
        let queued = produce(Cursor::new(Vec::new()), sender).await;
        assert_eq!(queued, 0);
        assert!(receiver.recv().await.is_err());
    }

    #[tokio::test]
    async fn test_open_input_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("does-not-exist.txt");

        let error = open_input(Some(missing.as_path())).await.err().unwrap();

        assert!(error.to_string().starts_with("Failed opening file"));
    }

    #[tokio::test]
    async fn test_open_input_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"one.com\ntwo.com\n").unwrap();
        let (sender, receiver) = async_channel::unbounded();

        let reader = open_input(Some(file.path())).await.unwrap();
        let queued = produce(reader, sender).await;

        assert_eq!(queued, 2);
        assert_eq!(receiver.recv().await.unwrap().raw, "one.com");
        assert_eq!(receiver.recv().await.unwrap().raw, "two.com");
    }
}
