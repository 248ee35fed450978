// src/probe/scheme.rs
// =============================================================================
// This module adds and swaps the scheme ("http://" or "https://") of a URL.
//
// Everything here is a pure function: a string goes in, a new string comes
// out. Only the scheme token at the very start of the URL is ever touched, so
// the host, path and query stay exactly as the user wrote them.
//
// Rust concepts:
// - &str vs String: We borrow the input and return a freshly owned String
// - Enums with methods: Scheme knows its own prefix
// - strip_prefix: Returns Option<&str> with the rest of the string
// =============================================================================

use std::fmt;

const HTTP_PREFIX: &str = "http://";
const HTTPS_PREFIX: &str = "https://";

// The two schemes we know how to probe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scheme {
    Http,
    Https,
}

impl Scheme {
    /// The text a URL with this scheme starts with, e.g. "https://"
    pub fn prefix(self) -> &'static str {
        match self {
            Scheme::Http => HTTP_PREFIX,
            Scheme::Https => HTTPS_PREFIX,
        }
    }

    // The scheme we swap away from when rewriting to this one
    fn other(self) -> Scheme {
        match self {
            Scheme::Http => Scheme::Https,
            Scheme::Https => Scheme::Http,
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scheme::Http => write!(f, "http"),
            Scheme::Https => write!(f, "https"),
        }
    }
}

// Returns true if the URL already starts with "http://" or "https://"
//
// The check is case-sensitive: "HTTP://host" is treated as a bare host.
pub fn has_scheme(url: &str) -> bool {
    url.starts_with(HTTP_PREFIX) || url.starts_with(HTTPS_PREFIX)
}

// Adds "http://" in front of a URL that has no scheme yet
//
// Example:
//   "example.com"         -> "http://example.com"
//   "https://example.com" -> "https://example.com" (unchanged)
pub fn ensure_scheme(url: &str) -> String {
    if has_scheme(url) {
        url.to_string()
    } else {
        format!("{HTTP_PREFIX}{url}")
    }
}

// Returns the URL rewritten so it starts with exactly `scheme`'s prefix
//
// Steps:
// 1. Add "http://" if the URL has no scheme at all
// 2. If it already starts with the target prefix, return it as-is
// 3. Otherwise swap the leading scheme token and keep the rest untouched
//
// Example:
//   with_scheme("http://example.com/a?next=http://x", Scheme::Https)
//     -> "https://example.com/a?next=http://x"
pub fn with_scheme(url: &str, scheme: Scheme) -> String {
    let url = ensure_scheme(url);

    // The URL is tested against the prefix, never the other way around
    if url.starts_with(scheme.prefix()) {
        return url;
    }

    match url.strip_prefix(scheme.other().prefix()) {
        Some(rest) => format!("{}{}", scheme.prefix(), rest),
        // ensure_scheme guarantees one of the two prefixes is present
        None => url,
    }
}
