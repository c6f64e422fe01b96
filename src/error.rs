// Error types for the extraction pipeline.
// Everything here is fatal: a non-matching line is skipped, never reported.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

// Failures of the VALUES scanner. Offsets are byte offsets into the value list.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenizeError {
    #[error("quoted value opened at byte {offset} is never closed")]
    UnterminatedQuote { offset: usize },

    #[error("value list ends with a dangling backslash")]
    DanglingEscape,

    #[error("last row does not end with ');'")]
    MissingTerminator,
}

#[derive(Debug, Error)]
pub enum DumpError {
    #[error("cannot open dump {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("read failed at line {line}: {source}")]
    Read {
        line: u64,
        #[source]
        source: io::Error,
    },

    #[error("line {line}: getting substring of INSERT statement after ' VALUES ' failed (got {snippet:?})")]
    MalformedValues { line: u64, snippet: String },

    #[error("line {line}: {source}")]
    Tokenize {
        line: u64,
        #[source]
        source: TokenizeError,
    },

    #[error("writing CSV failed: {0}")]
    Write(#[source] io::Error),
}

// Shorten a value list for error messages; dumps put whole tables on one line.
pub(crate) fn snippet(text: &str) -> String {
    const MAX: usize = 40;
    match text.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snippet_keeps_short_text() {
        assert_eq!(snippet("abc"), "abc");
        assert_eq!(snippet(""), "");
    }

    #[test]
    fn snippet_truncates_on_char_boundary() {
        let long = "é".repeat(50);
        let s = snippet(&long);
        assert!(s.ends_with("..."));
        assert_eq!(s.chars().count(), 43);
    }

    #[test]
    fn malformed_values_message_names_line() {
        let err = DumpError::MalformedValues {
            line: 7,
            snippet: "abc".into(),
        };
        let msg = err.to_string();
        assert!(msg.starts_with("line 7:"));
        assert!(msg.contains("' VALUES '"));
    }
}
