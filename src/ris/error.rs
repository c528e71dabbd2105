//! Error types for RIS parsing.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while reading RIS text.
#[derive(Debug, Error)]
pub enum RisError {
    /// The export file could not be read.
    #[error("cannot read RIS file {path}: {source}")]
    Io {
        /// File that failed to load
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// A tagged field appeared before any `TY` line.
    #[error(
        "RIS field '{tag}' on line {line} is outside an entry\n  Suggestion: every entry must start with a 'TY  - ' line"
    )]
    FieldOutsideEntry {
        /// 1-based line number
        line: usize,
        /// Offending tag
        tag: String,
    },

    /// A `TY` line appeared while the previous entry was still open.
    #[error(
        "RIS entry starting on line {line} opens before the previous entry was closed\n  Suggestion: terminate each entry with 'ER  - '"
    )]
    NestedEntry {
        /// 1-based line number of the second `TY`
        line: usize,
    },

    /// Input ended while an entry was still open.
    #[error(
        "RIS entry starting on line {line} is never closed\n  Suggestion: terminate each entry with 'ER  - '"
    )]
    UnterminatedEntry {
        /// 1-based line number of the opening `TY`
        line: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ris_error_unterminated_message() {
        let msg = RisError::UnterminatedEntry { line: 7 }.to_string();
        assert!(msg.contains("line 7"));
        assert!(msg.contains("ER  - "), "suggestion should mention ER");
    }

    #[test]
    fn test_ris_error_field_outside_entry_names_tag() {
        let msg = RisError::FieldOutsideEntry {
            line: 1,
            tag: "TI".to_string(),
        }
        .to_string();
        assert!(msg.contains("'TI'"));
    }
}
