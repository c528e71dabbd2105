//! RIS tagged-field parsing and serialization.
//!
//! RIS is the exchange format used by Scopus, Web of Science and most
//! reference managers. Each entry is a block of `XY  - value` lines opened by
//! `TY` and closed by `ER`.
//!
//! # Example
//!
//! ```
//! use litrank_core::ris::{parse_ris, write_ris};
//!
//! let text = "TY  - JOUR\nTI  - A paper\nER  - \n";
//! let entries = parse_ris(text).unwrap();
//! assert_eq!(entries[0].first("TI"), Some("A paper"));
//! assert_eq!(parse_ris(&write_ris(&entries)).unwrap(), entries);
//! ```

mod entry;
mod error;
mod reader;
mod writer;

pub use entry::{RisEntry, tags};
pub use error::RisError;
pub use reader::parse_ris;
pub use writer::write_ris;

use std::path::Path;

use tracing::instrument;

/// Reads and parses a RIS file from disk.
///
/// # Errors
/// Returns [`RisError::Io`] if the file cannot be read, or a syntax error
/// from [`parse_ris`].
#[instrument]
pub fn load_ris_file(path: &Path) -> Result<Vec<RisEntry>, RisError> {
    let text = std::fs::read_to_string(path).map_err(|source| RisError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_ris(&text)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_ris_file_reads_entries() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "TY  - JOUR").unwrap();
        writeln!(file, "TI  - Loaded from disk").unwrap();
        writeln!(file, "ER  - ").unwrap();

        let entries = load_ris_file(file.path()).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].first(tags::TITLE), Some("Loaded from disk"));
    }

    #[test]
    fn test_load_ris_file_nonexistent_file_errors() {
        let result = load_ris_file(Path::new("/nonexistent/export.ris"));
        assert!(matches!(result, Err(RisError::Io { .. })));
    }
}
