//! RIS text writer.

use std::fmt::Write as _;

use super::entry::{RisEntry, tags};

/// Serializes entries back to RIS text.
///
/// Multi-line values are written as a tag line followed by continuation
/// lines, which [`super::parse_ris`] joins back together.
#[must_use]
pub fn write_ris(entries: &[RisEntry]) -> String {
    let mut out = String::new();
    for (index, entry) in entries.iter().enumerate() {
        if index > 0 {
            out.push('\n');
        }
        write_field(&mut out, tags::TYPE, &entry.reference_type);
        for (tag, value) in &entry.fields {
            write_field(&mut out, tag, value);
        }
        out.push_str("ER  - \n");
    }
    out
}

fn write_field(out: &mut String, tag: &str, value: &str) {
    // `writeln!` into a String cannot fail.
    let _ = writeln!(out, "{tag}  - {value}");
}
