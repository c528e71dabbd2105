//! RIS text reader.

use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, instrument};

use super::entry::{RisEntry, tags};
use super::error::RisError;

#[allow(clippy::expect_used)]
static TAG_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Z][A-Z0-9])  -(?: (.*))?$").expect("RIS tag line regex is valid")
});

/// Parses RIS text into raw entries, preserving entry and field order.
///
/// Lines that are not tag lines continue the previous field's value
/// (joined with a newline). Blank lines inside a value are kept; blank lines
/// right before the next tag line are not. Text between entries is ignored.
///
/// # Errors
/// Returns a [`RisError`] variant for fields outside an entry, a `TY` inside
/// an open entry, or an entry that is never closed.
#[instrument(skip(input), fields(input_len = input.len()))]
pub fn parse_ris(input: &str) -> Result<Vec<RisEntry>, RisError> {
    let input = input.strip_prefix('\u{feff}').unwrap_or(input);
    let mut entries = Vec::new();
    let mut current: Option<(usize, RisEntry)> = None;
    let mut pending_blanks = 0usize;

    for (index, raw_line) in input.lines().enumerate() {
        let line_no = index + 1;
        let line = raw_line.trim_end_matches('\r');

        let Some(captures) = TAG_LINE.captures(line) else {
            if let Some((_, entry)) = current.as_mut()
                && let Some((_, value)) = entry.fields.last_mut()
            {
                if line.trim().is_empty() {
                    pending_blanks += 1;
                } else {
                    for _ in 0..=pending_blanks {
                        value.push('\n');
                    }
                    pending_blanks = 0;
                    value.push_str(line.trim_end());
                }
            }
            continue;
        };
        pending_blanks = 0;

        let tag = &captures[1];
        let value = captures.get(2).map_or("", |m| m.as_str()).trim_end();

        match (tag, current.take()) {
            (tags::TYPE, None) => current = Some((line_no, RisEntry::new(value))),
            (tags::TYPE, Some(_)) => return Err(RisError::NestedEntry { line: line_no }),
            (tags::END, Some((_, entry))) => entries.push(entry),
            (_, None) => {
                return Err(RisError::FieldOutsideEntry {
                    line: line_no,
                    tag: tag.to_string(),
                });
            }
            (_, Some((start, mut entry))) => {
                entry.push(tag, value);
                current = Some((start, entry));
            }
        }
    }

    if let Some((start, _)) = current {
        return Err(RisError::UnterminatedEntry { line: start });
    }

    debug!(entries = entries.len(), "RIS parsed");
    Ok(entries)
}
