//! Re-attaching scores to the raw export entries.

use std::collections::{BTreeSet, HashMap, VecDeque};

use tracing::{debug, instrument, warn};

use super::csv::format_number;
use super::error::UnmatchedRoundTrip;
use crate::ris::{RisEntry, tags};
use crate::scoring::RankedRecord;

/// Fill value for raw fields of a ranked record with no matching entry.
pub const SENTINEL: &str = "none";

/// Below this similarity no closest title is reported.
const CLOSEST_THRESHOLD: f64 = 0.5;

/// Raw entries carrying score fields, in ranked order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RoundTrip {
    pub entries: Vec<RisEntry>,
    pub warnings: Vec<UnmatchedRoundTrip>,
}

/// Normalized (title, source) join key: lowercase with whitespace runs
/// collapsed to one space.
#[must_use]
pub fn natural_key(title: &str, source: &str) -> (String, String) {
    (fold(title), fold(source))
}

fn fold(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Right-joins `raw` onto `ranked`.
///
/// Every ranked record yields exactly one entry, in ranked order. A record
/// is paired with the raw entry it was normalized from when that entry still
/// carries the same (title, source) key. Otherwise it takes the first
/// unclaimed raw entry with its key, in input order. A ranked record with
/// neither gets an entry built from its own title, source and type with
/// every other tag seen in `raw` set to [`SENTINEL`], and an
/// [`UnmatchedRoundTrip`] warning. Scores go to `C1`..`C4`: composite,
/// citation, recency and topic.
#[instrument(skip_all, fields(ranked = ranked.len(), raw = raw.len()))]
pub fn round_trip(ranked: &[RankedRecord], raw: &[RisEntry]) -> RoundTrip {
    let keys: Vec<(String, String)> = raw.iter().map(entry_key).collect();
    let mut claimed = vec![false; raw.len()];
    let direct: Vec<Option<usize>> = ranked
        .iter()
        .map(|record| {
            let index = source_index(record, &keys).filter(|index| !claimed[*index])?;
            claimed[index] = true;
            Some(index)
        })
        .collect();
    let mut by_key: HashMap<&(String, String), VecDeque<usize>> = HashMap::new();
    for (index, key) in keys.iter().enumerate() {
        if !claimed[index] {
            by_key.entry(key).or_default().push_back(index);
        }
    }

    let mut entries = Vec::with_capacity(ranked.len());
    let mut warnings = Vec::new();
    for (record, direct) in ranked.iter().zip(direct) {
        let matched = direct.or_else(|| {
            let key = natural_key(&record.record.title, &record.record.source);
            by_key.get_mut(&key).and_then(VecDeque::pop_front)
        });
        let mut entry = match matched {
            Some(index) => raw[index].clone(),
            None => {
                let warning = UnmatchedRoundTrip {
                    row: record.row,
                    title: record.record.title.clone(),
                    source: record.record.source.clone(),
                    closest: closest_title(&record.record.title, raw),
                };
                warn!(warning = %warning, "Ranked record has no raw entry");
                warnings.push(warning);
                placeholder(record, raw)
            }
        };
        let scores = [
            record.score,
            record.cite_score,
            record.recency_score,
            record.topic_score,
        ];
        for (tag, value) in tags::SCORE_FIELDS.iter().zip(scores) {
            entry.set(tag, format_number(value));
        }
        entries.push(entry);
    }

    debug!(
        entries = entries.len(),
        unmatched = warnings.len(),
        "Round-trip join complete"
    );
    RoundTrip { entries, warnings }
}

/// The record's own raw entry, if it exists and its key still agrees.
fn source_index(record: &RankedRecord, keys: &[(String, String)]) -> Option<usize> {
    let index = record.record.raw_index?;
    let key = keys.get(index)?;
    (*key == natural_key(&record.record.title, &record.record.source)).then_some(index)
}

fn entry_key(entry: &RisEntry) -> (String, String) {
    natural_key(
        entry.first_of(&tags::TITLE_TAGS).unwrap_or_default(),
        entry.first_of(&tags::SOURCE_TAGS).unwrap_or_default(),
    )
}

fn placeholder(record: &RankedRecord, raw: &[RisEntry]) -> RisEntry {
    let mut entry = RisEntry::new(record.record.reference_type.clone())
        .with(tags::TITLE, &record.record.title)
        .with(tags::SECONDARY_TITLE, &record.record.source);

    let skip: BTreeSet<&str> = tags::TITLE_TAGS
        .iter()
        .chain(tags::SOURCE_TAGS.iter())
        .chain(tags::SCORE_FIELDS.iter())
        .copied()
        .collect();
    let mut seen = BTreeSet::new();
    for (tag, _) in raw.iter().flat_map(|entry| entry.fields.iter()) {
        if !skip.contains(tag.as_str()) && seen.insert(tag.as_str()) {
            entry.push(tag.as_str(), SENTINEL);
        }
    }
    entry
}

fn closest_title(title: &str, raw: &[RisEntry]) -> Option<String> {
    let wanted = fold(title);
    raw.iter()
        .filter_map(|entry| entry.first_of(&tags::TITLE_TAGS))
        .map(|candidate| {
            let similarity = strsim::normalized_levenshtein(&wanted, &fold(candidate));
            (similarity, candidate)
        })
        .filter(|(similarity, _)| *similarity >= CLOSEST_THRESHOLD)
        .max_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, candidate)| candidate.to_string())
}
