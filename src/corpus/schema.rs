//! Source schemas and their citation-count encodings.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Scopus puts the figure inside the first note: `...; Cited By: 12`.
const SCOPUS_MARKER: &str = "Cited By:";
/// Web of Science puts it after `": "` in the second note.
const WOS_DELIMITER: &str = ": ";

/// Bibliographic database an export came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceSchema {
    #[default]
    Scopus,
    Wos,
}

/// Why a citation figure could not be located in the notes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum CitationLookup {
    /// The raw token that should hold the count.
    Found(String),
    /// The marker or delimiter was absent.
    Missing(String),
}

impl SourceSchema {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Scopus => "scopus",
            Self::Wos => "wos",
        }
    }

    /// Locates the raw citation token in the entry's `N1` notes.
    pub(crate) fn locate_citations<'a, I>(self, mut notes: I) -> CitationLookup
    where
        I: Iterator<Item = &'a str>,
    {
        match self {
            Self::Scopus => {
                let Some(first) = notes.next() else {
                    return CitationLookup::Missing("no N1 note present".to_string());
                };
                first
                    .split(';')
                    .map(str::trim)
                    .find_map(|segment| segment.strip_prefix(SCOPUS_MARKER))
                    .map_or_else(
                        || {
                            CitationLookup::Missing(format!(
                                "first N1 note has no '{SCOPUS_MARKER}' segment"
                            ))
                        },
                        |count| CitationLookup::Found(count.trim().to_string()),
                    )
            }
            Self::Wos => {
                let Some(second) = notes.nth(1) else {
                    return CitationLookup::Missing("fewer than two N1 notes".to_string());
                };
                second.split_once(WOS_DELIMITER).map_or_else(
                    || {
                        CitationLookup::Missing(format!(
                            "second N1 note has no '{}' delimiter",
                            WOS_DELIMITER.trim_end()
                        ))
                    },
                    |(_, count)| CitationLookup::Found(count.trim().to_string()),
                )
            }
        }
    }
}

impl fmt::Display for SourceSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceSchema {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "scopus" => Ok(Self::Scopus),
            "wos" | "web-of-science" => Ok(Self::Wos),
            other => Err(format!("unknown source schema '{other}' (expected scopus or wos)")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scopus_finds_cited_by_segment() {
        let notes = ["Export Date: 12 May 2023; Cited By: 15"];
        assert_eq!(
            SourceSchema::Scopus.locate_citations(notes.into_iter()),
            CitationLookup::Found("15".to_string())
        );
    }

    #[test]
    fn test_scopus_marker_missing() {
        let notes = ["Export Date: 12 May 2023"];
        assert!(matches!(
            SourceSchema::Scopus.locate_citations(notes.into_iter()),
            CitationLookup::Missing(_)
        ));
    }

    #[test]
    fn test_wos_uses_second_note() {
        let notes = [
            "Times Cited in Web of Science Core Collection:  4",
            "Total Times Cited:  7",
        ];
        assert_eq!(
            SourceSchema::Wos.locate_citations(notes.into_iter()),
            CitationLookup::Found("7".to_string())
        );
    }

    #[test]
    fn test_wos_single_note_is_missing() {
        let notes = ["Total Times Cited:  7"];
        assert!(matches!(
            SourceSchema::Wos.locate_citations(notes.into_iter()),
            CitationLookup::Missing(_)
        ));
    }

    #[test]
    fn test_schema_from_str() {
        assert_eq!("Scopus".parse::<SourceSchema>(), Ok(SourceSchema::Scopus));
        assert_eq!("wos".parse::<SourceSchema>(), Ok(SourceSchema::Wos));
        assert!("pubmed".parse::<SourceSchema>().is_err());
    }
}
