//! Raw RIS entry model.

/// Well-known RIS tags.
pub mod tags {
    pub const TYPE: &str = "TY";
    pub const END: &str = "ER";
    pub const TITLE: &str = "TI";
    pub const PRIMARY_TITLE: &str = "T1";
    pub const AUTHOR: &str = "AU";
    pub const PRIMARY_AUTHOR: &str = "A1";
    pub const YEAR: &str = "PY";
    pub const PRIMARY_DATE: &str = "Y1";
    pub const SECONDARY_TITLE: &str = "T2";
    pub const JOURNAL_ABBREV: &str = "JO";
    pub const JOURNAL_FULL: &str = "JF";
    pub const VOLUME: &str = "VL";
    pub const START_PAGE: &str = "SP";
    pub const END_PAGE: &str = "EP";
    pub const ABSTRACT: &str = "AB";
    pub const NOTES_ABSTRACT: &str = "N2";
    pub const NOTES: &str = "N1";
    pub const DOI: &str = "DO";

    /// Title tags in lookup order.
    pub const TITLE_TAGS: [&str; 2] = [TITLE, PRIMARY_TITLE];
    /// Source (journal or venue) tags in lookup order.
    pub const SOURCE_TAGS: [&str; 3] = [SECONDARY_TITLE, JOURNAL_FULL, JOURNAL_ABBREV];

    /// User-defined fields used by the round-trip export, in order:
    /// composite score, citation, recency and topic components.
    pub const SCORE_FIELDS: [&str; 4] = ["C1", "C2", "C3", "C4"];
}

/// One RIS entry as read from an export: ordered `(tag, value)` pairs.
///
/// `TY` and `ER` are not stored as fields; the reference type lives in
/// [`RisEntry::reference_type`]. Repeated tags keep their input order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RisEntry {
    /// Value of the `TY` line (e.g. `JOUR`).
    pub reference_type: String,
    /// Remaining fields in input order.
    pub fields: Vec<(String, String)>,
}

impl RisEntry {
    #[must_use]
    pub fn new(reference_type: impl Into<String>) -> Self {
        Self {
            reference_type: reference_type.into(),
            fields: Vec::new(),
        }
    }

    /// Appends a field.
    pub fn push(&mut self, tag: impl Into<String>, value: impl Into<String>) {
        self.fields.push((tag.into(), value.into()));
    }

    /// Builder-style [`RisEntry::push`].
    #[must_use]
    pub fn with(mut self, tag: &str, value: &str) -> Self {
        self.push(tag, value);
        self
    }

    /// First value for `tag`, if any.
    #[must_use]
    pub fn first(&self, tag: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(t, _)| t == tag)
            .map(|(_, v)| v.as_str())
    }

    /// First value found for any of `tags`, checked in the given order.
    #[must_use]
    pub fn first_of(&self, tags: &[&str]) -> Option<&str> {
        tags.iter().find_map(|tag| self.first(tag))
    }

    /// All values for `tag` in input order.
    pub fn all<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.fields
            .iter()
            .filter(move |(t, _)| t == tag)
            .map(|(_, v)| v.as_str())
    }

    /// Replaces every occurrence of `tag` with a single value appended at the end.
    pub fn set(&mut self, tag: &str, value: impl Into<String>) {
        self.fields.retain(|(t, _)| t != tag);
        self.fields.push((tag.to_string(), value.into()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_first_of_respects_priority() {
        let entry = RisEntry::new("JOUR")
            .with(tags::JOURNAL_ABBREV, "J. Abbrev")
            .with(tags::SECONDARY_TITLE, "Journal Full");
        assert_eq!(
            entry.first_of(&[tags::SECONDARY_TITLE, tags::JOURNAL_ABBREV]),
            Some("Journal Full")
        );
    }

    #[test]
    fn test_entry_all_keeps_order() {
        let entry = RisEntry::new("JOUR")
            .with(tags::AUTHOR, "Smith, J.")
            .with(tags::TITLE, "T")
            .with(tags::AUTHOR, "Doe, A.");
        let authors: Vec<_> = entry.all(tags::AUTHOR).collect();
        assert_eq!(authors, vec!["Smith, J.", "Doe, A."]);
    }

    #[test]
    fn test_entry_set_replaces_existing_values() {
        let mut entry = RisEntry::new("JOUR").with("C1", "old").with("C1", "older");
        entry.set("C1", "0.5");
        assert_eq!(entry.all("C1").collect::<Vec<_>>(), vec!["0.5"]);
    }
}
