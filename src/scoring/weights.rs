//! Weight specification for the composite score.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use super::error::ScoreError;

pub const CITES_KEY: &str = "cites";
pub const RECENCY_KEY: &str = "recency";
pub const TOPICS_KEY: &str = "topics";

/// Default weight of each topic within the topic component.
pub const DEFAULT_TOPIC_WEIGHT: f64 = 0.5;
/// Default overall weight of the topic component.
pub const DEFAULT_TOPICS_WEIGHT: f64 = 1.0;

/// Below this similarity no label is suggested for a typo.
const SUGGESTION_THRESHOLD: f64 = 0.6;

/// Overall contribution of each criterion, nominally in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReservedWeights {
    pub cites: f64,
    pub recency: f64,
    pub topics: f64,
}

impl Default for ReservedWeights {
    fn default() -> Self {
        Self {
            cites: 0.0,
            recency: 0.0,
            topics: DEFAULT_TOPICS_WEIGHT,
        }
    }
}

/// Reserved weights plus a weight per topic label.
///
/// Values are only checked for finiteness. Out-of-range weights skew the
/// ranking but cannot break normalization, which is relative to the batch.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WeightSpecification {
    pub reserved: ReservedWeights,
    /// Relative importance of each topic within the topic component.
    pub topics: BTreeMap<String, f64>,
}

impl WeightSpecification {
    /// Cites 0, recency 0, topics 1.0, and 0.5 for every label.
    #[must_use]
    pub fn defaults_for(labels: &[String]) -> Self {
        Self {
            reserved: ReservedWeights::default(),
            topics: labels
                .iter()
                .map(|label| (label.clone(), DEFAULT_TOPIC_WEIGHT))
                .collect(),
        }
    }

    /// Splits a flat key/weight mapping into reserved and topic weights.
    ///
    /// # Errors
    /// Returns [`ScoreError::MissingReservedWeight`] if a reserved key is
    /// absent and [`ScoreError::NonFiniteWeight`] for NaN or infinity.
    pub fn from_map<I>(map: I) -> Result<Self, ScoreError>
    where
        I: IntoIterator<Item = (String, f64)>,
    {
        let mut topics: BTreeMap<String, f64> = map.into_iter().collect();
        for (key, value) in &topics {
            check_finite(key, *value)?;
        }
        let mut take = |key: &'static str| {
            topics
                .remove(key)
                .ok_or(ScoreError::MissingReservedWeight { key })
        };
        let reserved = ReservedWeights {
            cites: take(CITES_KEY)?,
            recency: take(RECENCY_KEY)?,
            topics: take(TOPICS_KEY)?,
        };
        Ok(Self { reserved, topics })
    }

    /// Parses a flat JSON object such as `{"cites": 0.5, "recency": 0.2,
    /// "topics": 1, "0_graphs": 0.8}`.
    ///
    /// # Errors
    /// Returns [`ScoreError::WeightFile`] if the text is not an object of
    /// numbers, or any error from [`Self::from_map`].
    pub fn from_json(raw: &str, origin: &Path) -> Result<Self, ScoreError> {
        let map: BTreeMap<String, f64> =
            serde_json::from_str(raw).map_err(|error| ScoreError::WeightFile {
                path: origin.to_path_buf(),
                reason: error.to_string(),
            })?;
        Self::from_map(map)
    }

    /// Reads a JSON weight file.
    ///
    /// # Errors
    /// Returns [`ScoreError::WeightFile`] if the file cannot be read or parsed.
    #[instrument]
    pub fn load(path: &Path) -> Result<Self, ScoreError> {
        let raw = std::fs::read_to_string(path).map_err(|error| ScoreError::WeightFile {
            path: path.to_path_buf(),
            reason: error.to_string(),
        })?;
        let weights = Self::from_json(&raw, path)?;
        debug!(topics = weights.topics.len(), "Weights loaded");
        Ok(weights)
    }

    /// Flat mapping with reserved keys alongside topic labels.
    #[must_use]
    pub fn to_map(&self) -> BTreeMap<String, f64> {
        let mut map = self.topics.clone();
        map.insert(CITES_KEY.to_string(), self.reserved.cites);
        map.insert(RECENCY_KEY.to_string(), self.reserved.recency);
        map.insert(TOPICS_KEY.to_string(), self.reserved.topics);
        map
    }

    /// Sets one weight; reserved keys address the reserved weights.
    ///
    /// # Errors
    /// Returns [`ScoreError::NonFiniteWeight`] for NaN or infinity.
    pub fn set(&mut self, key: &str, value: f64) -> Result<(), ScoreError> {
        check_finite(key, value)?;
        match key {
            CITES_KEY => self.reserved.cites = value,
            RECENCY_KEY => self.reserved.recency = value,
            TOPICS_KEY => self.reserved.topics = value,
            label => {
                self.topics.insert(label.to_string(), value);
            }
        }
        Ok(())
    }

    /// Checks every weight for finiteness and every topic key against the
    /// labels of the current fit.
    ///
    /// # Errors
    /// Returns [`ScoreError::UnknownTopicWeight`] for a label not in `labels`,
    /// with the closest known label as a suggestion, or
    /// [`ScoreError::NonFiniteWeight`].
    pub fn validate_against(&self, labels: &[String]) -> Result<(), ScoreError> {
        check_finite(CITES_KEY, self.reserved.cites)?;
        check_finite(RECENCY_KEY, self.reserved.recency)?;
        check_finite(TOPICS_KEY, self.reserved.topics)?;
        for (label, value) in &self.topics {
            check_finite(label, *value)?;
            if !labels.iter().any(|known| known == label) {
                return Err(ScoreError::UnknownTopicWeight {
                    label: label.clone(),
                    suggestion: closest_label(label, labels),
                });
            }
        }
        Ok(())
    }
}

fn check_finite(key: &str, value: f64) -> Result<(), ScoreError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ScoreError::NonFiniteWeight {
            key: key.to_string(),
            value,
        })
    }
}

fn closest_label(label: &str, labels: &[String]) -> Option<String> {
    labels
        .iter()
        .map(|known| (strsim::normalized_levenshtein(label, known), known))
        .filter(|(similarity, _)| *similarity >= SUGGESTION_THRESHOLD)
        .max_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, known)| known.clone())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn labels() -> Vec<String> {
        vec!["0_graphs_neural".to_string(), "1_screening_llm".to_string()]
    }

    fn map(pairs: &[(&str, f64)]) -> Vec<(String, f64)> {
        pairs.iter().map(|(k, v)| ((*k).to_string(), *v)).collect()
    }

    #[test]
    fn test_defaults_for_labels() {
        let weights = WeightSpecification::defaults_for(&labels());
        assert!((weights.reserved.cites).abs() < f64::EPSILON);
        assert!((weights.reserved.recency).abs() < f64::EPSILON);
        assert!((weights.reserved.topics - 1.0).abs() < f64::EPSILON);
        assert_eq!(weights.topics.len(), 2);
        assert!(weights.topics.values().all(|w| (*w - 0.5).abs() < f64::EPSILON));
        assert!(weights.validate_against(&labels()).is_ok());
    }

    #[test]
    fn test_from_map_lifts_reserved_keys() {
        let weights = WeightSpecification::from_map(map(&[
            ("cites", 1.0),
            ("recency", 0.25),
            ("topics", 0.5),
            ("0_graphs_neural", 0.9),
        ]))
        .unwrap();
        assert!((weights.reserved.recency - 0.25).abs() < f64::EPSILON);
        assert_eq!(weights.topics.keys().collect::<Vec<_>>(), vec!["0_graphs_neural"]);
        assert_eq!(weights.to_map().len(), 4);
    }

    #[test]
    fn test_from_map_requires_every_reserved_key() {
        let result = WeightSpecification::from_map(map(&[("cites", 1.0), ("topics", 0.0)]));
        assert_eq!(
            result,
            Err(ScoreError::MissingReservedWeight { key: "recency" })
        );
    }

    #[test]
    fn test_from_map_rejects_nan() {
        let result = WeightSpecification::from_map(map(&[
            ("cites", f64::NAN),
            ("recency", 0.0),
            ("topics", 0.0),
        ]));
        assert!(
            matches!(result, Err(ScoreError::NonFiniteWeight { ref key, .. }) if key == "cites")
        );
    }

    #[test]
    fn test_validate_against_suggests_closest_label() {
        let mut weights = WeightSpecification::defaults_for(&labels());
        weights.set("0_graph_neural", 1.0).unwrap();
        let result = weights.validate_against(&labels());
        assert_eq!(
            result,
            Err(ScoreError::UnknownTopicWeight {
                label: "0_graph_neural".to_string(),
                suggestion: Some("0_graphs_neural".to_string()),
            })
        );
    }

    #[test]
    fn test_validate_against_without_close_label() {
        let mut weights = WeightSpecification::default();
        weights.set("soil", 1.0).unwrap();
        let result = weights.validate_against(&labels());
        assert!(matches!(
            result,
            Err(ScoreError::UnknownTopicWeight { suggestion: None, .. })
        ));
    }

    #[test]
    fn test_set_addresses_reserved_weights() {
        let mut weights = WeightSpecification::default();
        weights.set("cites", 0.7).unwrap();
        assert!((weights.reserved.cites - 0.7).abs() < f64::EPSILON);
        assert!(weights.topics.is_empty());
        assert!(weights.set("recency", f64::INFINITY).is_err());
    }

    #[test]
    fn test_load_json_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"cites": 1, "recency": 0.5, "topics": 0, "1_screening_llm": 0.3}}"#).unwrap();
        let weights = WeightSpecification::load(file.path()).unwrap();
        assert!((weights.reserved.cites - 1.0).abs() < f64::EPSILON);
        assert!((weights.topics["1_screening_llm"] - 0.3).abs() < f64::EPSILON);
    }

    #[test]
    fn test_load_rejects_non_numeric_values() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"cites": "high", "recency": 0, "topics": 0}}"#).unwrap();
        assert!(matches!(
            WeightSpecification::load(file.path()),
            Err(ScoreError::WeightFile { .. })
        ));
    }
}
