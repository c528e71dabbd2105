//! Litrank Core Library
//!
//! Triage for literature reviews: read a Scopus or Web of Science RIS
//! export, model the topics of its abstracts, score every paper by citation
//! impact, recency and topic relevance, and export a shortlist that can be
//! imported back into a reference manager.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`ris`] - RIS tagged-field reader and writer
//! - [`corpus`] - Canonical records and the export normalizer
//! - [`topics`] - Topic engines, hyperparameter scaling, integration and reports
//! - [`scoring`] - Weight specification and the multi-criteria ranker
//! - [`export`] - Shortlist CSV, round-trip RIS and output directories
//! - [`eda`] - Descriptive summary tables

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod corpus;
pub mod eda;
pub mod export;
pub mod ris;
pub mod scoring;
pub mod topics;

// Re-export commonly used types
pub use corpus::{BibliographicRecord, CorpusTable, IngestPolicy, RowId, SourceSchema, normalize};
pub use export::{Shortlist, ShortlistExport, export};
pub use ris::{RisEntry, load_ris_file, parse_ris, write_ris};
pub use scoring::{Ranking, ScoringOptions, WeightSpecification, score};
pub use topics::{
    IntegratedCorpus, KeywordTopicEngine, PrecomputedTopics, TopicEngine, TopicEngineError,
    integrate, run_topic_fit, scale,
};
