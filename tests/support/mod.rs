//! Shared fixtures: a small Scopus export and a matching precomputed topic run.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

/// Four records; the last has no abstract.
pub const SCOPUS_EXPORT: &str = "\
TY  - JOUR
TI  - Graph neural networks for citation screening
AU  - Smith, J.
AU  - Doe, A.
PY  - 2021
T2  - Journal of Reviews
VL  - 12
SP  - 1
EP  - 10
AB  - Graph neural networks rank citation graphs for systematic review screening.
N1  - Export Date: 1 May 2023; Cited By: 40
KW  - graphs
DO  - 10.1000/a
ER  -

TY  - JOUR
TI  - Large language models screen abstracts
AU  - Lee, K.
PY  - 2023
T2  - Journal of Reviews
AB  - Large language models screen abstracts for systematic reviews with high recall.
N1  - Export Date: 1 May 2023; Cited By: 5
ER  -

TY  - CONF
TI  - Topic models for literature reviews
AU  - Smith, J.
PY  - 2019
T2  - Proceedings of Mining
AB  - Topic models summarize large literature collections for reviewers.
N1  - Export Date: 1 May 2023; Cited By: 12
ER  -

TY  - JOUR
TI  - Editorial
PY  - 2022
T2  - Journal of Reviews
N1  - Export Date: 1 May 2023; Cited By: 0
ER  -
";

/// Topic run over rows 0..=2 of [`SCOPUS_EXPORT`]; row 2 is an outlier.
pub const TOPICS_JSON: &str = r#"{
  "labels": {"-1": "-1_misc", "0": "0_graph_screening", "1": "1_language_models"},
  "keywords": {"0": ["graph", "screening"], "1": ["language", "models"]},
  "representative_docs": {"0": ["Graph neural networks rank citation graphs."]},
  "documents": [
    {"row": 0, "topic": 0, "probability": 0.9, "distribution": [0.9, 0.1]},
    {"row": 1, "topic": 1, "probability": 0.8, "distribution": [0.2, 0.8]},
    {"row": 2, "topic": -1, "probability": 0.3, "distribution": [0.3, 0.3]}
  ]
}"#;

/// Writes `contents` to `dir/name` and returns the path.
pub fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).unwrap();
    path
}
