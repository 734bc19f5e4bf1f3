//! Catalog identity resolution.
//!
//! Resolves a free-text game title to a catalog id through a fixed pipeline:
//!
//! ```text
//! exact key → fuzzy ratio (> 88) → edit distance (< 3) → chooser → best effort → unresolved
//! ```
//!
//! # Module Structure
//!
//! - [`normalize`]: title canonicalization and the loose comparison key
//! - [`similarity`]: ratio and edit-distance scoring
//! - [`matcher`]: the tier pipeline itself

pub mod matcher;
pub mod normalize;
pub mod similarity;

use serde::{Deserialize, Serialize};

pub use matcher::{Chooser, IdentityMatcher, MatchMethod, MatchOptions, MatchResult, MatchStatus};
pub use normalize::{fold_case, match_key, normalize_game_name};
pub use similarity::{levenshtein_distance, similarity_ratio, EditScorer, Scorer};

/// One catalog search hit. Produced per search call and discarded after matching.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchCandidate {
    pub raw_name: String,
    pub normalized_name: String,
    pub catalog_id: String,
}

impl SearchCandidate {
    pub fn new(raw_name: impl Into<String>, catalog_id: impl Into<String>) -> Self {
        let raw_name = raw_name.into();
        Self {
            normalized_name: normalize_game_name(&raw_name),
            raw_name,
            catalog_id: catalog_id.into(),
        }
    }
}
