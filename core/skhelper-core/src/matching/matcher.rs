//! Multi-tier identity matcher.
//!
//! ## Tiers
//!
//! Evaluated in order, first success wins:
//!
//! 1. **Exact**: loose keys of query and candidate are equal.
//! 2. **Fuzzy**: best similarity ratio strictly above [`FUZZY_THRESHOLD`].
//! 3. **Levenshtein**: smallest edit distance strictly below [`DISTANCE_THRESHOLD`].
//! 4. **Interactive**: the user picks from the candidate list (attended only).
//! 5. **Best effort**: the tier 3 winner, for unattended runs only.
//!
//! Ties in tiers 2 and 3 go to the first candidate reaching the extremal score.
//! Tiers 2, 3 and 5 only run when `allow_fuzzy_tiers` is set.

use serde::Serialize;

use super::normalize::{fold_case, match_key, normalize_game_name};
use super::similarity::{EditScorer, Scorer};
use super::SearchCandidate;

/// Fuzzy ratio a candidate must strictly exceed to be accepted.
pub const FUZZY_THRESHOLD: u8 = 88;
/// Edit distance a candidate must stay strictly below to be accepted.
pub const DISTANCE_THRESHOLD: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    Exact,
    FuzzyStrong,
    LevenshteinClose,
    UserChosen,
    BestEffort,
    Unresolved,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMethod {
    LooseKey,
    SimilarityRatio,
    EditDistance,
    Chooser,
    ClosestDistance,
    None,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchResult {
    pub status: MatchStatus,
    pub catalog_id: Option<String>,
    pub method: MatchMethod,
    /// Ratio for fuzzy matches, edit distance for distance-based matches.
    pub confidence: Option<f64>,
}

impl MatchResult {
    fn found(
        status: MatchStatus,
        method: MatchMethod,
        candidate: &SearchCandidate,
        confidence: Option<f64>,
    ) -> Self {
        Self {
            status,
            catalog_id: Some(candidate.catalog_id.clone()),
            method,
            confidence,
        }
    }

    pub fn unresolved() -> Self {
        Self {
            status: MatchStatus::Unresolved,
            catalog_id: None,
            method: MatchMethod::None,
            confidence: None,
        }
    }
}

/// Interactive picker shown when no automatic tier matched.
pub trait Chooser {
    /// Returns the selected catalog id, or `None` when the user cancels.
    fn choose(&self, query: &str, candidates: &[SearchCandidate]) -> Option<String>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchOptions {
    pub allow_fuzzy_tiers: bool,
    /// Unattended run: the chooser is never shown and best effort is allowed.
    pub background: bool,
    /// Largest distance best effort may return. `None` accepts any distance.
    pub best_effort_ceiling: Option<usize>,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            allow_fuzzy_tiers: true,
            background: false,
            best_effort_ceiling: None,
        }
    }
}

pub struct IdentityMatcher<S: Scorer = EditScorer> {
    scorer: S,
    options: MatchOptions,
}

impl IdentityMatcher<EditScorer> {
    pub fn new(options: MatchOptions) -> Self {
        Self::with_scorer(EditScorer, options)
    }
}

impl<S: Scorer> IdentityMatcher<S> {
    pub fn with_scorer(scorer: S, options: MatchOptions) -> Self {
        Self { scorer, options }
    }

    /// Resolves `title` against `candidates`. Candidate names are expected to be
    /// normalized already (see [`SearchCandidate::new`]).
    pub fn resolve(
        &self,
        title: &str,
        candidates: &[SearchCandidate],
        chooser: Option<&dyn Chooser>,
    ) -> MatchResult {
        let query = normalize_game_name(title);
        let query_key = match_key(&query);

        if !query_key.is_empty() {
            if let Some(hit) = candidates
                .iter()
                .find(|c| match_key(&c.normalized_name) == query_key)
            {
                tracing::info!(title, id = %hit.catalog_id, matched = %hit.normalized_name, "Resolved catalog id via exact key");
                return MatchResult::found(MatchStatus::Exact, MatchMethod::LooseKey, hit, None);
            }
        }

        if candidates.is_empty() {
            tracing::info!(title, "No catalog candidates to match against");
            return MatchResult::unresolved();
        }

        let mut closest: Option<(&SearchCandidate, usize)> = None;
        if self.options.allow_fuzzy_tiers {
            let folded_query = fold_case(&query);
            let folded: Vec<String> = candidates
                .iter()
                .map(|c| fold_case(&c.normalized_name))
                .collect();

            let mut best_ratio: Option<(&SearchCandidate, u8)> = None;
            for (candidate, name) in candidates.iter().zip(&folded) {
                let score = self.scorer.ratio(&folded_query, name);
                if best_ratio.map_or(true, |(_, best)| score > best) {
                    best_ratio = Some((candidate, score));
                }
            }

            if let Some((hit, score)) = best_ratio.filter(|(_, s)| *s > FUZZY_THRESHOLD) {
                tracing::info!(title, id = %hit.catalog_id, score, "Resolved catalog id via fuzzy ratio");
                return MatchResult::found(
                    MatchStatus::FuzzyStrong,
                    MatchMethod::SimilarityRatio,
                    hit,
                    Some(f64::from(score)),
                );
            }

            for (candidate, name) in candidates.iter().zip(&folded) {
                let distance = self.scorer.distance(&folded_query, name);
                if closest.map_or(true, |(_, best)| distance < best) {
                    closest = Some((candidate, distance));
                }
            }

            if let Some((hit, distance)) = closest.filter(|(_, d)| *d < DISTANCE_THRESHOLD) {
                tracing::info!(title, id = %hit.catalog_id, distance, "Resolved catalog id via edit distance");
                return MatchResult::found(
                    MatchStatus::LevenshteinClose,
                    MatchMethod::EditDistance,
                    hit,
                    Some(distance as f64),
                );
            }
        }

        if !self.options.background {
            if let Some(chooser) = chooser {
                match chooser.choose(&query, candidates) {
                    Some(id) if !id.trim().is_empty() => {
                        tracing::info!(title, id = %id, "Catalog id chosen by user");
                        return MatchResult {
                            status: MatchStatus::UserChosen,
                            catalog_id: Some(id.trim().to_string()),
                            method: MatchMethod::Chooser,
                            confidence: None,
                        };
                    }
                    _ => tracing::debug!(title, "Chooser cancelled"),
                }
            }
        }

        if self.options.background {
            let ceiling = self.options.best_effort_ceiling;
            if let Some((hit, distance)) =
                closest.filter(|(_, d)| ceiling.map_or(true, |max| *d <= max))
            {
                tracing::info!(title, id = %hit.catalog_id, distance, "Using closest catalog candidate as best effort");
                return MatchResult::found(
                    MatchStatus::BestEffort,
                    MatchMethod::ClosestDistance,
                    hit,
                    Some(distance as f64),
                );
            }
        }

        tracing::info!(title, "Catalog id not found");
        MatchResult::unresolved()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::collections::HashMap;

    /// Scores looked up by folded candidate name.
    struct TableScorer {
        scores: HashMap<String, (u8, usize)>,
    }

    impl TableScorer {
        fn new(entries: &[(&str, u8, usize)]) -> Self {
            Self {
                scores: entries
                    .iter()
                    .map(|(name, ratio, distance)| (name.to_lowercase(), (*ratio, *distance)))
                    .collect(),
            }
        }
    }

    impl Scorer for TableScorer {
        fn ratio(&self, _a: &str, b: &str) -> u8 {
            self.scores.get(b).map_or(0, |s| s.0)
        }

        fn distance(&self, _a: &str, b: &str) -> usize {
            self.scores.get(b).map_or(usize::MAX, |s| s.1)
        }
    }

    struct FixedChooser {
        answer: Option<String>,
        calls: Cell<usize>,
    }

    impl FixedChooser {
        fn new(answer: Option<&str>) -> Self {
            Self {
                answer: answer.map(str::to_string),
                calls: Cell::new(0),
            }
        }
    }

    impl Chooser for FixedChooser {
        fn choose(&self, _query: &str, _candidates: &[SearchCandidate]) -> Option<String> {
            self.calls.set(self.calls.get() + 1);
            self.answer.clone()
        }
    }

    fn candidates(entries: &[(&str, &str)]) -> Vec<SearchCandidate> {
        entries
            .iter()
            .map(|(name, id)| SearchCandidate::new(*name, *id))
            .collect()
    }

    fn attended() -> MatchOptions {
        MatchOptions::default()
    }

    fn background() -> MatchOptions {
        MatchOptions {
            background: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_exact_wins_over_strong_fuzzy() {
        let list = candidates(&[("Hades II", "1145350"), ("HADES™", "1145360")]);
        let scorer = TableScorer::new(&[("Hades II", 99, 1), ("Hades", 10, 40)]);
        let matcher = IdentityMatcher::with_scorer(scorer, attended());

        let result = matcher.resolve("Hades", &list, None);
        assert_eq!(result.status, MatchStatus::Exact);
        assert_eq!(result.catalog_id.as_deref(), Some("1145360"));
    }

    #[test]
    fn test_fuzzy_89_beats_distance_5() {
        let list = candidates(&[("Alpha", "1"), ("Beta", "2")]);
        let scorer = TableScorer::new(&[("Alpha", 40, 9), ("Beta", 89, 5)]);
        let matcher = IdentityMatcher::with_scorer(scorer, attended());

        let result = matcher.resolve("Gamma", &list, None);
        assert_eq!(result.status, MatchStatus::FuzzyStrong);
        assert_eq!(result.catalog_id.as_deref(), Some("2"));
        assert_eq!(result.confidence, Some(89.0));
    }

    #[test]
    fn test_fuzzy_85_falls_to_distance_2() {
        let list = candidates(&[("Alpha", "1"), ("Beta", "2")]);
        let scorer = TableScorer::new(&[("Alpha", 85, 2), ("Beta", 30, 7)]);
        let matcher = IdentityMatcher::with_scorer(scorer, attended());

        let result = matcher.resolve("Gamma", &list, None);
        assert_eq!(result.status, MatchStatus::LevenshteinClose);
        assert_eq!(result.catalog_id.as_deref(), Some("1"));
        assert_eq!(result.confidence, Some(2.0));
    }

    #[test]
    fn test_threshold_88_is_not_enough() {
        let list = candidates(&[("Alpha", "1")]);
        let scorer = TableScorer::new(&[("Alpha", 88, 3)]);
        let matcher = IdentityMatcher::with_scorer(scorer, attended());

        assert_eq!(matcher.resolve("Gamma", &list, None).status, MatchStatus::Unresolved);
    }

    #[test]
    fn test_ties_resolve_to_first_candidate() {
        let list = candidates(&[("Alpha", "1"), ("Beta", "2"), ("Delta", "3")]);
        let scorer = TableScorer::new(&[("Alpha", 50, 2), ("Beta", 95, 4), ("Delta", 95, 2)]);
        let matcher = IdentityMatcher::with_scorer(scorer, attended());
        assert_eq!(matcher.resolve("Gamma", &list, None).catalog_id.as_deref(), Some("2"));

        let scorer = TableScorer::new(&[("Alpha", 50, 2), ("Beta", 60, 4), ("Delta", 60, 2)]);
        let matcher = IdentityMatcher::with_scorer(scorer, attended());
        assert_eq!(matcher.resolve("Gamma", &list, None).catalog_id.as_deref(), Some("1"));
    }

    #[test]
    fn test_chooser_selection_when_attended() {
        let list = candidates(&[("Alpha", "1"), ("Beta", "2")]);
        let scorer = TableScorer::new(&[("Alpha", 10, 9), ("Beta", 10, 9)]);
        let matcher = IdentityMatcher::with_scorer(scorer, attended());
        let chooser = FixedChooser::new(Some("2"));

        let result = matcher.resolve("Gamma", &list, Some(&chooser));
        assert_eq!(result.status, MatchStatus::UserChosen);
        assert_eq!(result.catalog_id.as_deref(), Some("2"));
        assert_eq!(chooser.calls.get(), 1);
    }

    #[test]
    fn test_chooser_cancel_is_unresolved_when_attended() {
        let list = candidates(&[("Alpha", "1")]);
        let scorer = TableScorer::new(&[("Alpha", 10, 9)]);
        let matcher = IdentityMatcher::with_scorer(scorer, attended());
        let chooser = FixedChooser::new(None);

        let result = matcher.resolve("Gamma", &list, Some(&chooser));
        assert_eq!(result.status, MatchStatus::Unresolved);
        assert!(result.catalog_id.is_none());
    }

    #[test]
    fn test_background_never_prompts_and_uses_best_effort() {
        let list = candidates(&[("Alpha", "1"), ("Beta", "2")]);
        let scorer = TableScorer::new(&[("Alpha", 20, 12), ("Beta", 30, 7)]);
        let matcher = IdentityMatcher::with_scorer(scorer, background());
        let chooser = FixedChooser::new(Some("1"));

        let result = matcher.resolve("Gamma", &list, Some(&chooser));
        assert_eq!(result.status, MatchStatus::BestEffort);
        assert_eq!(result.catalog_id.as_deref(), Some("2"));
        assert_eq!(result.confidence, Some(7.0));
        assert_eq!(chooser.calls.get(), 0);
    }

    #[test]
    fn test_best_effort_respects_ceiling() {
        let list = candidates(&[("Alpha", "1")]);
        let scorer = TableScorer::new(&[("Alpha", 20, 12)]);
        let options = MatchOptions {
            best_effort_ceiling: Some(10),
            ..background()
        };
        let matcher = IdentityMatcher::with_scorer(scorer, options);

        assert_eq!(matcher.resolve("Gamma", &list, None).status, MatchStatus::Unresolved);
    }

    #[test]
    fn test_best_effort_requires_fuzzy_tiers() {
        let list = candidates(&[("Alpha", "1")]);
        let scorer = TableScorer::new(&[("Alpha", 99, 0)]);
        let options = MatchOptions {
            allow_fuzzy_tiers: false,
            ..background()
        };
        let matcher = IdentityMatcher::with_scorer(scorer, options);

        assert_eq!(matcher.resolve("Gamma", &list, None).status, MatchStatus::Unresolved);
    }

    #[test]
    fn test_empty_candidates_are_unresolved() {
        let matcher = IdentityMatcher::new(background());
        let chooser = FixedChooser::new(Some("1"));
        let result = matcher.resolve("Celeste", &[], Some(&chooser));
        assert_eq!(result, MatchResult::unresolved());
        assert_eq!(chooser.calls.get(), 0);
    }

    #[test]
    fn test_default_scorer_end_to_end() {
        let list = candidates(&[
            ("Portal 2", "620"),
            ("Portal", "400"),
            ("Portal Stories: Mel", "317400"),
        ]);
        let matcher = IdentityMatcher::new(attended());

        let result = matcher.resolve("PORTAL® 2", &list, None);
        assert_eq!(result.status, MatchStatus::Exact);
        assert_eq!(result.catalog_id.as_deref(), Some("620"));

        let result = matcher.resolve("Portl 2", &list, None);
        assert_eq!(result.status, MatchStatus::FuzzyStrong);
        assert_eq!(result.catalog_id.as_deref(), Some("620"));
    }
}
