//! Intent matching.
//!
//! Free text is resolved to an intent in two passes: case-folded keyword
//! containment in catalog order, then fuzzy similarity against every keyword.

mod scorer;

pub use scorer::{
    SimilarityScorer, WeightedRatio, partial_ratio, ratio, token_set_ratio, token_sort_ratio,
    weighted_ratio,
};

use crate::knowledge::KnowledgeBase;
use indexmap::IndexMap;

/// Minimum fuzzy score (inclusive) for a keyword to count as a match.
pub const DEFAULT_FUZZY_THRESHOLD: f64 = 60.0;

/// Longer inputs skip the fuzzy pass and only get keyword containment.
pub const MAX_FUZZY_INPUT_CHARS: usize = 512;

/// How an intent was matched.
#[derive(Debug, Clone, PartialEq)]
pub enum MatchKind {
    /// A keyword occurred verbatim in the input.
    Keyword,
    /// The best fuzzy score met the threshold.
    Fuzzy { score: f64 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct IntentMatch {
    pub intent: String,
    pub keyword: String,
    pub kind: MatchKind,
}

/// Resolves user input to intent names.
pub struct IntentMatcher<S = WeightedRatio> {
    scorer: S,
    threshold: f64,
}

impl IntentMatcher<WeightedRatio> {
    pub fn new() -> Self {
        Self::with_scorer(WeightedRatio, DEFAULT_FUZZY_THRESHOLD)
    }
}

impl Default for IntentMatcher<WeightedRatio> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: SimilarityScorer> IntentMatcher<S> {
    pub fn with_scorer(scorer: S, threshold: f64) -> Self {
        Self { scorer, threshold }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Returns the matched intent name, or `None` when nothing is close enough.
    pub fn find(&self, input: &str, kb: &KnowledgeBase) -> Option<String> {
        self.find_match(input, kb).map(|found| found.intent)
    }

    /// Like [`find`](Self::find), but reports which keyword matched and how.
    pub fn find_match(&self, input: &str, kb: &KnowledgeBase) -> Option<IntentMatch> {
        let query = input.to_lowercase();

        for (intent, entry) in kb.iter() {
            for keyword in &entry.keywords {
                let keyword = keyword.to_lowercase();
                if !keyword.is_empty() && query.contains(&keyword) {
                    return Some(IntentMatch {
                        intent: intent.to_string(),
                        keyword,
                        kind: MatchKind::Keyword,
                    });
                }
            }
        }

        if query.trim().is_empty() {
            return None;
        }

        let length = query.chars().count();
        if length > MAX_FUZZY_INPUT_CHARS {
            tracing::debug!(length, "input too long for fuzzy matching");
            return None;
        }

        // A keyword shared by several intents belongs to the last one in catalog
        // order but keeps the position of its first occurrence.
        let mut owners: IndexMap<String, &str> = IndexMap::new();
        for (intent, entry) in kb.iter() {
            for keyword in &entry.keywords {
                let keyword = keyword.to_lowercase();
                if !keyword.is_empty() {
                    owners.insert(keyword, intent);
                }
            }
        }

        // On equal scores the earlier keyword wins.
        let mut best: Option<(f64, &str, String)> = None;
        for (keyword, intent) in owners {
            let score = self.scorer.score(&query, &keyword);
            if best.as_ref().is_none_or(|(top, _, _)| score > *top) {
                best = Some((score, intent, keyword));
            }
        }

        let (score, intent, keyword) = best?;
        tracing::debug!(intent, keyword = %keyword, score, "best fuzzy keyword");
        (score >= self.threshold).then(|| IntentMatch {
            intent: intent.to_string(),
            keyword,
            kind: MatchKind::Fuzzy { score },
        })
    }
}
