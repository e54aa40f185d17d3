//! Yes/no interpretation of follow-up answers.
//!
//! Answers are matched against a per-language lexicon. Severity terms count
//! as an affirmative answer even when no yes/no word is present, and
//! anything unrecognized is treated as a negative answer.

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Sentence terminators stripped from the end of an answer (Latin and Ethiopic).
const TERMINATORS: &[char] = &['.', '!', '?', '።', '፧', '፨'];

/// Terms that describe a severe symptom, in every supported language.
const SEVERITY_TERMS: &[&str] = &["heavy", "spurting", "ከባድ", "ዘይሳሕ"];

/// Yes/no vocabulary for one language.
#[derive(Debug, Clone, Default)]
pub struct LanguageLexicon {
    pub positives: Vec<String>,
    pub negatives: Vec<String>,
}

impl LanguageLexicon {
    fn new(positives: &[&str], negatives: &[&str]) -> Self {
        Self {
            positives: positives.iter().map(|word| word.to_string()).collect(),
            negatives: negatives.iter().map(|word| word.to_string()).collect(),
        }
    }
}

static BUILTIN_LEXICONS: Lazy<HashMap<&'static str, LanguageLexicon>> = Lazy::new(|| {
    HashMap::from([
        (
            "en",
            LanguageLexicon::new(&["yes", "y", "ya", "yep", "sure"], &["no", "n", "not", "nope"]),
        ),
        ("ti", LanguageLexicon::new(&["እወ", "yes"], &["ኣይ", "ኖኖ"])),
        ("am", LanguageLexicon::new(&["አዎ", "yes"], &["አይ", "ኖኖ"])),
    ])
});

/// How an answer was classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarity {
    Affirmative,
    Negative,
    /// No yes/no word, but the answer describes a severe symptom.
    Severe,
    Unrecognized,
}

impl Polarity {
    pub fn is_positive(self) -> bool {
        matches!(self, Polarity::Affirmative | Polarity::Severe)
    }
}

/// Interprets follow-up answers against localized yes/no word lists.
#[derive(Debug, Clone)]
pub struct FollowupResolver {
    lexicons: HashMap<String, LanguageLexicon>,
    severity_terms: Vec<String>,
}

impl Default for FollowupResolver {
    fn default() -> Self {
        Self {
            lexicons: BUILTIN_LEXICONS
                .iter()
                .map(|(lang, lexicon)| (lang.to_string(), lexicon.clone()))
                .collect(),
            severity_terms: SEVERITY_TERMS.iter().map(|term| term.to_string()).collect(),
        }
    }
}

impl FollowupResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces the lexicon for `lang`.
    pub fn with_lexicon(mut self, lang: impl Into<String>, lexicon: LanguageLexicon) -> Self {
        self.lexicons.insert(lang.into(), lexicon);
        self
    }

    pub fn is_positive(&self, answer: &str, lang: &str) -> bool {
        self.classify(answer, lang).is_positive()
    }

    pub fn classify(&self, answer: &str, lang: &str) -> Polarity {
        let answer = normalize(answer);
        let matches = |words: &[String]| {
            words
                .iter()
                .any(|word| answer == *word || answer.starts_with(word.as_str()))
        };

        if let Some(lexicon) = self.lexicons.get(lang) {
            if matches(&lexicon.positives) {
                return Polarity::Affirmative;
            }
            if matches(&lexicon.negatives) {
                return Polarity::Negative;
            }
        }

        if self
            .severity_terms
            .iter()
            .any(|term| answer.contains(term.as_str()))
        {
            return Polarity::Severe;
        }

        Polarity::Unrecognized
    }
}

fn normalize(answer: &str) -> String {
    answer
        .trim()
        .trim_end_matches(TERMINATORS)
        .trim_end()
        .to_lowercase()
}
