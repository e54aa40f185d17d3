//! Knowledge base domain model.
//!
//! A knowledge base is one language's catalog of intents. Catalog order is
//! significant: the intent matcher uses it as its tie-break, so the map keeps
//! the order in which intents appear in the source document.

use crate::error::Result;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A yes/no clarifying question attached to an intent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Followup {
    /// Question shown to the user
    pub question: String,
    /// Intent started when the answer is affirmative
    #[serde(default)]
    pub yes_intent: Option<String>,
    /// Intent started when the answer is negative
    #[serde(default)]
    pub no_intent: Option<String>,
}

/// Instructions for a single intent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entry {
    pub keywords: Vec<String>,
    pub steps: Vec<String>,
    pub followups: Vec<Followup>,
    pub escalation: Option<String>,
}

impl Entry {
    /// The first declared follow-up, if any.
    pub fn first_followup(&self) -> Option<&Followup> {
        self.followups.first()
    }
}

/// Entry as it appears in a catalog document, before defaults are applied.
#[derive(Debug, Deserialize)]
struct RawEntry {
    #[serde(default)]
    keywords: Option<Vec<String>>,
    #[serde(default)]
    steps: Vec<String>,
    #[serde(default)]
    followups: Option<Vec<Followup>>,
    #[serde(default)]
    escalation: Option<String>,
}

impl RawEntry {
    fn into_entry(self, intent: &str) -> Entry {
        Entry {
            // Only an absent list falls back to the intent name; an explicit
            // empty list means the intent is reachable through follow-ups only.
            keywords: self.keywords.unwrap_or_else(|| vec![intent.to_string()]),
            steps: self.steps,
            followups: self.followups.unwrap_or_default(),
            escalation: self.escalation.filter(|text| !text.is_empty()),
        }
    }
}

/// An immutable, language-specific intent catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct KnowledgeBase {
    lang: String,
    entries: IndexMap<String, Entry>,
}

impl KnowledgeBase {
    /// Builds a knowledge base from already-normalized entries.
    pub fn new(lang: impl Into<String>, entries: IndexMap<String, Entry>) -> Self {
        Self {
            lang: lang.into(),
            entries,
        }
    }

    /// Parses a catalog document (`{ intent: { keywords, steps, followups, escalation } }`).
    pub fn from_json(lang: impl Into<String>, source: &str) -> Result<Self> {
        let raw: IndexMap<String, RawEntry> = serde_json::from_str(source)?;
        let entries = raw
            .into_iter()
            .map(|(intent, entry)| {
                let entry = entry.into_entry(&intent);
                (intent, entry)
            })
            .collect();
        Ok(Self::new(lang, entries))
    }

    /// Language code of the catalog this knowledge base was read from.
    pub fn lang(&self) -> &str {
        &self.lang
    }

    pub fn get(&self, intent: &str) -> Option<&Entry> {
        self.entries.get(intent)
    }

    pub fn contains(&self, intent: &str) -> bool {
        self.entries.contains_key(intent)
    }

    /// Iterates intents in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Entry)> {
        self.entries.iter().map(|(name, entry)| (name.as_str(), entry))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
