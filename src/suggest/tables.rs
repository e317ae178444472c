//! Ranking tables: typo corrections, contextual predictions, and the
//! completion vocabulary.
//!
//! The tables are data, not code. They are read-only after load, shared
//! across sessions behind an `Arc`, and replaceable as a unit from a JSON
//! resource; swapping them changes suggestions and nothing else. Candidate
//! order inside a prediction list is the ranking, so lists stay vectors.

use std::collections::HashMap;

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TableError {
    #[error("malformed table JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

static CORRECTIONS: &[(&str, &str)] = &[
    ("teh", "the"),
    ("adn", "and"),
    ("hte", "the"),
    ("taht", "that"),
    ("thier", "their"),
    ("recieve", "receive"),
    ("seperate", "separate"),
    ("definately", "definitely"),
    ("occured", "occurred"),
    ("begining", "beginning"),
    ("wnat", "want"),
    ("freind", "friend"),
    ("becuase", "because"),
];

static PREDICTIONS: &[(&str, &[&str])] = &[
    ("the", &["best", "first", "same", "only"]),
    ("i", &["am", "have", "will", "think"]),
    ("you", &["are", "can", "have", "know"]),
    ("to", &["be", "get", "do", "see"]),
    ("and", &["the", "then", "i"]),
    ("a", &["lot", "few", "little", "good"]),
    ("of", &["the", "a", "course"]),
    ("in", &["the", "a", "my"]),
    ("it", &["is", "was", "would"]),
    ("is", &["a", "the", "not"]),
    ("this", &["is", "was", "one"]),
    ("that", &["is", "was", "the"]),
    ("have", &["a", "been", "to"]),
    ("how", &["are", "do", "much"]),
    ("what", &["is", "do", "are"]),
    ("good", &["morning", "luck", "night"]),
    ("thank", &["you"]),
    ("see", &["you", "the"]),
    ("for", &["the", "a", "me"]),
    ("on", &["the", "a", "my"]),
    ("my", &["own", "way", "first"]),
    ("we", &["are", "have", "can"]),
    ("they", &["are", "have", "were"]),
    ("at", &["the", "least", "all"]),
    ("be", &["a", "the", "able"]),
    ("was", &["a", "the", "not"]),
    ("so", &["much", "far", "many"]),
    ("can", &["be", "you", "help"]),
    ("not", &["the", "a", "sure"]),
    ("just", &["a", "the", "one"]),
    ("hello", &["there", "everyone", "again"]),
];

static VOCABULARY: &[&str] = &[
    "about", "after", "again", "all", "also", "always", "and", "another", "any", "are", "around",
    "back", "because", "been", "before", "being", "best", "better", "between", "both", "but",
    "came", "can", "come", "could", "day", "did", "different", "down", "each", "even", "every",
    "first", "for", "from", "get", "give", "good", "great", "had", "has", "have", "hello", "help",
    "her", "here", "him", "his", "home", "house", "how", "into", "just", "know", "last", "life",
    "like", "little", "long", "look", "made", "make", "many", "may", "more", "most", "much",
    "must", "never", "new", "night", "now", "off", "old", "only", "other", "our", "out", "over",
    "own", "people", "place", "right", "said", "same", "see", "she", "should", "since", "some",
    "still", "such", "take", "than", "thank", "thanks", "that", "the", "their", "them", "then",
    "there", "these", "they", "thing", "think", "this", "those", "three", "through", "time",
    "today", "together", "too", "two", "under", "until", "use", "very", "want", "was", "way",
    "week", "well", "went", "were", "what", "when", "where", "which", "while", "who", "why",
    "will", "with", "word", "work", "world", "would", "year", "your",
];

/// The three suggestion tables, keyed by case-folded words.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LexiconTables {
    corrections: HashMap<String, String>,
    predictions: HashMap<String, Vec<String>>,
    vocabulary: Vec<String>,
}

impl Default for LexiconTables {
    fn default() -> Self {
        Self {
            corrections: CORRECTIONS
                .iter()
                .map(|&(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            predictions: PREDICTIONS
                .iter()
                .map(|&(k, vs)| (k.to_string(), vs.iter().map(|&v| v.to_string()).collect()))
                .collect(),
            vocabulary: VOCABULARY.iter().map(|&w| w.to_string()).collect(),
        }
    }
}

impl LexiconTables {
    /// Load replacement tables from JSON. Missing top-level fields keep the
    /// built-in data for that table.
    pub fn from_json(json: &str) -> Result<Self, TableError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn correction_for(&self, folded_word: &str) -> Option<&str> {
        self.corrections.get(folded_word).map(String::as_str)
    }

    /// Next-word candidates for a context word, best first. Empty when the
    /// word is unknown.
    pub fn predictions_for(&self, folded_word: &str) -> &[String] {
        self.predictions
            .get(folded_word)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// The completion vocabulary in declaration order.
    pub fn vocabulary(&self) -> &[String] {
        &self.vocabulary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_tables_are_populated() {
        let tables = LexiconTables::default();
        assert_eq!(tables.correction_for("teh"), Some("the"));
        assert_eq!(tables.correction_for("the"), None);
        assert_eq!(tables.predictions_for("good"), &["morning", "luck", "night"]);
        assert!(tables.predictions_for("xyzzy").is_empty());
        assert!(tables.vocabulary().contains(&"hello".to_string()));
    }

    #[test]
    fn test_from_json_replaces_tables() {
        let json = r#"{
            "corrections": {"huose": "house"},
            "predictions": {"open": ["the", "a"]},
            "vocabulary": ["open", "opened", "opening"]
        }"#;
        let tables = LexiconTables::from_json(json).unwrap();
        assert_eq!(tables.correction_for("huose"), Some("house"));
        assert_eq!(tables.correction_for("teh"), None);
        assert_eq!(tables.predictions_for("open"), &["the", "a"]);
        assert_eq!(tables.vocabulary().len(), 3);
    }

    #[test]
    fn test_from_json_partial_keeps_builtin_rest() {
        let tables = LexiconTables::from_json(r#"{"vocabulary": ["alpha"]}"#).unwrap();
        assert_eq!(tables.vocabulary(), &["alpha"]);
        // the other tables fall back to the built-in data
        assert_eq!(tables.correction_for("teh"), Some("the"));
    }

    #[test]
    fn test_from_json_malformed_is_an_error() {
        assert!(LexiconTables::from_json("[1, 2]").is_err());
    }
}
