//! Swipe-to-word decoding: letter-sequence normalization plus an exact
//! pattern table.
//!
//! The table is a placeholder ranking source. It can be replaced (as a JSON
//! resource) without touching the gesture tracker or the session; an empty
//! decode result means "nothing to commit" and is never an error.

use std::collections::HashMap;

use tracing::debug;

use crate::gesture::KeyHit;
use crate::suggest::TableError;

/// Swiped-letter patterns and the words they decode to.
static DEFAULT_PATTERNS: &[(&str, &str)] = &[
    ("helo", "hello"),
    ("hllo", "hello"),
    ("adn", "and"),
    ("nad", "and"),
    ("teh", "the"),
    ("hte", "the"),
    ("yuo", "you"),
    ("oyu", "you"),
    ("aer", "are"),
    ("rae", "are"),
    ("ot", "to"),
    ("fro", "for"),
    ("ofr", "for"),
    ("wiht", "with"),
    ("whit", "with"),
    ("taht", "that"),
    ("htat", "that"),
    ("tihs", "this"),
    ("htis", "this"),
    ("ahve", "have"),
    ("haev", "have"),
    ("form", "from"),
    ("fomr", "from"),
    ("tehy", "they"),
    ("yhte", "they"),
    ("konw", "know"),
    ("nkow", "know"),
    ("wnat", "want"),
    ("awnt", "want"),
    ("eben", "been"),
    ("neeb", "been"),
    ("godo", "good"),
    ("ogod", "good"),
    ("muhc", "much"),
    ("mcuh", "much"),
    ("soem", "some"),
    ("mose", "some"),
    ("tmie", "time"),
    ("itme", "time"),
    ("vrey", "very"),
    ("yrev", "very"),
    ("wehn", "when"),
    ("hwne", "when"),
    ("coem", "come"),
    ("moce", "come"),
    ("hree", "here"),
    ("ehre", "here"),
    ("jsut", "just"),
    ("ujst", "just"),
    ("lkie", "like"),
    ("ilke", "like"),
    ("ovre", "over"),
    ("roev", "over"),
    ("aslo", "also"),
    ("laso", "also"),
    ("bakc", "back"),
    ("cabk", "back"),
    ("afetr", "after"),
    ("atfer", "after"),
    ("ues", "use"),
    ("seu", "use"),
    ("tow", "two"),
    ("wto", "two"),
    ("hwo", "how"),
    ("ohw", "how"),
    ("oru", "our"),
    ("uro", "our"),
    ("wokr", "work"),
    ("rwok", "work"),
    ("frist", "first"),
    ("fisrt", "first"),
    ("wlel", "well"),
    ("ewll", "well"),
    ("wya", "way"),
    ("awy", "way"),
    ("nwe", "new"),
    ("enw", "new"),
    ("yaer", "year"),
    ("yrea", "year"),
    ("woudl", "would"),
    ("wolud", "would"),
    ("poeple", "people"),
    ("peolpe", "people"),
    ("htink", "think"),
    ("wheer", "where"),
    ("hwere", "where"),
    ("beign", "being"),
    ("nwo", "now"),
    ("onw", "now"),
    ("amke", "make"),
    ("meak", "make"),
    ("mots", "most"),
    ("omst", "most"),
    ("gte", "get"),
    ("teg", "get"),
    ("ese", "see"),
    ("ees", "see"),
    ("hmi", "him"),
    ("ihm", "him"),
    ("ahs", "has"),
    ("sha", "has"),
    ("ahd", "had"),
    ("dha", "had"),
];

/// Exact-match pattern table, replaceable independently of the tracker and
/// the session.
#[derive(Debug, Clone)]
pub struct SwipePatternTable {
    map: HashMap<String, String>,
}

impl Default for SwipePatternTable {
    fn default() -> Self {
        Self::from_pairs(
            DEFAULT_PATTERNS
                .iter()
                .map(|&(k, v)| (k.to_string(), v.to_string())),
        )
    }
}

impl SwipePatternTable {
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        Self {
            map: pairs.into_iter().collect(),
        }
    }

    /// Load a replacement table from a JSON object of pattern to word.
    pub fn from_json(json: &str) -> Result<Self, TableError> {
        let map: HashMap<String, String> = serde_json::from_str(json)?;
        Ok(Self { map })
    }

    pub fn get(&self, pattern: &str) -> Option<&str> {
        self.map.get(pattern).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

/// Turns a touched-key sequence into a candidate word.
#[derive(Debug, Clone)]
pub struct SwipeDecoder {
    table: std::sync::Arc<SwipePatternTable>,
}

impl Default for SwipeDecoder {
    fn default() -> Self {
        Self::new(std::sync::Arc::new(SwipePatternTable::default()))
    }
}

impl SwipeDecoder {
    pub fn new(table: std::sync::Arc<SwipePatternTable>) -> Self {
        Self { table }
    }

    /// Decode a touched-key sequence. An empty result means no commit and
    /// no suggestion request; the caller treats it as a no-op.
    pub fn decode(&self, hits: &[KeyHit]) -> String {
        let letters: String = hits
            .iter()
            .map(|h| h.key)
            .filter(|c| c.is_alphabetic())
            .flat_map(char::to_lowercase)
            .collect();
        self.decode_letters(&letters)
    }

    /// Same as [`decode`](Self::decode) on an already-collected lowercase
    /// letter sequence. Used by the diagnostics CLI.
    pub fn decode_letters(&self, letters: &str) -> String {
        if let Some(word) = self.table.get(letters) {
            debug!(letters, word, "pattern table hit");
            return word.to_string();
        }
        if letters.chars().count() > 1 {
            letters.to_string()
        } else {
            String::new()
        }
    }
}
