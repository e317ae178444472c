//! Staged suggestion generation: corrections, contextual predictions, and
//! prefix completions over shared read-only tables.

mod tables;

pub use tables::{LexiconTables, TableError};

use std::sync::Arc;

use tracing::{debug, debug_span};

/// Upper bound on one response. Earlier stages are never evicted by later
/// ones.
pub const MAX_SUGGESTIONS: usize = 5;

/// Which stage produced a suggestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuggestionOrigin {
    Correction,
    Prediction,
    Completion,
}

/// One ranked suggestion. Immutable once produced; rank is list order.
#[derive(Debug, Clone, PartialEq)]
pub struct Suggestion {
    pub text: String,
    pub confidence: f32,
    pub origin: SuggestionOrigin,
    pub is_correction: bool,
}

/// What to suggest for: the word being typed and up to K preceding words,
/// oldest first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SuggestionRequest {
    pub current_word: String,
    pub preceding_context: Vec<String>,
}

/// Served when nothing has been typed yet.
static EMPTY_INPUT_DEFAULTS: &[(&str, f32)] = &[("the", 0.9), ("and", 0.8), ("to", 0.7)];

/// Deterministic table-driven ranking. Stateless per call; every session
/// holds its own handle onto the shared tables.
#[derive(Debug, Clone)]
pub struct SuggestionEngine {
    tables: Arc<LexiconTables>,
}

impl SuggestionEngine {
    pub fn new(tables: Arc<LexiconTables>) -> Self {
        Self { tables }
    }

    /// Rank up to [`MAX_SUGGESTIONS`] suggestions for `request`. Identical
    /// requests always produce identical output, and no input makes this
    /// fail: malformed requests degrade to the nearest defined stage.
    pub fn suggest(&self, request: &SuggestionRequest) -> Vec<Suggestion> {
        let _span = debug_span!("suggest", word = %request.current_word).entered();

        if request.current_word.is_empty() {
            return EMPTY_INPUT_DEFAULTS
                .iter()
                .map(|&(text, confidence)| Suggestion {
                    text: text.to_string(),
                    confidence,
                    origin: SuggestionOrigin::Prediction,
                    is_correction: false,
                })
                .collect();
        }

        let folded = request.current_word.to_lowercase();
        let mut out: Vec<Suggestion> = Vec::new();

        // 1. Exact typo correction.
        if let Some(fix) = self.tables.correction_for(&folded) {
            out.push(Suggestion {
                text: fix.to_string(),
                confidence: 0.95,
                origin: SuggestionOrigin::Correction,
                is_correction: true,
            });
        }

        // 2. Next-word predictions from the last context word.
        if let Some(prev) = request.preceding_context.last() {
            let candidates = self.tables.predictions_for(&prev.to_lowercase());
            for (index, candidate) in candidates.iter().enumerate() {
                if out.len() >= MAX_SUGGESTIONS {
                    break;
                }
                if candidate.as_str() == request.current_word {
                    continue;
                }
                if out.iter().any(|s| s.text == *candidate) {
                    continue;
                }
                out.push(Suggestion {
                    text: candidate.clone(),
                    confidence: 0.8 - 0.1 * index as f32,
                    origin: SuggestionOrigin::Prediction,
                    is_correction: false,
                });
            }
        }

        // 3. Prefix completions, only once the word has taken shape.
        if folded.chars().count() >= 2 {
            for word in self.tables.vocabulary() {
                if out.len() >= MAX_SUGGESTIONS {
                    break;
                }
                if word.len() <= folded.len() || !word.starts_with(&folded) {
                    continue;
                }
                if word.as_str() == request.current_word {
                    continue;
                }
                if out.iter().any(|s| s.text == *word) {
                    continue;
                }
                out.push(Suggestion {
                    text: word.clone(),
                    confidence: 0.6,
                    origin: SuggestionOrigin::Completion,
                    is_correction: false,
                });
            }
        }

        debug!(count = out.len());
        out
    }
}
