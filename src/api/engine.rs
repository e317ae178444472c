use std::sync::Arc;

use crate::suggest::{LexiconTables, SuggestionEngine, SuggestionRequest};
use crate::swipe::SwipePatternTable;

use super::{GkError, GkSession, GkSuggestion};

/// Shared read-only resources: the ranking tables and the swipe pattern
/// table. Sessions created from one engine share them by handle.
#[derive(uniffi::Object)]
pub struct GkEngine {
    tables: Arc<LexiconTables>,
    patterns: Arc<SwipePatternTable>,
}

#[uniffi::export]
impl GkEngine {
    /// Engine over the built-in tables.
    #[uniffi::constructor]
    fn new() -> Arc<Self> {
        Arc::new(Self {
            tables: Arc::new(LexiconTables::default()),
            patterns: Arc::new(SwipePatternTable::default()),
        })
    }

    /// Engine with tables replaced from JSON resources. An empty string
    /// keeps the built-in data for that table.
    #[uniffi::constructor]
    fn from_json(tables_json: String, patterns_json: String) -> Result<Arc<Self>, GkError> {
        let tables = if tables_json.is_empty() {
            LexiconTables::default()
        } else {
            LexiconTables::from_json(&tables_json).map_err(|e| GkError::InvalidData {
                msg: e.to_string(),
            })?
        };
        let patterns = if patterns_json.is_empty() {
            SwipePatternTable::default()
        } else {
            SwipePatternTable::from_json(&patterns_json).map_err(|e| GkError::InvalidData {
                msg: e.to_string(),
            })?
        };
        Ok(Arc::new(Self {
            tables: Arc::new(tables),
            patterns: Arc::new(patterns),
        }))
    }

    fn create_session(&self) -> Arc<GkSession> {
        GkSession::new(Arc::clone(&self.tables), Arc::clone(&self.patterns))
    }

    /// Synchronous suggestion query for host tooling and previews. Input
    /// handling should go through a session and its async pipeline instead.
    fn suggest(&self, current_word: String, preceding_context: Vec<String>) -> Vec<GkSuggestion> {
        let engine = SuggestionEngine::new(Arc::clone(&self.tables));
        engine
            .suggest(&SuggestionRequest {
                current_word,
                preceding_context,
            })
            .into_iter()
            .map(Into::into)
            .collect()
    }
}
