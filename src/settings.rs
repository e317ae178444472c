//! Host configuration snapshot.
//!
//! The host pushes a fresh snapshot on its configuration-reload signal as a
//! JSON payload; field names mirror that payload. Unknown fields (theming
//! and other host-side concerns) are ignored.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    pub ai_suggestions_enabled: bool,
    pub swipe_typing_enabled: bool,
    /// Forwarded to the host feedback path; the core never reads it.
    pub vibration_enabled: bool,
    pub auto_correct_enabled: bool,
    pub smart_punctuation_enabled: bool,
    pub caps_lock_active: bool,
    /// How many characters back auto-correction reads from the text sink.
    pub lookback_chars: usize,
    /// How many preceding words a suggestion request carries.
    pub context_words: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            ai_suggestions_enabled: true,
            swipe_typing_enabled: true,
            vibration_enabled: true,
            auto_correct_enabled: true,
            smart_punctuation_enabled: true,
            caps_lock_active: false,
            lookback_chars: 50,
            context_words: 2,
        }
    }
}

impl Settings {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings = Settings::from_json(r#"{"autoCorrectEnabled": false}"#).unwrap();
        assert!(!settings.auto_correct_enabled);
        assert!(settings.swipe_typing_enabled);
        assert_eq!(settings.lookback_chars, 50);
    }

    #[test]
    fn test_host_payload_field_names() {
        let settings = Settings::from_json(
            r#"{
                "aiSuggestionsEnabled": false,
                "swipeTypingEnabled": false,
                "vibrationEnabled": false,
                "autoCorrectEnabled": true,
                "smartPunctuationEnabled": false,
                "capsLockActive": true,
                "theme": "solarized"
            }"#,
        )
        .unwrap();
        assert!(!settings.ai_suggestions_enabled);
        assert!(!settings.swipe_typing_enabled);
        assert!(settings.caps_lock_active);
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        assert!(Settings::from_json("{").is_err());
    }
}
