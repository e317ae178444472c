//! Input session state machine.
//!
//! Owns caps/shift and keyboard-mode state, turns key and gesture events
//! into ordered text-sink operations, and decides when a new suggestion
//! computation is due. It never blocks and never computes suggestions
//! itself; refresh requests ride on the response and are enqueued by the
//! caller.
//!
//! Every event that touches text receives a snapshot of the text before the
//! cursor. The handlers keep a working copy of that snapshot and update it
//! as operations are emitted, so smart punctuation, auto-correction, and the
//! refresh request each see the effective text.

use std::sync::Arc;

use tracing::{debug, debug_span};

use crate::gesture::CompletedSwipe;
use crate::settings::Settings;
use crate::suggest::{LexiconTables, SuggestionRequest};
use crate::swipe::SwipeDecoder;

/// Two shift presses within this window engage caps lock.
pub const SHIFT_DOUBLE_TAP_MS: u64 = 800;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapsState {
    Off,
    /// Upper-case for the next letter only.
    Shifted,
    /// Caps lock; character input does not release it.
    Locked,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyboardMode {
    Letters,
    Symbols,
    Numbers,
}

/// Key events delivered by the host. Character keys carry the unshifted
/// character; the timestamp rides on `handle_key`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Character(char),
    Shift,
    Delete,
    Space,
    Mode(KeyboardMode),
}

/// Snapshot of the text around the cursor, taken by the host right before
/// the event.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SurroundingText {
    pub before_cursor: String,
    pub has_selection: bool,
}

/// Ordered operations for the host text sink. Counts are in characters.
#[derive(Debug, Clone, PartialEq)]
pub enum TextOp {
    /// Insert text at the cursor. An empty commit replaces the active
    /// selection with nothing.
    Commit(String),
    DeleteSurrounding { before: usize, after: usize },
}

/// Orthogonal side-effects accompanying a response.
#[derive(Debug, Default)]
pub struct SideEffects {
    pub clear_suggestions: bool,
}

/// Response from one session call, applied by the caller in order.
#[derive(Debug, Default)]
pub struct KeyResponse {
    pub consumed: bool,
    pub ops: Vec<TextOp>,
    /// New suggestion computation to enqueue. Supersedes any not-yet
    /// delivered one.
    pub refresh: Option<SuggestionRequest>,
    /// Set only when the keyboard layout actually changed.
    pub mode_change: Option<KeyboardMode>,
    pub side_effects: SideEffects,
}

impl KeyResponse {
    fn ignored() -> Self {
        Self::default()
    }

    fn consumed() -> Self {
        Self {
            consumed: true,
            ..Self::default()
        }
    }
}

fn is_sentence_end(c: char) -> bool {
    matches!(c, '.' | '!' | '?')
}

fn is_word_punctuation(c: char) -> bool {
    matches!(c, '.' | ',' | '!' | '?' | ';' | ':')
}

/// Stateful input session. One per host editing session; holds a handle to
/// the shared read-only tables.
pub struct InputSession {
    tables: Arc<LexiconTables>,
    decoder: SwipeDecoder,
    settings: Settings,
    caps: CapsState,
    mode: KeyboardMode,
    last_shift_ms: Option<u64>,
}

impl InputSession {
    pub fn new(tables: Arc<LexiconTables>, decoder: SwipeDecoder, settings: Settings) -> Self {
        let caps = if settings.caps_lock_active {
            CapsState::Locked
        } else {
            CapsState::Off
        };
        Self {
            tables,
            decoder,
            settings,
            caps,
            mode: KeyboardMode::Letters,
            last_shift_ms: None,
        }
    }

    pub fn caps(&self) -> CapsState {
        self.caps
    }

    pub fn mode(&self) -> KeyboardMode {
        self.mode
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Apply a fresh configuration snapshot.
    pub fn reload_settings(&mut self, settings: Settings) {
        if settings.caps_lock_active {
            self.caps = CapsState::Locked;
        } else if self.caps == CapsState::Locked {
            self.caps = CapsState::Off;
        }
        self.settings = settings;
    }

    /// Host began an editing session. Resets state to defaults and clears
    /// the suggestion bar; `fresh_sentence` is the host's signal that the
    /// field starts a sentence.
    pub fn session_start(&mut self, fresh_sentence: bool, settings: Settings) -> KeyResponse {
        self.reload_settings(settings);
        self.mode = KeyboardMode::Letters;
        self.last_shift_ms = None;
        if self.caps != CapsState::Locked {
            self.caps = if fresh_sentence {
                CapsState::Shifted
            } else {
                CapsState::Off
            };
        }
        let mut resp = KeyResponse::consumed();
        resp.side_effects.clear_suggestions = true;
        resp
    }

    /// Host ended the editing session. Pending suggestions are dropped;
    /// nothing else is persisted.
    pub fn session_end(&mut self) -> KeyResponse {
        let mut resp = KeyResponse::consumed();
        resp.side_effects.clear_suggestions = true;
        resp
    }

    /// Process one key event. `surrounding` is `None` when no text sink is
    /// active, which turns sink-touching keys into no-ops.
    pub fn handle_key(
        &mut self,
        key: Key,
        t_ms: u64,
        surrounding: Option<&SurroundingText>,
    ) -> KeyResponse {
        let _span = debug_span!("handle_key", ?key, t_ms).entered();
        match key {
            Key::Shift => self.handle_shift(t_ms),
            Key::Mode(mode) => self.handle_mode(mode),
            Key::Character(_) | Key::Delete | Key::Space => {
                let Some(surrounding) = surrounding else {
                    return KeyResponse::ignored();
                };
                match key {
                    Key::Character(c) => self.handle_character(c, surrounding),
                    Key::Delete => self.handle_delete(surrounding),
                    Key::Space => self.handle_space(surrounding),
                    Key::Shift | Key::Mode(_) => unreachable!(),
                }
            }
        }
    }

    fn handle_shift(&mut self, t_ms: u64) -> KeyResponse {
        let double_tap = self
            .last_shift_ms
            .is_some_and(|prev| t_ms.saturating_sub(prev) < SHIFT_DOUBLE_TAP_MS);
        if double_tap {
            self.caps = match self.caps {
                CapsState::Locked => CapsState::Off,
                CapsState::Off | CapsState::Shifted => CapsState::Locked,
            };
            self.last_shift_ms = None;
        } else {
            self.caps = match self.caps {
                CapsState::Shifted => CapsState::Off,
                CapsState::Off | CapsState::Locked => CapsState::Shifted,
            };
            self.last_shift_ms = Some(t_ms);
        }
        debug!(caps = ?self.caps, "shift");
        KeyResponse::consumed()
    }

    fn handle_mode(&mut self, mode: KeyboardMode) -> KeyResponse {
        let mut resp = KeyResponse::consumed();
        // re-entering the active mode must not reload the layout
        if mode != self.mode {
            self.mode = mode;
            resp.mode_change = Some(mode);
        }
        resp
    }

    fn handle_character(&mut self, c: char, surrounding: &SurroundingText) -> KeyResponse {
        let mut resp = KeyResponse::consumed();
        let mut text = self.bounded_tail(&surrounding.before_cursor);

        if is_sentence_end(c) && self.settings.smart_punctuation_enabled && text.ends_with(' ') {
            push_delete(&mut resp.ops, &mut text, 1);
        }
        if is_word_punctuation(c) && self.settings.auto_correct_enabled {
            self.auto_correct(&mut resp.ops, &mut text);
        }

        let out = self.apply_caps(c);
        text.push(out);
        resp.ops.push(TextOp::Commit(out.to_string()));

        if self.caps != CapsState::Locked {
            if is_sentence_end(c) {
                self.caps = CapsState::Shifted;
            } else if self.caps == CapsState::Shifted && c.is_alphabetic() {
                self.caps = CapsState::Off;
            }
        }

        resp.refresh = self.refresh_request(&text);
        resp
    }

    fn handle_space(&mut self, surrounding: &SurroundingText) -> KeyResponse {
        let mut resp = KeyResponse::consumed();
        let mut text = self.bounded_tail(&surrounding.before_cursor);

        // Double-space shortcut: "word " plus space becomes "word. ".
        if self.settings.smart_punctuation_enabled && text.ends_with(' ') {
            let before_space = text.chars().rev().nth(1);
            if before_space.is_some_and(|c| c.is_alphanumeric()) {
                push_delete(&mut resp.ops, &mut text, 1);
                text.push_str(". ");
                resp.ops.push(TextOp::Commit(". ".to_string()));
                if self.caps != CapsState::Locked {
                    self.caps = CapsState::Shifted;
                }
                resp.refresh = self.refresh_request(&text);
                return resp;
            }
        }

        if self.settings.auto_correct_enabled {
            self.auto_correct(&mut resp.ops, &mut text);
        }
        text.push(' ');
        resp.ops.push(TextOp::Commit(" ".to_string()));
        resp.refresh = self.refresh_request(&text);
        resp
    }

    fn handle_delete(&mut self, surrounding: &SurroundingText) -> KeyResponse {
        let mut resp = KeyResponse::consumed();
        if surrounding.has_selection {
            resp.ops.push(TextOp::Commit(String::new()));
        } else if !surrounding.before_cursor.is_empty() {
            resp.ops.push(TextOp::DeleteSurrounding { before: 1, after: 0 });
        }
        // deletes never refresh suggestions
        resp
    }

    /// A finished word-swipe from the tracker. An undecodable swipe is
    /// consumed without committing anything.
    pub fn handle_swipe(
        &mut self,
        swipe: &CompletedSwipe,
        surrounding: Option<&SurroundingText>,
    ) -> KeyResponse {
        if !self.settings.swipe_typing_enabled {
            return KeyResponse::ignored();
        }
        let Some(surrounding) = surrounding else {
            return KeyResponse::ignored();
        };
        let word = self.decoder.decode(&swipe.keys);
        if word.is_empty() {
            return KeyResponse::consumed();
        }
        debug!(word, direction = ?swipe.direction, "swipe committed");

        let mut resp = KeyResponse::consumed();
        let mut text = self.bounded_tail(&surrounding.before_cursor);
        text.push_str(&word);
        text.push(' ');
        resp.ops.push(TextOp::Commit(format!("{word} ")));
        resp.refresh = self.refresh_request(&text);
        resp
    }

    /// User tapped a suggestion: the word before the cursor is replaced by
    /// the accepted text plus a trailing space.
    pub fn accept_suggestion(
        &mut self,
        suggestion: &str,
        surrounding: Option<&SurroundingText>,
    ) -> KeyResponse {
        let Some(surrounding) = surrounding else {
            return KeyResponse::ignored();
        };
        let mut resp = KeyResponse::consumed();
        let mut text = self.bounded_tail(&surrounding.before_cursor);
        let word_len = trailing_word(&text).chars().count();
        if word_len > 0 {
            push_delete(&mut resp.ops, &mut text, word_len);
        }
        text.push_str(suggestion);
        text.push(' ');
        resp.ops.push(TextOp::Commit(format!("{suggestion} ")));
        resp.refresh = self.refresh_request(&text);
        resp
    }

    fn apply_caps(&self, c: char) -> char {
        if !c.is_alphabetic() {
            return c;
        }
        match self.caps {
            CapsState::Off => c.to_lowercase().next().unwrap_or(c),
            CapsState::Shifted | CapsState::Locked => c.to_uppercase().next().unwrap_or(c),
        }
    }

    /// Last `lookback_chars` characters of the snapshot.
    fn bounded_tail(&self, before_cursor: &str) -> String {
        let bound = self.settings.lookback_chars;
        let count = before_cursor.chars().count();
        if count <= bound {
            before_cursor.to_string()
        } else {
            before_cursor.chars().skip(count - bound).collect()
        }
    }

    /// Replace the word at the end of `text` when the correction table has
    /// a different word for it. The delete and the commit land in `ops` as
    /// one batch.
    fn auto_correct(&self, ops: &mut Vec<TextOp>, text: &mut String) {
        let word = trailing_word(text);
        let len = word.chars().count();
        if len < 2 {
            return;
        }
        let folded = word.to_lowercase();
        let Some(fix) = self.tables.correction_for(&folded) else {
            return;
        };
        if fix == word {
            return;
        }
        let fix = fix.to_string();
        debug!(from = %word, to = %fix, "auto-correct");
        push_delete(ops, text, len);
        text.push_str(&fix);
        ops.push(TextOp::Commit(fix));
    }

    fn refresh_request(&self, text: &str) -> Option<SuggestionRequest> {
        if !self.settings.ai_suggestions_enabled {
            return None;
        }
        Some(build_request(text, self.settings.context_words))
    }
}

/// The alphabetic run at the end of `text`.
fn trailing_word(text: &str) -> &str {
    match text.rfind(|c: char| !c.is_alphabetic()) {
        Some(i) => {
            let c_len = text[i..].chars().next().map_or(0, char::len_utf8);
            &text[i + c_len..]
        }
        None => text,
    }
}

/// Split a snapshot tail into the word being typed and up to
/// `context_words` preceding words.
fn build_request(text: &str, context_words: usize) -> SuggestionRequest {
    let current_word = trailing_word(text);
    let rest = &text[..text.len() - current_word.len()];
    let mut context: Vec<String> = rest
        .split(|c: char| !c.is_alphabetic())
        .filter(|w| !w.is_empty())
        .map(str::to_string)
        .collect();
    let drop = context.len().saturating_sub(context_words);
    context.drain(..drop);
    SuggestionRequest {
        current_word: current_word.to_string(),
        preceding_context: context,
    }
}

fn push_delete(ops: &mut Vec<TextOp>, text: &mut String, count: usize) {
    for _ in 0..count {
        text.pop();
    }
    ops.push(TextOp::DeleteSurrounding {
        before: count,
        after: 0,
    });
}
