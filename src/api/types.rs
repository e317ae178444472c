use crate::gesture::{PointerResponse, RedrawAction};
use crate::session::{KeyResponse, KeyboardMode, TextOp};
use crate::suggest::{Suggestion, SuggestionOrigin};

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum GkError {
    #[error("IO error: {msg}")]
    Io { msg: String },
    #[error("invalid data: {msg}")]
    InvalidData { msg: String },
    #[error("internal error: {msg}")]
    Internal { msg: String },
}

// ---------------------------------------------------------------------------
// Records (value types, copied across the FFI boundary)
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, Debug, uniffi::Record)]
pub struct GkPoint {
    pub x: f32,
    pub y: f32,
}

/// One key rectangle reported by the host layout view.
#[derive(Clone, Debug, uniffi::Record)]
pub struct GkKeyFrame {
    /// The character the key produces unshifted.
    pub key: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// Snapshot of the text around the cursor, taken right before the event.
#[derive(Clone, Debug, Default, uniffi::Record)]
pub struct GkSurrounding {
    pub before_cursor: String,
    pub has_selection: bool,
}

#[derive(Clone, Debug, uniffi::Record)]
pub struct GkSuggestion {
    pub text: String,
    pub confidence: f32,
    pub origin: GkOrigin,
    pub is_correction: bool,
}

/// Event-driven response from every session call.
#[derive(Debug, uniffi::Record)]
pub struct GkKeyResponse {
    pub consumed: bool,
    pub events: Vec<GkEvent>,
}

impl GkKeyResponse {
    pub(super) fn not_consumed() -> Self {
        Self {
            consumed: false,
            events: Vec::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, Debug, PartialEq, Eq, uniffi::Enum)]
pub enum GkKeyboardMode {
    Letters,
    Symbols,
    Numbers,
}

impl From<KeyboardMode> for GkKeyboardMode {
    fn from(mode: KeyboardMode) -> Self {
        match mode {
            KeyboardMode::Letters => Self::Letters,
            KeyboardMode::Symbols => Self::Symbols,
            KeyboardMode::Numbers => Self::Numbers,
        }
    }
}

impl From<GkKeyboardMode> for KeyboardMode {
    fn from(mode: GkKeyboardMode) -> Self {
        match mode {
            GkKeyboardMode::Letters => Self::Letters,
            GkKeyboardMode::Symbols => Self::Symbols,
            GkKeyboardMode::Numbers => Self::Numbers,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, uniffi::Enum)]
pub enum GkOrigin {
    Correction,
    Prediction,
    Completion,
}

impl From<SuggestionOrigin> for GkOrigin {
    fn from(origin: SuggestionOrigin) -> Self {
        match origin {
            SuggestionOrigin::Correction => Self::Correction,
            SuggestionOrigin::Prediction => Self::Prediction,
            SuggestionOrigin::Completion => Self::Completion,
        }
    }
}

impl From<Suggestion> for GkSuggestion {
    fn from(s: Suggestion) -> Self {
        Self {
            text: s.text,
            confidence: s.confidence,
            origin: s.origin.into(),
            is_correction: s.is_correction,
        }
    }
}

/// Key events delivered by the host.
#[derive(Clone, Debug, uniffi::Enum)]
pub enum GkKey {
    /// The unshifted character of the pressed key.
    Character { ch: String },
    Shift,
    Delete,
    Space,
    Mode { mode: GkKeyboardMode },
}

/// Commands for the host, applied in order.
#[derive(Clone, Debug, uniffi::Enum)]
pub enum GkEvent {
    Commit { text: String },
    DeleteSurrounding { before: u32, after: u32 },
    RedrawPath { points: Vec<GkPoint> },
    ClearPath,
    /// Up to three display strings for the suggestion bar.
    SuggestionBar { items: Vec<String> },
    ClearSuggestionBar,
    /// Haptic/audio cue for a consumed key; identifier only, no payload.
    KeyFeedback { key: String },
    ModeChanged { mode: GkKeyboardMode },
    SchedulePoll,
}

// ---------------------------------------------------------------------------
// Conversion helpers
// ---------------------------------------------------------------------------

pub(super) fn convert_key_response(
    resp: KeyResponse,
    feedback: Option<String>,
    has_pending_work: bool,
) -> GkKeyResponse {
    let mut events = Vec::new();

    // 1. Text operations, in order
    for op in resp.ops {
        match op {
            TextOp::Commit(text) => events.push(GkEvent::Commit { text }),
            TextOp::DeleteSurrounding { before, after } => events.push(GkEvent::DeleteSurrounding {
                before: before as u32,
                after: after as u32,
            }),
        }
    }

    // 2. Mode change
    if let Some(mode) = resp.mode_change {
        events.push(GkEvent::ModeChanged { mode: mode.into() });
    }

    // 3. Side effects
    if resp.side_effects.clear_suggestions {
        events.push(GkEvent::ClearSuggestionBar);
    }

    // 4. Key feedback, only for consumed keys
    if resp.consumed {
        if let Some(key) = feedback {
            events.push(GkEvent::KeyFeedback { key });
        }
    }

    // 5. Schedule poll
    if has_pending_work {
        events.push(GkEvent::SchedulePoll);
    }

    GkKeyResponse {
        consumed: resp.consumed,
        events,
    }
}

pub(super) fn convert_pointer_response(resp: &PointerResponse) -> GkKeyResponse {
    let mut events = Vec::new();
    match &resp.redraw {
        RedrawAction::Keep => {}
        RedrawAction::Path(points) => events.push(GkEvent::RedrawPath {
            points: points.iter().map(|&(x, y)| GkPoint { x, y }).collect(),
        }),
        RedrawAction::Clear => events.push(GkEvent::ClearPath),
    }
    GkKeyResponse {
        consumed: resp.handled,
        events,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SideEffects;

    #[test]
    fn test_event_order_ops_then_feedback_then_poll() {
        let resp = KeyResponse {
            consumed: true,
            ops: vec![
                TextOp::DeleteSurrounding { before: 3, after: 0 },
                TextOp::Commit("the".to_string()),
            ],
            refresh: None,
            mode_change: None,
            side_effects: SideEffects::default(),
        };
        let out = convert_key_response(resp, Some("a".to_string()), true);
        assert!(out.consumed);
        assert!(matches!(
            out.events[0],
            GkEvent::DeleteSurrounding { before: 3, after: 0 }
        ));
        assert!(matches!(out.events[1], GkEvent::Commit { .. }));
        assert!(matches!(out.events[2], GkEvent::KeyFeedback { .. }));
        assert!(matches!(out.events[3], GkEvent::SchedulePoll));
    }

    #[test]
    fn test_unconsumed_key_gets_no_feedback() {
        let resp = KeyResponse::default();
        let out = convert_key_response(resp, Some("a".to_string()), false);
        assert!(!out.consumed);
        assert!(out.events.is_empty());
    }
}
