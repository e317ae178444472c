use std::sync::{Arc, Mutex};

use crate::async_worker::AsyncWorker;
use crate::geometry::{FrameLayout, KeyFrame};
use crate::gesture::GestureTracker;
use crate::session::{InputSession, Key, KeyResponse, SurroundingText};
use crate::settings::Settings;
use crate::suggest::LexiconTables;
use crate::swipe::{SwipeDecoder, SwipePatternTable};

use super::types::{convert_key_response, convert_pointer_response};
use super::{GkError, GkEvent, GkKey, GkKeyFrame, GkKeyResponse, GkSurrounding};

/// Suggestion-bar width: the engine ranks five, the bar shows three.
const MAX_BAR_ITEMS: usize = 3;

/// One host editing session: the state machine, its gesture tracker, the
/// current key geometry, and the background suggestion worker.
#[derive(uniffi::Object)]
pub struct GkSession {
    session: Mutex<InputSession>,
    tracker: Mutex<GestureTracker>,
    layout: Mutex<FrameLayout>,
    worker: AsyncWorker,
}

#[uniffi::export]
impl GkSession {
    /// Replace the key geometry. The host calls this whenever its layout
    /// view is measured. Frames with an empty key string are dropped.
    fn set_layout(&self, frames: Vec<GkKeyFrame>) {
        let frames = frames
            .into_iter()
            .filter_map(|f| {
                let key = f.key.chars().next()?;
                Some(KeyFrame {
                    key,
                    x: f.x,
                    y: f.y,
                    width: f.width,
                    height: f.height,
                })
            })
            .collect();
        *self.layout.lock().unwrap() = FrameLayout::new(frames);
    }

    /// Apply a configuration-reload signal.
    fn reload_settings(&self, settings_json: String) -> Result<(), GkError> {
        let settings = Settings::from_json(&settings_json).map_err(|e| GkError::InvalidData {
            msg: e.to_string(),
        })?;
        self.session.lock().unwrap().reload_settings(settings);
        Ok(())
    }

    /// Host began an editing session. An empty `settings_json` keeps the
    /// defaults.
    fn session_start(
        &self,
        fresh_sentence: bool,
        settings_json: String,
    ) -> Result<GkKeyResponse, GkError> {
        let settings = if settings_json.is_empty() {
            Settings::default()
        } else {
            Settings::from_json(&settings_json).map_err(|e| GkError::InvalidData {
                msg: e.to_string(),
            })?
        };
        self.worker.invalidate();
        self.tracker.lock().unwrap().on_pointer_cancel();
        let resp = self
            .session
            .lock()
            .unwrap()
            .session_start(fresh_sentence, settings);
        Ok(convert_key_response(resp, None, false))
    }

    fn session_end(&self) -> GkKeyResponse {
        self.worker.invalidate();
        self.tracker.lock().unwrap().on_pointer_cancel();
        let resp = self.session.lock().unwrap().session_end();
        convert_key_response(resp, None, false)
    }

    fn handle_key(
        &self,
        key: GkKey,
        t_ms: u64,
        surrounding: Option<GkSurrounding>,
    ) -> GkKeyResponse {
        let Some((key, feedback)) = convert_key(&key) else {
            return GkKeyResponse::not_consumed();
        };
        let surrounding = surrounding.map(convert_surrounding);
        let resp = self
            .session
            .lock()
            .unwrap()
            .handle_key(key, t_ms, surrounding.as_ref());
        self.finish(resp, Some(feedback))
    }

    fn pointer_down(&self, x: f32, y: f32, t_ms: u64) -> GkKeyResponse {
        if !self.swipe_enabled() {
            return GkKeyResponse::not_consumed();
        }
        let resp = self.tracker.lock().unwrap().on_pointer_down(x, y, t_ms);
        convert_pointer_response(&resp)
    }

    fn pointer_move(&self, x: f32, y: f32, t_ms: u64) -> GkKeyResponse {
        if !self.swipe_enabled() {
            return GkKeyResponse::not_consumed();
        }
        let resp = self.tracker.lock().unwrap().on_pointer_move(x, y, t_ms);
        convert_pointer_response(&resp)
    }

    /// Pointer lifted. When the gesture resolves into a word-swipe, the
    /// commit and refresh events are appended to the pointer events.
    fn pointer_up(
        &self,
        x: f32,
        y: f32,
        t_ms: u64,
        surrounding: Option<GkSurrounding>,
    ) -> GkKeyResponse {
        if !self.swipe_enabled() {
            return GkKeyResponse::not_consumed();
        }
        let pointer = {
            let layout = self.layout.lock().unwrap();
            self.tracker
                .lock()
                .unwrap()
                .on_pointer_up(&*layout, x, y, t_ms)
        };
        let mut out = convert_pointer_response(&pointer);

        if let Some(ref swipe) = pointer.swipe {
            let surrounding = surrounding.map(convert_surrounding);
            let resp = self
                .session
                .lock()
                .unwrap()
                .handle_swipe(swipe, surrounding.as_ref());
            let swipe_out = self.finish(resp, None);
            out.consumed = out.consumed || swipe_out.consumed;
            out.events.extend(swipe_out.events);
        }
        out
    }

    fn pointer_cancel(&self) -> GkKeyResponse {
        let resp = self.tracker.lock().unwrap().on_pointer_cancel();
        convert_pointer_response(&resp)
    }

    /// User tapped a suggestion on the bar.
    fn accept_suggestion(&self, text: String, surrounding: Option<GkSurrounding>) -> GkKeyResponse {
        let surrounding = surrounding.map(convert_surrounding);
        let resp = self
            .session
            .lock()
            .unwrap()
            .accept_suggestion(&text, surrounding.as_ref());
        self.finish(resp, None)
    }

    /// Deliver the newest suggestion result, if one is ready and still
    /// current. Superseded results have already been dropped by the worker.
    fn poll(&self) -> Option<GkKeyResponse> {
        let result = self.worker.try_recv()?;
        let items: Vec<String> = result
            .suggestions
            .iter()
            .take(MAX_BAR_ITEMS)
            .map(|s| s.text.clone())
            .collect();
        Some(GkKeyResponse {
            consumed: true,
            events: vec![GkEvent::SuggestionBar { items }],
        })
    }
}

impl GkSession {
    /// Sessions are created through [`super::GkEngine::create_session`],
    /// which hands them the shared tables.
    pub(super) fn new(tables: Arc<LexiconTables>, patterns: Arc<SwipePatternTable>) -> Arc<Self> {
        let session = InputSession::new(
            Arc::clone(&tables),
            SwipeDecoder::new(patterns),
            Settings::default(),
        );
        let worker = AsyncWorker::new(tables);
        Arc::new(Self {
            session: Mutex::new(session),
            tracker: Mutex::new(GestureTracker::new()),
            layout: Mutex::new(FrameLayout::default()),
            worker,
        })
    }

    /// Submit any refresh request to the worker, then flatten the response.
    fn finish(&self, mut resp: KeyResponse, feedback: Option<String>) -> GkKeyResponse {
        let mut has_pending = false;
        if let Some(request) = resp.refresh.take() {
            self.worker.submit(request);
            has_pending = true;
        }
        convert_key_response(resp, feedback, has_pending)
    }

    fn swipe_enabled(&self) -> bool {
        self.session.lock().unwrap().settings().swipe_typing_enabled
    }
}

fn convert_surrounding(s: GkSurrounding) -> SurroundingText {
    SurroundingText {
        before_cursor: s.before_cursor,
        has_selection: s.has_selection,
    }
}

/// Map a host key event onto the session key plus its feedback identifier.
fn convert_key(key: &GkKey) -> Option<(Key, String)> {
    match key {
        GkKey::Character { ch } => {
            let c = ch.chars().next()?;
            Some((Key::Character(c), ch.clone()))
        }
        GkKey::Shift => Some((Key::Shift, "shift".to_string())),
        GkKey::Delete => Some((Key::Delete, "delete".to_string())),
        GkKey::Space => Some((Key::Space, "space".to_string())),
        GkKey::Mode { mode } => Some((Key::Mode((*mode).into()), "mode".to_string())),
    }
}
