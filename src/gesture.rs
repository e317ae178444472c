//! Pointer-path tracking and tap vs. word-swipe classification.
//!
//! The tracker owns the path for exactly one gesture. A touch starts
//! ambiguous; it becomes a swipe in progress once the pointer strays far
//! enough from the starting point, at which point moves are consumed and the
//! host is asked to draw the path. On release the path either meets the
//! duration and distance thresholds and resolves into a key sequence, or is
//! discarded silently.

use tracing::{debug, debug_span};

use crate::geometry::{KeyId, KeyLayout};

/// Straight-line distance from the first sample beyond which a touch stops
/// being a tap and starts being tracked as a swipe.
pub const SWIPE_START_THRESHOLD: f32 = 50.0;
/// Minimum total path length for a finished gesture to count as a word-swipe.
pub const MIN_SWIPE_DISTANCE: f32 = 100.0;
/// Minimum gesture duration for a finished gesture to count as a word-swipe.
pub const MIN_SWIPE_TIME_MS: u64 = 300;

/// One pointer sample. Timestamps are host-provided monotonic milliseconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchSample {
    pub x: f32,
    pub y: f32,
    pub t_ms: u64,
}

/// Coarse direction of the whole gesture, first sample to last. The axis
/// with the larger magnitude wins; ties go horizontal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipeDirection {
    Left,
    Right,
    Up,
    Down,
}

/// A key first touched at `sample_index` along the path.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyHit {
    pub key: KeyId,
    pub sample_index: usize,
}

/// A finished word-swipe: the deduplicated letter-key sequence plus
/// metadata. The direction label is informational only.
#[derive(Debug, Clone)]
pub struct CompletedSwipe {
    pub keys: Vec<KeyHit>,
    pub direction: SwipeDirection,
    pub duration_ms: u64,
    pub distance: f32,
}

/// Path-overlay request accompanying a pointer response. One of three
/// states, so "draw and clear at once" is unrepresentable.
#[derive(Debug, Clone, PartialEq)]
pub enum RedrawAction {
    /// Leave the overlay as-is.
    Keep,
    /// Draw the current path.
    Path(Vec<(f32, f32)>),
    /// Remove the overlay.
    Clear,
}

/// What the caller should do after feeding one pointer event.
#[derive(Debug)]
pub struct PointerResponse {
    /// True when the event was consumed by swipe tracking and normal
    /// key-press handling must be suppressed.
    pub handled: bool,
    pub redraw: RedrawAction,
    /// A finished word-swipe. Only `on_pointer_up` ever sets this.
    pub swipe: Option<CompletedSwipe>,
}

impl PointerResponse {
    fn not_handled() -> Self {
        Self {
            handled: false,
            redraw: RedrawAction::Keep,
            swipe: None,
        }
    }
}

/// Tracks one gesture at a time from pointer down to up or cancel.
#[derive(Debug, Default)]
pub struct GestureTracker {
    path: Vec<TouchSample>,
    in_progress: bool,
}

impl GestureTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_in_progress(&self) -> bool {
        self.in_progress
    }

    /// A new touch. Any leftover path from an unterminated gesture is
    /// dropped first.
    pub fn on_pointer_down(&mut self, x: f32, y: f32, t_ms: u64) -> PointerResponse {
        self.path.clear();
        self.in_progress = false;
        self.path.push(TouchSample { x, y, t_ms });
        PointerResponse::not_handled()
    }

    pub fn on_pointer_move(&mut self, x: f32, y: f32, t_ms: u64) -> PointerResponse {
        if self.path.is_empty() {
            // move without a preceding down
            return PointerResponse::not_handled();
        }
        self.path.push(TouchSample { x, y, t_ms });

        if !self.in_progress {
            let first = self.path[0];
            let from_start = ((x - first.x).powi(2) + (y - first.y).powi(2)).sqrt();
            if from_start <= SWIPE_START_THRESHOLD {
                return PointerResponse::not_handled();
            }
            self.in_progress = true;
            debug!(from_start = f64::from(from_start), "swipe tracking started");
        }

        PointerResponse {
            handled: true,
            redraw: RedrawAction::Path(self.path_points()),
            swipe: None,
        }
    }

    /// Touch ended. A touch that never became a swipe is reported as not
    /// handled so the ordinary key-press path can run. An in-progress
    /// gesture below the duration or distance thresholds is discarded
    /// silently. The path is cleared in every case.
    pub fn on_pointer_up(
        &mut self,
        layout: &dyn KeyLayout,
        x: f32,
        y: f32,
        t_ms: u64,
    ) -> PointerResponse {
        if !self.in_progress {
            self.path.clear();
            return PointerResponse::not_handled();
        }
        let _span = debug_span!("gesture_end").entered();

        self.path.push(TouchSample { x, y, t_ms });
        let duration_ms = t_ms.saturating_sub(self.path[0].t_ms);
        let distance = total_distance(&self.path);

        let swipe = if duration_ms >= MIN_SWIPE_TIME_MS && distance >= MIN_SWIPE_DISTANCE {
            let keys = resolve_key_hits(layout, &self.path);
            let direction = direction_of(self.path[0], self.path[self.path.len() - 1]);
            debug!(
                duration_ms,
                distance = f64::from(distance),
                key_count = keys.len(),
                "swipe finished"
            );
            Some(CompletedSwipe {
                keys,
                direction,
                duration_ms,
                distance,
            })
        } else {
            debug!(
                duration_ms,
                distance = f64::from(distance),
                "swipe below thresholds, discarded"
            );
            None
        };

        self.path.clear();
        self.in_progress = false;
        PointerResponse {
            handled: true,
            redraw: RedrawAction::Clear,
            swipe,
        }
    }

    /// Touch sequence was taken over by the system. Drops all state.
    pub fn on_pointer_cancel(&mut self) -> PointerResponse {
        let was_in_progress = self.in_progress;
        self.path.clear();
        self.in_progress = false;
        PointerResponse {
            handled: was_in_progress,
            redraw: RedrawAction::Clear,
            swipe: None,
        }
    }

    fn path_points(&self) -> Vec<(f32, f32)> {
        self.path.iter().map(|s| (s.x, s.y)).collect()
    }
}

fn total_distance(path: &[TouchSample]) -> f32 {
    path.windows(2)
        .map(|w| ((w[1].x - w[0].x).powi(2) + (w[1].y - w[0].y).powi(2)).sqrt())
        .sum()
}

fn direction_of(first: TouchSample, last: TouchSample) -> SwipeDirection {
    let dx = last.x - first.x;
    let dy = last.y - first.y;
    if dx.abs() >= dy.abs() {
        if dx >= 0.0 {
            SwipeDirection::Right
        } else {
            SwipeDirection::Left
        }
    } else if dy >= 0.0 {
        SwipeDirection::Down
    } else {
        SwipeDirection::Up
    }
}

/// Resolve samples to letter keys. Samples that hit no key are skipped; a
/// key is recorded once per run of consecutive hits, and runs are not broken
/// by resolution misses in between.
fn resolve_key_hits(layout: &dyn KeyLayout, path: &[TouchSample]) -> Vec<KeyHit> {
    let mut keys = Vec::new();
    let mut last: Option<KeyId> = None;
    for (i, sample) in path.iter().enumerate() {
        let Some(key) = layout.key_at(sample.x, sample.y) else {
            continue;
        };
        if !key.is_alphabetic() {
            continue;
        }
        if last == Some(key) {
            continue;
        }
        keys.push(KeyHit {
            key,
            sample_index: i,
        });
        last = Some(key);
    }
    keys
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::QwertyGrid;

    fn grid() -> QwertyGrid {
        QwertyGrid::new(1000.0, 300.0)
    }

    /// Drive a full gesture through key centers with one sample per key.
    fn run_swipe(keys: &[char], step_ms: u64) -> PointerResponse {
        let grid = grid();
        let mut tracker = GestureTracker::new();
        let centers: Vec<(f32, f32)> = keys.iter().map(|&k| grid.key_center(k).unwrap()).collect();

        let mut t = 0;
        tracker.on_pointer_down(centers[0].0, centers[0].1, t);
        for &(x, y) in &centers[1..] {
            t += step_ms;
            tracker.on_pointer_move(x, y, t);
        }
        let (x, y) = centers[centers.len() - 1];
        tracker.on_pointer_up(&grid, x, y, t + step_ms)
    }

    #[test]
    fn test_tap_is_not_handled() {
        let grid = grid();
        let mut tracker = GestureTracker::new();
        tracker.on_pointer_down(100.0, 50.0, 0);
        // small jitter stays below the start threshold
        let resp = tracker.on_pointer_move(110.0, 55.0, 20);
        assert!(!resp.handled);
        let resp = tracker.on_pointer_up(&grid, 110.0, 55.0, 40);
        assert!(!resp.handled);
        assert!(resp.swipe.is_none());
        assert!(!tracker.is_in_progress());
    }

    #[test]
    fn test_move_past_threshold_starts_tracking() {
        let mut tracker = GestureTracker::new();
        tracker.on_pointer_down(100.0, 50.0, 0);
        let resp = tracker.on_pointer_move(145.0, 50.0, 20);
        assert!(!resp.handled, "45 units is below the start threshold");
        let resp = tracker.on_pointer_move(160.0, 50.0, 40);
        assert!(resp.handled);
        assert!(matches!(resp.redraw, RedrawAction::Path(_)));
        assert!(tracker.is_in_progress());
    }

    #[test]
    fn test_short_duration_emits_nothing() {
        // long path, but the whole gesture takes 100 ms
        let resp = run_swipe(&['q', 'p'], 50);
        assert!(resp.handled);
        assert!(resp.swipe.is_none());
    }

    #[test]
    fn test_short_distance_emits_nothing() {
        let grid = grid();
        let mut tracker = GestureTracker::new();
        tracker.on_pointer_down(100.0, 50.0, 0);
        tracker.on_pointer_move(160.0, 50.0, 200);
        let resp = tracker.on_pointer_up(&grid, 170.0, 50.0, 400);
        assert!(resp.handled);
        assert!(resp.swipe.is_none(), "70 units is below the distance floor");
    }

    #[test]
    fn test_valid_swipe_emits_letter_sequence() {
        let resp = run_swipe(&['h', 'e', 'l', 'o'], 150);
        let swipe = resp.swipe.expect("swipe should resolve");
        let letters: Vec<char> = swipe.keys.iter().map(|h| h.key).collect();
        assert_eq!(letters, vec!['h', 'e', 'l', 'o']);
        assert!(swipe.duration_ms >= MIN_SWIPE_TIME_MS);
        assert!(swipe.distance >= MIN_SWIPE_DISTANCE);
    }

    #[test]
    fn test_no_consecutive_duplicate_keys() {
        let grid = grid();
        let mut tracker = GestureTracker::new();
        let (hx, hy) = grid.key_center('h').unwrap();
        let (ex, ey) = grid.key_center('e').unwrap();
        tracker.on_pointer_down(hx, hy, 0);
        // wander within 'h' after crossing the start threshold via 'e'
        tracker.on_pointer_move(ex, ey, 100);
        tracker.on_pointer_move(ex + 5.0, ey, 200);
        tracker.on_pointer_move(hx, hy, 300);
        let resp = tracker.on_pointer_up(&grid, hx + 5.0, hy, 400);
        let swipe = resp.swipe.expect("swipe should resolve");
        let letters: Vec<char> = swipe.keys.iter().map(|h| h.key).collect();
        assert_eq!(letters, vec!['h', 'e', 'h']);
        for pair in letters.windows(2) {
            assert_ne!(pair[0], pair[1]);
        }
    }

    #[test]
    fn test_resolution_misses_are_skipped() {
        use crate::geometry::{FrameLayout, KeyFrame};
        // single key in an otherwise empty layout
        let layout = FrameLayout::new(vec![KeyFrame {
            key: 'a',
            x: 0.0,
            y: 0.0,
            width: 50.0,
            height: 50.0,
        }]);
        let mut tracker = GestureTracker::new();
        tracker.on_pointer_down(10.0, 10.0, 0);
        tracker.on_pointer_move(200.0, 10.0, 200);
        let resp = tracker.on_pointer_up(&layout, 400.0, 10.0, 400);
        let swipe = resp.swipe.expect("swipe should resolve");
        // only the first sample hit a key
        assert_eq!(swipe.keys.len(), 1);
        assert_eq!(swipe.keys[0].key, 'a');
        assert_eq!(swipe.keys[0].sample_index, 0);
    }

    #[test]
    fn test_cancel_discards_everything() {
        let mut tracker = GestureTracker::new();
        tracker.on_pointer_down(100.0, 50.0, 0);
        tracker.on_pointer_move(300.0, 50.0, 200);
        assert!(tracker.is_in_progress());
        let resp = tracker.on_pointer_cancel();
        assert!(resp.handled);
        assert_eq!(resp.redraw, RedrawAction::Clear);
        assert!(resp.swipe.is_none());
        assert!(!tracker.is_in_progress());

        // the next up is a plain tap again
        let resp = tracker.on_pointer_up(&grid(), 300.0, 50.0, 300);
        assert!(!resp.handled);
    }

    #[test]
    fn test_direction_labels() {
        fn dir(dx: f32, dy: f32) -> SwipeDirection {
            let first = TouchSample {
                x: 0.0,
                y: 0.0,
                t_ms: 0,
            };
            let last = TouchSample {
                x: dx,
                y: dy,
                t_ms: 1,
            };
            direction_of(first, last)
        }
        assert_eq!(dir(10.0, 2.0), SwipeDirection::Right);
        assert_eq!(dir(-10.0, 2.0), SwipeDirection::Left);
        assert_eq!(dir(2.0, 10.0), SwipeDirection::Down);
        assert_eq!(dir(2.0, -10.0), SwipeDirection::Up);
        // ties break toward horizontal
        assert_eq!(dir(10.0, 10.0), SwipeDirection::Right);
        assert_eq!(dir(-10.0, -10.0), SwipeDirection::Left);
    }

    #[test]
    fn test_path_cleared_after_completion() {
        let grid = grid();
        let mut tracker = GestureTracker::new();
        tracker.on_pointer_down(100.0, 50.0, 0);
        tracker.on_pointer_move(400.0, 50.0, 200);
        tracker.on_pointer_up(&grid, 400.0, 50.0, 400);
        // a fresh move without a down is ignored
        let resp = tracker.on_pointer_move(500.0, 50.0, 500);
        assert!(!resp.handled);
        assert!(!tracker.is_in_progress());
    }
}
