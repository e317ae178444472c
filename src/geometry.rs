//! Key-layout geometry: resolving a touch position to the key under it.
//!
//! The host keyboard view owns the real geometry. The engine only depends on
//! the [`KeyLayout`] seam: [`FrameLayout`] wraps key rectangles reported by
//! the host, [`QwertyGrid`] is a normalized three-row grid used by tests and
//! the replay tooling.

/// A key identifier: the character the key produces in its unshifted state.
pub type KeyId = char;

/// Resolves positions to keys.
pub trait KeyLayout {
    /// The key occupying `(x, y)`, or `None` between keys or off the board.
    fn key_at(&self, x: f32, y: f32) -> Option<KeyId>;
}

/// One key rectangle as reported by the host view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeyFrame {
    pub key: KeyId,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl KeyFrame {
    fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x && x < self.x + self.width && y >= self.y && y < self.y + self.height
    }
}

/// Layout backed by a flat list of host key frames. An empty layout resolves
/// nothing, which makes every sample a resolution miss.
#[derive(Debug, Default)]
pub struct FrameLayout {
    frames: Vec<KeyFrame>,
}

impl FrameLayout {
    pub fn new(frames: Vec<KeyFrame>) -> Self {
        Self { frames }
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

impl KeyLayout for FrameLayout {
    fn key_at(&self, x: f32, y: f32) -> Option<KeyId> {
        self.frames.iter().find(|f| f.contains(x, y)).map(|f| f.key)
    }
}

const ROWS: [&[u8]; 3] = [b"qwertyuiop", b"asdfghjkl", b"zxcvbnm"];

/// Three-row QWERTY grid scaled to `width` by `height`. Rows split the
/// height in thirds, keys split each row evenly.
#[derive(Debug, Clone, Copy)]
pub struct QwertyGrid {
    width: f32,
    height: f32,
}

impl QwertyGrid {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Center position of `key`, if it is on the grid. Used to synthesize
    /// swipe paths in tooling.
    pub fn key_center(&self, key: KeyId) -> Option<(f32, f32)> {
        for (row_idx, row) in ROWS.iter().enumerate() {
            if let Some(col) = row.iter().position(|&b| b as char == key) {
                let key_w = self.width / row.len() as f32;
                let key_h = self.height / ROWS.len() as f32;
                return Some(((col as f32 + 0.5) * key_w, (row_idx as f32 + 0.5) * key_h));
            }
        }
        None
    }
}

impl KeyLayout for QwertyGrid {
    fn key_at(&self, x: f32, y: f32) -> Option<KeyId> {
        if x < 0.0 || y < 0.0 || x >= self.width || y >= self.height {
            return None;
        }
        let row_idx = (((y / self.height) * ROWS.len() as f32) as usize).min(ROWS.len() - 1);
        let row = ROWS[row_idx];
        let col = (((x / self.width) * row.len() as f32) as usize).min(row.len() - 1);
        Some(row[col] as char)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qwerty_corners() {
        let grid = QwertyGrid::new(1000.0, 300.0);
        assert_eq!(grid.key_at(1.0, 1.0), Some('q'));
        assert_eq!(grid.key_at(999.0, 1.0), Some('p'));
        assert_eq!(grid.key_at(1.0, 299.0), Some('z'));
        assert_eq!(grid.key_at(999.0, 299.0), Some('m'));
    }

    #[test]
    fn test_qwerty_out_of_bounds() {
        let grid = QwertyGrid::new(1000.0, 300.0);
        assert_eq!(grid.key_at(-1.0, 10.0), None);
        assert_eq!(grid.key_at(10.0, 300.0), None);
        assert_eq!(grid.key_at(1000.0, 10.0), None);
    }

    #[test]
    fn test_qwerty_center_resolves_to_key() {
        let grid = QwertyGrid::new(1000.0, 300.0);
        for row in ROWS {
            for &b in row {
                let key = b as char;
                let (x, y) = grid.key_center(key).unwrap();
                assert_eq!(grid.key_at(x, y), Some(key));
            }
        }
    }

    #[test]
    fn test_frame_layout_hit_and_miss() {
        let layout = FrameLayout::new(vec![
            KeyFrame {
                key: 'a',
                x: 0.0,
                y: 0.0,
                width: 10.0,
                height: 10.0,
            },
            KeyFrame {
                key: 'b',
                x: 12.0,
                y: 0.0,
                width: 10.0,
                height: 10.0,
            },
        ]);
        assert_eq!(layout.key_at(5.0, 5.0), Some('a'));
        assert_eq!(layout.key_at(13.0, 5.0), Some('b'));
        // the gap between keys resolves to nothing
        assert_eq!(layout.key_at(11.0, 5.0), None);
    }

    #[test]
    fn test_empty_frame_layout_resolves_nothing() {
        let layout = FrameLayout::default();
        assert!(layout.is_empty());
        assert_eq!(layout.key_at(5.0, 5.0), None);
    }
}
