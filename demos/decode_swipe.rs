//! Swipe a word across the built-in QWERTY grid and print what the engine
//! makes of it: the decoded word, then the suggestions a fresh word would
//! start from after the commit.
//!
//! Run with: cargo run --example decode_swipe

use std::sync::Arc;

use glide_engine::geometry::QwertyGrid;
use glide_engine::gesture::GestureTracker;
use glide_engine::suggest::{LexiconTables, SuggestionEngine, SuggestionRequest};
use glide_engine::swipe::SwipeDecoder;

fn main() {
    let grid = QwertyGrid::new(1000.0, 300.0);
    let mut tracker = GestureTracker::new();

    // Drag the pointer over h, e, l, o, key center to key center.
    let keys = ['h', 'e', 'l', 'o'];
    let centers: Vec<(f32, f32)> = keys
        .iter()
        .filter_map(|&k| grid.key_center(k))
        .collect();

    let mut t = 0;
    tracker.on_pointer_down(centers[0].0, centers[0].1, t);
    for &(x, y) in &centers[1..] {
        t += 150;
        tracker.on_pointer_move(x, y, t);
    }
    let (last_x, last_y) = centers[centers.len() - 1];
    let resp = tracker.on_pointer_up(&grid, last_x, last_y, t + 150);

    let Some(swipe) = resp.swipe else {
        println!("no swipe resolved");
        return;
    };

    let letters: String = swipe.keys.iter().map(|h| h.key).collect();
    let decoder = SwipeDecoder::default();
    let word = decoder.decode(&swipe.keys);
    println!(
        "keys {letters:?} decoded as {word:?} ({:?}, {} ms, {:.0} units)",
        swipe.direction, swipe.duration_ms, swipe.distance
    );

    let engine = SuggestionEngine::new(Arc::new(LexiconTables::default()));
    let suggestions = engine.suggest(&SuggestionRequest {
        current_word: String::new(),
        preceding_context: vec![word],
    });
    println!("suggestions after the commit:");
    for s in suggestions {
        println!("  {} ({:.2})", s.text, s.confidence);
    }
}
